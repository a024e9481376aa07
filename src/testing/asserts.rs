// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Extra asserts to make tests shorter / more readable.

#[macro_export]
macro_rules! assert_dir {
  ($dir:expr, [$($path:literal),* $(,)?]) => {{
    let actual = $dir.files();
    let expected = std::collections::HashSet::from([$($dir.get_path($path)),*]);

    assert!(
      actual == expected,
      "Directory contents do not match:\nActual:   {actual:#?}\nExpected: {expected:#?}"
    );
  }}
}

#[macro_export]
macro_rules! assert_err {
  ($res:expr, $msg:literal) => {{
    let Err(e) = $res else {
      panic!("Unexpected `Ok`.");
    };

    assert!(
      e.contains($msg),
      "Error message did not contain expected substring.\nActual:\n{e}\nExpected:\n{}",
      $msg
    );
  }};
}

/// Checks an ASCII EXIF tag, given by its `exif::Tag` constant name.
#[macro_export]
macro_rules! assert_tag {
  // Tag should not be present.
  ($dir:expr, $file:literal, $tag:ident, None) => {{
    let actual = $crate::testing::read_ascii($dir.get_path($file), exif::Tag::$tag);

    if let Some(actual) = actual {
      panic!(
        "{:?}:\nUnexpected `{}`:\n\tActual:   `{}`\n\tExpected: `None`",
        $dir.get_path($file),
        stringify!($tag),
        actual
      );
    }
  }};

  ($dir:expr, $file:literal, $tag:ident, $expected:literal) => {{
    let Some(actual) = $crate::testing::read_ascii($dir.get_path($file), exif::Tag::$tag) else {
      panic!(
        "{:?}:\nUnexpected `{}`:\n\tActual:   `None`\n\tExpected: `{}`",
        $dir.get_path($file),
        stringify!($tag),
        $expected
      );
    };

    assert!(
      actual == $expected,
      "{:?}:\nUnexpected `{}`:\n\tActual:   `{}`\n\tExpected: `{}`",
      $dir.get_path($file),
      stringify!($tag),
      actual,
      $expected,
    );
  }};
}
