// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Helper for setting up test directories with images, sidecars and
//! archives.

use std::{
  collections::{HashMap, HashSet, VecDeque},
  env,
  fs::{self, File},
  io::Write,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use exif::Tag;
use image::ImageFormat;
use zip::{ZipWriter, write::SimpleFileOptions};

use super::{make_image, make_tiff};
use crate::io;

static TEST_ROOT: LazyLock<PathBuf> =
  LazyLock::new(|| env::temp_dir().join(format!("{}_tests", env!("CARGO_PKG_NAME"))));

/// Helper for creating directories for tests needing actual files.
pub struct TestDir {
  root: PathBuf,
}

impl TestDir {
  /// Creates a new directory under `TEST_ROOT` for tests involving file
  /// operations. Note: Prefer using `test_dir!()` macro.
  pub fn new(
    test_path: PathBuf,
    images: Vec<(&'static str, HashMap<&'static str, &'static str>)>,
  ) -> Self {
    let root_rel = TEST_ROOT.join(test_path);
    if root_rel.exists() {
      fs::remove_dir_all(&root_rel).unwrap();
    }
    fs::create_dir_all(&root_rel).unwrap();

    let root = root_rel.canonicalize().unwrap();

    let d = Self { root };
    for (image, tags) in images {
      d.add_file(image, create_image(image, &tags));
    }

    d
  }

  /// Writes `contents` to `file`, creating parent directories as needed.
  pub fn add_file(&self, file: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
    let full_path = self.get_path(file);

    assert!(!full_path.exists(), "File already exists: {full_path:?}");
    fs::create_dir_all(full_path.parent().unwrap()).unwrap();
    fs::write(full_path, contents).unwrap();
  }

  /// Writes a ZIP archive holding `entries`. Entry names ending in `/` are
  /// added as directories.
  pub fn add_zip(&self, file: impl AsRef<Path>, entries: &[(&str, &[u8])]) {
    let full_path = self.get_path(file);
    fs::create_dir_all(full_path.parent().unwrap()).unwrap();

    let mut zip = ZipWriter::new(File::create(full_path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
      if name.ends_with('/') {
        zip.add_directory(*name, options).unwrap();
      } else {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents).unwrap();
      }
    }
    zip.finish().unwrap();
  }

  pub fn files(&self) -> HashSet<PathBuf> {
    traverse_dir(&self.root)
  }

  pub fn get_path(&self, file: impl AsRef<Path>) -> PathBuf {
    self.root.join(file)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}

/// Encodes an image whose format follows the extension of `path`, with
/// ASCII `tags` (e.g. `"Make": "TestCam"`) in its EXIF. No tags means no EXIF
/// block at all.
pub fn create_image(path: impl AsRef<Path>, tags: &HashMap<&str, &str>) -> Vec<u8> {
  let path = path.as_ref();
  let format = ImageFormat::from_path(path).unwrap_or_else(|_| panic!("Unsupported image: {path:?}"));
  let image = make_image(format);

  if tags.is_empty() {
    return image;
  }

  let mut fields = tags
    .iter()
    .map(|(k, v)| {
      let tag = match *k {
        "Artist" => Tag::Artist,
        "DateTimeOriginal" => Tag::DateTimeOriginal,
        "GPSLatitudeRef" => Tag::GPSLatitudeRef,
        "GPSMapDatum" => Tag::GPSMapDatum,
        "ImageDescription" => Tag::ImageDescription,
        "Make" => Tag::Make,
        "Model" => Tag::Model,
        _ => panic!("Unsupported tag: {k}"),
      };
      (tag, *v)
    })
    .collect::<Vec<_>>();
  fields.sort_by_key(|(t, _)| t.number());

  io::embed_exif(image, make_tiff(&fields, false)).unwrap()
}

fn traverse_dir(root: impl AsRef<Path>) -> HashSet<PathBuf> {
  let mut dirs = VecDeque::from([root.as_ref().to_owned()]);
  let mut files = HashSet::new();

  while let Some(dir) = dirs.pop_front() {
    for entry in fs::read_dir(dir).unwrap().map(Result::unwrap) {
      let file_type = entry.file_type().unwrap();
      if file_type.is_dir() {
        dirs.push_back(entry.path());
      } else if file_type.is_file() {
        files.insert(entry.path());
      } else {
        panic!("Unexpected file type: {file_type:?}");
      }
    }
  }

  files
}

#[macro_export]
macro_rules! test_path {
  () => {{
    // HACK: Get module hierarchy for caller.
    let mut function = $crate::testing::type_of(|| ()).rsplit("::");
    // 0th element is `{closure}`.
    let case = function.nth(1).unwrap();
    let suite = function.next().unwrap();
    let module = function.next().unwrap();

    std::path::PathBuf::from(format!("{module}/{suite}/{case}"))
  }};
}

/// Creates a `TestDir` for the calling test, holding the listed images.
#[macro_export]
macro_rules! test_dir {
  ($($file:literal: {$($key:literal: $value:literal),* $(,)?}),* $(,)?) => {{
    let images = vec![
      $(($file, std::collections::HashMap::from([$(($key, $value)),*]))),*
    ];
    TestDir::new(test_path!(), images)
  }};
}
