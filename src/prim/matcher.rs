// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Finds the sidecar describing an image, by file name.

use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
};

use clap::ValueEnum;
use regex::Regex;

use crate::config::constants::SIDECAR_SUFFIX;

/// How an image's file name is compared against sidecar paths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
  /// Interpolates the image name, unescaped, into `^.*NAME\.supplemental-metadata\.json$`
  /// and matches it against the whole sidecar path. Regex metacharacters in
  /// the name (`.`, `(`, `+`, ...) are interpreted, so this can both miss and
  /// over-match. Braces outside a `{n,m}` repetition match literally.
  #[default]
  Pattern,
  /// Sidecar file name must equal the image name plus the sidecar suffix.
  /// Recommended.
  Literal,
}

/// Returns the first of `sidecars` naming `image_name` as its subject, or
/// `None` if there isn't one. Errors only if `Pattern` mode produces an
/// invalid regex.
pub fn find_sidecar<'a>(
  image_name: &str,
  sidecars: &'a [PathBuf],
  mode: MatchMode,
) -> Result<Option<&'a Path>, String> {
  let matches: Vec<&Path> = match mode {
    MatchMode::Pattern => {
      let re = Regex::new(&format!(
        "^.*{}{}$",
        literal_braces(image_name),
        regex::escape(SIDECAR_SUFFIX)
      ))
      .map_err(|e| {
        let e = e.to_string();
        let e = e.split_whitespace().collect::<Vec<_>>().join(" ");
        format!("{image_name}: Cannot build sidecar pattern ({e}).")
      })?;

      sidecars
        .iter()
        .filter(|s| re.is_match(&s.to_string_lossy()))
        .map(PathBuf::as_path)
        .collect()
    }
    MatchMode::Literal => {
      let expected = format!("{image_name}{SIDECAR_SUFFIX}");

      sidecars
        .iter()
        .filter(|s| s.file_name() == Some(OsStr::new(&expected)))
        .map(PathBuf::as_path)
        .collect()
    }
  };

  if matches.len() > 1 {
    log::warn!(
      "{image_name}: {} candidate sidecars. Using {}.",
      matches.len(),
      matches[0].display()
    );
  }

  Ok(matches.first().copied())
}

/// Escapes each brace in `name` that doesn't belong to a `{n}`, `{n,}`, `{,m}`
/// or `{n,m}` repetition, so that it matches literally. `regex` rejects such
/// braces, while the usual regex dialects read them as plain characters.
fn literal_braces(name: &str) -> String {
  let mut pattern = String::with_capacity(name.len());
  let mut chars = name.char_indices();

  while let Some((i, c)) = chars.next() {
    match c {
      '\\' => {
        pattern.push(c);
        if let Some((_, next)) = chars.next() {
          pattern.push(next);
        }
      }
      '{' => match repetition(&name[i..]) {
        Some((repetition, len)) => {
          pattern.push_str(&repetition);
          // Skip the rest of the repetition, which is all ASCII.
          for _ in 1..len {
            chars.next();
          }
        }
        None => pattern.push_str(r"\{"),
      },
      '}' => pattern.push_str(r"\}"),
      _ => pattern.push(c),
    }
  }

  pattern
}

/// Parses a repetition at the start of `s`, returning it in a form `regex`
/// accepts, along with its length in `s`.
fn repetition(s: &str) -> Option<(String, usize)> {
  let end = s.find('}')?;
  let body = &s[1..end];
  let (min, max) = match body.split_once(',') {
    Some((min, max)) => (min, Some(max)),
    None => (body, None),
  };

  let is_number = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
  if !is_number(min) || !max.is_none_or(is_number) || (max.is_none() && min.is_empty()) {
    return None;
  }

  let min = if min.is_empty() { "0" } else { min };
  let repetition = match max {
    Some(max) => format!("{{{min},{max}}}"),
    None => format!("{{{min}}}"),
  };

  Some((repetition, end + 1))
}
