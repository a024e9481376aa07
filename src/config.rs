// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Structure for holding run configuration.

use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
};

use crate::prim::MatchMode;

pub mod constants;

pub struct Config {
  /// Directory holding the Takeout zip files.
  pub archive_dir: PathBuf,
  /// Where archives are unpacked to, and where images are edited in place.
  pub output_dir:  PathBuf,
  pub match_mode:  MatchMode,
  /// Compute updates but leave images untouched.
  pub dry_run:     bool,
}

impl Config {
  /// Builds a configuration, defaulting `output_dir` to
  /// `archive_dir/takeout_unpacked`.
  pub fn new(
    archive_dir: &Path,
    output_dir: Option<PathBuf>,
    match_mode: MatchMode,
    dry_run: bool,
  ) -> Self {
    Self {
      archive_dir: archive_dir.to_owned(),
      output_dir: output_dir.unwrap_or_else(|| archive_dir.join(constants::UNPACK_DIR_NAME)),
      match_mode,
      dry_run,
    }
  }
}

/// Whether `path` has one of the accepted image extensions.
pub fn path_is_image(path: &Path) -> bool {
  path
    .extension()
    .and_then(OsStr::to_str)
    .is_some_and(|e| constants::IMAGE_EXTENSIONS.contains(&e))
}

/// Whether `path` names a Takeout sidecar.
pub fn path_is_sidecar(path: &Path) -> bool {
  path
    .file_name()
    .and_then(OsStr::to_str)
    .is_some_and(|n| n.len() > constants::SIDECAR_SUFFIX.len() && n.ends_with(constants::SIDECAR_SUFFIX))
}

/// Whether `path` is a Takeout archive.
pub fn path_is_archive(path: &Path) -> bool {
  path.extension().is_some_and(|e| e == constants::ARCHIVE_EXTENSION)
}
