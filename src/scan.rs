// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Finds the images and sidecars of an unpacked Takeout export.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config;

/// Every image under `root`, recursively, in sorted order.
pub fn find_images(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, String> {
  find_files(root.as_ref(), config::path_is_image)
}

/// Every sidecar under `root`, recursively, in sorted order.
pub fn find_sidecars(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, String> {
  find_files(root.as_ref(), config::path_is_sidecar)
}

/// Walks `root`, collecting files accepted by `filter`. Hidden files and
/// directories are not visited, and unreadable entries are logged and
/// skipped.
fn find_files(root: &Path, filter: fn(&Path) -> bool) -> Result<Vec<PathBuf>, String> {
  if !root.is_dir() {
    return Err(format!("{}: Not a directory.", root.display()));
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(root).into_iter().filter_entry(|e| e.depth() == 0 || !is_hidden(e)) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        log::warn!("{}: Skipping unreadable entry ({e}).", root.display());
        continue;
      }
    };

    if entry.file_type().is_file() && filter(entry.path()) {
      log::trace!("{}: Found.", entry.path().display());
      files.push(entry.into_path());
    }
  }
  files.sort();

  Ok(files)
}

/// Whether `entry`'s name starts with a dot.
fn is_hidden(entry: &DirEntry) -> bool {
  entry.file_name().to_str().is_some_and(|n| n.starts_with('.'))
}
