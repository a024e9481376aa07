// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Unpacking of Takeout zip archives.

use std::{
  fs::{self, File},
  io,
  path::{Path, PathBuf},
};

use zip::ZipArchive;

use crate::config;

/// Extracts every `*.zip` directly inside `archive_dir` into `dest`, keeping
/// each archive's internal layout. Archives are merged into the one tree, so
/// later archives overwrite identically named files from earlier ones.
///
/// Skips everything if `dest` already exists, returning `Ok(None)`. Otherwise
/// returns the number of files extracted.
pub fn unpack_archives(
  archive_dir: impl AsRef<Path>,
  dest: impl AsRef<Path>,
) -> Result<Option<usize>, String> {
  let archive_dir = archive_dir.as_ref();
  let dest = dest.as_ref();

  if dest.exists() {
    log::info!("{}: Already unpacked. Skipping.", dest.display());
    return Ok(None);
  }

  let archives = find_archives(archive_dir)?;
  if archives.is_empty() {
    log::warn!("{}: No archives found.", archive_dir.display());
  }

  fs::create_dir_all(dest).map_err(|e| format!("{}: Failed to create destination ({e}).", dest.display()))?;

  let mut count = 0;
  for (i, archive) in archives.iter().enumerate() {
    log::info!(
      "Unpacking archive {}/{}: {}",
      i + 1,
      archives.len(),
      archive.display()
    );
    count += extract_zip(archive, dest)?;
  }
  log::info!("Unpacked {count} files into {}.", dest.display());

  Ok(Some(count))
}

/// Archives directly inside `archive_dir`, sorted.
fn find_archives(archive_dir: &Path) -> Result<Vec<PathBuf>, String> {
  let entries = fs::read_dir(archive_dir)
    .map_err(|e| format!("{}: Failed to read archive directory ({e}).", archive_dir.display()))?;

  let mut archives = Vec::new();
  for entry in entries {
    let path = entry
      .map_err(|e| format!("{}: Failed to read archive directory ({e}).", archive_dir.display()))?
      .path();
    if path.is_file() && config::path_is_archive(&path) {
      archives.push(path);
    }
  }
  archives.sort();

  Ok(archives)
}

/// Extracts one archive, returning the number of files written. Entries that
/// would land outside `dest` are skipped.
fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize, String> {
  let file = File::open(archive_path)
    .map_err(|e| format!("{}: Failed to open archive ({e}).", archive_path.display()))?;
  let mut archive = ZipArchive::new(file)
    .map_err(|e| format!("{}: Invalid or corrupt ZIP ({e}).", archive_path.display()))?;

  let mut count = 0;
  for i in 0..archive.len() {
    let mut entry = archive
      .by_index(i)
      .map_err(|e| format!("{}: Failed to read entry {i} ({e}).", archive_path.display()))?;

    let Some(entry_path) = entry.enclosed_name() else {
      log::warn!(
        "{}: Skipping unsafe entry `{}`.",
        archive_path.display(),
        entry.name()
      );
      continue;
    };
    let output_path = dest.join(entry_path);

    if entry.is_dir() {
      fs::create_dir_all(&output_path)
        .map_err(|e| format!("{}: Failed to create directory ({e}).", output_path.display()))?;
    } else {
      if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
          .map_err(|e| format!("{}: Failed to create directory ({e}).", parent.display()))?;
      }
      let mut output = File::create(&output_path)
        .map_err(|e| format!("{}: Failed to create file ({e}).", output_path.display()))?;
      io::copy(&mut entry, &mut output)
        .map_err(|e| format!("{}: Failed to extract file ({e}).", output_path.display()))?;
      log::debug!("{}: Extracted.", output_path.display());
      count += 1;
    }
  }

  Ok(count)
}
