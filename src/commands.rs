// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Top-level restore command.

use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
};

use crate::{config::Config, io, prim, prim::MatchMode, scan, unpack};

/// How often, in images, progress is logged at info level.
const PROGRESS_INTERVAL: usize = 100;

/// Counts for a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
  /// Images found after unpacking.
  pub images:  usize,
  /// Images with a sidecar.
  pub matched: usize,
  /// Images whose metadata was (or, in a dry run, would be) rewritten.
  pub updated: usize,
  /// Images that hit an error. Each is logged individually.
  pub failed:  usize,
}

/// Unpacks the archives in `config.archive_dir`, then restores the metadata
/// of every image found from its sidecar.
///
/// Only setup and unpacking errors are returned. Per-image errors are logged
/// and counted, and the run carries on.
pub fn restore(config: &Config) -> Result<Summary, String> {
  log::info!(
    "Restoring metadata from {} into {}.",
    config.archive_dir.display(),
    config.output_dir.display()
  );

  unpack::unpack_archives(&config.archive_dir, &config.output_dir)?;

  let images = scan::find_images(&config.output_dir)?;
  let sidecars = scan::find_sidecars(&config.output_dir)?;
  log::info!("Found {} images and {} sidecars.", images.len(), sidecars.len());

  Ok(edit_images(&images, &sidecars, config.match_mode, config.dry_run))
}

/// What happened to one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
  /// No sidecar.
  Unmatched,
  /// Sidecar found, but it held nothing to restore.
  Unchanged,
  Updated,
}

/// Restores each of `images` from its sidecar in `sidecars`.
pub fn edit_images(
  images: &[PathBuf],
  sidecars: &[PathBuf],
  match_mode: MatchMode,
  dry_run: bool,
) -> Summary {
  let mut summary = Summary {
    images: images.len(),
    ..Summary::default()
  };

  for (i, image) in images.iter().enumerate() {
    if reports_progress(i, images.len()) {
      log::info!("Editing image {}/{}: {}", i + 1, images.len(), image.display());
    } else {
      log::debug!("Editing image {}/{}: {}", i + 1, images.len(), image.display());
    }

    match edit_image(image, sidecars, match_mode, dry_run) {
      Ok(Outcome::Unmatched) => {}
      Ok(Outcome::Unchanged) => summary.matched += 1,
      Ok(Outcome::Updated) => {
        summary.matched += 1;
        summary.updated += 1;
      }
      Err((matched, e)) => {
        log::error!("{e}");
        if matched {
          summary.matched += 1;
        }
        summary.failed += 1;
      }
    }
  }

  summary
}

/// Whether the `index`th of `total` images is logged at info level: the first,
/// the last, and every `PROGRESS_INTERVAL`th.
fn reports_progress(index: usize, total: usize) -> bool {
  let n = index + 1;
  n == 1 || n == total || n % PROGRESS_INTERVAL == 0
}

/// Matches and updates one image. Errors carry whether a sidecar was matched,
/// and a single-line diagnostic.
fn edit_image(
  image: &Path,
  sidecars: &[PathBuf],
  match_mode: MatchMode,
  dry_run: bool,
) -> Result<Outcome, (bool, String)> {
  let Some(sidecar) = match_sidecar(image, sidecars, match_mode).map_err(|e| (false, e))? else {
    log::debug!("{}: No sidecar. Skipping.", image.display());
    return Ok(Outcome::Unmatched);
  };

  match io::update_image(image, sidecar, dry_run) {
    Ok(true) => Ok(Outcome::Updated),
    Ok(false) => Ok(Outcome::Unchanged),
    Err(e) => Err((
      true,
      format!(
        "Image update error: Image File: {} | Metadata File: {} | Error: {}",
        image.display(),
        sidecar.display(),
        e.split_whitespace().collect::<Vec<_>>().join(" ")
      ),
    )),
  }
}

/// Finds the sidecar for one image by its file name.
fn match_sidecar<'a>(
  image: &Path,
  sidecars: &'a [PathBuf],
  match_mode: MatchMode,
) -> Result<Option<&'a Path>, String> {
  let name = image
    .file_name()
    .map(OsStr::to_string_lossy)
    .ok_or(format!("{}: No file name.", image.display()))?;

  prim::find_sidecar(&name, sidecars, match_mode).map_err(|e| format!("{}: {e}", image.display()))
}
