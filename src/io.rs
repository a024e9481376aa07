// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Functions for reading sidecars and rewriting image metadata.
//!
//! Images are edited in their own container: the EXIF segment (JPEG) or
//! `eXIf` chunk (PNG) is swapped out and everything else, including the pixel
//! data, is written back untouched.

use std::{fs, path::Path};

use img_parts::{Bytes, ImageEXIF, jpeg::Jpeg, png::Png};

use crate::prim::{ExifUpdate, Sidecar};

const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8];
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// An image container that can hold an EXIF block.
enum Container {
  Jpeg(Jpeg),
  Png(Png),
}

impl Container {
  /// Detects the container from its signature, not the file extension.
  fn parse(image: Vec<u8>) -> Result<Self, String> {
    if image.starts_with(JPEG_SIGNATURE) {
      Jpeg::from_bytes(image.into())
        .map(Self::Jpeg)
        .map_err(|e| format!("Invalid JPEG ({e})."))
    } else if image.starts_with(PNG_SIGNATURE) {
      Png::from_bytes(image.into())
        .map(Self::Png)
        .map_err(|e| format!("Invalid PNG ({e})."))
    } else {
      Err("Unsupported image format.".to_string())
    }
  }

  fn exif(&self) -> Option<Bytes> {
    match self {
      Self::Jpeg(jpeg) => jpeg.exif(),
      Self::Png(png) => png.exif(),
    }
  }

  fn set_exif(&mut self, exif: Vec<u8>) {
    match self {
      Self::Jpeg(jpeg) => jpeg.set_exif(Some(exif.into())),
      Self::Png(png) => png.set_exif(Some(exif.into())),
    }
  }

  fn into_bytes(self) -> Vec<u8> {
    match self {
      Self::Jpeg(jpeg) => jpeg.encoder().bytes().to_vec(),
      Self::Png(png) => png.encoder().bytes().to_vec(),
    }
  }
}

/// Reads and parses a sidecar.
pub fn read_sidecar(path: impl AsRef<Path>) -> Result<Sidecar, String> {
  let path = path.as_ref();
  let json = fs::read(path).map_err(|e| format!("{}: Failed to read sidecar ({e}).", path.display()))?;

  Sidecar::from_json(json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Returns the raw EXIF (TIFF) block embedded in `image`, if any.
#[cfg(test)]
pub fn embedded_exif(image: Vec<u8>) -> Result<Option<Vec<u8>>, String> {
  Ok(Container::parse(image)?.exif().map(|e| e.to_vec()))
}

/// Replaces the EXIF block of `image` with `exif`, adding one if needed.
#[cfg(test)]
pub fn embed_exif(image: Vec<u8>, exif: Vec<u8>) -> Result<Vec<u8>, String> {
  let mut container = Container::parse(image)?;
  container.set_exif(exif);

  Ok(container.into_bytes())
}

/// Applies `update` to the EXIF of an in-memory image, returning the new image
/// bytes. Fails without producing anything if the existing EXIF block can't be
/// parsed, rather than discarding it.
pub fn apply_update(image: Vec<u8>, update: &ExifUpdate) -> Result<Vec<u8>, String> {
  let mut container = Container::parse(image)?;

  let existing = container
    .exif()
    .map(|raw| {
      exif::Reader::new()
        .read_raw(raw.to_vec())
        .map_err(|e| format!("Unreadable EXIF ({e})."))
    })
    .transpose()?;
  if existing.is_none() {
    log::trace!("No existing EXIF. Creating new block.");
  }

  container.set_exif(update.rewrite(existing.as_ref())?);

  Ok(container.into_bytes())
}

/// Restores `image`'s metadata from `sidecar`, overwriting `image` in place.
/// Returns whether the sidecar held anything to restore.
///
/// In `dry_run` mode, the new image is built but not written.
pub fn update_image(
  image: impl AsRef<Path>,
  sidecar: impl AsRef<Path>,
  dry_run: bool,
) -> Result<bool, String> {
  let image = image.as_ref();

  let update = ExifUpdate::from_sidecar(&read_sidecar(&sidecar)?)
    .map_err(|e| format!("{}: {e}", sidecar.as_ref().display()))?;
  if update.is_empty() {
    log::debug!("{}: Nothing to restore.", image.display());
    return Ok(false);
  }

  let original = fs::read(image).map_err(|e| format!("{}: Failed to read image ({e}).", image.display()))?;
  let updated = apply_update(original, &update).map_err(|e| format!("{}: {e}", image.display()))?;

  if dry_run {
    log::info!("{}: Would restore {update}.", image.display());
    return Ok(true);
  }

  fs::write(image, updated).map_err(|e| format!("{}: Failed to write image ({e}).", image.display()))?;
  log::debug!("{}: Restored {update}.", image.display());

  Ok(true)
}
