// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Conversions between Takeout's JSON representations and EXIF's.

use chrono::DateTime;

/// EXIF date & time format, as used by `DateTimeOriginal` and friends.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Denominator used for the seconds rational of a DMS coordinate.
pub const DMS_SECONDS_DENOMINATOR: u32 = 100;

/// A coordinate magnitude split into degrees, minutes and seconds, with the
/// seconds held in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
  pub degrees:      u32,
  pub minutes:      u32,
  pub centiseconds: u32,
}

impl Dms {
  /// Splits an unsigned decimal degree value into DMS.
  ///
  /// Seconds are rounded to 6 decimal places first, then scaled to hundredths
  /// and rounded again, so e.g. `30.239999999` is stored as `3024/100`.
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  pub fn from_decimal(value: f64) -> Result<Self, String> {
    if !value.is_finite() || !(0.0..=180.0).contains(&value) {
      return Err(format!("Coordinate out of range ({value})."));
    }

    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.0).trunc();
    let seconds = round_to((value - degrees - minutes / 60.0) * 3600.0, 6);

    // Range checked above, so these all fit.
    Ok(Self {
      degrees:      degrees as u32,
      minutes:      minutes as u32,
      centiseconds: (seconds * f64::from(DMS_SECONDS_DENOMINATOR)).round().max(0.0) as u32,
    })
  }

  /// Converts back to unsigned decimal degrees.
  pub fn to_decimal(self) -> f64 {
    dms_to_lat_lon(
      f64::from(self.degrees),
      f64::from(self.minutes),
      f64::from(self.centiseconds) / f64::from(DMS_SECONDS_DENOMINATOR),
    )
  }
}

/// Converts degrees, minutes and seconds to latitude and longitude.
pub fn dms_to_lat_lon(deg: f64, min: f64, sec: f64) -> f64 {
  deg + (min / 60.0) + (sec / 3600.0)
}

/// Picks the hemisphere reference for a signed latitude.
pub fn latitude_ref(latitude: f64) -> &'static str {
  if latitude >= 0.0 { "N" } else { "S" }
}

/// Picks the hemisphere reference for a signed longitude.
pub fn longitude_ref(longitude: f64) -> &'static str {
  if longitude >= 0.0 { "E" } else { "W" }
}

/// Formats Unix epoch seconds as an EXIF date & time, in UTC.
pub fn format_timestamp(timestamp: i64) -> Result<String, String> {
  DateTime::from_timestamp(timestamp, 0)
    .map(|d| d.format(EXIF_DATETIME_FORMAT).to_string())
    .ok_or(format!("Timestamp `{timestamp}` is out of range."))
}

fn round_to(value: f64, places: i32) -> f64 {
  let scale = 10_f64.powi(places);
  (value * scale).round() / scale
}
