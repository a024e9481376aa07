// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Takeout JSON sidecar parsing.

use serde::Deserialize;

/// The subset of a Takeout `*.supplemental-metadata.json` file this tool
/// restores. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidecar {
  pub photo_taken_time: Option<PhotoTakenTime>,
  pub geo_data:         Option<GeoData>,
  pub description:      Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoTakenTime {
  pub timestamp: Timestamp,
}

/// Takeout writes epoch seconds as a string, but integers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
  Integer(i64),
  Text(String),
}

#[derive(Debug, Deserialize)]
pub struct GeoData {
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
}

impl Sidecar {
  /// Parses sidecar JSON.
  pub fn from_json(json: impl AsRef<[u8]>) -> Result<Self, String> {
    serde_json::from_slice(json.as_ref()).map_err(|e| format!("Invalid sidecar JSON ({e})."))
  }

  /// Capture time as Unix epoch seconds, if present.
  pub fn taken_timestamp(&self) -> Result<Option<i64>, String> {
    self
      .photo_taken_time
      .as_ref()
      .map(|t| t.timestamp.seconds())
      .transpose()
  }

  /// Signed `(latitude, longitude)`, if present. Takeout writes `0.0` for
  /// photos without a location, so a zero latitude counts as absent.
  pub fn position(&self) -> Result<Option<(f64, f64)>, String> {
    let Some(geo_data) = &self.geo_data else {
      return Ok(None);
    };
    let Some(latitude) = geo_data.latitude.filter(|l| *l != 0.0) else {
      return Ok(None);
    };
    let longitude = geo_data
      .longitude
      .ok_or(format!("Latitude ({latitude}) present without longitude."))?;

    Ok(Some((latitude, longitude)))
  }
}

impl Timestamp {
  pub fn seconds(&self) -> Result<i64, String> {
    match self {
      Self::Integer(seconds) => Ok(*seconds),
      Self::Text(text) => text
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("Invalid timestamp `{text}` ({e}).")),
    }
  }
}
