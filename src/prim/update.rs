// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Translation of a sidecar into EXIF fields, and rewriting of an EXIF (TIFF)
//! block with those fields.

use std::{
  fmt::{self, Display, Formatter},
  io::Cursor,
};

use exif::{Context, Exif, Field, In, Rational, Tag, Value, experimental::Writer};

use super::{Dms, Sidecar, conv};

/// Character code prefix for a UTF-16 `UserComment`.
const USER_COMMENT_UNICODE: &[u8; 8] = b"UNICODE\0";

/// GPS position in EXIF form: a hemisphere reference and unsigned DMS for each
/// axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsUpdate {
  pub latitude_ref:  &'static str,
  pub latitude:      Dms,
  pub longitude_ref: &'static str,
  pub longitude:     Dms,
}

impl GpsUpdate {
  /// Converts signed decimal degrees.
  pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
    Ok(Self {
      latitude_ref:  conv::latitude_ref(latitude),
      latitude:      Dms::from_decimal(latitude.abs())?,
      longitude_ref: conv::longitude_ref(longitude),
      longitude:     Dms::from_decimal(longitude.abs())?,
    })
  }
}

/// Everything a sidecar contributes to an image's EXIF. `None` fields leave
/// the corresponding tags untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExifUpdate {
  /// Written to both `DateTimeOriginal` and `DateTimeDigitized`.
  pub date_time:   Option<String>,
  /// Replaces the whole GPS IFD.
  pub gps:         Option<GpsUpdate>,
  /// Written to `UserComment`.
  pub description: Option<String>,
}

impl ExifUpdate {
  pub fn from_sidecar(sidecar: &Sidecar) -> Result<Self, String> {
    Ok(Self {
      date_time:   sidecar
        .taken_timestamp()?
        .map(conv::format_timestamp)
        .transpose()?,
      gps:         sidecar
        .position()?
        .map(|(latitude, longitude)| GpsUpdate::new(latitude, longitude))
        .transpose()?,
      description: sidecar.description.clone(),
    })
  }

  pub fn is_empty(&self) -> bool {
    self.date_time.is_none() && self.gps.is_none() && self.description.is_none()
  }

  /// Builds a new TIFF-format EXIF block holding every field of `existing`
  /// (if any) not covered by this update, plus this update's fields. The
  /// byte order of `existing` is kept; new blocks are big-endian.
  ///
  /// Fields are written in IFD then tag order, so rewriting a block with the
  /// same update is byte-for-byte stable.
  pub fn rewrite(&self, existing: Option<&Exif>) -> Result<Vec<u8>, String> {
    let little_endian = existing.is_some_and(Exif::little_endian);

    let mut fields: Vec<Field> = existing
      .map(|e| {
        e.fields()
          .filter(|f| !self.replaces(f.tag))
          .map(|f| Field {
            tag:     f.tag,
            ifd_num: f.ifd_num,
            value:   f.value.clone(),
          })
          .collect()
      })
      .unwrap_or_default();
    fields.extend(self.fields(little_endian));
    fields.sort_by_key(|f| (f.ifd_num.index(), f.tag.number()));

    let mut writer = Writer::new();
    for field in &fields {
      log::trace!("Writing {} ({}).", field.tag, field.ifd_num);
      writer.push_field(field);
    }
    if let Some(thumbnail) = existing.and_then(thumbnail) {
      writer.set_jpeg(thumbnail, In::THUMBNAIL);
    }

    let mut buf = Cursor::new(Vec::new());
    writer
      .write(&mut buf, little_endian)
      .map_err(|e| format!("Failed to encode EXIF ({e})."))?;

    Ok(buf.into_inner())
  }

  /// Whether an existing tag is overwritten (or, for GPS, dropped) by this
  /// update.
  fn replaces(&self, tag: Tag) -> bool {
    match tag {
      Tag::DateTimeOriginal | Tag::DateTimeDigitized => self.date_time.is_some(),
      Tag::UserComment => self.description.is_some(),
      _ => tag.context() == Context::Gps && self.gps.is_some(),
    }
  }

  fn fields(&self, little_endian: bool) -> Vec<Field> {
    let mut fields = Vec::new();

    if let Some(date_time) = &self.date_time {
      for tag in [Tag::DateTimeOriginal, Tag::DateTimeDigitized] {
        fields.push(ascii_field(tag, date_time));
      }
    }

    if let Some(gps) = &self.gps {
      fields.push(ascii_field(Tag::GPSLatitudeRef, gps.latitude_ref));
      fields.push(dms_field(Tag::GPSLatitude, gps.latitude));
      fields.push(ascii_field(Tag::GPSLongitudeRef, gps.longitude_ref));
      fields.push(dms_field(Tag::GPSLongitude, gps.longitude));
    }

    if let Some(description) = &self.description {
      fields.push(Field {
        tag:     Tag::UserComment,
        ifd_num: In::PRIMARY,
        value:   Value::Undefined(encode_user_comment(description, little_endian), 0),
      });
    }

    fields
  }
}

impl Display for ExifUpdate {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut parts = Vec::new();
    if let Some(date_time) = &self.date_time {
      parts.push(format!("date `{date_time}`"));
    }
    if let Some(gps) = &self.gps {
      parts.push(format!(
        "GPS `{:.6}{} {:.6}{}`",
        gps.latitude.to_decimal(),
        gps.latitude_ref,
        gps.longitude.to_decimal(),
        gps.longitude_ref
      ));
    }
    if self.description.is_some() {
      parts.push("description".to_string());
    }

    if parts.is_empty() {
      write!(f, "nothing")
    } else {
      write!(f, "{}", parts.join(", "))
    }
  }
}

/// Encodes `text` as an EXIF `UserComment` with the Unicode character code,
/// using UTF-16 in the block's byte order.
pub fn encode_user_comment(text: &str, little_endian: bool) -> Vec<u8> {
  let mut bytes = USER_COMMENT_UNICODE.to_vec();
  for unit in text.encode_utf16() {
    if little_endian {
      bytes.extend_from_slice(&unit.to_le_bytes());
    } else {
      bytes.extend_from_slice(&unit.to_be_bytes());
    }
  }
  bytes
}

fn ascii_field(tag: Tag, value: &str) -> Field {
  Field {
    tag,
    ifd_num: In::PRIMARY,
    value: Value::Ascii(vec![value.as_bytes().to_vec()]),
  }
}

fn dms_field(tag: Tag, dms: Dms) -> Field {
  Field {
    tag,
    ifd_num: In::PRIMARY,
    value: Value::Rational(vec![
      Rational {
        num:   dms.degrees,
        denom: 1,
      },
      Rational {
        num:   dms.minutes,
        denom: 1,
      },
      Rational {
        num:   dms.centiseconds,
        denom: conv::DMS_SECONDS_DENOMINATOR,
      },
    ]),
  }
}

/// The embedded JPEG thumbnail, which `Writer` only keeps if handed it
/// explicitly.
fn thumbnail(exif: &Exif) -> Option<&[u8]> {
  let offset = exif
    .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
    .value
    .get_uint(0)?;
  let length = exif
    .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
    .value
    .get_uint(0)?;

  let start = usize::try_from(offset).ok()?;
  let end = start.checked_add(usize::try_from(length).ok()?)?;
  exif.buf().get(start..end)
}
