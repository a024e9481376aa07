// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Builders and readers for test images and their EXIF.

use std::{fs, io::Cursor, path::Path};

use exif::{Exif, Field, In, Tag, Value, experimental::Writer};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::io;

/// Encodes a small image with no metadata.
pub fn make_image(format: ImageFormat) -> Vec<u8> {
  let pixels = RgbaImage::from_fn(8, 8, |x, y| {
    Rgba([u8::try_from(x * 32).unwrap(), u8::try_from(y * 32).unwrap(), 128, 255])
  });
  let image = match format {
    ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(pixels).to_rgb8()),
    _ => DynamicImage::ImageRgba8(pixels),
  };

  let mut buf = Cursor::new(Vec::new());
  image.write_to(&mut buf, format).unwrap();
  buf.into_inner()
}

/// Encodes ASCII `fields` as a TIFF-format EXIF block.
pub fn make_tiff(fields: &[(Tag, &str)], little_endian: bool) -> Vec<u8> {
  let fields = fields
    .iter()
    .map(|(tag, value)| Field {
      tag:     *tag,
      ifd_num: In::PRIMARY,
      value:   Value::Ascii(vec![value.as_bytes().to_vec()]),
    })
    .collect::<Vec<_>>();

  let mut writer = Writer::new();
  for field in &fields {
    writer.push_field(field);
  }

  let mut buf = Cursor::new(Vec::new());
  writer.write(&mut buf, little_endian).unwrap();
  buf.into_inner()
}

/// Parses a TIFF-format EXIF block.
pub fn parse_tiff(tiff: Vec<u8>) -> Exif {
  exif::Reader::new().read_raw(tiff).unwrap()
}

/// Reads the EXIF embedded in the image at `path`, if any.
pub fn read_exif(path: impl AsRef<Path>) -> Option<Exif> {
  io::embedded_exif(fs::read(path).unwrap())
    .unwrap()
    .map(parse_tiff)
}

/// Reads an ASCII tag from the image at `path`.
pub fn read_ascii(path: impl AsRef<Path>, tag: Tag) -> Option<String> {
  read_exif(path).and_then(|e| ascii(&e, tag))
}

pub fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
  match &exif.get_field(tag, In::PRIMARY)?.value {
    Value::Ascii(values) => values
      .first()
      .map(|v| String::from_utf8_lossy(v).into_owned()),
    value => panic!("`{tag}` is not ASCII: {value:?}"),
  }
}

pub fn rationals(exif: &Exif, tag: Tag) -> Option<Vec<(u32, u32)>> {
  match &exif.get_field(tag, In::PRIMARY)?.value {
    Value::Rational(values) => Some(values.iter().map(|r| (r.num, r.denom)).collect()),
    value => panic!("`{tag}` is not rational: {value:?}"),
  }
}

/// Decodes a Unicode `UserComment`.
pub fn user_comment(exif: &Exif) -> Option<String> {
  let Value::Undefined(bytes, _) = &exif.get_field(Tag::UserComment, In::PRIMARY)?.value else {
    panic!("`UserComment` is not undefined.");
  };
  let (code, text) = bytes.split_at(8);
  assert_eq!(code, b"UNICODE\0");

  let units = text
    .chunks_exact(2)
    .map(|c| {
      if exif.little_endian() {
        u16::from_le_bytes([c[0], c[1]])
      } else {
        u16::from_be_bytes([c[0], c[1]])
      }
    })
    .collect::<Vec<_>>();
  Some(String::from_utf16(&units).unwrap())
}

/// Converts DMS rationals back to decimal degrees.
pub fn decimal(dms: &[(u32, u32)]) -> f64 {
  let [d, m, s] = dms else {
    panic!("Expected 3 rationals, got {dms:?}.");
  };
  let value = |(num, denom): &(u32, u32)| f64::from(*num) / f64::from(*denom);

  value(d) + value(m) / 60.0 + value(s) / 3600.0
}
