// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Constants for expected file extensions and Takeout naming conventions.

/// Image extensions picked up when scanning the unpacked export. Matching is
/// case-sensitive, so only these exact spellings are accepted.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "JPG", "PNG", "JPEG"];

/// Extension of the archives Takeout produces. Also case-sensitive.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Appended to an image's full file name to get its sidecar's file name.
/// e.g. `IMG_0001.jpg` -> `IMG_0001.jpg.supplemental-metadata.json`.
pub const SIDECAR_SUFFIX: &str = ".supplemental-metadata.json";

/// Default destination, created under the archive directory.
pub const UNPACK_DIR_NAME: &str = "takeout_unpacked";
