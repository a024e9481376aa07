// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Primitive types for Takeout sidecars, the EXIF updates derived from them,
//! and the rules linking images to sidecars.

mod conv;
mod matcher;
mod sidecar;
mod update;

pub use conv::*;
pub use matcher::*;
pub use sidecar::*;
pub use update::*;
