//! Value Objects
//!
//! Small immutable types with validation and ordering rules.

mod audio_format;
mod generation;
mod marker;
mod revision;

pub use audio_format::AudioFormat;
pub use generation::{DeviceGeneration, UnknownGeneration};
pub use marker::{RevisionMarker, MARKER_EXTENSION, UNPUBLISHED_PREFIX};
pub use revision::{Revision, RevisionError};
