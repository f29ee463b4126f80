//! # Telemetry Normalizer
//!
//! Converts heterogeneous tracker payloads into canonical, validated GPS
//! readings. Failures are loud and typed; nothing is silently dropped.

mod error;
mod log;
mod normalize;
mod reading;
mod source;

pub use crate::error::*;
pub use crate::log::*;
pub use crate::normalize::*;
pub use crate::reading::*;
pub use crate::source::*;
