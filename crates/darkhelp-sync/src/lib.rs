#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// A single-slot channel with blocking and overwriting send modes.
pub mod slot;

pub use crate::slot::SlotChannel;
