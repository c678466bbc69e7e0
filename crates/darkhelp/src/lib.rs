#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the predictor.
pub mod error;

/// The boundary with the object detection engine.
pub mod network;

/// Predictor and annotation settings.
pub mod config;

/// Class names files.
pub mod names;

/// Results produced by a prediction.
pub mod prediction;

/// Human readable durations.
pub mod duration;

/// The predictor.
pub mod detector;

/// Drawing prediction results on the original image.
mod annotate;

pub use crate::config::{default_annotation_colours, AnnotationConfig, DarkHelpConfig};
pub use crate::detector::DarkHelp;
pub use crate::error::DarkHelpError;
pub use crate::network::{
    BoxError, DetectionParams, LoadNetwork, Network, NetworkInput, NormalizedBox, RawDetection,
};
pub use crate::prediction::{PredictionResult, PredictionResults};

#[doc(inline)]
pub use darkhelp_image as image;

#[doc(inline)]
pub use darkhelp_imgproc as imgproc;

#[doc(inline)]
pub use darkhelp_io as io;

#[doc(inline)]
pub use darkhelp_sync as sync;
