use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DarkHelpError;
use crate::network::DetectionParams;

/// The colours used to annotate detections, as RGB.
///
/// The class id of a detection picks its colour, wrapping around the list.
pub fn default_annotation_colours() -> Vec<[u8; 3]> {
    vec![
        [0xFF, 0x35, 0x5E], // Radical Red
        [0x29, 0x96, 0x17], // Slimy Green
        [0xFF, 0xCC, 0x33], // Sunglow
        [0xAF, 0x6E, 0x4D], // Brown Sugar
        [0xFF, 0x00, 0xFF], // magenta
        [0x50, 0xBF, 0xE6], // Blizzard Blue
        [0xCC, 0xFF, 0x00], // Electric Lime
        [0x00, 0xFF, 0xFF], // cyan
        [0x8D, 0x4E, 0x85], // Razzmic Berry
        [0xFF, 0x00, 0xCC], // Purple Pizzazz
        [0x00, 0xFF, 0x00], // green
        [0xFF, 0xFF, 0x00], // yellow
        [0x5D, 0xAD, 0xEC], // Blue Jeans
        [0xFF, 0x6E, 0xFF], // Shocking Pink
        [0xFF, 0xFF, 0x66], // Laser Lemon
        [0xAA, 0xF0, 0xD1], // Magic Mint
        [0xFF, 0xC0, 0x00], // orange
        [0x9C, 0x51, 0xB6], // Purple Plum
        [0xFF, 0x99, 0x33], // Neon Carrot
        [0xFF, 0x00, 0xFF], // magenta, again
        [0x66, 0xFF, 0x66], // Screamin' Green
        [0xFF, 0x00, 0x00], // red
        [0xFF, 0x60, 0x37], // Outrageous Orange
        [0xFD, 0x5B, 0x78], // Wild Watermelon
    ]
}

/// Settings used by [`crate::DarkHelp::annotate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// RGB colours of the boxes, picked by class id.
    pub colours: Vec<[u8; 3]>,
    /// Scale of the label font, `0.5` renders 8 pixel high glyphs, capped at 512 pixels.
    pub font_scale: f64,
    /// Stroke thickness of the label font, capped at 64 pixels.
    pub font_thickness: usize,
    /// Draw the inference duration in the top-left corner.
    pub include_duration: bool,
    /// Draw the local date and time in the bottom-left corner.
    pub include_timestamp: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            colours: default_annotation_colours(),
            font_scale: 0.5,
            font_thickness: 1,
            include_duration: true,
            include_timestamp: false,
        }
    }
}

/// Settings of the predictor.
///
/// # Example
///
/// ```
/// use darkhelp::DarkHelpConfig;
///
/// let config = DarkHelpConfig::from_json_str(r#"{ "threshold": 0.25 }"#).unwrap();
///
/// assert_eq!(config.threshold, 0.25);
/// assert_eq!(config.nms_threshold, 0.45);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkHelpConfig {
    /// Minimum probability for a class to be kept, in `[0, 1]`.
    pub threshold: f32,
    /// Threshold used by hierarchical classifiers.
    pub hierarchy_threshold: f32,
    /// Overlap threshold for non-maximal suppression, `0` disables it.
    pub nms_threshold: f32,
    /// Append the rounded percentage to every name, e.g. `"dog 90%"`.
    pub names_include_percentage: bool,
    /// Append the other classes above the threshold to the name.
    pub include_all_names: bool,
    /// Annotation settings.
    pub annotation: AnnotationConfig,
}

impl Default for DarkHelpConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            hierarchy_threshold: 0.5,
            nms_threshold: 0.45,
            names_include_percentage: true,
            include_all_names: true,
            annotation: AnnotationConfig::default(),
        }
    }
}

impl DarkHelpConfig {
    /// Parse a configuration from JSON, missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, DarkHelpError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DarkHelpError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the detection threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the threshold used by hierarchical classifiers.
    pub fn with_hierarchy_threshold(mut self, hierarchy_threshold: f32) -> Self {
        self.hierarchy_threshold = hierarchy_threshold;
        self
    }

    /// Set the non-maximal suppression threshold.
    pub fn with_nms_threshold(mut self, nms_threshold: f32) -> Self {
        self.nms_threshold = nms_threshold;
        self
    }

    /// Set whether names include percentages.
    pub fn with_names_include_percentage(mut self, include: bool) -> Self {
        self.names_include_percentage = include;
        self
    }

    /// Set whether names list every class above the threshold.
    pub fn with_include_all_names(mut self, include: bool) -> Self {
        self.include_all_names = include;
        self
    }

    /// Set the annotation settings.
    pub fn with_annotation(mut self, annotation: AnnotationConfig) -> Self {
        self.annotation = annotation;
        self
    }

    pub(crate) fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            threshold: self.threshold,
            hierarchy_threshold: self.hierarchy_threshold,
            nms_threshold: self.nms_threshold,
        }
    }

    /// Bring the threshold back into `[0, 1]`.
    ///
    /// A `new_threshold` of `Some(t >= 0)` replaces the stored threshold. Values above 1
    /// are taken as percentages, negative ones fall back to `0.1`.
    pub(crate) fn update_threshold(&mut self, new_threshold: Option<f32>) {
        if let Some(threshold) = new_threshold.filter(|t| *t >= 0.0) {
            self.threshold = threshold;
        }
        if self.threshold > 1.0 {
            self.threshold /= 100.0;
        }
        if self.threshold < 0.0 {
            self.threshold = 0.1;
        }
        if self.threshold > 1.0 {
            self.threshold = 1.0;
        }
    }
}
