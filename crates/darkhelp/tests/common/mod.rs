#![allow(dead_code)]

use std::path::Path;

use darkhelp::image::{Image, ImageSize};
use darkhelp::{
    BoxError, DarkHelpError, DetectionParams, LoadNetwork, Network, NetworkInput, NormalizedBox,
    RawDetection,
};

/// An engine returning a fixed list of detections and recording what it was given.
#[derive(Default)]
pub struct ScriptedNetwork {
    pub input_size: ImageSize,
    pub num_classes: usize,
    pub detections: Vec<RawDetection>,
    pub fail: bool,
    pub calls: Vec<(ImageSize, ImageSize, DetectionParams)>,
    pub last_input: Option<Image<u8, 3>>,
}

impl ScriptedNetwork {
    pub fn new(num_classes: usize, detections: Vec<RawDetection>) -> Self {
        Self {
            input_size: ImageSize {
                width: 32,
                height: 32,
            },
            num_classes,
            detections,
            ..Default::default()
        }
    }
}

impl Network for ScriptedNetwork {
    fn input_size(&self) -> ImageSize {
        self.input_size
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn detect(
        &mut self,
        input: &NetworkInput,
        image_size: ImageSize,
        params: &DetectionParams,
    ) -> Result<Vec<RawDetection>, BoxError> {
        if self.fail {
            return Err("out of memory".into());
        }
        self.calls.push((input.size(), image_size, *params));
        self.last_input = Some(input.to_image()?);
        Ok(self.detections.clone())
    }
}

impl LoadNetwork for ScriptedNetwork {
    fn load(config: &Path, weights: &Path) -> Result<Self, BoxError> {
        if !config.exists() || !weights.exists() {
            return Err(format!("cannot open {}", config.display()).into());
        }
        Ok(Self::new(3, vec![]))
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn detection(x: f32, y: f32, w: f32, h: f32, probabilities: &[f32]) -> RawDetection {
    RawDetection {
        bbox: NormalizedBox { x, y, w, h },
        probabilities: probabilities.to_vec(),
    }
}

pub fn names() -> Vec<String> {
    vec!["cat".to_string(), "dog".to_string(), "car".to_string()]
}

pub fn black_image(width: usize, height: usize) -> Result<Image<u8, 3>, DarkHelpError> {
    Ok(Image::from_size_val(ImageSize { width, height }, 0u8)?)
}
