use std::path::Path;

use darkhelp_image::{Image, ImageError, ImageSize};

/// Error type returned by engine implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Thresholds handed to the engine for a single inference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Minimum probability for a class to be reported.
    pub threshold: f32,
    /// Threshold used by hierarchical (tree) classifiers.
    pub hierarchy_threshold: f32,
    /// Overlap threshold for non-maximal suppression, `0` disables it.
    pub nms_threshold: f32,
}

/// Bounding box in coordinates normalized to `[0, 1]` by the image size.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedBox {
    /// Horizontal center of the box.
    pub x: f32,
    /// Vertical center of the box.
    pub y: f32,
    /// Width of the box.
    pub w: f32,
    /// Height of the box.
    pub h: f32,
}

/// A single object reported by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetection {
    /// Where the object is.
    pub bbox: NormalizedBox,
    /// One probability per class of the network, most entries are usually zero.
    pub probabilities: Vec<f32>,
}

/// The image fed to the network.
///
/// The pixels are stored in planar order (C, H, W) as `f32` normalized to `[0, 1]`,
/// the layout Darknet-style engines consume.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkInput {
    size: ImageSize,
    data: Vec<f32>,
}

impl NetworkInput {
    /// Build the network input from an RGB image already resized to the network size.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageSize`] if the image is empty.
    pub fn from_image(image: &Image<u8, 3>) -> Result<Self, ImageError> {
        if image.is_empty() {
            return Err(ImageError::InvalidImageSize(
                image.width(),
                image.height(),
                image.width(),
                image.height(),
            ));
        }

        // cast and scale the image to f32
        let hwc = image.cast_and_scale::<f32>(1.0 / 255.0)?.into_vec();

        // convert HWC -> CHW
        let plane_len = image.width() * image.height();
        let mut data = vec![0.0f32; plane_len * 3];
        for (i, pixel) in hwc.chunks_exact(3).enumerate() {
            for (c, &value) in pixel.iter().enumerate() {
                data[c * plane_len + i] = value;
            }
        }

        Ok(Self {
            size: image.size(),
            data,
        })
    }

    /// Size of the input in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The planar data, red plane first.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// A single channel plane.
    ///
    /// Returns `None` if `channel` is not 0, 1 or 2.
    pub fn channel(&self, channel: usize) -> Option<&[f32]> {
        if channel >= 3 {
            return None;
        }
        let plane_len = self.size.width * self.size.height;
        self.data.get(channel * plane_len..(channel + 1) * plane_len)
    }

    /// Convert the planar input back to an interleaved RGB8 image.
    pub fn to_image(&self) -> Result<Image<u8, 3>, ImageError> {
        let plane_len = self.size.width * self.size.height;
        let mut data = vec![0u8; plane_len * 3];
        for (i, pixel) in data.chunks_exact_mut(3).enumerate() {
            for (c, value) in pixel.iter_mut().enumerate() {
                *value = (self.data[c * plane_len + i] * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
        Image::new(self.size, data)
    }
}

/// An object detection engine.
///
/// The engine owns the neural network: it runs the forward pass and applies
/// non-maximal suppression when `params.nms_threshold > 0`.
pub trait Network {
    /// The input size expected by the network, images are resized to it before [`Network::detect`].
    fn input_size(&self) -> ImageSize;

    /// Number of classes the network was trained on.
    fn num_classes(&self) -> usize;

    /// Run inference.
    ///
    /// # Arguments
    ///
    /// * `input` - The image resized to [`Network::input_size`].
    /// * `image_size` - The size of the original image.
    /// * `params` - The detection thresholds.
    ///
    /// # Returns
    ///
    /// The detected objects, with boxes normalized by the original image size.
    fn detect(
        &mut self,
        input: &NetworkInput,
        image_size: ImageSize,
        params: &DetectionParams,
    ) -> Result<Vec<RawDetection>, BoxError>;
}

/// An engine that can be created from a configuration and a weights file.
pub trait LoadNetwork: Network + Sized {
    /// Load the network.
    fn load(config: &Path, weights: &Path) -> Result<Self, BoxError>;
}
