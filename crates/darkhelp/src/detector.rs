use std::path::Path;
use std::time::{Duration, Instant};

use darkhelp_image::{Image, Rect};
use darkhelp_imgproc::{interpolation::InterpolationMode, resize};

use crate::config::DarkHelpConfig;
use crate::duration::format_duration;
use crate::error::DarkHelpError;
use crate::names::{class_name, numbered_names, read_names_file};
use crate::network::{LoadNetwork, Network, NetworkInput, RawDetection};
use crate::prediction::{PredictionResult, PredictionResults};

/// Object detection with a simplified API over a [`Network`].
///
/// A `DarkHelp` owns the network, the class names and the state of the last prediction:
/// call [`DarkHelp::predict`] on an image, then optionally [`DarkHelp::annotate`] to draw
/// the results on a copy of it.
pub struct DarkHelp<N> {
    pub(crate) network: N,
    pub(crate) names: Vec<String>,
    pub(crate) config: DarkHelpConfig,
    pub(crate) prediction_results: PredictionResults,
    pub(crate) original_image: Option<Image<u8, 3>>,
    pub(crate) annotated_image: Option<Image<u8, 3>>,
    pub(crate) duration: Duration,
}

impl<N: Network> DarkHelp<N> {
    /// Wrap an already loaded network.
    ///
    /// # Arguments
    ///
    /// * `network` - The detection engine.
    /// * `names` - One name per class, may be empty.
    pub fn new(network: N, names: Vec<String>) -> Self {
        Self {
            network,
            names,
            config: DarkHelpConfig::default(),
            prediction_results: PredictionResults::default(),
            original_image: None,
            annotated_image: None,
            duration: Duration::ZERO,
        }
    }

    /// Load the network from its configuration and weights, and the class names if given.
    ///
    /// The time spent loading the network is available from [`DarkHelp::duration`].
    ///
    /// # Errors
    ///
    /// Empty configuration or weights paths, a failure of the engine, or an unreadable
    /// names file.
    pub fn load(
        config: impl AsRef<Path>,
        weights: impl AsRef<Path>,
        names: Option<&Path>,
    ) -> Result<Self, DarkHelpError>
    where
        N: LoadNetwork,
    {
        let (config, weights) = (config.as_ref(), weights.as_ref());
        if config.as_os_str().is_empty() {
            return Err(DarkHelpError::EmptyConfigFilename);
        }
        if weights.as_os_str().is_empty() {
            return Err(DarkHelpError::EmptyWeightsFilename);
        }

        let start = Instant::now();
        let network = N::load(config, weights).map_err(DarkHelpError::NetworkLoadError)?;
        let duration = start.elapsed();

        log::info!(
            "loaded network {} in {}",
            config.display(),
            format_duration(duration)
        );

        let names = match names {
            Some(path) if !path.as_os_str().is_empty() => read_names_file(path)?,
            _ => Vec::new(),
        };

        let mut darkhelp = Self::new(network, names);
        darkhelp.duration = duration;
        Ok(darkhelp)
    }

    /// Run the network on an image.
    ///
    /// Results of a previous prediction are discarded first.
    ///
    /// # Arguments
    ///
    /// * `image` - The RGB image, kept as [`DarkHelp::original_image`].
    /// * `new_threshold` - Replaces the stored threshold when non-negative. Values above 1 are
    ///   taken as percentages.
    ///
    /// # Errors
    ///
    /// [`DarkHelpError::EmptyImage`] for an image without pixels, or a failure of the engine.
    pub fn predict(
        &mut self,
        image: Image<u8, 3>,
        new_threshold: Option<f32>,
    ) -> Result<&PredictionResults, DarkHelpError> {
        self.prediction_results.clear();
        self.annotated_image = None;
        self.original_image = None;

        if image.is_empty() {
            return Err(DarkHelpError::EmptyImage);
        }

        self.config.update_threshold(new_threshold);

        let mut resized = Image::from_size_val(self.network.input_size(), 0u8)?;
        resize::resize_fast(&image, &mut resized, InterpolationMode::Bilinear)?;
        let input = NetworkInput::from_image(&resized)?;

        let params = self.config.detection_params();
        let start = Instant::now();
        let detections = self
            .network
            .detect(&input, image.size(), &params)
            .map_err(DarkHelpError::InferenceError)?;
        self.duration = start.elapsed();

        if self.names.is_empty() && !detections.is_empty() {
            log::warn!("no class names were given, using numbered names");
            self.names = numbered_names(self.network.num_classes());
        }

        for detection in &detections {
            if let Some(result) = self.build_result(detection, &image) {
                self.prediction_results.push(result);
            }
        }

        log::debug!(
            "{} objects in {} ({} candidates)",
            self.prediction_results.len(),
            format_duration(self.duration),
            detections.len()
        );

        self.original_image = Some(image);
        Ok(&self.prediction_results)
    }

    /// Read an image file and run [`DarkHelp::predict`] on it.
    pub fn predict_file(
        &mut self,
        image_path: impl AsRef<Path>,
        new_threshold: Option<f32>,
    ) -> Result<&PredictionResults, DarkHelpError> {
        let image = darkhelp_io::functional::read_image_any_rgb8(image_path)?;
        self.predict(image, new_threshold)
    }

    fn build_result(
        &self,
        detection: &RawDetection,
        image: &Image<u8, 3>,
    ) -> Option<PredictionResult> {
        let threshold = self.config.threshold;

        let mut result = PredictionResult::default();
        for (class_id, &probability) in detection.probabilities.iter().enumerate() {
            if probability >= threshold {
                result.all_probabilities.insert(class_id, probability);
                if probability > result.best_probability {
                    result.best_class = class_id;
                    result.best_probability = probability;
                }
            }
        }

        if result.best_probability < threshold {
            return None;
        }

        let bbox = detection.bbox;
        if ![bbox.x, bbox.y, bbox.w, bbox.h].iter().all(|v| v.is_finite()) {
            log::warn!("skipping detection with a non-finite box {bbox:?}");
            return None;
        }

        // pixel coordinates are kept within the range of i32
        let pixels = |v: f64| v.round().clamp(i32::MIN as f64, i32::MAX as f64) as i64;
        let (cols, rows) = (image.cols() as f64, image.rows() as f64);
        let w = pixels(bbox.w as f64 * cols);
        let h = pixels(bbox.h as f64 * rows);
        let x = pixels(bbox.x as f64 * cols - w as f64 / 2.0);
        let y = pixels(bbox.y as f64 * rows - h as f64 / 2.0);
        result.rect = Rect::new(x, y, w, h);

        result.mid_x = bbox.x;
        result.mid_y = bbox.y;
        result.width = bbox.w;
        result.height = bbox.h;
        result.name = self.result_name(&result);

        Some(result)
    }

    fn result_name(&self, result: &PredictionResult) -> String {
        let percentage =
            |probability: f32| format!(" {}%", (100.0 * probability as f64).round() as i64);

        let mut name = class_name(&self.names, result.best_class).into_owned();
        if self.config.names_include_percentage {
            name.push_str(&percentage(result.best_probability));
        }

        if self.config.include_all_names && result.all_probabilities.len() > 1 {
            for (&class_id, &probability) in &result.all_probabilities {
                if class_id == result.best_class {
                    continue;
                }
                name.push_str(", ");
                name.push_str(&class_name(&self.names, class_id));
                if self.config.names_include_percentage {
                    name.push_str(&percentage(probability));
                }
            }
        }

        name
    }

    /// The duration of the last inference, or of the network load before any prediction.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// [`DarkHelp::duration`] formatted for display, e.g. `"35 milliseconds"`.
    pub fn duration_string(&self) -> String {
        format_duration(self.duration)
    }

    /// The class names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Replace the class names.
    pub fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
    }

    /// The current settings.
    pub fn config(&self) -> &DarkHelpConfig {
        &self.config
    }

    /// The current settings, mutably.
    pub fn config_mut(&mut self) -> &mut DarkHelpConfig {
        &mut self.config
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: DarkHelpConfig) -> Self {
        self.config = config;
        self
    }

    /// The results of the last prediction.
    pub fn prediction_results(&self) -> &PredictionResults {
        &self.prediction_results
    }

    /// The image of the last successful prediction.
    pub fn original_image(&self) -> Option<&Image<u8, 3>> {
        self.original_image.as_ref()
    }

    /// The image produced by the last call to [`DarkHelp::annotate`].
    pub fn annotated_image(&self) -> Option<&Image<u8, 3>> {
        self.annotated_image.as_ref()
    }

    /// The wrapped network.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// The wrapped network, mutably.
    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }
}

impl<N> std::fmt::Debug for DarkHelp<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DarkHelp")
            .field("names", &self.names.len())
            .field("config", &self.config)
            .field("prediction_results", &self.prediction_results.len())
            .field("duration", &self.duration)
            .finish()
    }
}
