use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use darkhelp_image::Rect;
use serde::Serialize;

/// An object found by [`crate::DarkHelp::predict`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Where the object is in the original image, in pixels.
    ///
    /// The rectangle may extend past the image borders.
    pub rect: Rect,
    /// Horizontal center of the object, normalized to `[0, 1]`.
    pub mid_x: f32,
    /// Vertical center of the object, normalized to `[0, 1]`.
    pub mid_y: f32,
    /// Width of the object, normalized to `[0, 1]`.
    pub width: f32,
    /// Height of the object, normalized to `[0, 1]`.
    pub height: f32,
    /// Every class above the threshold with its probability, ordered by class id.
    pub all_probabilities: BTreeMap<usize, f32>,
    /// The class with the highest probability.
    pub best_class: usize,
    /// The probability of [`PredictionResult::best_class`].
    pub best_probability: f32,
    /// A name suitable for display, e.g. `"dog 90%, cat 55%"`.
    pub name: String,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" #{} prob={} x={} y={} w={} h={} entries={}",
            self.name,
            self.best_class,
            self.best_probability,
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height,
            self.all_probabilities.len()
        )?;

        if self.all_probabilities.len() > 1 {
            write!(f, " [")?;
            for (class_id, probability) in &self.all_probabilities {
                write!(f, " {class_id}={probability}")?;
            }
            write!(f, " ]")?;
        }

        Ok(())
    }
}

/// The objects found in one image.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionResults(pub Vec<PredictionResult>);

impl PredictionResults {
    /// Remove every result.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Append a result.
    pub fn push(&mut self, result: PredictionResult) {
        self.0.push(result);
    }

    /// Consume the results and return the inner vector.
    pub fn into_vec(self) -> Vec<PredictionResult> {
        self.0
    }
}

impl Deref for PredictionResults {
    type Target = [PredictionResult];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PredictionResult>> for PredictionResults {
    fn from(results: Vec<PredictionResult>) -> Self {
        Self(results)
    }
}

impl IntoIterator for PredictionResults {
    type Item = PredictionResult;
    type IntoIter = std::vec::IntoIter<PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PredictionResults {
    type Item = &'a PredictionResult;
    type IntoIter = std::slice::Iter<'a, PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PredictionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number_of_results = self.0.len();
        write!(f, "prediction results: {number_of_results}")?;
        for (idx, result) in self.0.iter().enumerate() {
            write!(f, "\n-> {}/{}: {}", idx + 1, number_of_results, result)?;
        }
        Ok(())
    }
}
