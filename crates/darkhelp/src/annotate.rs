use darkhelp_image::{Image, Rect};
use darkhelp_imgproc::draw::{draw_filled_rect, draw_rect, draw_text, text_size};

use crate::config::{default_annotation_colours, AnnotationConfig};
use crate::detector::DarkHelp;
use crate::error::DarkHelpError;
use crate::network::Network;

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];
const BOX_THICKNESS: usize = 2;

// draws `text` inside a filled box whose top-left corner is `(x, y)`
fn draw_label(
    image: &mut Image<u8, 3>,
    text: &str,
    (x, y): (i64, i64),
    background: [u8; 3],
    annotation: &AnnotationConfig,
) {
    let size = text_size(text, annotation.font_scale, annotation.font_thickness);
    let label = Rect::new(x, y, size.width as i64 + 2, size.height as i64 + 2);
    draw_filled_rect(image, &label, background);
    draw_text(
        image,
        text,
        (label.x + 1, label.y + 1),
        BLACK,
        annotation.font_scale,
        annotation.font_thickness,
    );
}

impl<N: Network> DarkHelp<N> {
    /// Draw the results of the last prediction on a copy of the original image.
    ///
    /// Every result at or above the threshold gets a box in the colour of its class with its
    /// name above it. The inference duration and the local time are added when enabled in
    /// [`AnnotationConfig`].
    ///
    /// # Arguments
    ///
    /// * `new_threshold` - Replaces the stored threshold when non-negative, without running
    ///   the prediction again.
    ///
    /// # Errors
    ///
    /// [`DarkHelpError::NotPredicted`] if [`DarkHelp::predict`] did not succeed before.
    pub fn annotate(&mut self, new_threshold: Option<f32>) -> Result<&Image<u8, 3>, DarkHelpError> {
        let Some(original_image) = self.original_image.as_ref() else {
            return Err(DarkHelpError::NotPredicted);
        };

        if let Some(threshold) = new_threshold.filter(|t| *t >= 0.0) {
            self.config.threshold = threshold;
        }

        if self.config.annotation.colours.is_empty() {
            self.config.annotation.colours = default_annotation_colours();
        }

        let mut annotated_image = original_image.clone();
        let annotation = &self.config.annotation;
        let colours = &annotation.colours;

        for result in self
            .prediction_results
            .iter()
            .filter(|result| result.best_probability >= self.config.threshold)
        {
            let colour = colours[result.best_class % colours.len()];
            draw_rect(&mut annotated_image, &result.rect, colour, BOX_THICKNESS);

            let size = text_size(&result.name, annotation.font_scale, annotation.font_thickness);
            draw_label(
                &mut annotated_image,
                &result.name,
                (result.rect.x - 1, result.rect.y - size.height as i64 - 2),
                colour,
                annotation,
            );
        }

        if annotation.include_duration {
            draw_label(
                &mut annotated_image,
                &self.duration_string(),
                (2, 2),
                WHITE,
                annotation,
            );
        }

        if annotation.include_timestamp {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            log::debug!("timestamp={timestamp}");

            let size = text_size(&timestamp, annotation.font_scale, annotation.font_thickness);
            let y = annotated_image.rows() as i64 - size.height as i64 - 4;
            draw_label(&mut annotated_image, &timestamp, (2, y), WHITE, annotation);
        }

        let annotated_image: &Image<u8, 3> = self.annotated_image.insert(annotated_image);
        Ok(annotated_image)
    }
}
