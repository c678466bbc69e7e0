use darkhelp_image::{Image, ImageError};

/// Define the RGB weights for the grayscale conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

fn check_same_size<const A: usize, const B: usize>(
    src: &Image<u8, A>,
    dst: &Image<u8, B>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

/// Convert an RGB image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `dst` - The output grayscale image.
///
/// # Errors
///
/// Returns an error if the images do not have the same size.
///
/// # Example
///
/// ```
/// use darkhelp_image::{Image, ImageSize};
/// use darkhelp_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 0, 0, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
///
/// assert_eq!(gray.as_slice(), &[255, 0]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().chunks_exact(3))
        .for_each(|(dst_pixel, src_pixel)| {
            let (r, g, b) = (
                src_pixel[0] as f64,
                src_pixel[1] as f64,
                src_pixel[2] as f64,
            );
            *dst_pixel = (RW * r + GW * g + BW * b).round().clamp(0.0, 255.0) as u8;
        });

    Ok(())
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all channels.
///
/// # Errors
///
/// Returns an error if the images do not have the same size.
pub fn rgb_from_gray_u8(src: &Image<u8, 1>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    dst.as_slice_mut()
        .chunks_exact_mut(3)
        .zip(src.as_slice())
        .for_each(|(dst_pixel, &gray)| dst_pixel.fill(gray));

    Ok(())
}

/// Swap the first and last channel of every pixel, turning RGB into BGR and back.
///
/// # Errors
///
/// Returns an error if the images do not have the same size.
pub fn bgr_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    dst.as_slice_mut()
        .chunks_exact_mut(3)
        .zip(src.as_slice().chunks_exact(3))
        .for_each(|(dst_pixel, src_pixel)| {
            dst_pixel[0] = src_pixel[2];
            dst_pixel[1] = src_pixel[1];
            dst_pixel[2] = src_pixel[0];
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkhelp_image::ImageSize;

    #[test]
    fn gray_from_rgb() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255],
        )?;
        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        gray_from_rgb_u8(&image, &mut gray)?;

        assert_eq!(gray.as_slice(), &[76, 150, 29]);
        Ok(())
    }

    #[test]
    fn gray_from_rgb_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;
        let mut gray = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;

        assert_eq!(
            gray_from_rgb_u8(&image, &mut gray),
            Err(ImageError::InvalidImageSize(3, 2, 2, 2))
        );
        Ok(())
    }

    #[test]
    fn rgb_from_gray() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![10, 200],
        )?;
        let mut rgb = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        rgb_from_gray_u8(&image, &mut rgb)?;

        assert_eq!(rgb.as_slice(), &[10, 10, 10, 200, 200, 200]);
        Ok(())
    }

    #[test]
    fn bgr_from_rgb() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 2, 3, 4, 5, 6],
        )?;
        let mut bgr = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        bgr_from_rgb_u8(&image, &mut bgr)?;

        assert_eq!(bgr.as_slice(), &[3, 2, 1, 6, 5, 4]);
        Ok(())
    }
}
