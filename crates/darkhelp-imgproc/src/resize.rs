use crate::interpolation::InterpolationMode;
use darkhelp_image::{Image, ImageError, ImageSize};
use fast_image_resize as fr;

/// Resize an image to a new size using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The function resizes an image to the size of `dst` using the specified interpolation mode.
/// It supports only 3-channel images and u8 data type.
///
/// # Arguments
///
/// * `src` - The input image container with 3 channels.
/// * `dst` - The output image container, already allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use darkhelp_image::{Image, ImageSize};
/// use darkhelp_imgproc::interpolation::InterpolationMode;
/// use darkhelp_imgproc::resize::resize_fast;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if either image is empty or the image cannot be resized.
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let invalid_size = ImageError::InvalidImageSize(
        src.width(),
        src.height(),
        dst.width(),
        dst.height(),
    );

    if src.is_empty() || dst.is_empty() {
        return Err(invalid_size);
    }

    let [src_width, src_height]: [u32; 2] = src.size().into();
    let src_data_len = src.as_slice().len();
    let src_image = fr::images::ImageRef::new(
        src_width,
        src_height,
        src.as_slice(),
        fr::PixelType::U8x3,
    )
    .map_err(|_| ImageError::InvalidChannelShape(src_data_len, src.width() * src.height() * 3))?;

    let [dst_width, dst_height]: [u32; 2] = dst.size().into();
    let dst_data_len = dst.as_slice().len();
    let mut dst_image = fr::images::Image::from_slice_u8(
        dst_width,
        dst_height,
        dst.as_slice_mut(),
        fr::PixelType::U8x3,
    )
    .map_err(|_| ImageError::InvalidChannelShape(dst_data_len, dst_data_len))?;

    let algorithm = match interpolation {
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Area => fr::ResizeAlg::Convolution(fr::FilterType::Box),
        InterpolationMode::Bicubic => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
    };
    let options = fr::ResizeOptions::new().resize_alg(algorithm);

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|_| invalid_size)?;

    Ok(())
}

/// Compute the largest size that fits within `desired` while keeping the aspect ratio of `src`.
///
/// Returns `None` when the source is empty or when either desired dimension is zero.
/// A computed dimension never collapses below one pixel.
///
/// # Example
///
/// ```
/// use darkhelp_image::ImageSize;
/// use darkhelp_imgproc::resize::fit_size_keeping_aspect_ratio;
///
/// let fitted = fit_size_keeping_aspect_ratio(
///     ImageSize { width: 1920, height: 1080 },
///     ImageSize { width: 640, height: 480 },
/// );
///
/// assert_eq!(fitted, Some(ImageSize { width: 640, height: 360 }));
/// ```
pub fn fit_size_keeping_aspect_ratio(src: ImageSize, desired: ImageSize) -> Option<ImageSize> {
    if src.is_empty() || desired.is_empty() {
        return None;
    }

    if src == desired {
        return Some(src);
    }

    let image_width = src.width as f64;
    let image_height = src.height as f64;
    let horizontal_factor = image_width / desired.width as f64;
    let vertical_factor = image_height / desired.height as f64;
    let largest_factor = horizontal_factor.max(vertical_factor);

    Some(ImageSize {
        width: ((image_width / largest_factor).round() as usize).max(1),
        height: ((image_height / largest_factor).round() as usize).max(1),
    })
}

/// Resize an image so it fits within `desired` while keeping its aspect ratio.
///
/// Shrinking uses [`InterpolationMode::Area`], enlarging uses [`InterpolationMode::Bicubic`].
/// When the image already has the desired size a copy is returned.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] when the source is empty or the desired size
/// has a zero dimension.
pub fn resize_keeping_aspect_ratio(
    src: &Image<u8, 3>,
    desired: ImageSize,
) -> Result<Image<u8, 3>, ImageError> {
    if src.size() == desired && !src.is_empty() {
        return Ok(src.clone());
    }

    let new_size = fit_size_keeping_aspect_ratio(src.size(), desired).ok_or(
        ImageError::InvalidImageSize(src.width(), src.height(), desired.width, desired.height),
    )?;

    let interpolation = if new_size.width > src.width() || new_size.height > src.height() {
        InterpolationMode::Bicubic
    } else {
        InterpolationMode::Area
    };

    let mut dst = Image::from_size_val(new_size, 0u8)?;
    resize_fast(src, &mut dst, interpolation)?;

    Ok(dst)
}
