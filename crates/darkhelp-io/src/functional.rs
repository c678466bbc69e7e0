use std::{fs::File, io::BufWriter, path::Path};

use darkhelp_image::{Image, ImageSize};
use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
    DynamicImage, ExtendedColorType, ImageEncoder,
};

use crate::error::IoError;

fn open_dynamic_image(file_path: &Path) -> Result<DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    Ok(img)
}

fn image_size(img: &DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

/// Reads an image from the given file path as RGB8.
///
/// The method tries to read from any image format supported by the image crate,
/// the format is guessed from the file content. Images with a different color type
/// are converted to RGB8.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] when the path is missing, or a decoding error.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = open_dynamic_image(file_path.as_ref())?;
    let size = image_size(&img);
    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads an image from the given file path as a single channel (mono8) image.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_any_gray8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = open_dynamic_image(file_path.as_ref())?;
    let size = image_size(&img);
    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

/// Decodes an encoded image held in memory as RGB8.
///
/// # Arguments
///
/// * `bytes` - The encoded image, e.g. the content of a PNG or JPEG file.
pub fn decode_image_rgb8(bytes: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let img = image::load_from_memory(bytes)?;
    let size = image_size(&img);
    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an RGB8 image to a PNG file using the best compression.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
/// * `image` - The image to write.
pub fn write_image_png_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let writer = BufWriter::new(File::create(file_path)?);
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
    let [width, height]: [u32; 2] = image.size().into();
    encoder.write_image(image.as_slice(), width, height, ExtendedColorType::Rgb8)?;

    Ok(())
}

/// Writes an RGB8 image to a JPEG file.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG file.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality in `1..=100`.
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    if !(1..=100).contains(&quality) {
        return Err(IoError::InvalidJpegQuality(quality));
    }

    let writer = BufWriter::new(File::create(file_path)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality);
    let [width, height]: [u32; 2] = image.size().into();
    encoder.write_image(image.as_slice(), width, height, ExtendedColorType::Rgb8)?;

    Ok(())
}

/// Writes an RGB8 image choosing the encoder from the file extension.
///
/// `png` is written with [`write_image_png_rgb8`], `jpg` and `jpeg` with
/// [`write_image_jpeg_rgb8`] at quality 90.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] for any other extension.
pub fn write_image_any_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let extension = file_path
        .extension()
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.to_str() {
        Some("png") => write_image_png_rgb8(file_path, image),
        Some("jpg") | Some("jpeg") => write_image_jpeg_rgb8(file_path, image, 90),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}
