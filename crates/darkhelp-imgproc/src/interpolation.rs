/// Interpolation mode for the resize operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Nearest neighbor interpolation
    Nearest,
    /// Bilinear interpolation
    Bilinear,
    /// Pixel area relation, best suited for shrinking
    Area,
    /// Bicubic interpolation, best suited for enlarging
    Bicubic,
}
