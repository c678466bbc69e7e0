/// An axis aligned rectangle in pixel coordinates.
///
/// Coordinates are signed since detections may extend past the image borders.
///
/// # Examples
///
/// ```
/// use darkhelp_image::Rect;
///
/// let rect = Rect::new(10, 20, 30, 40);
///
/// assert_eq!(rect.top_left(), (10, 20));
/// assert_eq!(rect.bottom_right(), (39, 59));
/// assert_eq!(rect.area(), 1200);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x: i64,
    /// The y-coordinate of the top-left corner.
    pub y: i64,
    /// The width of the rectangle.
    pub width: i64,
    /// The height of the rectangle.
    pub height: i64,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The top-left corner as `(x, y)`.
    pub fn top_left(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// The bottom-right corner as `(x, y)`, inclusive.
    pub fn bottom_right(&self) -> (i64, i64) {
        (self.x + self.width - 1, self.y + self.height - 1)
    }

    /// The area of the rectangle, zero for degenerate rectangles.
    pub fn area(&self) -> i64 {
        self.width.max(0) * self.height.max(0)
    }
}
