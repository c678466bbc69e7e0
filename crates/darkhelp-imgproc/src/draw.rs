use darkhelp_image::{Image, ImageSize, Rect};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use std::cmp::{max, min};

/// Side of a glyph cell in pixels before scaling.
const GLYPH_SIZE: usize = 8;

/// Largest glyph magnification, i.e. 512 pixel high glyphs.
pub const MAX_GLYPH_SCALE: usize = 64;

/// Largest stroke thickness in pixels for lines and text.
pub const MAX_THICKNESS: usize = 64;

/// Helper function to set a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Offsets covered by a brush of the given thickness, e.g. `0..=0` for 1 and `-1..=1` for 3.
#[inline]
fn brush(thickness: usize) -> std::ops::RangeInclusive<i64> {
    let thickness = stroke_width(thickness) as i64;
    -((thickness - 1) / 2)..=thickness / 2
}

#[inline]
fn stroke_width(thickness: usize) -> usize {
    thickness.clamp(1, MAX_THICKNESS)
}

/// Clamps both ends of the span `(a, b)` to `[lo, hi]`, `None` when the span misses it.
fn clip_span((a, b): (i64, i64), (lo, hi): (i64, i64)) -> Option<(i64, i64)> {
    if max(a, b) < lo || min(a, b) > hi {
        return None;
    }
    Some((a.clamp(lo, hi), b.clamp(lo, hi)))
}

/// Clips the segment `p0..p1` to the box `[lo, hi]` on both axes (Liang-Barsky).
///
/// Returns `None` when the segment misses the box. Endpoints inside the box are kept as is.
fn clip_line(
    p0: (i64, i64),
    p1: (i64, i64),
    lo: (i64, i64),
    hi: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    // horizontal and vertical segments are clipped exactly
    if p0.1 == p1.1 {
        let (xa, xb) = clip_span((p0.0, p1.0), (lo.0, hi.0))?;
        clip_span((p0.1, p0.1), (lo.1, hi.1))?;
        return Some(((xa, p0.1), (xb, p1.1)));
    }
    if p0.0 == p1.0 {
        let (ya, yb) = clip_span((p0.1, p1.1), (lo.1, hi.1))?;
        clip_span((p0.0, p0.0), (lo.0, hi.0))?;
        return Some(((p0.0, ya), (p1.0, yb)));
    }

    let (x0, y0) = (p0.0 as f64, p0.1 as f64);
    let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, x0 - lo.0 as f64),
        (dx, hi.0 as f64 - x0),
        (-dy, y0 - lo.1 as f64),
        (dy, hi.1 as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }

    if t0 > t1 {
        return None;
    }

    let at = |t: f64| {
        (
            ((x0 + t * dx).round() as i64).clamp(lo.0, hi.0),
            ((y0 + t * dy).round() as i64).clamp(lo.1, hi.1),
        )
    };
    let start = if t0 > 0.0 { at(t0) } else { p0 };
    let end = if t1 < 1.0 { at(t1) } else { p1 };
    Some((start, end))
}

/// Draws a line on an image inplace using a standard Bresenham's line algorithm.
///
/// The line is clipped to the image, extended by the brush size, before it is walked.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line, approximated with a square brush.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let margin = stroke_width(thickness) as i64;
    let lo = (-margin, -margin);
    let hi = (
        img.cols() as i64 - 1 + margin,
        img.rows() as i64 - 1 + margin,
    );
    let Some(((mut x0, mut y0), (x1, y1))) = clip_line(p0, p1, lo, hi) else {
        return;
    };

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        for i in brush(thickness) {
            for j in brush(thickness) {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a rectangle outline on an image inplace.
///
/// The outline runs along the outermost pixels of `rect`. Degenerate rectangles are ignored.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `rect` - The rectangle to outline.
/// * `color` - The color of the rectangle outline.
/// * `thickness` - The thickness of the lines.
pub fn draw_rect<const C: usize>(
    img: &mut Image<u8, C>,
    rect: &Rect,
    color: [u8; C],
    thickness: usize,
) {
    if rect.width < 1 || rect.height < 1 {
        return;
    }

    let (x0, y0) = rect.top_left();
    let (x1, y1) = rect.bottom_right();

    draw_line(img, (x0, y0), (x1, y0), color, thickness); // Top
    draw_line(img, (x0, y1), (x1, y1), color, thickness); // Bottom
    draw_line(img, (x0, y0), (x0, y1), color, thickness); // Left
    draw_line(img, (x1, y0), (x1, y1), color, thickness); // Right
}

/// Draws a filled rectangle on an image inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `rect` - The rectangle to fill, clipped to the image bounds.
/// * `color` - The fill color of the rectangle.
pub fn draw_filled_rect<const C: usize>(img: &mut Image<u8, C>, rect: &Rect, color: [u8; C]) {
    let x_min = max(0, rect.x);
    let y_min = max(0, rect.y);
    let x_max = min(img.cols() as i64, rect.x.saturating_add(rect.width));
    let y_max = min(img.rows() as i64, rect.y.saturating_add(rect.height));

    for y in y_min..y_max {
        for x in x_min..x_max {
            set_pixel(img, x, y, color);
        }
    }
}

/// Integer magnification of the 8x8 glyphs for a given font scale.
///
/// A scale of `0.5` renders glyphs at their native 8 pixels, `1.0` doubles them.
/// The result is clamped to `1..=MAX_GLYPH_SCALE`.
pub fn glyph_scale(font_scale: f64) -> usize {
    ((font_scale * 2.0).round() as usize).clamp(1, MAX_GLYPH_SCALE)
}

/// Size in pixels of `text` once rendered by [`draw_text`].
///
/// # Examples
///
/// ```
/// use darkhelp_imgproc::draw::text_size;
///
/// let size = text_size("dog", 0.5, 1);
///
/// assert_eq!(size.width, 24);
/// assert_eq!(size.height, 8);
/// ```
pub fn text_size(text: &str, font_scale: f64, thickness: usize) -> ImageSize {
    let cell = GLYPH_SIZE * glyph_scale(font_scale);
    let num_chars = text.chars().count();
    if num_chars == 0 {
        return ImageSize {
            width: 0,
            height: cell,
        };
    }

    ImageSize {
        width: num_chars * cell + stroke_width(thickness) - 1,
        height: cell,
    }
}

/// Draws text on an image inplace using a 8x8 bitmap font.
///
/// Characters without a glyph are rendered as `?`. Thickness widens every stroke to the right.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `text` - The text to render.
/// * `top_left` - The top-left corner of the first glyph as (x, y).
/// * `color` - The color of the text.
/// * `font_scale` - The font scale, see [`glyph_scale`].
/// * `thickness` - The stroke thickness in pixels.
pub fn draw_text<const C: usize>(
    img: &mut Image<u8, C>,
    text: &str,
    top_left: (i64, i64),
    color: [u8; C],
    font_scale: f64,
    thickness: usize,
) {
    let scale = glyph_scale(font_scale) as i64;
    let cell = GLYPH_SIZE as i64 * scale;
    let stroke = stroke_width(thickness) as i64;

    for (index, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };

        let origin_x = top_left.0 + index as i64 * cell;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col as i64 * scale;
                let py = top_left.1 + row as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale + stroke - 1 {
                        set_pixel(img, px + dx, py + dy, color);
                    }
                }
            }
        }
    }
}
