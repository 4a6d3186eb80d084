//! Drawing surface for the icon, backed by a tiny-skia pixmap.
//!
//! Shape ink replaces whatever is underneath, alpha included, with
//! anti-aliased edges. Once a mask has been applied it also acts as a clip:
//! nothing is ever painted where the mask is zero.

use anyhow::{anyhow, bail, Result};
use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use tiny_skia::{
    BlendMode, ColorU8, FillRule, LineCap, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke,
    Transform,
};

pub type Point = (i32, i32);

/// Bounding box `(x0, y0, x1, y1)` of an ellipse
pub type Bounds = (i32, i32, i32, i32);

pub struct Canvas {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

impl Canvas {
    /// Create a fully transparent square canvas
    pub fn new(size: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(size, size).ok_or_else(|| anyhow!("Can't create a {size}x{size} canvas"))?;
        Ok(Self { pixmap, clip: None })
    }

    pub(crate) fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub(crate) fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) color of the pixel at `(x, y)`
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let color = self.pixmap.pixels()[self.index(x, y)].demultiply();
        Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn into_image(self) -> RgbaImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| self.pixel(x, y))
    }

    /// Paint every row with the color returned for it
    pub fn fill_rows<F>(&mut self, mut color_for_row: F)
    where
        F: FnMut(u32) -> Rgba<u8>,
    {
        for y in 0..self.height() {
            let color = color_for_row(y);
            for x in 0..self.width() {
                if self.paintable(x as i32, y as i32) {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Replace the alpha channel with `mask` and clip all later drawing to it.
    ///
    /// Pixels are stored premultiplied, so wherever the mask is zero the
    /// pixel becomes `(0, 0, 0, 0)`.
    pub fn apply_mask(&mut self, mask: &GrayImage) -> Result<()> {
        if mask.dimensions() != (self.width(), self.height()) {
            bail!(
                "Mask is {}x{}, canvas is {}x{}",
                mask.width(),
                mask.height(),
                self.width(),
                self.height()
            );
        }

        let mut clip = Mask::new(self.width(), self.height())
            .ok_or_else(|| anyhow!("Can't create clip mask"))?;
        for (x, y, value) in mask.enumerate_pixels() {
            let mut pixel = self.pixel(x, y);
            pixel[3] = value[0];
            self.set(x, y, pixel);
            clip.data_mut()[self.index(x, y)] = value[0];
        }
        self.clip = Some(clip);
        Ok(())
    }

    /// Stroke the outline of the ellipse inscribed in `bounds`.
    ///
    /// The outline grows inwards from the bounding box by `width` pixels.
    pub fn stroke_ellipse(&mut self, bounds: Bounds, width: u32, color: Rgba<u8>) {
        let (x0, y0, x1, y1) = bounds;
        let inset = width as f32 / 2.0;
        let oval = Rect::from_ltrb(
            x0 as f32 + inset,
            y0 as f32 + inset,
            x1 as f32 - inset,
            y1 as f32 - inset,
        );

        if let Some(path) = oval.and_then(PathBuilder::from_oval) {
            self.stroke(&path, width, color);
        }
    }

    /// Draw a straight segment `width` pixels thick with flat ends
    pub fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgba<u8>) {
        self.draw_polyline(&[from, to], width, color);
    }

    /// Stroke `points` as one open path
    pub fn draw_polyline(&mut self, points: &[Point], width: u32, color: Rgba<u8>) {
        if let Some(path) = build_path(points, false) {
            self.stroke(&path, width, color);
        }
    }

    /// Fill the interior of a polygon
    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba<u8>) {
        if let Some(path) = build_path(points, true) {
            self.pixmap.fill_path(
                &path,
                &ink(color),
                FillRule::Winding,
                Transform::identity(),
                self.clip.as_ref(),
            );
        }
    }

    /// Blend `color` over the pixel at `(x, y)` by `coverage` in `0.0..=1.0`.
    ///
    /// Every channel, alpha included, moves towards `color` by the coverage.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 || !self.paintable(x, y) {
            return;
        }

        let (x, y) = (x as u32, y as u32);
        let mut pixel = self.pixel(x, y);
        for channel in 0..4 {
            let under = pixel[channel] as f32;
            let over = color[channel] as f32;
            pixel[channel] = (under + (over - under) * coverage).round() as u8;
        }
        self.set(x, y, pixel);
    }

    fn stroke(&mut self, path: &Path, width: u32, color: Rgba<u8>) {
        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            path,
            &ink(color),
            &stroke,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    fn set(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        let index = self.index(x, y);
        self.pixmap.pixels_mut()[index] =
            ColorU8::from_rgba(color[0], color[1], color[2], color[3]).premultiply();
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width() + x) as usize
    }

    fn paintable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return false;
        }
        match &self.clip {
            Some(mask) => mask.data()[self.index(x as u32, y as u32)] > 0,
            None => true,
        }
    }
}

// Solid paint that overwrites the destination instead of compositing onto it
fn ink(color: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.blend_mode = BlendMode::Source;
    paint.anti_alias = true;
    paint
}

fn build_path(points: &[Point], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;

    let mut pb = PathBuilder::new();
    pb.move_to(first.0 as f32, first.1 as f32);
    for point in rest {
        pb.line_to(point.0 as f32, point.1 as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Binary mask of a `size` square whose corners are rounded by `radius`
pub fn rounded_rect_mask(size: u32, radius: u32) -> GrayImage {
    ImageBuffer::from_fn(size, size, |x, y| {
        if in_rounded_rect(x, y, size, radius) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Whether pixel `(x, y)` lies inside the rounded square spanning `0..=size`
pub fn in_rounded_rect(x: u32, y: u32, size: u32, radius: u32) -> bool {
    let (x, y) = (x as f32, y as f32);
    let (size, radius) = (size as f32, radius as f32);

    // Inside the cross formed by the two straight bands
    if (x >= radius && x <= size - radius) || (y >= radius && y <= size - radius) {
        return true;
    }

    let cx = if x < radius { radius } else { size - radius };
    let cy = if y < radius { radius } else { size - radius };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= radius * radius
}
