//! Font lookup for the currency symbol.
//!
//! A short list of well-known system font paths is probed in order. The first
//! file that parses and has a glyph for every symbol character wins. When
//! nothing usable is found, a tiny built-in bitmap font takes over so the icon
//! always gets a symbol.

use crate::canvas::{Canvas, Point};
use image::Rgba;
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// System fonts probed after any user supplied paths
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "C:/Windows/Fonts/arial.ttf",
    "C:/Windows/Fonts/calibri.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

pub enum SymbolFont {
    /// TrueType/OpenType font loaded from disk
    Outline { font: Font<'static>, path: PathBuf },
    /// Built-in fallback
    Bitmap,
}

impl SymbolFont {
    /// Probe `extra` paths, then the system list unless `system_fonts` is off.
    ///
    /// Never fails: unreadable, unparsable or incomplete fonts are skipped.
    pub fn load(extra: &[PathBuf], system_fonts: bool, text: &str) -> Self {
        let system = SYSTEM_FONT_PATHS
            .iter()
            .map(PathBuf::from)
            .filter(|_| system_fonts);

        extra
            .iter()
            .cloned()
            .chain(system)
            .find_map(|path| {
                load_outline_font(&path, text).map(|font| SymbolFont::Outline { font, path })
            })
            .unwrap_or(SymbolFont::Bitmap)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SymbolFont::Bitmap)
    }

    /// Path of the loaded font file, `None` for the built-in font
    pub fn path(&self) -> Option<&Path> {
        match self {
            SymbolFont::Outline { path, .. } => Some(path),
            SymbolFont::Bitmap => None,
        }
    }

    /// Draw `text` at pixel size `size` with its ink bounds centered on `center`
    pub fn draw_centered(
        &self,
        canvas: &mut Canvas,
        text: &str,
        size: f32,
        center: Point,
        color: Rgba<u8>,
    ) {
        match self {
            SymbolFont::Outline { font, .. } => {
                draw_outline_text(canvas, font, text, size, center, color)
            }
            SymbolFont::Bitmap => draw_bitmap_text(canvas, text, size, center, color),
        }
    }
}

fn load_outline_font(path: &Path, text: &str) -> Option<Font<'static>> {
    let data = std::fs::read(path).ok()?;
    let font = Font::try_from_vec(data)?;

    // Glyph 0 is .notdef, i.e. the font has no such character
    if text.chars().any(|c| font.glyph(c).id().0 == 0) {
        return None;
    }
    Some(font)
}

fn draw_outline_text(
    canvas: &mut Canvas,
    font: &Font<'static>,
    text: &str,
    size: f32,
    center: Point,
    color: Rgba<u8>,
) {
    let scale = Scale::uniform(size);
    let ascent = font.v_metrics(scale).ascent;
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, ascent)).collect();

    // Union of the ink boxes of every glyph
    let bounds = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .reduce(|a, b| rusttype::Rect {
            min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        });
    let bounds = match bounds {
        Some(bounds) => bounds,
        None => return,
    };

    let offset_x = center.0 - (bounds.min.x + bounds.max.x) / 2;
    let offset_y = center.1 - (bounds.min.y + bounds.max.y) / 2;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|x, y, coverage| {
                canvas.blend(
                    bb.min.x + x as i32 + offset_x,
                    bb.min.y + y as i32 + offset_y,
                    color,
                    coverage,
                );
            });
        }
    }
}

const CELL_WIDTH: i32 = 5;
const CELL_HEIGHT: i32 = 7;

/// 5x7 rows for the fallback font, bit 4 is the leftmost column
fn bitmap_glyph(c: char) -> [u8; 7] {
    match c {
        '₹' => [
            0b11111, 0b00010, 0b11111, 0b00100, 0b01000, 0b00100, 0b00011,
        ],
        '$' => [
            0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100,
        ],
        '€' => [
            0b00111, 0b01000, 0b11110, 0b01000, 0b11110, 0b01000, 0b00111,
        ],
        '£' => [
            0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b11111,
        ],
        '¥' => [
            0b10001, 0b01010, 0b00100, 0b11111, 0b00100, 0b11111, 0b00100,
        ],
        ' ' => [0; 7],
        // Hollow box for anything else
        _ => [
            0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
        ],
    }
}

/// Size of one bitmap cell in pixels for a requested font size
pub fn bitmap_pixel_size(size: f32) -> i32 {
    ((size / 10.0) as i32).max(1)
}

fn draw_bitmap_text(canvas: &mut Canvas, text: &str, size: f32, center: Point, color: Rgba<u8>) {
    let px = bitmap_pixel_size(size);
    let count = text.chars().count() as i32;
    if count == 0 {
        return;
    }

    // One empty column between characters
    let width = (count * (CELL_WIDTH + 1) - 1) * px;
    let height = CELL_HEIGHT * px;
    let left = center.0 - width / 2;
    let top = center.1 - height / 2;

    for (index, c) in text.chars().enumerate() {
        let glyph_left = left + index as i32 * (CELL_WIDTH + 1) * px;
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..CELL_WIDTH {
                if bits & (1 << (CELL_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x0 = glyph_left + col * px;
                let y0 = top + row as i32 * px;
                for y in y0..y0 + px {
                    for x in x0..x0 + px {
                        canvas.blend(x, y, color, 1.0);
                    }
                }
            }
        }
    }
}
