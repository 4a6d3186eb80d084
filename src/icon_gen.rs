use crate::canvas::{rounded_rect_mask, Canvas, Point};
use crate::font::SymbolFont;
use crate::palette::{parse_css_color, Palette};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageBuffer, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub const ICON_SIZE: u32 = 1024;
pub const CORNER_RADIUS: u32 = 200;

pub const PRIMARY_FILE: &str = "app_icon.png";
pub const FOREGROUND_FILE: &str = "app_icon_foreground.png";

// Magnifying glass
const LENS_RADIUS: i32 = 180;
const LENS_RINGS: i32 = 45;
const LENS_RING_WIDTH: u32 = 2;
const HANDLE: (Point, Point) = ((640, 580), (750, 690));
const HANDLE_WIDTH: u32 = 50;

// Currency symbol
pub const DEFAULT_SYMBOL: &str = "₹";
const SYMBOL_SIZE: f32 = 280.0;

// Trend line and arrow head
const TREND_POINTS: [Point; 4] = [(200, 850), (350, 750), (500, 800), (800, 750)];
const TREND_WIDTH: u32 = 35;
const ARROW_HEAD: [Point; 3] = [(750, 750), (800, 700), (850, 750)];

// Arguments after CLI parsing, kept free of clap so the library can build them
#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
    pub fonts: Vec<PathBuf>,
    pub no_system_fonts: bool,
    pub symbol: String,
    pub top_color: Option<String>,
    pub bottom_color: Option<String>,
    pub ink_color: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            fonts: Vec::new(),
            no_system_fonts: false,
            symbol: DEFAULT_SYMBOL.to_string(),
            top_color: None,
            bottom_color: None,
            ink_color: None,
        }
    }
}

/// Everything that can vary between renders
#[derive(Debug, Clone)]
pub struct IconOptions {
    pub palette: Palette,
    pub symbol: String,
    pub fonts: Vec<PathBuf>,
    pub system_fonts: bool,
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            symbol: DEFAULT_SYMBOL.to_string(),
            fonts: Vec::new(),
            system_fonts: true,
        }
    }
}

impl IconOptions {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut palette = Palette::default();
        if let Some(color) = &args.top_color {
            palette.top = parse_css_color(color).context("Bad --top-color")?;
        }
        if let Some(color) = &args.bottom_color {
            palette.bottom = parse_css_color(color).context("Bad --bottom-color")?;
        }
        if let Some(color) = &args.ink_color {
            palette.ink = parse_css_color(color).context("Bad --ink-color")?;
        }

        Ok(Self {
            palette,
            symbol: args.symbol.clone(),
            fonts: args.fonts.clone(),
            system_fonts: !args.no_system_fonts,
        })
    }
}

pub struct RenderedIcon {
    pub primary: RgbaImage,
    /// Adaptive icon foreground layer: the primary icon on a transparent canvas
    pub foreground: RgbaImage,
    /// Font file the symbol was drawn with, `None` for the built-in font
    pub font_path: Option<PathBuf>,
}

pub fn generate_icons(args: Args) -> Result<()> {
    let options = IconOptions::from_args(&args)?;

    let icon = render(&options)?;
    match &icon.font_path {
        Some(path) => println!("Using font {}", path.display()),
        None => println!("Using built-in font"),
    }
    write_icons(&icon, &args.output)?;

    Ok(())
}

/// Draw the icon and derive its foreground layer
pub fn render(options: &IconOptions) -> Result<RenderedIcon> {
    let font = SymbolFont::load(&options.fonts, options.system_fonts, &options.symbol);
    let primary = draw_icon(&options.palette, &font, &options.symbol)?;
    let foreground = foreground_layer(&primary);

    Ok(RenderedIcon {
        primary,
        foreground,
        font_path: font.path().map(Path::to_path_buf),
    })
}

/// Same as [`render`] with the stock palette, symbol and font probe
pub fn render_default() -> Result<RenderedIcon> {
    render(&IconOptions::default())
}

fn draw_icon(palette: &Palette, font: &SymbolFont, symbol: &str) -> Result<RgbaImage> {
    let size = ICON_SIZE;
    let ink = palette.ink;
    let mut canvas = Canvas::new(size)?;

    // Background with rounded corners
    canvas.fill_rows(|y| palette.gradient_row(y, size));
    canvas.apply_mask(&rounded_rect_mask(size, CORNER_RADIUS))?;

    // Magnifying glass: concentric outlines widen the ring outwards
    let (cx, cy) = lens_center();
    for ring in 0..LENS_RINGS {
        let r = LENS_RADIUS + ring;
        canvas.stroke_ellipse((cx - r, cy - r, cx + r, cy + r), LENS_RING_WIDTH, ink);
    }
    canvas.draw_line(HANDLE.0, HANDLE.1, HANDLE_WIDTH, ink);

    font.draw_centered(&mut canvas, symbol, SYMBOL_SIZE, (cx, cy), ink);

    canvas.draw_polyline(&TREND_POINTS, TREND_WIDTH, ink);
    canvas.fill_polygon(&ARROW_HEAD, ink);

    Ok(canvas.into_image())
}

/// Center of the magnifying glass
pub fn lens_center() -> Point {
    ((ICON_SIZE / 2) as i32, (ICON_SIZE as f32 * 0.44) as i32)
}

// Masked-out pixels are already (0, 0, 0, 0), so the overlay is an exact copy
fn foreground_layer(primary: &RgbaImage) -> RgbaImage {
    let mut foreground =
        ImageBuffer::from_fn(primary.width(), primary.height(), |_, _| Rgba([0, 0, 0, 0]));
    image::imageops::overlay(&mut foreground, primary, 0, 0);
    foreground
}

/// Write both layers into `out_dir`, creating it if needed
pub fn write_icons(icon: &RenderedIcon, out_dir: &Path) -> Result<()> {
    create_dir_all(out_dir).context("Can't create output directory")?;

    for (filename, image) in [
        (PRIMARY_FILE, &icon.primary),
        (FOREGROUND_FILE, &icon.foreground),
    ] {
        println!("Generating {filename}...");
        save_png(image, &out_dir.join(filename))?;
        println!("✓ Generated {filename}");
    }

    Ok(())
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image.as_raw(), &mut out_file, image.width(), image.height())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::in_rounded_rect;

    fn fallback_options() -> IconOptions {
        IconOptions {
            system_fonts: false,
            ..IconOptions::default()
        }
    }

    #[test]
    fn icon_is_1024_square() {
        let icon = render(&fallback_options()).unwrap();
        assert_eq!(icon.primary.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(icon.foreground.dimensions(), (ICON_SIZE, ICON_SIZE));
    }

    #[test]
    fn outside_rounded_rect_is_transparent() {
        let icon = render(&fallback_options()).unwrap();
        for (x, y, pixel) in icon.primary.enumerate_pixels() {
            if !in_rounded_rect(x, y, ICON_SIZE, CORNER_RADIUS) {
                assert_eq!(pixel.0, [0, 0, 0, 0], "pixel ({}, {}) should be cleared", x, y);
            }
        }
    }

    #[test]
    fn left_margin_shows_the_gradient() {
        let palette = Palette::default();
        let icon = render(&fallback_options()).unwrap();

        // Nothing is drawn left of the trend line between the corner arcs
        for y in CORNER_RADIUS..ICON_SIZE - CORNER_RADIUS {
            for x in [0, 5, 100, 150] {
                assert_eq!(
                    *icon.primary.get_pixel(x, y),
                    palette.gradient_row(y, ICON_SIZE),
                    "gradient mismatch at ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render(&fallback_options()).unwrap();
        let second = render(&fallback_options()).unwrap();
        assert_eq!(first.primary.as_raw(), second.primary.as_raw());
    }

    #[test]
    fn foreground_matches_primary() {
        let icon = render(&fallback_options()).unwrap();
        let diffs = icon
            .primary
            .pixels()
            .zip(icon.foreground.pixels())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(diffs, 0, "foreground differs from primary in {} pixels", diffs);
    }

    #[test]
    fn built_in_font_is_reported() {
        let icon = render(&fallback_options()).unwrap();
        assert!(icon.font_path.is_none());
    }

    #[test]
    fn shapes_use_ink() {
        let palette = Palette::default();
        let icon = render(&fallback_options()).unwrap();
        let (cx, cy) = lens_center();

        // Right side of the lens ring
        let ring_x = (cx + LENS_RADIUS + 20) as u32;
        assert_eq!(*icon.primary.get_pixel(ring_x, cy as u32), palette.ink);

        // Middle of the handle
        assert_eq!(*icon.primary.get_pixel(695, 635), palette.ink);

        // Trend line start and arrow head interior
        assert_eq!(*icon.primary.get_pixel(275, 800), palette.ink);
        assert_eq!(*icon.primary.get_pixel(800, 730), palette.ink);
    }

    #[test]
    fn fallback_symbol_is_drawn_in_the_lens() {
        let palette = Palette::default();
        let icon = render(&fallback_options()).unwrap();
        let (cx, cy) = lens_center();

        // Top bar of the fallback rupee sign
        let top = (cy - 7 * 28 / 2 + 5) as u32;
        assert_eq!(*icon.primary.get_pixel(cx as u32, top), palette.ink);
    }

    #[test]
    fn custom_colors_are_parsed() {
        let args = Args {
            top_color: Some("#000000".to_string()),
            bottom_color: Some("white".to_string()),
            ..Args::default()
        };
        let options = IconOptions::from_args(&args).unwrap();
        assert_eq!(options.palette.top, Rgba([0, 0, 0, 255]));
        assert_eq!(options.palette.bottom, Rgba([255, 255, 255, 255]));
        assert_eq!(options.palette.ink, crate::palette::INK);
    }

    #[test]
    fn bad_color_is_an_error() {
        let args = Args {
            ink_color: Some("#zzz".to_string()),
            ..Args::default()
        };
        assert!(IconOptions::from_args(&args).is_err());
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let out = dir.path().join("nested");

        let icon = render(&fallback_options()).unwrap();
        write_icons(&icon, &out).unwrap();

        let mut decoded = Vec::new();
        for name in [PRIMARY_FILE, FOREGROUND_FILE] {
            let image = image::open(out.join(name)).expect("PNG should decode");
            assert_eq!(image.color(), ColorType::Rgba8);
            assert_eq!((image.width(), image.height()), (ICON_SIZE, ICON_SIZE));
            decoded.push(image.to_rgba8());
        }

        // Written bytes match the rendered icon, transparent corners included
        assert_eq!(decoded[0].as_raw(), icon.primary.as_raw());
        assert_eq!(decoded[1].as_raw(), decoded[0].as_raw());
    }
}
