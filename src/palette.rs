//! Colors used by the icon renderer.

use anyhow::{anyhow, Result};
use image::Rgba;
use std::str::FromStr;

/// Top of the background gradient (#6B9BD2)
pub const BLUE: Rgba<u8> = Rgba([107, 155, 210, 255]);

/// Bottom of the background gradient (#4DB6AC)
pub const TEAL: Rgba<u8> = Rgba([77, 182, 172, 255]);

/// Semi-transparent white used for every foreground shape
pub const INK: Rgba<u8> = Rgba([255, 255, 255, 230]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub top: Rgba<u8>,
    pub bottom: Rgba<u8>,
    pub ink: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            top: BLUE,
            bottom: TEAL,
            ink: INK,
        }
    }
}

impl Palette {
    /// Color of gradient row `y` on a canvas `size` rows tall.
    ///
    /// Each channel is interpolated linearly and truncated, alpha is opaque.
    pub fn gradient_row(&self, y: u32, size: u32) -> Rgba<u8> {
        let ratio = y as f64 / size as f64;
        let mix = |from: u8, to: u8| (from as f64 * (1.0 - ratio) + to as f64 * ratio) as u8;

        Rgba([
            mix(self.top[0], self.bottom[0]),
            mix(self.top[1], self.bottom[1]),
            mix(self.top[2], self.bottom[2]),
            255,
        ])
    }
}

/// Parse a CSS color string (`#4db6ac`, `rgb(77, 182, 172)`, `teal`, ...)
pub fn parse_css_color(value: &str) -> Result<Rgba<u8>> {
    let color = css_color::Srgb::from_str(value)
        .map_err(|_| anyhow!("Invalid CSS color: {}", value))?;

    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.).round() as u8;
    Ok(Rgba([
        channel(color.red),
        channel(color.green),
        channel(color.blue),
        channel(color.alpha),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_starts_at_top_color() {
        let palette = Palette::default();
        assert_eq!(palette.gradient_row(0, 1024), BLUE);
    }

    #[test]
    fn gradient_approaches_bottom_color() {
        let palette = Palette::default();
        let last = palette.gradient_row(1023, 1024);

        // The last row stops one step short of the bottom color.
        for channel in 0..3 {
            let diff = (last[channel] as i32 - TEAL[channel] as i32).abs();
            assert!(diff <= 1, "channel {} off by {}", channel, diff);
        }
        assert_eq!(last[3], 255);
    }

    #[test]
    fn gradient_midpoint_truncates() {
        let palette = Palette::default();
        // (107 + 77) / 2 = 92, (155 + 182) / 2 = 168.5, (210 + 172) / 2 = 191
        assert_eq!(palette.gradient_row(512, 1024), Rgba([92, 168, 191, 255]));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_css_color("#6B9BD2").unwrap(), BLUE);
        assert_eq!(parse_css_color("#4db6ac").unwrap(), TEAL);
    }

    #[test]
    fn rejects_garbage_colors() {
        assert!(parse_css_color("not-a-color").is_err());
    }
}
