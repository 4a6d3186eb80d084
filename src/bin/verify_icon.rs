use anyhow::{bail, Context, Result};
use image::ColorType;
use loanlens_icon::canvas::in_rounded_rect;
use loanlens_icon::icon_gen::{CORNER_RADIUS, ICON_SIZE, PRIMARY_FILE};

fn main() -> Result<()> {
    let mut paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        paths.push(PRIMARY_FILE.to_string());
    }

    for path in &paths {
        verify(path)?;
    }
    Ok(())
}

fn verify(path: &str) -> Result<()> {
    println!("Checking icon: {}", path);

    let img = image::open(path).with_context(|| format!("Failed to open {}", path))?;
    if img.color() != ColorType::Rgba8 {
        bail!("{} is {:?}, expected RGBA8", path, img.color());
    }
    if img.width() != ICON_SIZE || img.height() != ICON_SIZE {
        bail!(
            "{} is {}x{}, expected {}x{}",
            path,
            img.width(),
            img.height(),
            ICON_SIZE,
            ICON_SIZE
        );
    }

    let rgba_img = img.to_rgba8();
    let leaks = rgba_img
        .enumerate_pixels()
        .filter(|(x, y, p)| !in_rounded_rect(*x, *y, ICON_SIZE, CORNER_RADIUS) && p[3] != 0)
        .count();
    if leaks > 0 {
        bail!("{} has {} visible pixels outside the rounded corners", path, leaks);
    }

    let visible = rgba_img.pixels().filter(|p| p[3] > 0).count();
    println!("  Dimensions: {}x{}", img.width(), img.height());
    println!("  Visible pixels: {}", visible);
    println!("✓ {} looks good", path);
    Ok(())
}
