use crate::config::{
    parse_color, IconSpec, BACKGROUND_COLOR, LABEL, SYSTEM_FONT_CANDIDATES, TEXT_COLOR,
    VERTICAL_BIAS_DIVISOR,
};
use crate::font::{resolve_font, FontHandle};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgb, RgbImage,
};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Generate every icon in `specs` in order, stopping at the first failure.
pub fn generate_icons(specs: &[IconSpec]) -> Result<()> {
    for spec in specs {
        generate_icon(spec)?;
    }

    println!("All icons generated successfully!");
    Ok(())
}

/// Render one icon and write it as a PNG, overwriting any existing file.
/// The parent directory must already exist.
pub fn generate_icon(spec: &IconSpec) -> Result<()> {
    let font = resolve_font(spec.size, SYSTEM_FONT_CANDIDATES);
    let canvas = render_icon(spec.size, &font)?;

    save_png(&canvas, Path::new(spec.output_path))?;
    info!(
        "rendered {}x{} icon with {} font",
        spec.size,
        spec.size,
        if font.is_builtin() { "built-in" } else { "system" }
    );

    println!("Created {}", spec.output_path);
    Ok(())
}

/// Draw the label centered on a square background of `size` pixels.
pub fn render_icon(size: u32, font: &FontHandle) -> Result<RgbImage> {
    let background = Rgb(parse_color(BACKGROUND_COLOR)?);
    let text_color = Rgb(parse_color(TEXT_COLOR)?);

    let mut canvas = RgbImage::from_pixel(size, size, background);

    let (text_width, text_height) = font
        .text_bounds(LABEL)
        .map(|bounds| (bounds.width(), bounds.height()))
        .unwrap_or((0, 0));

    let (x, y) = label_origin(size, text_width, text_height);
    font.draw_text(&mut canvas, x, y, LABEL, text_color);

    Ok(canvas)
}

/// Top-left of the label's line box: centered on the ink, then lifted by a
/// tenth of the icon size.
fn label_origin(size: u32, text_width: i32, text_height: i32) -> (i32, i32) {
    let size = size as i32;
    let x = (size - text_width).div_euclid(2);
    let y = (size - text_height).div_euclid(2) - size / VERTICAL_BIAS_DIVISOR;
    (x, y)
}

fn save_png(canvas: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);

    write_png(canvas, &mut out_file)
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;

    Ok(())
}

// Encode an RGB canvas as PNG with compression
fn write_png<W: Write>(canvas: &RgbImage, w: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ColorType::Rgb8,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ICON_SPECS;

    const BACKGROUND: [u8; 3] = [0x4A, 0x90, 0xE2];

    fn ink_pixels(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| p.0 != BACKGROUND).count()
    }

    #[test]
    fn label_origin_centers_and_lifts() {
        assert_eq!(label_origin(16, 11, 7), (2, 3));
        assert_eq!(label_origin(128, 60, 46), (34, 29));
    }

    #[test]
    fn label_origin_floors_when_text_is_wider_than_icon() {
        assert_eq!(label_origin(16, 21, 7), (-3, 3));
    }

    #[test]
    fn builtin_render_has_background_corners_and_white_label() {
        for spec in ICON_SPECS {
            let canvas = render_icon(spec.size, &FontHandle::Builtin).unwrap();
            let last = spec.size - 1;

            assert_eq!(canvas.dimensions(), (spec.size, spec.size));
            for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
                assert_eq!(canvas.get_pixel(x, y).0, BACKGROUND);
            }
            assert!(canvas.pixels().any(|p| p.0 == [255, 255, 255]));
        }
    }

    #[test]
    fn builtin_label_lands_where_expected_on_small_icon() {
        let canvas = render_icon(16, &FontHandle::Builtin).unwrap();
        // Line box origin is (2, 3); the top row of "C" starts one pixel in.
        assert_eq!(canvas.get_pixel(3, 4).0, [255, 255, 255]);
        assert_eq!(canvas.get_pixel(2, 4).0, BACKGROUND);
        assert_eq!(canvas.get_pixel(2, 5).0, [255, 255, 255]);
    }

    #[test]
    fn render_is_deterministic() {
        let font = resolve_font(48, SYSTEM_FONT_CANDIDATES);
        let first = render_icon(48, &font).unwrap();
        let second = render_icon(48, &font).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn larger_icons_get_larger_text_with_a_system_font() {
        let small = resolve_font(16, SYSTEM_FONT_CANDIDATES);
        let large = resolve_font(128, SYSTEM_FONT_CANDIDATES);
        let small_ink = ink_pixels(&render_icon(16, &small).unwrap());
        let large_ink = ink_pixels(&render_icon(128, &large).unwrap());

        if small.is_builtin() && large.is_builtin() {
            // The built-in font has a single size.
            assert_eq!(small_ink, large_ink);
        } else {
            assert!(large_ink > small_ink);
        }
    }

    #[test]
    fn write_png_produces_rgb_png() {
        let canvas = render_icon(48, &FontHandle::Builtin).unwrap();
        let mut buf = Vec::new();
        write_png(&canvas, &mut buf).unwrap();

        let decoded = image::load_from_memory(&buf).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!(decoded.to_rgb8().as_raw(), canvas.as_raw());
    }

    #[test]
    fn save_png_fails_when_directory_is_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let canvas = render_icon(16, &FontHandle::Builtin).unwrap();
        let path = dir.path().join("missing").join("icon16.png");

        assert!(save_png(&canvas, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn save_png_overwrites_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("icon16.png");
        std::fs::write(&path, b"stale").unwrap();

        let canvas = render_icon(16, &FontHandle::Builtin).unwrap();
        save_png(&canvas, &path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }
}
