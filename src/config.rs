use anyhow::{anyhow, Result};
use std::str::FromStr;

/// One icon to produce: a square of `size` pixels written to `output_path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub output_path: &'static str,
}

pub const ICON_SPECS: [IconSpec; 3] = [
    IconSpec {
        size: 16,
        output_path: "assets/icon16.png",
    },
    IconSpec {
        size: 48,
        output_path: "assets/icon48.png",
    },
    IconSpec {
        size: 128,
        output_path: "assets/icon128.png",
    },
];

pub const BACKGROUND_COLOR: &str = "#4A90E2";
pub const TEXT_COLOR: &str = "#FFFFFF";
pub const LABEL: &str = "CG";

/// The label is lifted by `size / VERTICAL_BIAS_DIVISOR` pixels after centering.
pub const VERTICAL_BIAS_DIVISOR: i32 = 10;

/// System fonts tried in order. The first one is the preferred font.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Parse a CSS color string into 8-bit RGB channels.
pub fn parse_color(color: &str) -> Result<[u8; 3]> {
    let srgb =
        css_color::Srgb::from_str(color).map_err(|_| anyhow!("Invalid CSS color: {}", color))?;

    Ok([
        channel_to_u8(srgb.red),
        channel_to_u8(srgb.green),
        channel_to_u8(srgb.blue),
    ])
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
