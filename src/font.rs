use image::{Rgb, RgbImage};
use log::debug;
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::Path;

/// Ink extent of a string laid out with its line box at (0, 0).
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn union(self, other: TextBounds) -> TextBounds {
        TextBounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Font used to draw the label of one icon.
pub enum FontHandle {
    /// A scalable system font, sized so that its em square is `em_px` pixels.
    System {
        font: Font<'static>,
        scale: Scale,
        em_px: u32,
    },
    /// The fixed-size bitmap font compiled into the binary.
    Builtin,
}

/// Load the first usable font in `candidates` at an em size of `size / 2`
/// pixels, or fall back to the built-in font.
pub fn resolve_font<P: AsRef<Path>>(size: u32, candidates: &[P]) -> FontHandle {
    let em_px = size / 2;
    if em_px == 0 {
        debug!("icon size {size} too small for a scalable font, using built-in font");
        return FontHandle::Builtin;
    }

    for candidate in candidates {
        let path = candidate.as_ref();
        match load_system_font(path, em_px) {
            Some(handle) => {
                debug!("using font {} at {em_px}px", path.display());
                return handle;
            }
            None => debug!("font {} unavailable", path.display()),
        }
    }

    debug!("no system font available, using built-in font");
    FontHandle::Builtin
}

fn load_system_font(path: &Path, em_px: u32) -> Option<FontHandle> {
    let data = std::fs::read(path).ok()?;
    // Collections (.ttc) load their first face.
    let font = Font::try_from_vec_and_index(data, 0)?;
    let scale = scale_for_em(&font, em_px as f32)?;
    Some(FontHandle::System { font, scale, em_px })
}

/// rusttype scales by line height (ascent - descent); convert an em size to that.
fn scale_for_em(font: &Font<'_>, em_px: f32) -> Option<Scale> {
    let units_per_em = font.units_per_em();
    let metrics = font.v_metrics_unscaled();
    let line_height = metrics.ascent - metrics.descent;
    if units_per_em == 0 || line_height <= 0.0 {
        return None;
    }
    Some(Scale::uniform(em_px * line_height / units_per_em as f32))
}

impl FontHandle {
    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin)
    }

    /// Ink bounds of `text` drawn at the origin, `None` if it has no ink.
    pub fn text_bounds(&self, text: &str) -> Option<TextBounds> {
        match self {
            FontHandle::System { font, scale, .. } => glyphs_at(font, *scale, 0, 0, text)
                .iter()
                .filter_map(|glyph| glyph.pixel_bounding_box())
                .map(|bb| TextBounds {
                    left: bb.min.x,
                    top: bb.min.y,
                    right: bb.max.x,
                    bottom: bb.max.y,
                })
                .reduce(TextBounds::union),
            FontHandle::Builtin => builtin::text_bounds(text),
        }
    }

    /// Draw `text` with its line box at (`x`, `y`), clipped to the canvas.
    pub fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            FontHandle::System { font, scale, .. } => {
                for glyph in glyphs_at(font, *scale, x, y, text) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        blend(
                            canvas,
                            bb.min.x + gx as i32,
                            bb.min.y + gy as i32,
                            color,
                            coverage,
                        );
                    });
                }
            }
            FontHandle::Builtin => {
                builtin::for_each_ink_pixel(text, |px, py| {
                    blend(canvas, x + px, y + py, color, 1.0);
                });
            }
        }
    }
}

fn glyphs_at(
    font: &Font<'static>,
    scale: Scale,
    x: i32,
    y: i32,
    text: &str,
) -> Vec<PositionedGlyph<'static>> {
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(x as f32, y as f32 + ascent))
        .collect()
}

fn blend(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        let mixed = *dst as f32 + (src as f32 - *dst as f32) * coverage;
        *dst = mixed.round() as u8;
    }
}

/// 5x7 bitmap font for upper-case letters and digits.
mod builtin {
    use super::TextBounds;

    pub const ADVANCE: i32 = 6;
    pub const TOP_PADDING: i32 = 1;
    const GLYPH_WIDTH: i32 = 5;

    // One byte per row, bit 4 is the leftmost column.
    const LETTERS: [[u8; 7]; 26] = [
        [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
        [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
        [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
        [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100], // D
        [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
        [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
        [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
        [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
        [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
        [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
        [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
        [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
        [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
        [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
        [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
        [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
        [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
        [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
        [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
        [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
        [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
        [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
        [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
        [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
        [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
        [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
    ];

    const DIGITS: [[u8; 7]; 10] = [
        [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
        [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
        [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
        [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
        [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
        [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
        [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
        [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
        [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
        [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
    ];

    fn glyph(c: char) -> Option<&'static [u8; 7]> {
        match c {
            'A'..='Z' => LETTERS.get((c as u32 - 'A' as u32) as usize),
            '0'..='9' => DIGITS.get((c as u32 - '0' as u32) as usize),
            _ => None,
        }
    }

    /// Visit every lit pixel of `text` relative to the line box origin.
    pub fn for_each_ink_pixel<F: FnMut(i32, i32)>(text: &str, mut f: F) {
        for (index, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else {
                continue;
            };
            let origin_x = index as i32 * ADVANCE;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        f(origin_x + col, TOP_PADDING + row as i32);
                    }
                }
            }
        }
    }

    pub fn text_bounds(text: &str) -> Option<TextBounds> {
        let mut bounds: Option<TextBounds> = None;
        for_each_ink_pixel(text, |x, y| {
            let pixel = TextBounds {
                left: x,
                top: y,
                right: x + 1,
                bottom: y + 1,
            };
            bounds = Some(match bounds {
                Some(b) => b.union(pixel),
                None => pixel,
            });
        });
        bounds
    }
}
