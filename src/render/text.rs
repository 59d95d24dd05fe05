//! Legend labels for raster figures.
//!
//! Labels are laid out by plotters with the sans face the viewer ships.
//! If that face cannot be registered, a small 5x7 bitmap face is used
//! instead so a figure never loses its legend.

use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::OnceLock;

use ::image::RgbaImage;
use eframe::egui::FontDefinitions;
use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor, TextStyle};
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use tracing::debug;

/// Label height in pixels
const LABEL_SIZE: f64 = 16.0;

/// Name of the egui font used for raster labels
const SANS_FONT: &str = "Ubuntu-Light";

const BITMAP_HEIGHT: i32 = 7;
const BITMAP_SCALE: i32 = 2;

/// plotters drawing target over an RGBA buffer
struct ImageCanvas<'a> {
    img: &'a mut RgbaImage,
}

impl DrawingBackend for ImageCanvas<'_> {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        blend(self.img, point, color.rgb, color.alpha);
        Ok(())
    }
}

fn blend(img: &mut RgbaImage, (x, y): BackendCoord, rgb: (u8, u8, u8), alpha: f64) {
    let (width, height) = img.dimensions();
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 || alpha <= 0.0 {
        return;
    }
    let alpha = alpha.min(1.0);
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    let src = [rgb.0, rgb.1, rgb.2];
    for (dst, src) in pixel.0.iter_mut().zip(src) {
        *dst = (src as f64 * alpha + *dst as f64 * (1.0 - alpha)).round() as u8;
    }
    pixel.0[3] = 255;
}

/// Register the viewer's sans face with plotters, once per process
fn sans_font_ready() -> bool {
    static READY: OnceLock<bool> = OnceLock::new();
    *READY.get_or_init(|| {
        let fonts = FontDefinitions::default();
        let ready = match fonts.font_data.get(SANS_FONT).map(|data| &data.font) {
            Some(Cow::Borrowed(bytes)) => {
                plotters::style::register_font("sans-serif", FontStyle::Normal, *bytes).is_ok()
            }
            _ => false,
        };
        if !ready {
            debug!("{} unavailable, raster labels use the bitmap face", SANS_FONT);
        }
        ready
    })
}

fn label_style(color: [u8; 3]) -> TextStyle<'static> {
    FontDesc::new(FontFamily::SansSerif, LABEL_SIZE, FontStyle::Normal)
        .color(&RGBColor(color[0], color[1], color[2]))
        .pos(Pos::new(HPos::Right, VPos::Center))
}

/// Width in pixels `text` will occupy when drawn with [`draw_label`]
pub fn label_width(text: &str) -> i32 {
    if sans_font_ready() {
        if let Ok(((min_x, _), (max_x, _))) = label_style([0, 0, 0]).layout_box(text) {
            return max_x - min_x;
        }
    }
    bitmap_width(text)
}

/// Draw `text` right-aligned on `anchor.0`, vertically centred on `anchor.1`
pub fn draw_label(img: &mut RgbaImage, text: &str, anchor: (i32, i32), color: [u8; 3]) {
    if sans_font_ready() {
        let mut canvas = ImageCanvas { img: &mut *img };
        if canvas.draw_text(text, &label_style(color), anchor).is_ok() {
            return;
        }
    }
    draw_bitmap_label(img, text, anchor, color);
}

fn bitmap_width(text: &str) -> i32 {
    let columns: i32 = text.chars().map(|ch| glyph(ch).0 as i32 + 1).sum();
    (columns - 1).max(0) * BITMAP_SCALE
}

fn draw_bitmap_label(img: &mut RgbaImage, text: &str, anchor: (i32, i32), color: [u8; 3]) {
    let rgb = (color[0], color[1], color[2]);
    let top = anchor.1 - BITMAP_HEIGHT * BITMAP_SCALE / 2;
    let mut cursor = anchor.0 - bitmap_width(text);

    for ch in text.chars() {
        let (width, rows) = glyph(ch);
        for (row, pattern) in rows.iter().enumerate() {
            for col in 0..width {
                if pattern & (1 << (width - 1 - col)) == 0 {
                    continue;
                }
                let x = cursor + col as i32 * BITMAP_SCALE;
                let y = top + row as i32 * BITMAP_SCALE;
                for dy in 0..BITMAP_SCALE {
                    for dx in 0..BITMAP_SCALE {
                        blend(img, (x + dx, y + dy), rgb, 1.0);
                    }
                }
            }
        }
        cursor += (width as i32 + 1) * BITMAP_SCALE;
    }
}

/// Column count and row bitmaps for a character; letters are upper-cased
fn glyph(ch: char) -> (u8, [u8; 7]) {
    match ch.to_ascii_uppercase() {
        ' ' => (3, [0; 7]),
        '.' => (1, [0, 0, 0, 0, 0, 0, 1]),
        '-' => (3, [0, 0, 0, 0b111, 0, 0, 0]),
        '+' => (5, [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0]),
        '=' => (4, [0, 0, 0b1111, 0, 0b1111, 0, 0]),
        'µ' => (5, [0, 0, 0b10001, 0b10001, 0b10011, 0b11101, 0b10000]),
        '0' => (5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => (3, [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
        '2' => (5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => (5, [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110]),
        '4' => (5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => (5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => (5, [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => (5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => (5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => (5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        'A' => (5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => (5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => (5, [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
        'E' => (5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => (5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => (5, [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => (5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => (3, [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'J' => (5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => (5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => (5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => (5, [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => (5, [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
        'O' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => (5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => (5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100]),
        'W' => (5, [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001]),
        'X' => (5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => (5, [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        'Z' => (5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        // Hollow box for anything the face does not cover
        _ => (5, [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111]),
    }
}
