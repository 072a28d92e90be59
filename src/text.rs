//! Bitmap-font text
//!
//! A font is a single strip of equally sized letter cells: `A`..`Z`, then
//! `.` `,` `'` `!`. A backslash in a string starts a new line.

use std::rc::Rc;

use crate::bitmap::Bitmap;
use crate::display::PixelBuffer;
use crate::geometry::Vec2i;

/// Glyph cells in the standard font strip
pub const FONT_COLUMNS: u32 = 30;

const LINE_BREAK: char = '\\';

/// Letter strip plus the size of one cell
#[derive(Debug, Clone)]
pub struct Font {
    pub bitmap: Rc<Bitmap>,
    pub letter_size: Vec2i,
}

impl Font {
    /// Slice a strip into `columns` cells spanning its full height
    pub fn from_strip(bitmap: Rc<Bitmap>, columns: u32) -> Self {
        let columns = columns.max(1);
        let letter_size = Vec2i::new(
            (bitmap.width() / columns) as i32,
            bitmap.height() as i32,
        );
        Self {
            bitmap,
            letter_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bitmap.is_empty() || self.letter_size.x <= 0 || self.letter_size.y <= 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// Cell index of a character in the font strip.
/// Characters outside the supported set map to `c - 'A'` and usually land
/// outside the strip, where the letter blit draws nothing.
pub fn letter_index(c: char) -> i32 {
    match c {
        '.' => 26,
        ',' => 27,
        '\'' => 28,
        '!' => 29,
        _ => c as i32 - 'A' as i32,
    }
}

/// True for characters the font strip (or the layout) knows about
pub fn is_supported(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, '.' | ',' | '\'' | '!' | ' ' | LINE_BREAK)
}

/// Horizontal advance of one line, up to the next line break
pub fn measure_line(line: &str, size: i32, letter_width: i32) -> i32 {
    let step = size * letter_width;
    line.chars()
        .take_while(|&c| c != LINE_BREAK)
        .map(|c| if c == ' ' { step * 3 } else { step * 2 })
        .sum()
}

fn align_offset(align: TextAlign, line: &str, size: i32, letter_width: i32) -> i32 {
    match align {
        TextAlign::Left => 0,
        TextAlign::Right => -measure_line(line, size, letter_width),
        TextAlign::Center => -measure_line(line, size, letter_width) / 2,
    }
}

/// A string laid out with a bitmap font
#[derive(Debug, Clone)]
pub struct Text {
    pub text: String,
    pub font: Font,
    /// Center of the first letter
    pub position: Vec2i,
    /// Integer scale applied to the letter cell
    pub size: i32,
    pub align: TextAlign,
}

impl Text {
    pub fn new(text: impl Into<String>, font: Font, position: Vec2i, size: i32, align: TextAlign) -> Self {
        let text = text.into();
        if let Some(c) = text.chars().find(|&c| !is_supported(c)) {
            log::warn!("Text {:?} contains unsupported character {:?}", text, c);
        }
        Self {
            text,
            font,
            position,
            size,
            align,
        }
    }

    /// Blit every letter. `camera` is subtracted from the letter positions.
    pub fn draw(&self, buffer: &mut PixelBuffer, camera: Vec2i) {
        if self.font.is_empty() || self.size <= 0 {
            return;
        }

        let lw = self.font.letter_size.x;
        let lh = self.font.letter_size.y;
        let half_size = Vec2i::new(self.size * lw, self.size * lh);
        let step = self.size * lw;
        let line_height = ((self.size * (lh + 2)) as f32 * 2.5) as i32;

        let mut cursor = self.position;
        cursor.x += align_offset(self.align, &self.text, self.size, lw);

        for (i, c) in self.text.char_indices() {
            match c {
                ' ' => cursor.x += step * 3,
                LINE_BREAK => {
                    let rest = &self.text[i + c.len_utf8()..];
                    cursor.x = self.position.x + align_offset(self.align, rest, self.size, lw);
                    cursor.y += line_height;
                },
                _ => {
                    buffer.blit_letter(
                        &self.font.bitmap,
                        self.font.letter_size,
                        letter_index(c),
                        cursor,
                        half_size,
                        camera,
                    );
                    cursor.x += step * 2;
                },
            }
        }
    }
}
