#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::module_name_repetitions
)]
//! Data model and file codecs for Adafruit GFX style bitmap fonts.
//!
//! A [`Font`] is an ordered list of [`Glyph`]s. Each glyph is a sparse set of pixels in
//! character-cell coordinates (origin on the baseline, y pointing down) plus the metrics
//! the embedded `GFXglyph` struct carries. The [`formats`] module loads and saves fonts
//! as C headers, BDF, the raw binary struct image, XML and YAFF.

use serde::{Deserialize, Serialize};

mod error;
pub use error::*;

mod position;
pub use position::*;

mod sparse_map;
pub use sparse_map::*;

mod glyph;
pub use glyph::*;

mod properties;
pub use properties::*;

mod font;
pub use font::*;

mod flatten;
pub use flatten::*;

pub mod formats;
pub use formats::{FontFormat, LoadOptions, SaveOptions, glyphs_from_xml_str, glyphs_to_xml_string, load_file, save_file};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(width: {}, height: {})", self.width, self.height)
    }
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Size { width, height }
    }
}

impl From<Position> for Size {
    fn from(value: Position) -> Self {
        Size {
            width: value.x,
            height: value.y,
        }
    }
}

/// Half open rectangle: `right()` and `bottom()` are one past the last covered pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub start: Position,
    pub size: Size,
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x:{}, y:{}, width: {}, height: {})",
            self.start.x, self.start.y, self.size.width, self.size.height
        )
    }
}

impl Rectangle {
    pub fn new(start: Position, size: Size) -> Self {
        Self { start, size }
    }

    pub fn from(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            start: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Smallest rectangle covering both corner pixels (inclusive).
    pub fn from_corners(top_left: Position, bottom_right: Position) -> Self {
        let min = top_left.min(bottom_right);
        let max = top_left.max(bottom_right);
        Self {
            start: min,
            size: Size::new(max.x - min.x + 1, max.y - min.y + 1),
        }
    }

    pub fn top_left(&self) -> Position {
        self.start
    }

    pub fn bottom_right(&self) -> Position {
        Position {
            x: self.start.x + self.size.width,
            y: self.start.y + self.size.height,
        }
    }

    pub fn contains_pt(&self, point: Position) -> bool {
        self.start.x <= point.x && point.x < self.right() && self.start.y <= point.y && point.y < self.bottom()
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }

        if other.is_empty() {
            return *self;
        }

        let min = self.start.min(other.start);
        let max = self.bottom_right().max(other.bottom_right());
        Rectangle {
            start: min,
            size: (max - min).into(),
        }
    }

    pub fn y_range(&self) -> std::ops::Range<i32> {
        self.start.y..self.bottom()
    }

    pub fn x_range(&self) -> std::ops::Range<i32> {
        self.start.x..self.right()
    }

    pub fn left(&self) -> i32 {
        self.start.x
    }

    pub fn right(&self) -> i32 {
        self.bottom_right().x
    }

    pub fn top(&self) -> i32 {
        self.start.y
    }

    pub fn bottom(&self) -> i32 {
        self.bottom_right().y
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }
}
