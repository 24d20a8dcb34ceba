use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Position, Rectangle, SparseMap};

/// Where a glyph's code came from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlyphStatus {
    /// Code taken from the source file as is.
    #[default]
    Normal,
    /// Blank filler synthesized to close a gap in the code sequence.
    Inserted,
    /// Code was duplicate or missing and the glyph got moved to another code.
    Error,
}

impl std::fmt::Display for GlyphStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphStatus::Normal => write!(f, "normal"),
            GlyphStatus::Inserted => write!(f, "inserted"),
            GlyphStatus::Error => write!(f, "moved"),
        }
    }
}

/// One character: a sparse bitmap in cell coordinates plus code and advance.
///
/// Width, height and offsets are read off the bitmap bounds, so they always reflect the
/// current pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub code: u16,
    pub x_advance: i32,
    pub status: GlyphStatus,
    map: SparseMap,
}

impl Default for Glyph {
    fn default() -> Self {
        Self::blank(Glyph::UNASSIGNED, 0, GlyphStatus::Normal)
    }
}

impl Glyph {
    /// Code of a glyph that has not been assigned a character yet.
    pub const UNASSIGNED: u16 = 0xFFFF;

    /// Advance of blank glyphs inserted into code gaps, wide enough to stay visible in a listing.
    pub const INSERTED_ADVANCE: i32 = 4;

    pub fn blank(code: u16, x_advance: i32, status: GlyphStatus) -> Self {
        Self {
            code,
            x_advance,
            status,
            map: SparseMap::new(),
        }
    }

    /// Decodes a packed bitmap and moves it to `(x_offset, y_offset)`.
    pub fn from_packed(data: &[u8], width: i32, height: i32, x_offset: i32, y_offset: i32, x_advance: i32) -> Self {
        let mut map = SparseMap::from_packed(data, width, height);
        map.offset(x_offset, y_offset);
        Self {
            code: Self::UNASSIGNED,
            x_advance,
            status: GlyphStatus::Normal,
            map,
        }
    }

    pub fn from_map(map: &SparseMap, x_offset: i32, y_offset: i32, x_advance: i32) -> Self {
        let mut map = map.clone();
        map.offset(x_offset, y_offset);
        Self {
            code: Self::UNASSIGNED,
            x_advance,
            status: GlyphStatus::Normal,
            map,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    pub fn with_status(mut self, status: GlyphStatus) -> Self {
        self.status = status;
        self
    }

    pub fn map(&self) -> &SparseMap {
        &self.map
    }

    pub fn bounds(&self) -> Rectangle {
        self.map.bounds()
    }

    pub fn width(&self) -> i32 {
        self.map.bounds().width()
    }

    pub fn height(&self) -> i32 {
        self.map.bounds().height()
    }

    pub fn x_offset(&self) -> i32 {
        self.map.bounds().left()
    }

    pub fn y_offset(&self) -> i32 {
        self.map.bounds().top()
    }

    pub fn is_blank(&self) -> bool {
        self.map.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Position> + '_ {
        self.map.points()
    }

    pub fn packed_bytes(&self) -> Vec<u8> {
        self.map.packed_bytes()
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        self.map.get(x, y)
    }

    pub fn set(&mut self, x: i32, y: i32) {
        self.map.set(x, y);
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        self.map.clear(x, y);
    }

    pub fn set_value(&mut self, x: i32, y: i32, value: bool) {
        self.map.set_value(x, y, value);
    }

    pub fn toggle(&mut self, x: i32, y: i32) -> bool {
        self.map.toggle(x, y)
    }

    pub fn clear_all(&mut self) {
        self.map.clear_all();
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.map.offset(dx, dy);
    }

    pub fn flip_horizontal(&mut self) {
        self.map.flip_horizontal();
    }

    pub fn flip_vertical(&mut self) {
        self.map.flip_vertical();
    }

    pub fn rotate180(&mut self) {
        self.map.rotate180();
    }

    pub fn rotate90_cw(&mut self) {
        self.map.rotate90_cw();
    }

    pub fn rotate90_ccw(&mut self) {
        self.map.rotate90_ccw();
    }

    /// Takes over the pixels and the advance of `other`; code and status stay.
    pub fn copy_from(&mut self, other: &Glyph) {
        self.map.replace(&other.map);
        self.x_advance = other.x_advance;
    }

    /// Replaces the pixels with a hollow `width` x `height` box sitting on the baseline.
    pub fn set_rect(&mut self, width: i32, height: i32) {
        self.map.clear_all();
        if width <= 0 || height <= 0 {
            return;
        }
        for x in 0..width {
            self.map.set(x, -1);
            self.map.set(x, -height);
        }
        for y in 1..=height {
            self.map.set(0, -y);
            self.map.set(width - 1, -y);
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GlyphSerde {
    code: u16,
    x_advance: i32,
    #[serde(default)]
    status: GlyphStatus,
    width: i32,
    height: i32,
    x_offset: i32,
    y_offset: i32,
    data: String,
}

impl Serialize for Glyph {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        GlyphSerde {
            code: self.code,
            x_advance: self.x_advance,
            status: self.status,
            width: self.width(),
            height: self.height(),
            x_offset: self.x_offset(),
            y_offset: self.y_offset(),
            data: general_purpose::STANDARD.encode(self.packed_bytes()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Glyph {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let g = GlyphSerde::deserialize(deserializer)?;
        let data = general_purpose::STANDARD.decode(&g.data).map_err(serde::de::Error::custom)?;
        Ok(Glyph::from_packed(&data, g.width, g.height, g.x_offset, g.y_offset, g.x_advance)
            .with_code(g.code)
            .with_status(g.status))
    }
}
