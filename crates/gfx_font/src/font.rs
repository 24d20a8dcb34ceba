use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{FontProperties, Glyph, GlyphStatus, Rectangle, check_flatness, flatten_glyph_list, sanitize_identifier};

/// A bitmap font: glyphs sorted by code plus the line height.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Font {
    glyphs: Vec<Glyph>,
    /// Line height in pixels.
    pub y_advance: i32,
    #[serde(default)]
    pub properties: FontProperties,
    /// File the font was last loaded from or saved to.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.y_advance == other.y_advance && self.properties == other.properties && self.glyphs == other.glyphs
    }
}

impl Eq for Font {}

impl Font {
    pub fn new(y_advance: i32) -> Self {
        Self {
            y_advance,
            ..Default::default()
        }
    }

    /// Builds a font, sorting the glyphs by code. Glyphs sharing a code keep their order.
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = Glyph>, y_advance: i32) -> Self {
        let mut font = Self::new(y_advance);
        font.add_glyphs(glyphs);
        font
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// In place glyph access; changing codes here can break the sort order, use [`Font::flatten`] afterwards.
    pub fn glyphs_mut(&mut self) -> &mut [Glyph] {
        &mut self.glyphs
    }

    pub fn into_glyphs(self) -> Vec<Glyph> {
        self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn start_code(&self) -> u16 {
        self.glyphs.first().map_or(0, |g| g.code)
    }

    pub fn end_code(&self) -> u16 {
        self.glyphs.last().map_or(0, |g| g.code)
    }

    pub fn max_advance(&self) -> i32 {
        self.glyphs.iter().map(|g| g.x_advance).max().unwrap_or(0)
    }

    /// Union of all glyph bitmaps.
    pub fn bmp_bounds(&self) -> Rectangle {
        self.glyphs.iter().fold(Rectangle::default(), |r, g| r.union(&g.bounds()))
    }

    /// Bitmap bounds extended by the nominal character cell.
    pub fn full_bounds(&self) -> Rectangle {
        let cell = Rectangle::from(0, -self.y_advance, self.max_advance(), self.y_advance);
        self.bmp_bounds().union(&cell)
    }

    pub fn glyph_index(&self, code: u16) -> Option<usize> {
        self.glyphs.iter().position(|g| g.code == code)
    }

    pub fn glyph(&self, code: u16) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.code == code)
    }

    pub fn glyph_mut(&mut self, code: u16) -> Option<&mut Glyph> {
        self.glyphs.iter_mut().find(|g| g.code == code)
    }

    /// Inserts keeping the code order. A glyph whose code is not below the last one is appended.
    pub fn add(&mut self, glyph: Glyph) {
        if self.glyphs.last().map_or(true, |last| glyph.code >= last.code) {
            self.glyphs.push(glyph);
        } else {
            let index = self.glyphs.partition_point(|g| g.code <= glyph.code);
            self.glyphs.insert(index, glyph);
        }
    }

    pub fn add_glyphs(&mut self, glyphs: impl IntoIterator<Item = Glyph>) {
        for glyph in glyphs {
            self.add(glyph);
        }
    }

    pub fn remove(&mut self, code: u16) -> Option<Glyph> {
        let index = self.glyph_index(code)?;
        self.remove_at(index)
    }

    /// Removes a glyph. Removing from the middle moves the following glyphs down one code.
    pub fn remove_at(&mut self, index: usize) -> Option<Glyph> {
        if index >= self.glyphs.len() {
            return None;
        }
        let glyph = self.glyphs.remove(index);
        if index > 0 && index < self.glyphs.len() {
            self.renumber_from(index);
        }
        Some(glyph)
    }

    /// Inserts a glyph in front of `index` and renumbers so the codes stay consecutive.
    ///
    /// At the front of a font starting above code 0 the glyph takes the code below the first one.
    /// Otherwise it takes the code currently at `index` (or the one after the last glyph) and all
    /// following glyphs move up one code.
    pub fn insert_at(&mut self, index: usize, mut glyph: Glyph) {
        let index = index.min(self.glyphs.len());
        if self.glyphs.is_empty() {
            self.glyphs.push(glyph);
            return;
        }
        if index == 0 && self.start_code() > 0 {
            glyph.code = self.start_code() - 1;
            self.glyphs.insert(0, glyph);
            return;
        }
        glyph.code = match self.glyphs.get(index) {
            Some(g) => g.code,
            None => self.end_code().saturating_add(1),
        };
        self.glyphs.insert(index, glyph);
        self.renumber_from(index + 1);
    }

    fn renumber_from(&mut self, index: usize) {
        if index == 0 || index >= self.glyphs.len() {
            return;
        }
        let mut code = self.glyphs[index - 1].code as u32 + 1;
        for glyph in &mut self.glyphs[index..] {
            if code >= Glyph::UNASSIGNED as u32 {
                glyph.code = Glyph::UNASSIGNED;
                glyph.status = GlyphStatus::Error;
            } else {
                glyph.code = code as u16;
            }
            code += 1;
        }
    }

    pub fn truncate(&mut self, len: usize) {
        self.glyphs.truncate(len);
    }

    pub fn is_flat(&self) -> bool {
        check_flatness(&self.glyphs)
    }

    /// See [`flatten_glyph_list`].
    pub fn flatten(&mut self) {
        let glyphs = std::mem::take(&mut self.glyphs);
        self.glyphs = flatten_glyph_list(glyphs);
    }

    /// Gives every inserted filler the rounded mean advance of the real glyphs.
    pub fn fill_inserted_advance(&mut self) {
        let (sum, count) = self
            .glyphs
            .iter()
            .filter(|g| g.status != GlyphStatus::Inserted)
            .fold((0i64, 0i64), |(sum, count), g| (sum + g.x_advance as i64, count + 1));
        if count == 0 {
            return;
        }
        let mean = (sum as f64 / count as f64).round() as i32;
        for glyph in self.glyphs.iter_mut().filter(|g| g.status == GlyphStatus::Inserted) {
            glyph.x_advance = mean;
        }
    }

    /// Rounded mean advance over all glyphs, 0 for an empty font.
    pub fn mean_advance(&self) -> i32 {
        if self.glyphs.is_empty() {
            return 0;
        }
        let sum: i64 = self.glyphs.iter().map(|g| g.x_advance as i64).sum();
        (sum as f64 / self.glyphs.len() as f64).round() as i32
    }

    pub fn pixel_size_or_default(&self) -> i32 {
        let p = &self.properties;
        if let Some(size) = p.pixel_size {
            return size;
        }
        if let (Some(ascent), Some(descent)) = (p.ascent, p.descent) {
            return ascent + descent;
        }
        if self.y_advance > 0 {
            return self.y_advance;
        }
        self.bmp_bounds().height()
    }

    pub fn ascent_or_default(&self) -> i32 {
        let p = &self.properties;
        if let Some(ascent) = p.ascent {
            return ascent;
        }
        match (p.pixel_size, p.descent) {
            (Some(size), Some(descent)) => size - descent,
            (Some(size), None) => (size as f32 * 0.8).round() as i32,
            _ => {
                let bounds = self.bmp_bounds();
                if bounds.is_empty() {
                    (self.pixel_size_or_default() as f32 * 0.8).round() as i32
                } else {
                    (-bounds.top()).max(0)
                }
            }
        }
    }

    pub fn descent_or_default(&self) -> i32 {
        let p = &self.properties;
        if let Some(descent) = p.descent {
            return descent;
        }
        match (p.pixel_size, p.ascent) {
            (Some(size), Some(ascent)) => size - ascent,
            (Some(size), None) => size - self.ascent_or_default(),
            _ => {
                let bounds = self.bmp_bounds();
                if bounds.is_empty() {
                    (self.ascent_or_default() as f32 * 0.25).round() as i32
                } else {
                    bounds.bottom().max(0)
                }
            }
        }
    }

    /// The font name, falling back to `fallback`, then the file stem, then `"GfxFont"`.
    pub fn font_name_or_default(&self, fallback: Option<&str>) -> String {
        if let Some(name) = self.properties.font_name.as_ref().filter(|n| !n.trim().is_empty()) {
            return name.clone();
        }
        if let Some(name) = fallback.filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map_or_else(|| "GfxFont".to_string(), |s| s.to_string_lossy().to_string())
    }

    /// C identifier used for the arrays of the header format.
    pub fn identifier(&self, fallback: Option<&str>) -> String {
        sanitize_identifier(&self.font_name_or_default(fallback))
    }

    /// Properties with every missing value derived from the others or from the bitmaps.
    pub fn filled_properties(&self, fallback: Option<&str>) -> FontProperties {
        FontProperties {
            font_name: Some(self.font_name_or_default(fallback)),
            pixel_size: Some(self.pixel_size_or_default()),
            ascent: Some(self.ascent_or_default()),
            descent: Some(self.descent_or_default()),
        }
    }
}
