use std::collections::BTreeSet;

use crate::{Position, Rectangle};

/// A set of lit pixels with a tight bounding box.
///
/// All point mutations go through [`SparseMap::update`], which recomputes the bounds, so
/// [`SparseMap::bounds`] is never stale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseMap {
    points: BTreeSet<Position>,
    bounds: Rectangle,
}

impl SparseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes needed to pack a `width` x `height` bitmap without row padding.
    pub fn required_bytes(width: i32, height: i32) -> usize {
        if width <= 0 || height <= 0 {
            return 0;
        }
        (width as usize * height as usize).div_ceil(8)
    }

    /// Decodes a packed bitmap. Bits are read MSB first, rows top to bottom without padding,
    /// pixels land at `(0..width, 0..height)`. Missing trailing bytes read as zero.
    pub fn from_packed(data: &[u8], width: i32, height: i32) -> Self {
        let mut points = BTreeSet::new();
        if width > 0 && height > 0 {
            let bits = (width as usize * height as usize).min(data.len() * 8);
            for bit in 0..bits {
                if data[bit / 8] & (0x80 >> (bit % 8)) != 0 {
                    let x = (bit % width as usize) as i32;
                    let y = (bit / width as usize) as i32;
                    points.insert(Position::new(x, y));
                }
            }
        }
        Self::from_points(points)
    }

    pub fn from_points(points: impl IntoIterator<Item = Position>) -> Self {
        let mut map = Self::default();
        map.update(|p| p.extend(points));
        map
    }

    fn update(&mut self, f: impl FnOnce(&mut BTreeSet<Position>)) {
        f(&mut self.points);
        self.bounds = Self::compute_bounds(&self.points);
    }

    fn compute_bounds(points: &BTreeSet<Position>) -> Rectangle {
        let mut it = points.iter();
        let Some(first) = it.next() else {
            return Rectangle::default();
        };
        let (min, max) = it.fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Rectangle::from_corners(min, max)
    }

    /// Tight bounding box of all set points, empty when no point is set.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in row major order.
    pub fn points(&self) -> impl Iterator<Item = Position> + '_ {
        self.points.iter().copied()
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        self.points.contains(&Position::new(x, y))
    }

    pub fn set(&mut self, x: i32, y: i32) {
        if !self.get(x, y) {
            self.update(|p| {
                p.insert(Position::new(x, y));
            });
        }
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        if self.get(x, y) {
            self.update(|p| {
                p.remove(&Position::new(x, y));
            });
        }
    }

    pub fn set_value(&mut self, x: i32, y: i32, value: bool) {
        if value {
            self.set(x, y);
        } else {
            self.clear(x, y);
        }
    }

    /// Inverts the pixel and returns its new state.
    pub fn toggle(&mut self, x: i32, y: i32) -> bool {
        let value = !self.get(x, y);
        self.set_value(x, y, value);
        value
    }

    pub fn clear_all(&mut self) {
        self.update(BTreeSet::clear);
    }

    /// Replaces the whole point set.
    pub fn replace(&mut self, other: &SparseMap) {
        self.update(|p| p.clone_from(&other.points));
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        self.map_points(|p| Position::new(p.x + dx, p.y + dy));
    }

    fn map_points(&mut self, f: impl Fn(Position) -> Position) {
        self.update(|p| {
            *p = p.iter().map(|pt| f(*pt)).collect();
        });
    }

    pub fn flip_horizontal(&mut self) {
        let b = self.bounds;
        let sum = b.left() + b.right() - 1;
        self.map_points(|p| Position::new(sum - p.x, p.y));
    }

    pub fn flip_vertical(&mut self) {
        let b = self.bounds;
        let sum = b.top() + b.bottom() - 1;
        self.map_points(|p| Position::new(p.x, sum - p.y));
    }

    pub fn rotate180(&mut self) {
        let b = self.bounds;
        let sum_x = b.left() + b.right() - 1;
        let sum_y = b.top() + b.bottom() - 1;
        self.map_points(|p| Position::new(sum_x - p.x, sum_y - p.y));
    }

    /// Rotates a quarter turn clockwise; the top left corner of the bounds stays in place.
    pub fn rotate90_cw(&mut self) {
        let b = self.bounds;
        self.map_points(|p| {
            let rx = p.x - b.left();
            let ry = p.y - b.top();
            Position::new(b.left() + b.height() - 1 - ry, b.top() + rx)
        });
    }

    /// Rotates a quarter turn counter clockwise; the top left corner of the bounds stays in place.
    pub fn rotate90_ccw(&mut self) {
        let b = self.bounds;
        self.map_points(|p| {
            let rx = p.x - b.left();
            let ry = p.y - b.top();
            Position::new(b.left() + ry, b.top() + b.width() - 1 - rx)
        });
    }

    /// Packs the pixels inside the bounds, MSB first, rows top to bottom without padding.
    pub fn packed_bytes(&self) -> Vec<u8> {
        let b = self.bounds;
        let mut data = vec![0u8; Self::required_bytes(b.width(), b.height())];
        for p in &self.points {
            let bit = ((p.y - b.top()) * b.width() + (p.x - b.left())) as usize;
            data[bit / 8] |= 0x80 >> (bit % 8);
        }
        data
    }
}
