//! Per-pixel opacity masks for exact-silhouette collision.

use bitvec::prelude::BitVec;

use crate::sprite::Sprite;

/// Alpha values above this count as solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: BitVec,
}

impl Mask {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: BitVec::repeat(false, width * height),
        }
    }

    pub fn from_sprite(sprite: &Sprite) -> Self {
        let mut mask = Self::empty(sprite.width(), sprite.height());
        for y in 0..sprite.height() {
            for x in 0..sprite.width() {
                if sprite.get(x, y).alpha() > ALPHA_THRESHOLD {
                    mask.bits.set(y * mask.width + x, true);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range coordinates read as clear.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// ORs `other` into this mask with its top-left at (`x`, `y`), clipping
    /// whatever falls outside.
    pub fn draw(&mut self, other: &Mask, x: i32, y: i32) {
        for oy in 0..other.height as i32 {
            for ox in 0..other.width as i32 {
                let (tx, ty) = (x + ox, y + oy);
                if other.get(ox, oy)
                    && tx >= 0
                    && ty >= 0
                    && (tx as usize) < self.width
                    && (ty as usize) < self.height
                {
                    self.bits.set(ty as usize * self.width + tx as usize, true);
                }
            }
        }
    }

    /// First solid pixel shared with `other` placed at (`dx`, `dy`) relative to
    /// this mask's origin, in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, dx: i32, dy: i32) -> Option<(i32, i32)> {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn overlaps(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        self.overlap(other, dx, dy).is_some()
    }
}
