use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba(0, 0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Rgba {
        Rgba(r, g, b, 255)
    }

    pub fn alpha(&self) -> u8 {
        self.3
    }
}

/// A still image, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Sprite {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::EmptySprite);
        }
        if pixels.len() != width * height {
            return Err(CoreError::SpriteSize {
                expected: (width, height),
                actual: (pixels.len() / height, height),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a sprite from equal-length text rows; each char is looked up
    /// with `palette`, `None` meaning transparent.
    pub fn from_rows(
        rows: &[&str],
        palette: impl Fn(char) -> Option<Rgba>,
    ) -> Result<Self, CoreError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut pixels = Vec::with_capacity(width * height);
        for row in rows {
            if row.chars().count() != width {
                return Err(CoreError::SpriteSize {
                    expected: (width, height),
                    actual: (row.chars().count(), height),
                });
            }
            pixels.extend(row.chars().map(|c| palette(c).unwrap_or(Rgba::TRANSPARENT)));
        }
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    /// Fails unless the sprite is exactly `expected` (width, height).
    pub fn expect_size(&self, expected: (usize, usize)) -> Result<(), CoreError> {
        if self.size() != expected {
            return Err(CoreError::SpriteSize {
                expected,
                actual: self.size(),
            });
        }
        Ok(())
    }
}
