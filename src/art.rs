use flappy_lizard::{CoreError, FlightSprites, Rgba, Sprite};

/// Lizard sprite size, (width, height).
pub const LIZARD_SIZE: (usize, usize) = (8, 6);
pub const CACTUS_WIDTH: usize = 10;
pub const PIECE_HEIGHT: usize = 4;

#[rustfmt::skip]
const LIZARD_DOWN: [&str; 6] = [
    "......GG",
    "g...gGGE",
    "gggggggg",
    ".gggggg.",
    ".l...l..",
    "........",
];

#[rustfmt::skip]
const LIZARD_UP: [&str; 6] = [
    ".l...l..",
    "......GG",
    "g...gGGE",
    "gggggggg",
    ".gggggg.",
    "........",
];

#[rustfmt::skip]
const CACTUS_TIP: [&str; 4] = [
    ".CCCCCCCC.",
    "CCcCCCCcCC",
    "CCcCCCCcCC",
    "dddddddddd",
];

// Narrower than the tip: the outer columns are see-through.
#[rustfmt::skip]
const CACTUS_BODY: [&str; 4] = [
    ".cCCCCCCc.",
    ".cCcCCCCc.",
    ".cCCCCcCc.",
    ".cCCCCCCc.",
];

fn palette(c: char) -> Option<Rgba> {
    match c {
        'g' => Some(Rgba::opaque(84, 168, 55)),
        'G' => Some(Rgba::opaque(120, 200, 80)),
        'E' => Some(Rgba::opaque(20, 20, 20)),
        'l' => Some(Rgba::opaque(60, 120, 40)),
        'C' => Some(Rgba::opaque(100, 170, 40)),
        'c' => Some(Rgba::opaque(74, 122, 26)),
        'd' => Some(Rgba::opaque(60, 100, 20)),
        _ => None,
    }
}

/// Every still image the game draws and derives collision masks from.
pub struct Art {
    pub lizard_up: Sprite,
    pub lizard_down: Sprite,
    pub cactus_tip: Sprite,
    pub cactus_body: Sprite,
}

impl Art {
    pub fn load() -> Result<Self, CoreError> {
        Ok(Self {
            lizard_up: Sprite::from_rows(&LIZARD_UP, palette)?,
            lizard_down: Sprite::from_rows(&LIZARD_DOWN, palette)?,
            cactus_tip: Sprite::from_rows(&CACTUS_TIP, palette)?,
            cactus_body: Sprite::from_rows(&CACTUS_BODY, palette)?,
        })
    }

    pub fn flight_sprites(&self) -> FlightSprites {
        FlightSprites {
            up: self.lizard_up.clone(),
            down: self.lizard_down.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_art_matches_declared_sizes() {
        let art = Art::load().unwrap();
        assert_eq!(art.lizard_up.size(), LIZARD_SIZE);
        assert_eq!(art.lizard_down.size(), LIZARD_SIZE);
        assert_eq!(art.cactus_tip.size(), (CACTUS_WIDTH, PIECE_HEIGHT));
        assert_eq!(art.cactus_body.size(), (CACTUS_WIDTH, PIECE_HEIGHT));
    }
}
