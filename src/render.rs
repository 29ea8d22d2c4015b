use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use flappy_lizard::mask::ALPHA_THRESHOLD;
use flappy_lizard::{FlightModel, ObstaclePair, Sprite, WingFrame};

use crate::art::Art;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const SKY_TOP: Rgb = Rgb(238, 170, 90);
const SKY_BOT: Rgb = Rgb(250, 222, 160);
const DUNE_FAR: Rgb = Rgb(222, 178, 112);
const DUNE_NEAR: Rgb = Rgb(205, 155, 92);
const PANEL: Rgb = Rgb(52, 78, 91);
const PANEL_EDGE: Rgb = Rgb(32, 48, 56);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(245, 200, 66);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Copies the solid pixels of `sprite`, same threshold as collision masks.
    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) {
        for sy in 0..sprite.height() {
            for sx in 0..sprite.width() {
                let p = sprite.get(sx, sy);
                if p.alpha() > ALPHA_THRESHOLD {
                    self.set(x + sx as i32, y + sy as i32, Rgb(p.0, p.1, p.2));
                }
            }
        }
    }

    fn darken(&mut self) {
        for c in &mut self.px {
            *c = c.dim();
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap glyphs ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'D' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'F' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'U' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'Y' => [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0],
        'Z' => [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1],
        d @ '0'..='9' => DIGITS[d as usize - '0' as usize],
        _ => return None,
    })
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], fg: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Centered on `cx`; 3px glyphs with 1px spacing. Unknown chars are blanks.
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let total_w = text.chars().count() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(glyph) = letter(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, &glyph, fg);
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), fg);
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Everything the renderer needs for one frame.
pub struct Scene<'a> {
    pub flight: &'a FlightModel,
    /// Overrides the model's y, for the bobbing title screen.
    pub flight_y: f64,
    /// Visible pairs, left to right.
    pub pairs: Vec<&'a ObstaclePair>,
    pub piece_height: usize,
    pub backdrop_x: f64,
    pub score: u32,
    pub overlay: Overlay,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Title,
    Paused,
    GameOver { score: u32, best: u32 },
}

pub fn draw(buf: &mut PixelBuf, art: &Art, scene: Scene<'_>) {
    draw_sky(buf);
    draw_dunes(buf, scene.backdrop_x);
    for pair in scene.pairs {
        draw_pair(buf, art, pair, scene.piece_height);
    }
    let sprite = match scene.flight.wing_frame() {
        WingFrame::Up => &art.lizard_up,
        WingFrame::Down => &art.lizard_down,
    };
    buf.blit(sprite, scene.flight.x(), scene.flight_y.floor() as i32);

    let cx = buf.w as i32 / 2;
    match scene.overlay {
        Overlay::None => draw_number(buf, cx, 3, scene.score, WHITE),
        Overlay::Title => {
            let cy = buf.h as i32 / 4;
            draw_text(buf, cx, cy, "FLAPPY", GOLD);
            draw_text(buf, cx, cy + 7, "LIZARD", GOLD);
            draw_text(buf, cx, cy + 16, "SPACE", WHITE);
        }
        Overlay::Paused => {
            draw_number(buf, cx, 3, scene.score, WHITE);
            draw_text(buf, cx, buf.h as i32 / 2 - 2, "PAUSED", WHITE);
        }
        Overlay::GameOver { score, best } => draw_game_over(buf, score, best),
    }
}

/// Shown while the terminal cannot host a round.
pub fn draw_too_small(buf: &mut PixelBuf) {
    draw_sky(buf);
    draw_dunes(buf, 0.0);
    let cx = buf.w as i32 / 2;
    let cy = buf.h as i32 / 2;
    draw_text(buf, cx, cy - 6, "TOO", WHITE);
    draw_text(buf, cx, cy + 1, "SMALL", WHITE);
}

fn draw_sky(buf: &mut PixelBuf) {
    let h = buf.h;
    for y in 0..h {
        let t = ((y * 256) / h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.w {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_dunes(buf: &mut PixelBuf, scroll: f64) {
    let base = buf.h as i32;
    let scale = buf.h as f64 / 48.0;
    // Far dunes drift slower than the obstacles.
    for x in 0..buf.w as i32 {
        let fx = (x as f64 + scroll * 0.3) * 0.04;
        let h = (fx.sin() * 5.0 + (fx * 1.7).sin() * 3.0 + 9.0) * scale;
        for y in (base - h as i32)..base {
            buf.set(x, y, DUNE_FAR);
        }
    }
    for x in 0..buf.w as i32 {
        let fx = (x as f64 + scroll * 0.6) * 0.06;
        let h = (fx.sin() * 3.0 + (fx * 2.3).sin() * 2.0 + 5.0) * scale;
        for y in (base - h as i32)..base {
            buf.set(x, y, DUNE_NEAR);
        }
    }
}

/// Same layout the pair's collision masks are built with.
fn draw_pair(buf: &mut PixelBuf, art: &Art, pair: &ObstaclePair, piece_height: usize) {
    let x = pair.x().floor() as i32;
    let piece = piece_height as i32;

    for i in 0..pair.top_piece_count() as i32 {
        buf.blit(&art.cactus_body, x, i * piece);
    }
    buf.blit(&art.cactus_tip, x, pair.top_piece_count() as i32 * piece);

    let bottom_y = pair.bottom_y() as i32;
    buf.blit(&art.cactus_tip, x, bottom_y);
    for i in 1..=pair.bottom_piece_count() as i32 {
        buf.blit(&art.cactus_body, x, bottom_y + i * piece);
    }
}

fn draw_game_over(buf: &mut PixelBuf, score: u32, best: u32) {
    buf.darken();

    let cx = buf.w as i32 / 2;
    let cy = buf.h as i32 / 2;
    let panel_w = 40;
    let panel_h = 28;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);

    draw_text(buf, cx, py + 2, "GAME OVER", WHITE);
    draw_number(buf, cx, py + 10, score, WHITE);
    draw_text(buf, cx, py + 17, "BEST", GOLD);
    draw_number(buf, cx, py + 22, best, GOLD);
}
