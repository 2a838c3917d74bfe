use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// The monochrome framebuffer, stored row-major with one byte per pixel.
/// Every byte is either 0 (off) or 1 (on).
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    cells: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],
}

impl Screen {
    pub fn new() -> Screen {
        Screen {
            cells: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// The raw pixels, `SCREEN_WIDTH * SCREEN_HEIGHT` bytes, row by row.
    pub fn pixels(&self) -> &[u8] {
        &self.cells
    }

    /// Whether the pixel at `(x, y)` is on. Coordinates outside the screen are off.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.cells[y * SCREEN_WIDTH + x] == 1
    }

    pub fn clear(&mut self) {
        self.cells = [0; SCREEN_WIDTH * SCREEN_HEIGHT];
    }

    /// Flip the pixel at `(x, y)`, which must be on screen.
    /// Returns true if the pixel was on and is now turned off.
    fn toggle(&mut self, x: usize, y: usize) -> bool {
        let cell = &mut self.cells[y * SCREEN_WIDTH + x];
        *cell ^= 1;
        *cell == 0
    }

    /// XOR an 8 pixel wide sprite onto the screen with its top left corner at `(x, y)`.
    /// The corner wraps around the screen, but pixels past the right or
    /// bottom edge are clipped. Returns true if any pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let left = x % SCREEN_WIDTH;
        let top = y % SCREEN_HEIGHT;

        let mut collision = false;
        for (dy, row) in rows.iter().enumerate() {
            let py = top + dy;
            if py >= SCREEN_HEIGHT {
                break;
            }
            for dx in 0..8 {
                let px = left + dx;
                if px >= SCREEN_WIDTH {
                    break;
                }
                if row >> (7 - dx) & 1 == 1 {
                    collision |= self.toggle(px, py);
                }
            }
        }
        collision
    }

    /// Fill a 32-bit texture buffer, e.g. for uploading to a renderer.
    /// `buffer` must hold at least `SCREEN_WIDTH * SCREEN_HEIGHT` values.
    pub fn write_argb(&self, buffer: &mut [u32], on: u32, off: u32) {
        for (target, cell) in buffer.iter_mut().zip(self.cells.iter()) {
            *target = if *cell == 1 { on } else { off };
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(SCREEN_WIDTH) {
            for c in row.iter() {
                write!(f, "{}", if *c == 1 { "#" } else { "." })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn new_screen_is_blank() {
        let screen = Screen::new();
        assert!(screen.pixels().iter().all(|p| *p == 0));
        assert_eq!(screen.pixels().len(), SCREEN_WIDTH * SCREEN_HEIGHT);
    }

    #[test]
    fn sprite_bits_are_drawn_msb_first() {
        let mut screen = Screen::new();
        let collision = screen.draw_sprite(0, 0, &[0b1000_0001]);
        assert!(!collision);
        assert!(screen.get(0, 0));
        assert!(!screen.get(1, 0));
        assert!(screen.get(7, 0));
    }

    #[test]
    fn drawing_twice_erases_and_collides() {
        let mut screen = Screen::new();
        let glyph = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!screen.draw_sprite(10, 5, &glyph));
        assert!(screen.draw_sprite(10, 5, &glyph));
        assert_eq!(screen, Screen::new());
    }

    #[test]
    fn collision_covers_the_whole_sprite() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0x80]);
        // Only the first pixel overlaps, the rest are newly lit
        assert!(screen.draw_sprite(0, 0, &[0xFF]));
        assert!(!screen.get(0, 0));
        assert!((1..8).all(|x| screen.get(x, 0)));
    }

    #[test]
    fn sprites_are_clipped_at_the_right_edge() {
        let mut screen = Screen::new();
        screen.draw_sprite(60, 0, &[0xFF]);
        assert!((60..64).all(|x| screen.get(x, 0)));
        assert!((0..4).all(|x| !screen.get(x, 0)));
        assert!((0..4).all(|x| !screen.get(x, 1)));
    }

    #[test]
    fn clipped_pixels_do_not_spill_onto_the_next_row() {
        let mut screen = Screen::new();
        screen.draw_sprite(63, 0, &[0xFF, 0xFF]);
        assert!(screen.get(63, 0));
        assert!(screen.get(63, 1));
        assert_eq!(screen.pixels().iter().filter(|p| **p == 1).count(), 2);
    }

    #[test]
    fn sprites_are_clipped_at_the_bottom_edge() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert!(screen.get(0, 30));
        assert!(screen.get(0, 31));
        assert!(!screen.get(0, 0));
        assert!(!screen.get(0, 1));
    }

    #[test]
    fn start_position_wraps() {
        let mut screen = Screen::new();
        screen.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(screen.get(3, 2));
    }

    #[test]
    fn argb_export_maps_pixels() {
        let mut screen = Screen::new();
        screen.draw_sprite(1, 0, &[0x80]);
        let mut buffer = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
        screen.write_argb(&mut buffer, 0xFFFF_FFFF, 0xFF00_0000);
        assert_eq!(&buffer[..3], &[0xFF00_0000, 0xFFFF_FFFF, 0xFF00_0000]);
    }

    #[test]
    fn display_renders_rows() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0xC0]);
        let text = screen.to_string();
        let first = text.lines().next().unwrap_or_default();
        assert_eq!(&first[..3], "##.");
        assert_eq!(text.lines().count(), SCREEN_HEIGHT);
    }

    proptest! {
        #[test]
        fn double_draw_restores_any_screen(
            x in 0usize..256,
            y in 0usize..256,
            rows in proptest::collection::vec(any::<u8>(), 1..16),
            background in proptest::collection::vec((0usize..64, 0usize..32), 0..40),
        ) {
            let mut screen = Screen::new();
            for (bx, by) in background {
                screen.toggle(bx, by);
            }
            let before = screen.clone();
            screen.draw_sprite(x, y, &rows);
            screen.draw_sprite(x, y, &rows);
            prop_assert_eq!(screen, before);
        }

        #[test]
        fn pixels_stay_binary(x in 0usize..256, y in 0usize..256, rows in proptest::collection::vec(any::<u8>(), 0..16)) {
            let mut screen = Screen::new();
            screen.draw_sprite(x, y, &rows);
            screen.draw_sprite(x + 1, y, &rows);
            prop_assert!(screen.pixels().iter().all(|p| *p <= 1));
        }
    }
}
