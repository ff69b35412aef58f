use crate::grid::Grid;

/// Hex values of braille dots
///
/// ```notrust
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Draws a [`Grid`] into a braille framebuffer, each cell a `scale x scale` block of pixels.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the framebuffer
    w: usize,

    /// Height of the framebuffer
    h: usize,

    /// Side length of a cell, in pixels
    scale: usize,
}

impl Camera {
    /// A camera sized to fit `grid` exactly.
    pub fn for_grid(grid: &Grid, scale: usize) -> Self {
        let scale = scale.max(1);
        let w = grid.width() * scale;
        let h = grid.height() * scale;

        // Each braille character packs 2x4 pixels. Let `bw = ceil(w / 2)` and
        // `bh = ceil(h / 4)` be the width and height of the framebuffer in characters.
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));

        // Each braille character is 3 bytes, and newlines one byte.
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self {
            cb: vec![false; w * h],
            fb,
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
            scale,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Whether this camera was sized for a grid of `grid`'s dimensions
    pub fn fits(&self, grid: &Grid) -> bool {
        (self.h, self.w) == (grid.height() * self.scale, grid.width() * self.scale)
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Draw every live cell of `grid`. Cells outside the framebuffer are skipped.
    pub fn draw_grid(&mut self, grid: &Grid) {
        for (row, col) in grid.live_cells() {
            self.draw_square(col * self.scale, row * self.scale);
        }
    }

    /// Invert the pixels of the cell under the cursor, so it shows whether the cell is alive or
    /// dead.
    pub fn draw_cursor(&mut self, cursor: &Cursor) {
        let (x, y) = (cursor.col * self.scale, cursor.row * self.scale);

        if x + self.scale > self.w || y + self.scale > self.h {
            return;
        }

        for dy in 0..self.scale {
            for dx in 0..self.scale {
                let i = self.xy_from(x + dx, y + dy);
                self.cb[i] = !self.cb[i];
            }
        }
    }

    /// Turns on the `scale x scale` block of pixels whose top left corner is `(x, y)`
    fn draw_square(&mut self, x: usize, y: usize) {
        if x + self.scale > self.w || y + self.scale > self.h {
            return;
        }

        for dy in 0..self.scale {
            for dx in 0..self.scale {
                let i = self.xy_from(x + dx, y + dy);
                self.cb[i] = true;
            }
        }
    }

    /// Turn the cell buffer into lines of braille characters, each line ending in `\n`.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = (n % self.w, n / self.w);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }

        if !self.cp.is_empty() {
            self.fb.push('\n');
        }

        &self.fb
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

/// The cell a front-end is pointing at
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    /// Move by `(drow, dcol)`, stopping at the edges of `grid`.
    pub fn shift(&mut self, drow: isize, dcol: isize, grid: &Grid) {
        self.row = self.row.saturating_add_signed(drow);
        self.col = self.col.saturating_add_signed(dcol);
        self.clamp_to(grid);
    }

    /// Pull the cursor back onto `grid` after a resize.
    pub fn clamp_to(&mut self, grid: &Grid) {
        self.row = self.row.min(grid.height().saturating_sub(1));
        self.col = self.col.min(grid.width().saturating_sub(1));
    }
}
