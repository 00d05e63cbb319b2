//! Destructible pixel terrain
//!
//! A flat solid/air field, one byte per pixel, addressed as `y * width + x`.
//! Explosions carve circular holes; a settling pass then lets unsupported
//! material trickle down one row per call until nothing moves.

use rand::Rng;
use serde::Serialize;

/// Cell value for air
pub const AIR: u8 = 0;
/// Cell value for solid ground
pub const SOLID: u8 = 1;

/// Solid/air pixel grid shared by every projectile and tank in a duel
#[derive(Debug, Clone, Serialize)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    /// Row-major cells, `SOLID` or `AIR`
    cells: Vec<u8>,
    /// Set by `carve`, cleared by a settling pass that moved nothing
    settling: bool,
}

impl TerrainGrid {
    /// All-air grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![AIR; width * height],
            settling: false,
        }
    }

    /// Rolling hills from three summed sine waves, two of them phase-shifted
    /// by seeds drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        base_height: f32,
        rng: &mut R,
    ) -> Self {
        let seed1: f32 = rng.random_range(0.0..100.0);
        let seed2: f32 = rng.random_range(0.0..100.0);
        log::debug!("Generating {width}x{height} terrain (phases {seed1:.3}, {seed2:.3})");

        let mut grid = Self::new(width, height);
        for x in 0..width {
            let xf = x as f32;
            let h1 = (xf * 0.01 + seed1).sin() * 50.0;
            let h2 = (xf * 0.02 + seed2).sin() * 20.0;
            let h3 = (xf * 0.005).sin() * 80.0;
            let surface = (base_height + h1 + h2 + h3).ceil().clamp(0.0, height as f32) as usize;

            for y in surface..height {
                grid.cells[y * width + x] = SOLID;
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major cells for renderers
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Solidity at a world position. Coordinates are floored; anything
    /// outside the grid is air.
    pub fn is_solid(&self, x: f32, y: f32) -> bool {
        // Also rejects NaN
        if !(x >= 0.0 && y >= 0.0) {
            return false;
        }
        self.is_solid_cell(x as usize, y as usize)
    }

    #[inline]
    pub fn is_solid_cell(&self, x: usize, y: usize) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i] == SOLID)
    }

    /// Set a single cell; out-of-bounds writes are ignored
    pub fn set_solid(&mut self, x: usize, y: usize, solid: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = if solid { SOLID } else { AIR };
        }
    }

    /// Make every row from `y` down to the bottom solid
    pub fn fill_below(&mut self, y: usize) {
        let start = y.min(self.height) * self.width;
        self.cells[start..].fill(SOLID);
    }

    /// Topmost solid row in a column, or `height` if the column is empty
    pub fn surface_y(&self, col: usize) -> usize {
        if col >= self.width {
            return self.height;
        }
        (0..self.height)
            .find(|&y| self.cells[y * self.width + col] == SOLID)
            .unwrap_or(self.height)
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == SOLID).count()
    }

    /// Clear every cell within `radius` of the floored center.
    ///
    /// Always flags the grid as settling, even when nothing was cleared.
    /// A non-positive radius clears nothing.
    pub fn carve(&mut self, center_x: f32, center_y: f32, radius: f32) {
        self.settling = true;
        if !(radius > 0.0) {
            return;
        }

        let cx = center_x.floor() as i64;
        let cy = center_y.floor() as i64;
        let reach = radius.ceil() as i64;
        let r2 = f64::from(radius) * f64::from(radius);

        // Clip the bounding box to the grid before touching cells
        let x0 = cx.saturating_sub(reach).max(0);
        let x1 = cx.saturating_add(reach).min(self.width as i64 - 1);
        let y0 = cy.saturating_sub(reach).max(0);
        let y1 = cy.saturating_add(reach).min(self.height as i64 - 1);

        for y in y0..=y1 {
            let dy = y - cy;
            for x in x0..=x1 {
                let dx = x - cx;
                if ((dx * dx + dy * dy) as f64) <= r2 {
                    self.cells[y as usize * self.width + x as usize] = AIR;
                }
            }
        }
    }

    /// One gravity pass: every solid cell with air directly below drops one row.
    ///
    /// Rows are scanned bottom-up so material never falls more than one row
    /// per call. Returns whether anything moved and stores it as the
    /// settling flag.
    pub fn update_settling(&mut self) -> bool {
        let w = self.width;
        let mut moved = false;

        for y in (0..self.height.saturating_sub(1)).rev() {
            let row = y * w;
            for x in 0..w {
                let src = row + x;
                let dst = src + w;
                if self.cells[src] == SOLID && self.cells[dst] == AIR {
                    self.cells[src] = AIR;
                    self.cells[dst] = SOLID;
                    moved = true;
                }
            }
        }

        self.settling = moved;
        moved
    }
}
