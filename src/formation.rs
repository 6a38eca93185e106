/// The alien formation: a fixed rows × columns grid of slots.
///
/// Row 0 is the bottom (front) row.  A slot holds `Some(alien)` until that
/// alien is shot, after which it stays `None` for the rest of the wave.

use rand::Rng;

use crate::config::Config;
use crate::entities::{Alien, AlienVariant, Target};
use crate::error::ContractError;

/// Grid coordinates of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
}

/// Points for shooting an alien in `row`: 20 for the bottom pair of rows,
/// plus 20 for every pair above it.
pub fn row_score(row: usize) -> u32 {
    20 + 20 * (row / 2) as u32
}

/// Sprite for `row`; the variant changes every two rows and wraps around.
pub fn row_variant(row: usize, variants: u8) -> AlienVariant {
    AlienVariant(((row / 2) % variants.max(1) as usize) as u8)
}

#[derive(Clone, Debug)]
pub struct Formation {
    rows: usize,
    cols: usize,
    /// Row-major.
    slots: Vec<Option<Alien>>,
}

impl Formation {
    /// Lay out a full formation.  `rows` and `cols` must match the config.
    pub fn new(rows: usize, cols: usize, config: &Config) -> Result<Formation, ContractError> {
        if rows != config.alien_rows || cols != config.aliens_in_row || rows == 0 || cols == 0 {
            return Err(ContractError::GridDimensions {
                rows,
                cols,
                expected_rows: config.alien_rows,
                expected_cols: config.aliens_in_row,
            });
        }

        let x_pitch = config.alien_h_sep + config.alien_width;
        let y_pitch = config.alien_v_sep + config.alien_height;
        let left = config.alien_h_sep + config.alien_width / 2.0;
        let bottom = config.first_row_y();

        let mut slots = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let y = bottom + row as f32 * y_pitch;
            let variant = row_variant(row, config.alien_variants);
            for col in 0..cols {
                let x = left + col as f32 * x_pitch;
                slots.push(Some(Alien::new(x, y, variant, row_score(row), config)?));
            }
        }

        Ok(Formation { rows, cols, slots })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, slot: Slot) -> Option<usize> {
        (slot.row < self.rows && slot.col < self.cols).then(|| slot.row * self.cols + slot.col)
    }

    pub fn get(&self, slot: Slot) -> Option<&Alien> {
        self.index(slot).and_then(|i| self.slots[i].as_ref())
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Alien> {
        match self.index(slot) {
            Some(i) => self.slots[i].as_mut(),
            None => None,
        }
    }

    /// Empty a slot, returning the alien that was there.
    pub fn clear(&mut self, slot: Slot) -> Option<Alien> {
        self.index(slot).and_then(|i| self.slots[i].take())
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied slots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Alien)> + '_ {
        let cols = self.cols;
        self.slots.iter().enumerate().filter_map(move |(i, s)| {
            s.as_ref().map(|alien| {
                (
                    Slot {
                        row: i / cols,
                        col: i % cols,
                    },
                    alien,
                )
            })
        })
    }

    /// Move every surviving alien by the same offset.
    pub fn shift_all(&mut self, dx: f32, dy: f32) {
        for alien in self.slots.iter_mut().flatten() {
            alien.shift(dx, dy);
        }
    }

    /// First occupied slot walking up column `col` from the bottom row.
    pub fn lowest_in_column(&self, col: usize) -> Option<Slot> {
        (0..self.rows)
            .map(|row| Slot { row, col })
            .find(|&slot| self.get(slot).is_some())
    }

    /// Scan columns right to left, bottom to top within each column, and
    /// return the first occupied slot.
    pub fn rightmost_occupied(&self) -> Option<Slot> {
        (0..self.cols).rev().find_map(|col| self.lowest_in_column(col))
    }

    /// Scan columns left to right, bottom to top within each column, and
    /// return the first occupied slot.
    pub fn leftmost_occupied(&self) -> Option<Slot> {
        (0..self.cols).find_map(|col| self.lowest_in_column(col))
    }

    /// Pick a uniformly random column, re-rolling until it holds an alien,
    /// and return its front-most alien.  `None` only for an empty grid.
    pub fn pick_shooter(&self, rng: &mut impl Rng) -> Option<Slot> {
        if self.is_empty() {
            return None;
        }
        loop {
            let col = rng.gen_range(0..self.cols);
            if let Some(slot) = self.lowest_in_column(col) {
                return Some(slot);
            }
        }
    }

    /// Lowest bottom edge among the surviving aliens.
    pub fn lowest_edge(&self) -> Option<f32> {
        self.slots
            .iter()
            .flatten()
            .map(|alien| alien.bounds().bottom())
            .reduce(f32::min)
    }
}
