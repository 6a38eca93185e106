/// Arena constants.  Everything the simulation measures against lives here
/// so the core never hard-codes a size, speed or cadence.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    // ── Arena ────────────────────────────────────────────────────────────────
    pub arena_width: f32,
    pub arena_height: f32,
    /// Height of the defense line above the arena floor.
    pub defense_line: f32,

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_width: f32,
    pub ship_height: f32,
    /// Distance from the arena floor to the bottom of the ship.
    pub ship_bottom: f32,
    /// Horizontal distance covered per frame while a direction is held.
    pub ship_speed: f32,
    pub lives: u32,

    // ── Aliens ───────────────────────────────────────────────────────────────
    pub alien_width: f32,
    pub alien_height: f32,
    pub alien_h_sep: f32,
    pub alien_v_sep: f32,
    /// Gap between the top row and the top of the arena.
    pub alien_ceiling: f32,
    pub alien_rows: usize,
    pub aliens_in_row: usize,
    pub alien_h_walk: f32,
    pub alien_v_walk: f32,
    /// Seconds between march steps.
    pub march_interval: f32,
    pub alien_variants: u8,

    // ── Bolts ────────────────────────────────────────────────────────────────
    pub bolt_width: f32,
    pub bolt_height: f32,
    /// Vertical distance covered per frame.
    pub bolt_speed: f32,
    /// Upper bound (inclusive) of march steps between enemy shots.
    pub bolt_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arena_width: 800.0,
            arena_height: 700.0,
            defense_line: 100.0,

            ship_width: 44.0,
            ship_height: 44.0,
            ship_bottom: 32.0,
            ship_speed: 5.0,
            lives: 3,

            alien_width: 33.0,
            alien_height: 33.0,
            alien_h_sep: 16.0,
            alien_v_sep: 16.0,
            alien_ceiling: 100.0,
            alien_rows: 5,
            aliens_in_row: 12,
            alien_h_walk: 8.0,
            alien_v_walk: 16.0,
            march_interval: 1.0,
            alien_variants: 3,

            bolt_width: 4.0,
            bolt_height: 16.0,
            bolt_speed: 10.0,
            bolt_rate: 5,
        }
    }
}

impl Config {
    /// Read a JSON config file.  Missing fields fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("ship_speed", self.ship_speed),
            ("alien_width", self.alien_width),
            ("alien_height", self.alien_height),
            ("alien_h_walk", self.alien_h_walk),
            ("alien_v_walk", self.alien_v_walk),
            ("march_interval", self.march_interval),
            ("bolt_width", self.bolt_width),
            ("bolt_height", self.bolt_height),
            ("bolt_speed", self.bolt_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if !(self.alien_h_sep >= 0.0 && self.alien_v_sep >= 0.0) {
            return Err(invalid("alien separations must not be negative"));
        }
        // The formation drops at most one row per frame, and the front row can
        // still shoot in that frame: its bolt must start inside the bolt band.
        let max_drop = self.defense_line + 2.0 * self.bolt_height;
        if self.alien_v_walk > max_drop {
            return Err(invalid(format!(
                "alien_v_walk {} drops below the floor, at most {max_drop}",
                self.alien_v_walk
            )));
        }

        if self.alien_rows == 0 || self.aliens_in_row == 0 {
            return Err(invalid("formation needs at least one row and one column"));
        }
        if self.alien_variants == 0 {
            return Err(invalid("alien_variants must be at least 1"));
        }
        if self.bolt_rate == 0 {
            return Err(invalid("bolt_rate must be at least 1"));
        }
        if self.ship_width < self.bolt_width || self.alien_width < self.bolt_width {
            return Err(invalid("ships and aliens must be at least as wide as a bolt"));
        }
        if self.ship_bottom < 0.0
            || self.ship_bottom + self.ship_height > self.arena_height
            || self.ship_width > self.arena_width
        {
            return Err(invalid("ship does not fit inside the arena"));
        }

        let rows = self.alien_rows as f32;
        let cols = self.aliens_in_row as f32;
        let formation_width = self.alien_h_sep + cols * (self.alien_width + self.alien_h_sep);
        if formation_width > self.arena_width {
            return Err(invalid(format!(
                "{} columns need {formation_width} units but the arena is {} wide",
                self.aliens_in_row, self.arena_width
            )));
        }
        let formation_bottom = self.first_row_y() - self.alien_height / 2.0;
        if self.alien_ceiling < 0.0 || formation_bottom <= self.defense_line {
            return Err(invalid(format!(
                "{} rows reach down to {formation_bottom}, at or below the defense line",
                rows
            )));
        }

        Ok(())
    }

    /// Center y of formation row 0 (the bottom row) at wave start.
    pub fn first_row_y(&self) -> f32 {
        let rows = self.alien_rows as f32;
        let stack = self.alien_ceiling
            + self.alien_height * (rows - 0.5)
            + self.alien_v_sep * (rows - 1.0);
        self.arena_height - stack
    }

    /// Center y of the ship as (re)spawned.
    pub fn ship_y(&self) -> f32 {
        self.ship_bottom + self.ship_height / 2.0
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
