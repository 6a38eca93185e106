/// One wave of the game: the ship, the formation, the bolts in flight and
/// the counters that tie them together.
///
/// The driver calls [`Wave::advance`] once per rendered frame.  Each call
/// runs the same sequence of sub-steps; later steps see what earlier steps
/// changed in that frame, so the order below is part of the behaviour.
///
/// Randomness (which column shoots, how many steps between shots) is drawn
/// from the `rng` handed to `new` and `advance`.

use rand::Rng;

use crate::config::Config;
use crate::entities::{AlienVariant, Bolt, Bounds, Direction, Ship, Target};
use crate::error::ContractError;
use crate::formation::{Formation, Slot};
use crate::input::InputSnapshot;

// ── Render contract ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Ship,
    Alien(AlienVariant),
    PlayerBolt,
    EnemyBolt,
    DefenseLine,
}

/// Everything a renderer needs to draw one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drawable {
    pub sprite: Sprite,
    pub bounds: Bounds,
}

// ── Wave ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Wave {
    config: Config,
    ship: Option<Ship>,
    formation: Formation,
    bolts: Vec<Bolt>,
    lives: u32,
    score: u32,
    direction: Direction,
    /// Seconds since the last march step.
    march_timer: f32,
    /// March steps since the last enemy shot.
    steps: u32,
    /// Steps to wait before the next enemy shot.
    cadence: u32,
    shooter: Option<Slot>,
    /// True while the player may fire.
    fire_ready: bool,
    paused: bool,
    done: bool,
    won: Option<bool>,
}

impl Wave {
    pub fn new(config: Config, rng: &mut impl Rng) -> Result<Wave, ContractError> {
        config
            .validate()
            .map_err(|err| ContractError::InvalidConfig(err.to_string()))?;
        let formation = Formation::new(config.alien_rows, config.aliens_in_row, &config)?;
        let ship = Ship::spawn(&config)?;
        let cadence = rng.gen_range(1..=config.bolt_rate);
        log::info!(
            "new wave: {}x{} aliens, {} lives, first enemy shot after {} steps",
            formation.rows(),
            formation.cols(),
            config.lives,
            cadence
        );
        Ok(Wave {
            lives: config.lives,
            ship: Some(ship),
            formation,
            bolts: Vec::new(),
            score: 0,
            direction: Direction::Right,
            march_timer: 0.0,
            steps: 0,
            cadence,
            shooter: None,
            fire_ready: true,
            paused: false,
            done: false,
            won: None,
            config,
        })
    }

    /// Advance the wave by one frame.  `dt` is the time in seconds since the
    /// previous frame.
    ///
    /// The frame that detects the outcome still runs to the end; after that
    /// the wave is frozen and further calls do nothing.
    pub fn advance(&mut self, input: &InputSnapshot, dt: f32, rng: &mut impl Rng) {
        if self.done {
            return;
        }
        self.check_outcome();
        self.move_ship(input);
        self.march(dt);
        self.check_edges();
        self.fire_player_bolt(input);
        for bolt in &mut self.bolts {
            bolt.step();
        }
        self.prune_bolts();
        if self.player_bolt_live() {
            self.fire_ready = false;
        }
        if self.steps == 0 {
            self.shooter = self.formation.pick_shooter(rng);
        }
        self.fire_enemy_bolt(rng);
        self.resolve_collisions();

        log::trace!(
            "frame: score={} lives={} bolts={} aliens={} steps={}/{}",
            self.score,
            self.lives,
            self.bolts.len(),
            self.formation.occupied_count(),
            self.steps,
            self.cadence
        );
    }

    // ── Sub-steps ─────────────────────────────────────────────────────────────

    /// Loss (defense line breached, or no lives) wins over a cleared grid.
    fn check_outcome(&mut self) {
        let breached = self
            .formation
            .lowest_edge()
            .is_some_and(|edge| edge <= self.config.defense_line);
        if breached || self.lives == 0 {
            self.finish(false);
        } else if self.formation.is_empty() {
            self.finish(true);
        }
    }

    fn finish(&mut self, won: bool) {
        if self.won != Some(won) {
            log::info!(
                "wave {} with score {}",
                if won { "won" } else { "lost" },
                self.score
            );
        }
        self.done = true;
        self.won = Some(won);
    }

    fn move_ship(&mut self, input: &InputSnapshot) {
        let Some(ship) = self.ship.as_mut() else {
            return;
        };
        let mut dx = 0.0;
        if input.left {
            dx -= self.config.ship_speed;
        }
        if input.right {
            dx += self.config.ship_speed;
        }
        ship.slide(dx, self.config.arena_width);
    }

    fn march(&mut self, dt: f32) {
        self.march_timer += dt;
        if self.march_timer >= self.config.march_interval {
            self.formation
                .shift_all(self.direction.sign() * self.config.alien_h_walk, 0.0);
            self.steps += 1;
            self.march_timer = 0.0;
        }
    }

    /// Both walls are measured before either reversal is applied, and each
    /// is handled on its own.
    fn check_edges(&mut self) {
        let half = self.config.alien_width / 2.0;
        let sep = self.config.alien_h_sep;

        let right_gap = self
            .formation
            .rightmost_occupied()
            .and_then(|slot| self.formation.get(slot))
            .map(|alien| self.config.arena_width - alien.x() - half);
        let left_gap = self
            .formation
            .leftmost_occupied()
            .and_then(|slot| self.formation.get(slot))
            .map(|alien| alien.x() - half);

        if right_gap.is_some_and(|gap| gap < sep) {
            self.descend(Direction::Left);
        }
        if left_gap.is_some_and(|gap| gap < sep) {
            self.descend(Direction::Right);
        }
    }

    /// Drop a row, take one step back towards `heading`, and march that way.
    fn descend(&mut self, heading: Direction) {
        self.formation.shift_all(
            heading.sign() * self.config.alien_h_walk,
            -self.config.alien_v_walk,
        );
        self.direction = heading;
        log::debug!("formation reversed, now heading {:?}", heading);
    }

    fn fire_player_bolt(&mut self, input: &InputSnapshot) {
        if !input.fire_pressed || !self.fire_ready {
            return;
        }
        if let Some(ship) = &self.ship {
            let (x, y) = ship.nose(self.config.bolt_height);
            self.bolts
                .push(Bolt::launch(x, y, self.config.bolt_speed, &self.config));
            self.fire_ready = false;
        }
    }

    /// Drop bolts whose center is half a bolt or more outside the arena.
    fn prune_bolts(&mut self) {
        let tolerance = self.config.bolt_height / 2.0;
        let ceiling = self.config.arena_height + tolerance;
        let floor = -tolerance;

        let mut player_bolt_gone = false;
        self.bolts.retain(|bolt| {
            let keep = bolt.y() < ceiling && bolt.y() > floor;
            if !keep && bolt.is_player_bolt() {
                player_bolt_gone = true;
            }
            keep
        });
        if player_bolt_gone {
            self.fire_ready = true;
        }
    }

    /// Fire once the step counter reaches the cadence.  If the designated
    /// shooter was shot down in the meantime, another front-row alien fires.
    fn fire_enemy_bolt(&mut self, rng: &mut impl Rng) {
        if self.steps != self.cadence {
            return;
        }
        let shooter = self
            .shooter
            .filter(|&slot| self.formation.get(slot).is_some())
            .or_else(|| self.formation.pick_shooter(rng));

        if let Some(alien) = shooter.and_then(|slot| self.formation.get(slot)) {
            let y = alien.y() - self.config.alien_height / 2.0;
            self.bolts.push(Bolt::launch(
                alien.x(),
                y,
                -self.config.bolt_speed,
                &self.config,
            ));
            log::debug!("enemy fire from {:?}", shooter);
        }
        self.steps = 0;
        self.cadence = rng.gen_range(1..=self.config.bolt_rate);
    }

    fn resolve_collisions(&mut self) {
        let mut destroyed = Vec::new();
        for (slot, alien) in self.formation.iter() {
            if let Some(i) = self.bolts.iter().position(|bolt| alien.collides(bolt)) {
                self.bolts.remove(i);
                destroyed.push(slot);
            }
        }
        for slot in destroyed {
            if let Some(alien) = self.formation.clear(slot) {
                self.score += alien.score();
                log::debug!("alien at {:?} destroyed, +{}", slot, alien.score());
            }
        }

        let ship_hit = self
            .ship
            .as_ref()
            .and_then(|ship| self.bolts.iter().position(|bolt| ship.collides(bolt)));
        if let Some(i) = ship_hit {
            self.bolts.remove(i);
            self.ship = None;
            self.lives = self.lives.saturating_sub(1);
            if self.lives >= 1 {
                self.paused = true;
            }
            log::debug!("ship destroyed, {} lives left", self.lives);
        }

        if !self.player_bolt_live() {
            self.fire_ready = true;
        }
    }

    fn player_bolt_live(&self) -> bool {
        self.bolts.iter().any(Bolt::is_player_bolt)
    }

    // ── Driver hooks ──────────────────────────────────────────────────────────

    /// Put a fresh ship back at its starting position.
    pub fn respawn_ship(&mut self) -> Result<(), ContractError> {
        self.ship = Some(Ship::spawn(&self.config)?);
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    /// Add a bolt to the flight list as if it had been fired.
    pub fn insert_bolt(&mut self, bolt: Bolt) {
        self.bolts.push(bolt);
    }

    pub fn formation_mut(&mut self) -> &mut Formation {
        &mut self.formation
    }

    // ── Status ────────────────────────────────────────────────────────────────

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// `None` while the wave is still being played.
    pub fn won(&self) -> Option<bool> {
        self.won
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn cadence(&self) -> u32 {
        self.cadence
    }

    pub fn shooter(&self) -> Option<Slot> {
        self.shooter
    }

    pub fn can_fire(&self) -> bool {
        self.fire_ready
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn defense_line(&self) -> Bounds {
        Bounds {
            x: self.config.arena_width / 2.0,
            y: self.config.defense_line,
            width: self.config.arena_width,
            height: 0.0,
        }
    }

    /// Aliens, then the ship, the defense line and the bolts.
    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        let aliens = self.formation.iter().map(|(_, alien)| Drawable {
            sprite: Sprite::Alien(alien.variant()),
            bounds: *alien.bounds(),
        });
        let ship = self.ship.iter().map(|ship| Drawable {
            sprite: Sprite::Ship,
            bounds: *ship.bounds(),
        });
        let line = std::iter::once(Drawable {
            sprite: Sprite::DefenseLine,
            bounds: self.defense_line(),
        });
        let bolts = self.bolts.iter().map(|bolt| Drawable {
            sprite: if bolt.is_player_bolt() {
                Sprite::PlayerBolt
            } else {
                Sprite::EnemyBolt
            },
            bounds: bolt.bounds,
        });
        aliens.chain(ship).chain(line).chain(bolts)
    }
}
