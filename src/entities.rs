/// Game entities: plain data plus the bounding-box hit test.
///
/// Coordinates are arena units with the origin at the bottom-left corner and
/// y growing upward.  Every position is the center of the entity.

use crate::config::Config;
use crate::error::ContractError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoltOwner {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// +1.0 for right, -1.0 for left.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Which of the alien sprites a renderer should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlienVariant(pub u8);

// ── Bounding box ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Edges are inclusive.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.bottom() && py <= self.top()
    }

    /// The four corner points of the box.
    pub fn corners(&self) -> [(f32, f32); 4] {
        [
            (self.left(), self.bottom()),
            (self.right(), self.bottom()),
            (self.left(), self.top()),
            (self.right(), self.top()),
        ]
    }
}

/// Something a bolt can hit.  Ships are hit by enemy bolts, aliens by
/// player bolts; a bolt never hits its own side.
pub trait Target {
    fn bounds(&self) -> &Bounds;

    /// The owner whose bolts damage this target.
    fn hit_by(&self) -> BoltOwner;

    /// Sampled hit test: any bolt corner inside the target's box counts.
    /// A bolt that straddles the box without a corner inside is a miss.
    fn collides(&self, bolt: &Bolt) -> bool {
        bolt.owner() == self.hit_by()
            && bolt
                .bounds
                .corners()
                .iter()
                .any(|&(cx, cy)| self.bounds().contains(cx, cy))
    }
}

fn check_center(
    entity: &'static str,
    x: f32,
    y: f32,
    x_range: (f32, f32),
    y_range: (f32, f32),
) -> Result<(), ContractError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ContractError::NonFinite { entity, x, y });
    }
    if x < x_range.0 || x > x_range.1 {
        return Err(ContractError::XOutOfRange {
            entity,
            x,
            min: x_range.0,
            max: x_range.1,
        });
    }
    if y < y_range.0 || y > y_range.1 {
        return Err(ContractError::YOutOfRange {
            entity,
            y,
            min: y_range.0,
            max: y_range.1,
        });
    }
    Ok(())
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub(crate) bounds: Bounds,
}

impl Ship {
    pub fn new(x: f32, y: f32, config: &Config) -> Result<Ship, ContractError> {
        let (w, h) = (config.ship_width, config.ship_height);
        check_center(
            "ship",
            x,
            y,
            (w / 2.0, config.arena_width - w / 2.0),
            (h / 2.0, config.arena_height - h / 2.0),
        )?;
        Ok(Ship {
            bounds: Bounds { x, y, width: w, height: h },
        })
    }

    /// A ship centered horizontally at its configured height.
    pub fn spawn(config: &Config) -> Result<Ship, ContractError> {
        Ship::new(config.arena_width / 2.0, config.ship_y(), config)
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    /// Move horizontally by `dx`, stopping at the arena walls.
    pub fn slide(&mut self, dx: f32, arena_width: f32) {
        let half = self.bounds.width / 2.0;
        self.bounds.x = (self.bounds.x + dx).clamp(half, arena_width - half);
    }

    /// Where a freshly fired bolt of `bolt_height` is centered.
    pub fn nose(&self, bolt_height: f32) -> (f32, f32) {
        (self.bounds.x, self.bounds.top() + bolt_height / 2.0)
    }
}

impl Target for Ship {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn hit_by(&self) -> BoltOwner {
        BoltOwner::Enemy
    }
}

// ── Alien ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub(crate) bounds: Bounds,
    score: u32,
    variant: AlienVariant,
}

impl Alien {
    pub fn new(
        x: f32,
        y: f32,
        variant: AlienVariant,
        score: u32,
        config: &Config,
    ) -> Result<Alien, ContractError> {
        let (w, h) = (config.alien_width, config.alien_height);
        check_center(
            "alien",
            x,
            y,
            (w / 2.0, config.arena_width - w / 2.0),
            (h / 2.0, config.arena_height - h / 2.0),
        )?;
        Ok(Alien {
            bounds: Bounds { x, y, width: w, height: h },
            score,
            variant,
        })
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn variant(&self) -> AlienVariant {
        self.variant
    }

    pub fn shift(&mut self, dx: f32, dy: f32) {
        self.bounds.x += dx;
        self.bounds.y += dy;
    }
}

impl Target for Alien {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn hit_by(&self) -> BoltOwner {
        BoltOwner::Player
    }
}

// ── Bolt ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bolt {
    pub(crate) bounds: Bounds,
    /// Units per frame.  Positive travels up and belongs to the player.
    velocity: f32,
}

impl Bolt {
    pub fn new(x: f32, y: f32, velocity: f32, config: &Config) -> Result<Bolt, ContractError> {
        if !velocity.is_finite() || velocity == 0.0 {
            return Err(ContractError::InvalidVelocity(velocity));
        }
        let (w, h) = (config.bolt_width, config.bolt_height);
        check_center(
            "bolt",
            x,
            y,
            (w / 2.0, config.arena_width - w / 2.0),
            (-2.0 * h, config.arena_height + 2.0 * h),
        )?;
        Ok(Bolt {
            bounds: Bounds { x, y, width: w, height: h },
            velocity,
        })
    }

    /// Bolts fired from inside the wave.  Ship and alien positions already
    /// satisfy the bolt ranges once the config has been validated.
    pub(crate) fn launch(x: f32, y: f32, velocity: f32, config: &Config) -> Bolt {
        debug_assert!(Bolt::new(x, y, velocity, config).is_ok());
        Bolt {
            bounds: Bounds {
                x,
                y,
                width: config.bolt_width,
                height: config.bolt_height,
            },
            velocity,
        }
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn owner(&self) -> BoltOwner {
        if self.velocity > 0.0 {
            BoltOwner::Player
        } else {
            BoltOwner::Enemy
        }
    }

    pub fn is_player_bolt(&self) -> bool {
        self.owner() == BoltOwner::Player
    }

    /// Advance one frame along the velocity.
    pub fn step(&mut self) {
        self.bounds.y += self.velocity;
    }
}
