/// Top-level game flow: title screen, playing, paused after a lost life,
/// and the end-of-wave screen.
///
/// The driver owns the current [`Wave`] outright and replaces it whenever a
/// new wave starts.  It is advanced once per frame with the raw key state;
/// everything it decides is driven by the start key going down on a frame
/// that began with no keys held.

use rand::Rng;

use crate::config::Config;
use crate::error::ContractError;
use crate::input::{InputSnapshot, InputTracker, KeyState};
use crate::wave::Wave;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for the player to start.  No wave exists.
    Inactive,
    /// A fresh wave was created this frame.
    NewWave,
    Active,
    /// The ship was destroyed and lives remain; the wave is frozen.
    Paused,
    /// The ship is rebuilt this frame before play resumes.
    Continue,
    /// The wave ended, won or lost.
    Complete,
}

/// Message the renderer should overlay on the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    Title,
    Resume,
    Won,
    Lost,
}

/// The state the driver moves to at the start of a frame, before the wave
/// is touched.
pub fn transition(state: GameState, start_pressed: bool) -> GameState {
    match (state, start_pressed) {
        (GameState::NewWave, _) => GameState::Active,
        (GameState::Inactive, true) => GameState::NewWave,
        (GameState::Paused, true) => GameState::Continue,
        (GameState::Complete, true) => GameState::Inactive,
        (state, _) => state,
    }
}

#[derive(Debug)]
pub struct Driver {
    config: Config,
    state: GameState,
    wave: Option<Wave>,
    input: InputTracker,
    /// Highest wave score seen this session.
    best_score: u32,
}

impl Driver {
    pub fn new(config: Config) -> Driver {
        Driver {
            config,
            state: GameState::Inactive,
            wave: None,
            input: InputTracker::new(),
            best_score: 0,
        }
    }

    /// Run one frame.  `dt` is the time in seconds since the last frame.
    pub fn update(
        &mut self,
        keys: &KeyState,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Result<(), ContractError> {
        let input = self.input.sample(keys);
        let next = transition(self.state, input.start_pressed);
        if next != self.state {
            log::info!("state {:?} -> {:?}", self.state, next);
        }
        self.enter(next);

        match self.state {
            GameState::NewWave => {
                self.wave = Some(Wave::new(self.config.clone(), rng)?);
            }
            GameState::Active => self.play(&input, dt, rng),
            GameState::Continue => {
                if let Some(wave) = self.wave.as_mut() {
                    wave.respawn_ship()?;
                }
                self.state = GameState::Active;
            }
            GameState::Inactive | GameState::Paused | GameState::Complete => {}
        }
        Ok(())
    }

    /// Side effects of leaving one state for another.
    fn enter(&mut self, next: GameState) {
        match (self.state, next) {
            (GameState::Paused, GameState::Continue) => {
                if let Some(wave) = self.wave.as_mut() {
                    wave.set_paused(false);
                }
            }
            (GameState::Complete, GameState::Inactive) => {
                self.wave = None;
            }
            _ => {}
        }
        self.state = next;
    }

    fn play(&mut self, input: &InputSnapshot, dt: f32, rng: &mut impl Rng) {
        let Some(wave) = self.wave.as_mut() else {
            log::warn!("active state without a wave, returning to title");
            self.state = GameState::Inactive;
            return;
        };

        wave.advance(input, dt, rng);
        self.best_score = self.best_score.max(wave.score());

        if wave.is_done() {
            log::info!("state Active -> Complete");
            self.state = GameState::Complete;
        } else if wave.is_paused() {
            log::info!("state Active -> Paused ({} lives left)", wave.lives());
            self.state = GameState::Paused;
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn wave(&self) -> Option<&Wave> {
        self.wave.as_ref()
    }

    pub fn wave_mut(&mut self) -> Option<&mut Wave> {
        self.wave.as_mut()
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn banner(&self) -> Option<Banner> {
        match self.state {
            GameState::Inactive => Some(Banner::Title),
            GameState::Paused => Some(Banner::Resume),
            GameState::Complete => match self.wave.as_ref().and_then(Wave::won) {
                Some(true) => Some(Banner::Won),
                Some(false) => Some(Banner::Lost),
                None => None,
            },
            GameState::NewWave | GameState::Active | GameState::Continue => None,
        }
    }
}
