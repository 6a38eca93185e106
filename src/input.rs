/// Device-independent input.
///
/// The front end reports which keys are down this frame as a `KeyState`;
/// `InputTracker` compares it with the previous frame and produces the
/// `InputSnapshot` the driver and the wave consume.

/// Keys held down during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub start: bool,
    /// Total number of keys down, including ones the game ignores.
    pub key_count: usize,
}

impl KeyState {
    /// A key state whose count covers exactly the flags that are set.
    pub fn with(left: bool, right: bool, fire: bool, start: bool) -> KeyState {
        let key_count = [left, right, fire, start].iter().filter(|&&k| k).count();
        KeyState {
            left,
            right,
            fire,
            start,
            key_count,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Fire is down this frame and was up last frame.
    pub fire_pressed: bool,
    /// Start went down on a frame that began with no keys held.
    pub start_pressed: bool,
}

impl InputSnapshot {
    pub fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }
}

/// Edge detector across frames.
#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    last_count: usize,
    fire_was_down: bool,
}

impl InputTracker {
    pub fn new() -> InputTracker {
        InputTracker::default()
    }

    pub fn sample(&mut self, keys: &KeyState) -> InputSnapshot {
        let snapshot = InputSnapshot {
            left: keys.left,
            right: keys.right,
            fire: keys.fire,
            fire_pressed: keys.fire && !self.fire_was_down,
            start_pressed: keys.start && keys.key_count > 0 && self.last_count == 0,
        };
        self.last_count = keys.key_count;
        self.fire_was_down = keys.fire;
        snapshot
    }
}
