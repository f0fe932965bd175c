use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Focus)
    }

    /// Wire name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    fn index(self) -> usize {
        match self {
            Mode::Focus => 0,
            Mode::ShortBreak => 1,
            Mode::LongBreak => 2,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" | "f" => Ok(Mode::Focus),
            "shortbreak" | "short-break" | "short" => Ok(Mode::ShortBreak),
            "longbreak" | "long-break" | "long" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// One value per mode, indexable by [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerMode<T> {
    values: [T; 3],
}

impl<T: Copy> PerMode<T> {
    pub fn from_fn(mut f: impl FnMut(Mode) -> T) -> Self {
        Self {
            values: Mode::ALL.map(&mut f),
        }
    }

    pub fn get(&self, mode: Mode) -> T {
        self.values[mode.index()]
    }

    pub fn set(&mut self, mode: Mode, value: T) {
        self.values[mode.index()] = value;
    }
}
