pub mod driver;
mod engine;
mod mode;
mod settings;

pub use driver::{Command, TimerHandle};
pub use engine::{
    Completion, PendingArm, TimerEngine, TimerSnapshot, TimerState, AUTO_START_SETTLE_DELAY,
    SETTLE_DELAY,
};
pub use mode::{Mode, PerMode};
pub use settings::Settings;
