//! Encouragement shown when a countdown finishes.
//!
//! Front-ends show one line per completion while the profile's motivation
//! switch is on. The pick is driven by a caller-supplied seed so the same
//! completion always gets the same line.

use crate::timer::Mode;

const FOCUS: &[&str] = &[
    "Excellent! You've completed an amazing focus session!",
    "Outstanding work! Your productivity is on fire!",
    "Well done! You're building incredible focus habits!",
    "Fantastic! One step closer to your goals!",
    "Perfect session! You're becoming a focus master!",
    "Brilliant! Every focused minute counts!",
    "Amazing! Building momentum with each session!",
    "Great focus! Developing superhuman concentration!",
    "Sharp mind! Exceptional performance today!",
    "Time well invested! Keep it up!",
];

const SHORT_BREAK: &[&str] = &[
    "Short break complete! Ready to focus again?",
    "Refreshed and ready! Time to tackle your next goal!",
    "Break time over! Let's get back to productive work!",
    "Recharged! Your mind is fresh for the next session!",
    "Rest complete! Time to shine in your next focus session!",
    "Break finished! Let's make the next session amazing!",
    "Quick refresh! Your mind is ready for creativity!",
    "Energy renewed! Get ready to blast off!",
];

const LONG_BREAK: &[&str] = &[
    "Great long break! You're ready for big challenges!",
    "Full recharge complete! Your mind is at its peak!",
    "Strategic rest! Ready for the next cycle!",
    "Battery at 100%! Time for peak performance!",
    "Perfect balance! Mind and body ready!",
    "Deep rest achieved! Ready to conquer!",
    "Full recovery! Let's create something amazing!",
    "Completely refreshed! Your best work awaits!",
];

fn pool(mode: Mode) -> &'static [&'static str] {
    match mode {
        Mode::Focus => FOCUS,
        Mode::ShortBreak => SHORT_BREAK,
        Mode::LongBreak => LONG_BREAK,
    }
}

/// Pick the encouragement for a finished `mode`.
pub fn message_for(mode: Mode, seed: u64) -> &'static str {
    let messages = pool(mode);
    messages[(seed % messages.len() as u64) as usize]
}

/// Second line telling the user what comes next.
pub fn follow_up(mode: Mode) -> &'static str {
    match mode {
        Mode::Focus => "Session completed! Time for a well-deserved break.",
        Mode::ShortBreak | Mode::LongBreak => "Ready for your next productive session?",
    }
}
