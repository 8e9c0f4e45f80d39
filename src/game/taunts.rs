// Taunt messages shown on each successful click. Index 0 doubles as the idle
// message restored on reset.

pub const TAUNTS: [&str; 10] = [
    "Can't catch me! 😈",
    "Too slow! 🐌",
    "Missed again! 😅",
    "You'll never get me! 🚀",
    "Try harder! 💪",
    "Not fast enough! ⚡",
    "I'm too quick! 🏃\u{200d}♂\u{fe0f}",
    "Better luck next time! 🍀",
    "You're getting warmer! 🔥",
    "Almost there... not! 😂",
];

pub const DEFAULT_TAUNT_INDEX: usize = 0;

pub fn default_taunt() -> &'static str {
    TAUNTS[DEFAULT_TAUNT_INDEX]
}

/// Text shown once a round has ended.
pub fn summary(rate_text: &str) -> String {
    format!("Game Over! Final CPS: {rate_text}")
}
