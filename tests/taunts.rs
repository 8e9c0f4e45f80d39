// Invariants of the taunt list and summary text.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use evasive_click::game::taunts::{self, DEFAULT_TAUNT_INDEX, TAUNTS};

#[test]
fn taunts_are_unique_and_non_empty() {
    let mut seen = HashSet::new();
    for t in TAUNTS {
        assert!(!t.trim().is_empty(), "empty taunt in list");
        assert!(seen.insert(t), "duplicate taunt '{}'", t);
    }
    assert_eq!(TAUNTS.len(), 10);
}

#[test]
fn default_taunt_is_first_entry() {
    assert_eq!(DEFAULT_TAUNT_INDEX, 0);
    assert_eq!(taunts::default_taunt(), "Can't catch me! 😈");
}

#[test]
fn summary_embeds_rate_text() {
    assert_eq!(taunts::summary("3.40"), "Game Over! Final CPS: 3.40");
    assert!(!TAUNTS.iter().any(|t| t.starts_with("Game Over")), "summary text must not collide with a taunt");
}
