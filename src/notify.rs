//! Presentation hooks: what the session tells the outside world.

use std::io::Write;

use crate::engine::{GameStatus, GridState, Score};

/// Receives engine state changes. Every method defaults to a no-op.
pub trait GameObserver {
    /// Called after init, every accepted move, and undo.
    fn render(&mut self, _state: &GridState, _best: Score) {}
    /// The win tile appeared for the first time this game.
    fn won(&mut self, _score: Score) {}
    fn game_over(&mut self, _final_score: Score, _best: Score) {}
    /// Fired every N-th accepted move.
    fn interstitial(&mut self) {}
}

impl GameObserver for () {}

/// Counts accepted moves and fires every `every`-th one, then resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interstitial {
    every: u32,
    count: u32,
}

impl Interstitial {
    /// Panics if `every == 0`.
    pub fn new(every: u32) -> Self {
        assert!(every > 0, "interstitial interval must be positive");
        Interstitial { every, count: 0 }
    }

    /// Record one accepted move; true when the interstitial should fire.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> u32 { self.count }
}

/// Plain-text renderer for terminals.
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self { TextRenderer { out } }

    pub fn into_inner(self) -> W { self.out }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            log::warn!("could not write to terminal: {e}");
        }
    }
}

impl<W: Write> GameObserver for TextRenderer<W> {
    fn render(&mut self, state: &GridState, best: Score) {
        let status = match state.status {
            GameStatus::Ongoing => "",
            GameStatus::Won => "  [2048!]",
            GameStatus::Over => "  [game over]",
        };
        let text = format!("{}Score: {}  Best: {}{}", state.grid, state.score, best.max(state.score), status);
        self.line(&text);
    }

    fn won(&mut self, score: Score) {
        self.line(&format!("You win! Score: {score}. Keep going or press n for a new game."));
    }

    fn game_over(&mut self, final_score: Score, best: Score) {
        self.line(&format!("Game over. Final score: {final_score}  Best score: {best}"));
        self.line("Press n for a new game or u to undo.");
    }

    fn interstitial(&mut self) {
        self.line("-- take a breath --");
    }
}
