//! slide-2048: a 2048 grid engine and the thin layer a front end needs around it.
//!
//! This crate provides:
//! - A square `Grid` with slide/merge (`shifted`), spawn and stuck detection
//! - A `Game` with score, sticky win, game over, bounded undo and an early-game spawn ramp
//! - Input translation for keys and swipes (`input`)
//! - Best-score persistence (`persistence`) and presentation hooks (`notify`)
//! - A `Session` controller tying them together
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{Game, Move, Rules};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut game = Game::new(Rules::default(), StdRng::seed_from_u64(42));
//! let res = game.make_move(Move::Left);
//! if res.changed {
//!     assert!(res.spawned());
//!     game.undo();
//! }
//! assert_eq!(game.grid().count_empty(), 14);
//! ```
//!
//! Session with collaborators
//! ```
//! use slide_2048::config::Config;
//! use slide_2048::persistence::MemoryStore;
//! use slide_2048::session::Session;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut session = Session::new(&Config::default(), StdRng::seed_from_u64(1), MemoryStore::default(), ());
//! session.handle_key("ArrowUp");
//! session.handle_key("ArrowLeft");
//! assert!(session.game().history_len() <= 2);
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod notify;
pub mod persistence;
pub mod session;
