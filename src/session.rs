//! One play session: the engine plus its collaborators.
//!
//! The session is the only owner of the [`Game`]; every input runs to
//! completion before the next one is handled.

use log::{info, warn};
use rand::Rng;

use crate::config::Config;
use crate::engine::{Game, GridState, Move, MoveResult, Score};
use crate::input::Swipe;
use crate::notify::{GameObserver, Interstitial};
use crate::persistence::BestScoreStore;

pub struct Session<R, S, O> {
    game: Game<R>,
    store: S,
    observer: O,
    interstitial: Interstitial,
    swipe_threshold: f64,
    best: Score,
}

impl<R: Rng, S: BestScoreStore, O: GameObserver> Session<R, S, O> {
    /// Load the best score, deal a fresh game and render it.
    pub fn new(config: &Config, rng: R, store: S, observer: O) -> Self {
        let game = Game::new(config.rules(), rng);
        Self::with_game(config, game, store, observer)
    }

    /// Wrap an existing game, e.g. one resumed with [`Game::from_grid`].
    ///
    /// Only `interstitial_every` and `swipe_threshold` are read from `config`.
    /// The game keeps its own [`Rules`](crate::engine::Rules); grid size, win
    /// tile and undo depth in `config` are ignored here.
    pub fn with_game(config: &Config, game: Game<R>, store: S, observer: O) -> Self {
        let best = store.load().unwrap_or_else(|e| {
            warn!("could not load best score, starting from 0: {e}");
            0
        });
        let mut session = Session {
            game,
            store,
            observer,
            interstitial: Interstitial::new(config.interstitial_every),
            swipe_threshold: config.swipe_threshold,
            best,
        };
        info!("session started, best score {best}");
        session.render();
        session
    }

    /// Handle a key press. Unknown keys and input after game over are ignored.
    pub fn handle_key(&mut self, key: &str) -> Option<MoveResult> {
        if self.game.is_over() {
            return None;
        }
        let dir = Move::from_key(key)?;
        Some(self.play(dir))
    }

    /// Handle a finished touch gesture. Short swipes are ignored.
    pub fn handle_swipe(&mut self, swipe: Swipe) -> Option<MoveResult> {
        if self.game.is_over() {
            return None;
        }
        let dir = swipe.direction(self.swipe_threshold)?;
        Some(self.play(dir))
    }

    /// Apply one move and dispatch whatever it triggered.
    pub fn play(&mut self, dir: Move) -> MoveResult {
        let res = self.game.make_move(dir);
        if !res.changed {
            return res;
        }
        if res.just_won {
            info!("reached {} with score {}", self.game.rules().win_tile, res.score);
            self.observer.won(res.score);
        }
        if res.just_lost {
            self.record_final_score(res.score);
            info!("game over, final score {} (best {})", res.score, self.best);
            self.observer.game_over(res.score, self.best);
        }
        self.render();
        if self.interstitial.tick() {
            self.observer.interstitial();
        }
        res
    }

    pub fn undo(&mut self) -> GridState {
        let state = self.game.undo();
        self.render();
        state
    }

    pub fn new_game(&mut self) -> GridState {
        let state = self.game.init();
        info!("new game");
        self.render();
        state
    }

    #[inline]
    pub fn best_score(&self) -> Score { self.best }
    #[inline]
    pub fn game(&self) -> &Game<R> { &self.game }
    #[inline]
    pub fn observer(&self) -> &O { &self.observer }
    #[inline]
    pub fn store(&self) -> &S { &self.store }

    fn render(&mut self) {
        let state = self.game.state();
        self.observer.render(&state, self.best);
    }

    fn record_final_score(&mut self, score: Score) {
        if score <= self.best {
            return;
        }
        self.best = score;
        info!("new best score {score}");
        if let Err(e) = self.store.save(score) {
            warn!("could not save best score: {e}");
        }
    }
}
