use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    #[inline]
    fn is_horizontal(self) -> bool {
        matches!(self, Move::Left | Move::Right)
    }

    /// Right and down read their lines back to front so that the
    /// left-merge pass slides toward the direction of travel.
    #[inline]
    fn is_reversed(self) -> bool {
        matches!(self, Move::Right | Move::Down)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

pub type Tile = u32;
pub type Score = u64;

pub const DEFAULT_SIZE: usize = 4;
pub const WIN_TILE: Tile = 2048;
pub const HISTORY_DEPTH: usize = 10;

/// Square grid of tiles stored row-major. `0` is an empty cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An empty `size`x`size` grid.
    ///
    /// Panics if `size < 2`.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid size must be at least 2, got {size}");
        Grid { size, cells: vec![0; size * size] }
    }

    /// Build a grid from row-major cells.
    ///
    /// Returns `None` when the cell count is not a square of at least 2x2 or
    /// when a cell is neither 0 nor a power of two >= 2.
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// let g = Grid::from_cells(vec![2, 0, 0, 4]).unwrap();
    /// assert_eq!(g.size(), 2);
    /// assert!(Grid::from_cells(vec![3, 0, 0, 0]).is_none());
    /// ```
    pub fn from_cells(cells: Vec<Tile>) -> Option<Self> {
        let size = (cells.len() as f64).sqrt() as usize;
        if size < 2 || size * size != cells.len() {
            return None;
        }
        if !cells.iter().all(|&v| is_valid_tile(v)) {
            return None;
        }
        Some(Grid { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    /// Row-major view of every cell.
    #[inline]
    pub fn cells(&self) -> &[Tile] { &self.cells }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile { self.cells[row * self.size + col] }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.cells.contains(&tile)
    }

    /// True if an empty cell exists or two orthogonal neighbours are equal
    /// and small enough to merge.
    pub fn can_move(&self) -> bool {
        if self.contains(0) {
            return true;
        }
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let current = self.get(row, col);
                if current.checked_mul(2).is_none() {
                    continue;
                }
                if col + 1 < n && self.get(row, col + 1) == current {
                    return true;
                }
                if row + 1 < n && self.get(row + 1, col) == current {
                    return true;
                }
            }
        }
        false
    }

    /// Return the grid after sliding/merging in `dir` (no spawn) and the
    /// points the merges are worth.
    ///
    /// ```
    /// use slide_2048::engine::{Grid, Move};
    /// let g = Grid::from_cells(vec![
    ///     4, 4, 8, 8,
    ///     0, 0, 0, 0,
    ///     0, 0, 0, 0,
    ///     0, 0, 0, 0,
    /// ]).unwrap();
    /// let (moved, gained) = g.shifted(Move::Left);
    /// assert_eq!(&moved.cells()[..4], &[8, 16, 0, 0]);
    /// assert_eq!(gained, 24);
    /// ```
    pub fn shifted(&self, dir: Move) -> (Grid, Score) {
        let mut out = self.clone();
        let mut gained = 0;
        for idx in 0..self.size {
            let mut line = self.line(idx, dir);
            gained += merge_line(&mut line);
            out.set_line(idx, dir, &line);
        }
        (out, gained)
    }

    /// Place a tile in a uniformly chosen empty cell: 2 with probability
    /// `p_two`, else 4. Returns the spawned cell, or `None` on a full grid.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R, p_two: f64) -> Option<Spawn> {
        let empty: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect();
        if empty.is_empty() {
            return None;
        }
        let index = empty[rng.gen_range(0..empty.len())];
        let value = if rng.gen::<f64>() < p_two { 2 } else { 4 };
        self.cells[index] = value;
        Some(Spawn { index, value })
    }

    fn line(&self, idx: usize, dir: Move) -> Vec<Tile> {
        let n = self.size;
        let mut line: Vec<Tile> = if dir.is_horizontal() {
            self.cells[idx * n..(idx + 1) * n].to_vec()
        } else {
            (0..n).map(|row| self.cells[row * n + idx]).collect()
        };
        if dir.is_reversed() {
            line.reverse();
        }
        line
    }

    fn set_line(&mut self, idx: usize, dir: Move, line: &[Tile]) {
        let n = self.size;
        for (pos, &val) in line.iter().enumerate() {
            let pos = if dir.is_reversed() { n - 1 - pos } else { pos };
            let cell = if dir.is_horizontal() { idx * n + pos } else { pos * n + idx };
            self.cells[cell] = val;
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid").field("size", &self.size).field("cells", &self.cells).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8);
        writeln!(f)?;
        for (row, chunk) in self.cells.chunks(self.size).enumerate() {
            if row > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = chunk.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// Where a spawned tile landed and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub index: usize,
    pub value: Tile,
}

/// Compress and merge one line toward index 0, in place.
///
/// Single pass: a merged cell never merges again within the same call, and
/// with three equal values in a row the pair nearest index 0 merges.
/// Tiles whose double would overflow `Tile` stay put. Returns the merge points.
///
/// ```
/// use slide_2048::engine::merge_line;
/// let mut line = vec![2, 2, 2, 0];
/// assert_eq!(merge_line(&mut line), 4);
/// assert_eq!(line, vec![4, 2, 0, 0]);
/// ```
pub fn merge_line(line: &mut [Tile]) -> Score {
    let tiles: Vec<Tile> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut gained = 0;
    let mut write = 0;
    let mut i = 0;
    while i < tiles.len() {
        let pair = if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] { tiles[i].checked_mul(2) } else { None };
        if let Some(merged) = pair {
            gained += merged as Score;
            line[write] = merged;
            i += 2;
        } else {
            line[write] = tiles[i];
            i += 1;
        }
        write += 1;
    }
    for cell in &mut line[write..] {
        *cell = 0;
    }
    gained
}

/// Probability that a spawned tile is a 2, given the number of committed
/// moves at spawn time. Early moves favour 2s.
///
/// The count is not capped by the undo depth and is net of undos: each undo
/// takes one move back off it.
pub fn spawn_probability(move_count: u32) -> f64 {
    match move_count {
        0..=3 => 0.95,
        4..=10 => 0.90,
        _ => 0.85,
    }
}

#[inline]
fn is_valid_tile(v: Tile) -> bool {
    v == 0 || (v >= 2 && v.is_power_of_two())
}

fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}

/// Game status. `Won` is sticky; `Over` is reported whenever no move is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Won,
    Over,
}

/// Tunables for a game. Defaults give the classic 4x4 / 2048 / 10-deep undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub size: usize,
    pub win_tile: Tile,
    pub history_depth: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Rules { size: DEFAULT_SIZE, win_tile: WIN_TILE, history_depth: HISTORY_DEPTH }
    }
}

/// Grid and score captured before a move, restored by undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: Score,
}

/// What a renderer needs after init, an accepted move or undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub grid: Grid,
    pub score: Score,
    pub status: GameStatus,
}

/// Outcome of [`Game::make_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether the slide changed the grid. `false` means nothing happened.
    pub changed: bool,
    pub grid: Grid,
    pub score: Score,
    /// Merge points earned by this move.
    pub gained: Score,
    pub spawn: Option<Spawn>,
    pub status: GameStatus,
    /// The win tile appeared for the first time in this game.
    pub just_won: bool,
    /// This move left no legal move.
    pub just_lost: bool,
}

impl MoveResult {
    #[inline]
    pub fn spawned(&self) -> bool { self.spawn.is_some() }
}

/// One live game: grid, score, status flags and bounded undo history.
///
/// The random source is injected so games can be replayed from a seed.
///
/// ```
/// use slide_2048::engine::{Game, Move, Rules};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut game = Game::new(Rules::default(), StdRng::seed_from_u64(7));
/// assert_eq!(game.grid().count_empty(), 14);
/// let before = game.score();
/// let res = game.make_move(Move::Left);
/// assert!(res.score >= before);
/// ```
#[derive(Debug, Clone)]
pub struct Game<R> {
    rules: Rules,
    grid: Grid,
    score: Score,
    won: bool,
    over: bool,
    history: VecDeque<Snapshot>,
    moves: u32,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Create a game and deal the two opening tiles.
    ///
    /// Panics if `rules.size < 2`.
    pub fn new(rules: Rules, rng: R) -> Self {
        let mut game = Game {
            rules,
            grid: Grid::new(rules.size),
            score: 0,
            won: false,
            over: false,
            history: VecDeque::with_capacity(rules.history_depth + 1),
            moves: 0,
            rng,
        };
        game.init();
        game
    }

    /// Resume from an arbitrary position with empty history. No tiles are dealt.
    pub fn from_grid(rules: Rules, grid: Grid, score: Score, rng: R) -> Self {
        let won = grid.contains(rules.win_tile);
        let over = !grid.can_move();
        Game {
            rules: Rules { size: grid.size(), ..rules },
            grid,
            score,
            won,
            over,
            history: VecDeque::with_capacity(rules.history_depth + 1),
            moves: 0,
            rng,
        }
    }

    /// Start over: clear the grid, score, flags and history, then deal two tiles.
    pub fn init(&mut self) -> GridState {
        self.grid = Grid::new(self.rules.size);
        self.score = 0;
        self.won = false;
        self.over = false;
        self.history.clear();
        self.moves = 0;
        self.spawn();
        self.spawn();
        log::debug!("new {}x{} game dealt", self.rules.size, self.rules.size);
        self.state()
    }

    /// Slide every line toward `dir`, merge, and if anything changed spawn a
    /// tile and update the status flags.
    pub fn make_move(&mut self, dir: Move) -> MoveResult {
        if self.over {
            return self.unchanged();
        }

        let (moved, gained) = self.grid.shifted(dir);
        if moved == self.grid {
            return self.unchanged();
        }

        self.push_history();
        self.grid = moved;
        self.score += gained;
        let spawn = self.spawn();

        let mut just_won = false;
        if !self.won && self.grid.contains(self.rules.win_tile) {
            self.won = true;
            just_won = true;
        }
        let mut just_lost = false;
        if !self.grid.can_move() {
            self.over = true;
            just_lost = true;
        }
        log::debug!("move {dir}: +{gained}, score {}, spawn {:?}", self.score, spawn);

        MoveResult {
            changed: true,
            grid: self.grid.clone(),
            score: self.score,
            gained,
            spawn,
            status: self.status(),
            just_won,
            just_lost,
        }
    }

    /// Restore the grid and score from before the most recent accepted move.
    ///
    /// Clears the over flag; the won flag is left alone. No-op on empty history.
    pub fn undo(&mut self) -> GridState {
        if let Some(snapshot) = self.history.pop_back() {
            self.grid = snapshot.grid;
            self.score = snapshot.score;
            self.over = false;
            self.moves = self.moves.saturating_sub(1);
        }
        self.state()
    }

    pub fn state(&self) -> GridState {
        GridState { grid: self.grid.clone(), score: self.score, status: self.status() }
    }

    pub fn status(&self) -> GameStatus {
        if self.over {
            GameStatus::Over
        } else if self.won {
            GameStatus::Won
        } else {
            GameStatus::Ongoing
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }
    #[inline]
    pub fn score(&self) -> Score { self.score }
    #[inline]
    pub fn is_won(&self) -> bool { self.won }
    #[inline]
    pub fn is_over(&self) -> bool { self.over }
    #[inline]
    pub fn rules(&self) -> Rules { self.rules }
    #[inline]
    pub fn history_len(&self) -> usize { self.history.len() }

    /// Accepted moves committed in this game, net of undos.
    #[inline]
    pub fn move_count(&self) -> u32 { self.moves }

    pub fn max_tile(&self) -> Tile { self.grid.max_tile() }

    pub fn count_empty(&self) -> usize { self.grid.count_empty() }

    fn push_history(&mut self) {
        self.history.push_back(Snapshot { grid: self.grid.clone(), score: self.score });
        if self.history.len() > self.rules.history_depth {
            self.history.pop_front();
        }
        self.moves += 1;
    }

    fn spawn(&mut self) -> Option<Spawn> {
        let p_two = spawn_probability(self.moves);
        self.grid.spawn_random_tile(&mut self.rng, p_two)
    }

    fn unchanged(&self) -> MoveResult {
        MoveResult {
            changed: false,
            grid: self.grid.clone(),
            score: self.score,
            gained: 0,
            spawn: None,
            status: self.status(),
            just_won: false,
            just_lost: false,
        }
    }
}
