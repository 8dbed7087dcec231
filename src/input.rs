//! Translate keyboard keys and swipe gestures into [`Move`]s.
//!
//! Anything that is not one of the four directions is rejected here, so the
//! engine only ever sees a valid `Move`.

use crate::engine::Move;

/// Minimum displacement, in pointer units, for a swipe to count.
pub const SWIPE_THRESHOLD: f64 = 30.0;

impl Move {
    /// Parse a key name.
    ///
    /// Accepts the browser arrow-key names (`ArrowUp`, ...), `w/a/s/d`,
    /// vi-style `k/h/j/l`, and the words `up/down/left/right`.
    ///
    /// ```
    /// use slide_2048::engine::Move;
    /// assert_eq!(Move::from_key("ArrowLeft"), Some(Move::Left));
    /// assert_eq!(Move::from_key("s"), Some(Move::Down));
    /// assert_eq!(Move::from_key("Enter"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Move> {
        match key {
            "ArrowUp" => return Some(Move::Up),
            "ArrowDown" => return Some(Move::Down),
            "ArrowLeft" => return Some(Move::Left),
            "ArrowRight" => return Some(Move::Right),
            _ => {}
        }
        match key.to_ascii_lowercase().as_str() {
            "w" | "k" | "up" => Some(Move::Up),
            "s" | "j" | "down" => Some(Move::Down),
            "a" | "h" | "left" => Some(Move::Left),
            "d" | "l" | "right" => Some(Move::Right),
            _ => None,
        }
    }
}

/// A pointer position, screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self { Point { x, y } }
}

/// A completed touch gesture from press to release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub start: Point,
    pub end: Point,
}

impl Swipe {
    pub fn new(start: Point, end: Point) -> Self { Swipe { start, end } }

    /// Direction of the swipe, or `None` if it is too short.
    pub fn direction(&self, threshold: f64) -> Option<Move> {
        classify_swipe(self.start, self.end, threshold)
    }
}

/// Pick the dominant axis by absolute displacement (ties go vertical) and
/// accept it only when that displacement strictly exceeds `threshold`.
pub fn classify_swipe(start: Point, end: Point, threshold: f64) -> Option<Move> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() > dy.abs() {
        if dx.abs() > threshold {
            return Some(if dx > 0.0 { Move::Right } else { Move::Left });
        }
    } else if dy.abs() > threshold {
        return Some(if dy > 0.0 { Move::Down } else { Move::Up });
    }
    None
}
