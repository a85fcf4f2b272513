//! Score and combo accounting.

/// Maximum gap (seconds) between hits that keeps a combo alive.
pub const COMBO_WINDOW: f64 = 1.5;

/// Monotonically non-decreasing score plus the current combo multiplier.
///
/// Each hit scores `10 × combo`; the combo increments while hits land
/// within [`COMBO_WINDOW`] of each other and resets to 1 after a quiet
/// gap.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreBoard {
    pub score: u32,
    pub combo: u32,
    last_hit:  Option<f64>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        ScoreBoard::default()
    }

    /// Record a hit at `now` and return the points it scored.
    pub fn register_hit(&mut self, now: f64) -> u32 {
        let chained = matches!(self.last_hit, Some(last) if now - last < COMBO_WINDOW);
        self.combo = if chained { self.combo + 1 } else { 1 };
        self.last_hit = Some(now);

        let points = 10 * self.combo;
        self.score += points;
        points
    }
}
