//! Grid geometry: grid size, positions, walkers, moves and meeting points.

use serde::{Deserialize, Serialize};

use crate::constants::{FIRST_LABEL, LABEL_ALPHABET, MIN_GRID_SIZE};
use crate::error::{ConfigIssue, Result};

/// Side length N of the square grid. Always at least [`MIN_GRID_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GridSize(usize);

impl GridSize {
    pub fn new(n: usize) -> Result<Self> {
        if n < MIN_GRID_SIZE {
            return Err(ConfigIssue::GridTooSmall(n).into());
        }
        Ok(Self(n))
    }

    #[inline(always)]
    pub fn get(self) -> usize {
        self.0
    }

    /// Largest valid row/column index (N-1).
    #[inline(always)]
    pub fn max_index(self) -> usize {
        self.0 - 1
    }

    /// Ticks per trial, and steps per walker (N-1).
    #[inline(always)]
    pub fn steps(self) -> usize {
        self.0 - 1
    }

    /// All N meeting points, ordered A, B, ...
    pub fn meeting_points(self) -> impl Iterator<Item = MeetingPoint> {
        (0..self.0).map(move |i| MeetingPoint::at(self, i))
    }
}

/// A grid cell. `row` grows northward, `col` eastward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply one move. A move that would leave the grid keeps the position.
    #[inline(always)]
    pub fn step(self, mv: Move, grid: GridSize) -> Self {
        let max = grid.max_index();
        match mv {
            Move::Up if self.row < max => Self::new(self.row + 1, self.col),
            Move::Right if self.col < max => Self::new(self.row, self.col + 1),
            Move::Down if self.row > 0 => Self::new(self.row - 1, self.col),
            Move::Left if self.col > 0 => Self::new(self.row, self.col - 1),
            _ => self,
        }
    }

    pub fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// `row + col == N - 1`. Off-grid coordinates are simply not on it.
    pub fn is_on_anti_diagonal(self, grid: GridSize) -> bool {
        self.row.checked_add(self.col) == Some(grid.max_index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

/// One of the two walkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Walker {
    /// Starts at the SW corner, moves up or right.
    You,
    /// Starts at the NE corner, moves down or left.
    Friend,
}

impl Walker {
    pub fn start(self, grid: GridSize) -> Position {
        match self {
            Walker::You => Position::new(0, 0),
            Walker::Friend => Position::new(grid.max_index(), grid.max_index()),
        }
    }

    /// The two legal moves as `[heads, tails]`.
    #[inline(always)]
    pub fn legal_moves(self) -> [Move; 2] {
        match self {
            Walker::You => [Move::Right, Move::Up],
            Walker::Friend => [Move::Left, Move::Down],
        }
    }
}

/// A cell `(i, N-1-i)` on the anti-diagonal, the only place the walkers can meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MeetingPoint {
    /// Row of the point, 0..N. Point `i` is labelled `A + i`.
    pub index: usize,
    pub position: Position,
}

impl MeetingPoint {
    /// Meeting point with row `index`. `index` must be below N.
    pub(crate) fn at(grid: GridSize, index: usize) -> Self {
        debug_assert!(index < grid.get());
        Self {
            index,
            position: Position::new(index, grid.max_index() - index),
        }
    }

    /// The meeting point at `position`, if it lies on the anti-diagonal.
    pub fn from_position(grid: GridSize, position: Position) -> Option<Self> {
        position
            .is_on_anti_diagonal(grid)
            .then(|| Self::at(grid, position.row))
    }

    pub fn label(&self) -> String {
        point_label(self.index)
    }
}

/// Spreadsheet-style label: 0 → `A`, 25 → `Z`, 26 → `AA`, 27 → `AB`.
pub fn point_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % LABEL_ALPHABET;
        letters.push(FIRST_LABEL + rem as u8);
        n = (n - 1) / LABEL_ALPHABET;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Input of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid_size: usize,
    pub trial_count: u64,
    /// Fixed seed for a reproducible run; `None` draws one.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl SimulationConfig {
    /// Check every field before any work starts.
    pub fn validate(&self) -> Result<GridSize> {
        let grid = GridSize::new(self.grid_size)?;
        if self.trial_count == 0 {
            return Err(ConfigIssue::NoTrials.into());
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;

    #[test]
    fn test_grid_size_validation() {
        assert_eq!(
            GridSize::new(0),
            Err(SimulationError::InvalidConfiguration(ConfigIssue::GridTooSmall(0)))
        );
        assert!(GridSize::new(1).is_err());
        let grid = GridSize::new(2).unwrap();
        assert_eq!(grid.steps(), 1);
        assert_eq!(GridSize::new(1000).unwrap().max_index(), 999);
    }

    #[test]
    fn test_step_stays_on_grid() {
        let grid = GridSize::new(3).unwrap();
        let corner = Position::new(2, 2);
        assert_eq!(corner.step(Move::Up, grid), corner);
        assert_eq!(corner.step(Move::Right, grid), corner);
        assert_eq!(corner.step(Move::Down, grid), Position::new(1, 2));

        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Move::Down, grid), origin);
        assert_eq!(origin.step(Move::Left, grid), origin);
        assert_eq!(origin.step(Move::Up, grid), Position::new(1, 0));
        assert_eq!(origin.step(Move::Right, grid), Position::new(0, 1));
    }

    #[test]
    fn test_walker_starts_and_moves() {
        let grid = GridSize::new(5).unwrap();
        assert_eq!(Walker::You.start(grid), Position::new(0, 0));
        assert_eq!(Walker::Friend.start(grid), Position::new(4, 4));
        assert_eq!(
            Walker::Friend.start(grid).manhattan_distance(Walker::You.start(grid)),
            8
        );
        assert_eq!(Walker::You.legal_moves(), [Move::Right, Move::Up]);
        assert_eq!(Walker::Friend.legal_moves(), [Move::Left, Move::Down]);
    }

    #[test]
    fn test_meeting_points() {
        let grid = GridSize::new(3).unwrap();
        let points: Vec<Position> = grid.meeting_points().map(|p| p.position).collect();
        assert_eq!(
            points,
            vec![Position::new(0, 2), Position::new(1, 1), Position::new(2, 0)]
        );
        let labels: Vec<String> = grid.meeting_points().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);

        assert_eq!(
            MeetingPoint::from_position(grid, Position::new(1, 1)).map(|p| p.index),
            Some(1)
        );
        assert_eq!(MeetingPoint::from_position(grid, Position::new(1, 0)), None);
        assert_eq!(MeetingPoint::from_position(grid, Position::new(2, 2)), None);
    }

    #[test]
    fn test_far_off_grid_position_is_no_meeting_point() {
        let grid = GridSize::new(3).unwrap();
        assert!(!Position::new(1, usize::MAX).is_on_anti_diagonal(grid));
        assert_eq!(MeetingPoint::from_position(grid, Position::new(1, usize::MAX)), None);
        assert_eq!(MeetingPoint::from_position(grid, Position::new(usize::MAX, 0)), None);
        assert_eq!(
            MeetingPoint::from_position(grid, Position::new(usize::MAX, usize::MAX)),
            None
        );
        assert_eq!(MeetingPoint::from_position(grid, Position::new(3, 0)), None);
    }

    #[test]
    fn test_point_label_rollover() {
        assert_eq!(point_label(0), "A");
        assert_eq!(point_label(25), "Z");
        assert_eq!(point_label(26), "AA");
        assert_eq!(point_label(27), "AB");
        assert_eq!(point_label(51), "AZ");
        assert_eq!(point_label(52), "BA");
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimulationConfig {
            grid_size: 5,
            trial_count: 10,
            random_seed: Some(7),
        };
        assert_eq!(config.validate().unwrap().get(), 5);

        config.trial_count = 0;
        assert_eq!(
            config.validate(),
            Err(SimulationError::InvalidConfiguration(ConfigIssue::NoTrials))
        );

        config.grid_size = 1;
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfiguration(ConfigIssue::GridTooSmall(1)))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"grid_size": 4, "trial_count": 100}"#).unwrap();
        assert_eq!(config.random_seed, None);
        assert_eq!(config.validate().unwrap().get(), 4);
    }
}
