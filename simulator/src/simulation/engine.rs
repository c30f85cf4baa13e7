//! Trial engine: drives both walkers tick by tick until they meet or run out
//! of steps.
//!
//! ## Recording mode
//!
//! `simulate_trial_with_recording` captures one [`Frame`] per tick (tick 0 is
//! the start) into a [`TrialRecord`] so a renderer can replay it frame by
//! frame. Both modes consume the coin source identically.

use serde::Serialize;

use crate::error::Result;
use crate::types::{GridSize, MeetingPoint, Position, Walker};

use super::path::{generate_step, CoinSource};

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrialOutcome {
    /// First tick at which both walkers stood on the same cell.
    Met { point: MeetingPoint, tick: usize },
    /// All N-1 ticks ran without a coincidence.
    NoMeeting,
}

impl TrialOutcome {
    pub fn met(&self) -> bool {
        matches!(self, TrialOutcome::Met { .. })
    }

    pub fn meeting_point(&self) -> Option<MeetingPoint> {
        match self {
            TrialOutcome::Met { point, .. } => Some(*point),
            TrialOutcome::NoMeeting => None,
        }
    }
}

/// Both positions after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub tick: usize,
    pub you: Position,
    pub friend: Position,
    /// Manhattan distance between the walkers.
    pub distance: usize,
}

impl Frame {
    fn new(tick: usize, you: Position, friend: Position) -> Self {
        Self {
            tick,
            you,
            friend,
            distance: you.manhattan_distance(friend),
        }
    }
}

/// Full replay of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialRecord {
    pub grid_size: usize,
    /// Tick 0 (start) through the last simulated tick.
    pub frames: Vec<Frame>,
    pub outcome: TrialOutcome,
}

impl TrialRecord {
    /// Ticks actually simulated.
    pub fn ticks(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn you_path(&self) -> Vec<Position> {
        self.frames.iter().map(|f| f.you).collect()
    }

    pub fn friend_path(&self) -> Vec<Position> {
        self.frames.iter().map(|f| f.friend).collect()
    }
}

/// Core tick loop. `on_tick` sees the positions after every tick.
///
/// Per tick: one flip for You, then one for Friend. Returns at the first
/// coincidence; a coincidence is always on the anti-diagonal because after
/// `t` ticks You has `row + col = t` and Friend `2(N-1) - t`.
#[inline(always)]
fn drive_trial<C, F>(grid: GridSize, coins: &mut C, mut on_tick: F) -> TrialOutcome
where
    C: CoinSource + ?Sized,
    F: FnMut(usize, Position, Position),
{
    let mut you = Walker::You.start(grid);
    let mut friend = Walker::Friend.start(grid);

    for tick in 1..=grid.steps() {
        you = you.step(generate_step(Walker::You, coins), grid);
        friend = friend.step(generate_step(Walker::Friend, coins), grid);
        on_tick(tick, you, friend);

        if you == friend {
            debug_assert!(you.is_on_anti_diagonal(grid));
            return TrialOutcome::Met {
                point: MeetingPoint::at(grid, you.row),
                tick,
            };
        }
    }

    TrialOutcome::NoMeeting
}

/// Simulate one paired trial.
pub fn simulate_trial<C: CoinSource + ?Sized>(grid: GridSize, coins: &mut C) -> TrialOutcome {
    drive_trial(grid, coins, |_, _, _| {})
}

/// Simulate one paired trial, recording every frame.
pub fn simulate_trial_with_recording<C: CoinSource + ?Sized>(
    grid: GridSize,
    coins: &mut C,
) -> TrialRecord {
    let mut frames = Vec::with_capacity(grid.get());
    frames.push(Frame::new(
        0,
        Walker::You.start(grid),
        Walker::Friend.start(grid),
    ));
    let outcome = drive_trial(grid, coins, |tick, you, friend| {
        frames.push(Frame::new(tick, you, friend));
    });
    TrialRecord {
        grid_size: grid.get(),
        frames,
        outcome,
    }
}

/// Validated single-trial entry for animation consumers.
pub fn trace_trial<C: CoinSource + ?Sized>(grid_size: usize, coins: &mut C) -> Result<TrialRecord> {
    let grid = GridSize::new(grid_size)?;
    Ok(simulate_trial_with_recording(grid, coins))
}
