//! Step generation: one fair coin flip per step.
//!
//! Randomness is injected through [`CoinSource`] rather than read from a
//! global generator, so every trial is reproducible from its seed and
//! parallel chunks can run on independent streams.

use rand::RngCore;

use crate::types::{GridSize, Move, Position, Walker};

/// Source of fair, independent coin flips.
pub trait CoinSource {
    /// `true` is heads.
    fn flip(&mut self) -> bool;
}

impl<R: RngCore + ?Sized> CoinSource for R {
    #[inline(always)]
    fn flip(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }
}

/// Replays a fixed flip sequence, cycling when it runs out.
///
/// Used to reproduce a known pair of paths (e.g. for an animation replay)
/// and to enumerate trials exhaustively in tests. An empty script always
/// yields tails.
#[derive(Debug, Clone)]
pub struct ScriptedCoins {
    flips: Vec<bool>,
    cursor: usize,
}

impl ScriptedCoins {
    pub fn new(flips: Vec<bool>) -> Self {
        Self { flips, cursor: 0 }
    }

    /// Flips consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    fn next_flip(&mut self) -> bool {
        if self.flips.is_empty() {
            return false;
        }
        let flip = self.flips[self.cursor % self.flips.len()];
        self.cursor += 1;
        flip
    }
}

impl RngCore for ScriptedCoins {
    fn next_u32(&mut self) -> u32 {
        if self.next_flip() {
            1 << 31
        } else {
            0
        }
    }

    fn next_u64(&mut self) -> u64 {
        if self.next_flip() {
            1 << 63
        } else {
            0
        }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst {
            *byte = if self.next_flip() { 0x80 } else { 0 };
        }
    }
}

/// Draw one move for `walker`: heads takes the first legal move, tails the
/// second. Consumes exactly one flip.
#[inline(always)]
pub fn generate_step<C: CoinSource + ?Sized>(walker: Walker, coins: &mut C) -> Move {
    let [heads, tails] = walker.legal_moves();
    if coins.flip() {
        heads
    } else {
        tails
    }
}

/// A full monotone path: exactly N-1 independent steps.
pub fn generate_path<C: CoinSource + ?Sized>(
    walker: Walker,
    grid: GridSize,
    coins: &mut C,
) -> Vec<Move> {
    (0..grid.steps())
        .map(|_| generate_step(walker, coins))
        .collect()
}

/// Positions visited by `walker` following `moves`, start included.
pub fn walk_path(walker: Walker, grid: GridSize, moves: &[Move]) -> Vec<Position> {
    let mut pos = walker.start(grid);
    let mut visited = Vec::with_capacity(moves.len() + 1);
    visited.push(pos);
    for &mv in moves {
        pos = pos.step(mv, grid);
        visited.push(pos);
    }
    visited
}
