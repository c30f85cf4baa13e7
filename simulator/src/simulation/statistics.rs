//! Statistics from an aggregated batch.
//!
//! Every meeting point gets its empirical frequency next to two references:
//! the 1/N baseline and the exact combinatorial probability from
//! [`crate::theory`]. Deviations are reported against both so each claim can
//! be judged on its own.

use serde::Serialize;

use crate::error::{Result, SimulationError};
use crate::theory::{
    exact_meeting_probability, exact_point_probability, theoretical_point_probability,
};
use crate::types::Position;

use super::batch::AggregateResult;

// ── Top-level summary ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub grid_size: usize,
    pub trials: u64,
    pub meetings: u64,
    pub no_meetings: u64,
    /// meetings / trials.
    pub meeting_rate: f64,
    /// no_meetings / trials.
    pub no_meeting_rate: f64,
    /// 1/N.
    pub theoretical_point_probability: f64,
    /// C(2N-2, N-1) / 4^(N-1).
    pub exact_meeting_probability: f64,
    pub points: Vec<PointStatistics>,
    /// Mean |empirical - 1/N| over all points.
    pub mean_absolute_deviation: f64,
    /// Max |empirical - 1/N| over all points.
    pub max_absolute_deviation: f64,
    /// Mean |empirical - exact| over all points.
    pub mean_exact_deviation: f64,
}

// ── Per-point statistics ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PointStatistics {
    pub label: String,
    pub position: Position,
    pub count: u64,
    /// count / trials.
    pub empirical: f64,
    /// 1/N.
    pub theoretical: f64,
    /// C(N-1, i)^2 / 4^(N-1).
    pub exact: f64,
    /// |empirical - theoretical|.
    pub absolute_deviation: f64,
    /// absolute_deviation / theoretical.
    pub relative_deviation: f64,
    /// empirical - exact (signed).
    pub exact_deviation: f64,
    /// Binomial standard error of `empirical`.
    pub standard_error: f64,
    /// count / meetings; 0 when nobody met.
    pub share_of_meetings: f64,
}

// ── Aggregation ─────────────────────────────────────────────────────

/// Summarize a batch. Fails with `InsufficientData` when it holds no trials.
pub fn summarize(aggregate: &AggregateResult) -> Result<Summary> {
    let trials = aggregate.trials();
    if trials == 0 {
        return Err(SimulationError::InsufficientData);
    }
    let grid = aggregate.grid();
    let n = trials as f64;
    let meetings = aggregate.meetings();
    let theoretical = theoretical_point_probability(grid);

    let points: Vec<PointStatistics> = aggregate
        .iter()
        .map(|(point, count)| {
            let empirical = count as f64 / n;
            let exact = exact_point_probability(grid, point.index);
            let absolute_deviation = (empirical - theoretical).abs();
            PointStatistics {
                label: point.label(),
                position: point.position,
                count,
                empirical,
                theoretical,
                exact,
                absolute_deviation,
                relative_deviation: absolute_deviation / theoretical,
                exact_deviation: empirical - exact,
                standard_error: (empirical * (1.0 - empirical) / n).sqrt(),
                share_of_meetings: if meetings > 0 {
                    count as f64 / meetings as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    let num_points = points.len() as f64;
    let mean_absolute_deviation =
        points.iter().map(|p| p.absolute_deviation).sum::<f64>() / num_points;
    let max_absolute_deviation = points
        .iter()
        .map(|p| p.absolute_deviation)
        .fold(0.0, f64::max);
    let mean_exact_deviation =
        points.iter().map(|p| p.exact_deviation.abs()).sum::<f64>() / num_points;

    Ok(Summary {
        grid_size: grid.get(),
        trials,
        meetings,
        no_meetings: aggregate.no_meeting(),
        meeting_rate: meetings as f64 / n,
        no_meeting_rate: aggregate.no_meeting() as f64 / n,
        theoretical_point_probability: theoretical,
        exact_meeting_probability: exact_meeting_probability(grid),
        points,
        mean_absolute_deviation,
        max_absolute_deviation,
        mean_exact_deviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::batch::simulate_batch;
    use crate::simulation::engine::TrialOutcome;
    use crate::simulation::fast_prng::SplitMix64;
    use crate::types::{GridSize, MeetingPoint};

    fn grid(n: usize) -> GridSize {
        GridSize::new(n).unwrap()
    }

    /// Aggregate with `counts` per point and `no_meeting` misses.
    fn make_aggregate(n: usize, counts: &[u64], no_meeting: u64) -> AggregateResult {
        let g = grid(n);
        let mut agg = AggregateResult::new(g);
        for (i, &c) in counts.iter().enumerate() {
            let outcome = TrialOutcome::Met {
                point: MeetingPoint::at(g, i),
                tick: n - 1,
            };
            for _ in 0..c {
                agg.record(&outcome);
            }
        }
        for _ in 0..no_meeting {
            agg.record(&TrialOutcome::NoMeeting);
        }
        agg
    }

    #[test]
    fn test_empty_aggregate_insufficient() {
        let agg = AggregateResult::new(grid(4));
        assert_eq!(summarize(&agg).unwrap_err(), SimulationError::InsufficientData);
    }

    #[test]
    fn test_summary_counts_and_rates() {
        let agg = make_aggregate(4, &[1, 2, 3, 4], 10);
        let s = summarize(&agg).unwrap();
        assert_eq!(s.grid_size, 4);
        assert_eq!(s.trials, 20);
        assert_eq!(s.meetings, 10);
        assert_eq!(s.no_meetings, 10);
        assert!((s.meeting_rate - 0.5).abs() < 1e-12);
        assert!((s.no_meeting_rate - 0.5).abs() < 1e-12);
        assert!((s.theoretical_point_probability - 0.25).abs() < 1e-12);
        assert!((s.exact_meeting_probability - 20.0 / 64.0).abs() < 1e-12);

        let labels: Vec<&str> = s.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D"]);
        assert_eq!(s.points[3].position, Position::new(3, 0));

        let d = &s.points[3];
        assert_eq!(d.count, 4);
        assert!((d.empirical - 0.2).abs() < 1e-12);
        assert!((d.absolute_deviation - 0.05).abs() < 1e-12);
        assert!((d.relative_deviation - 0.2).abs() < 1e-12);
        assert!((d.exact - 1.0 / 64.0).abs() < 1e-12);
        assert!((d.exact_deviation - (0.2 - 1.0 / 64.0)).abs() < 1e-12);
        assert!((d.share_of_meetings - 0.4).abs() < 1e-12);
        assert!((d.standard_error - (0.2f64 * 0.8 / 20.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_summary_deviation_aggregates() {
        // N=2, baseline 0.5: empirical 0.25 and 0.5 → deviations 0.25 and 0.
        let agg = make_aggregate(2, &[1, 2], 1);
        let s = summarize(&agg).unwrap();
        assert!((s.mean_absolute_deviation - 0.125).abs() < 1e-12);
        assert!((s.max_absolute_deviation - 0.25).abs() < 1e-12);
        // Exact is 0.25 for both: deviations 0 and 0.25.
        assert!((s.mean_exact_deviation - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_no_meetings_share_is_zero() {
        let agg = make_aggregate(3, &[0, 0, 0], 5);
        let s = summarize(&agg).unwrap();
        assert_eq!(s.meetings, 0);
        assert!(s.points.iter().all(|p| p.share_of_meetings == 0.0));
        assert!((s.no_meeting_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let mut rng = SplitMix64::new(77);
        let agg = simulate_batch(grid(6), 5_000, &mut rng).unwrap();
        let s = summarize(&agg).unwrap();
        let share: f64 = s.points.iter().map(|p| p.share_of_meetings).sum();
        assert!((share - 1.0).abs() < 1e-9);
        let empirical: f64 = s.points.iter().map(|p| p.empirical).sum();
        assert!((empirical - s.meeting_rate).abs() < 1e-9);
    }

    #[test]
    fn test_summary_serializes() {
        let agg = make_aggregate(3, &[1, 1, 0], 4);
        let json = serde_json::to_value(summarize(&agg).unwrap()).unwrap();
        assert_eq!(json["trials"], 6);
        assert_eq!(json["points"][1]["label"], "B");
        assert_eq!(json["points"][1]["position"]["row"], 1);
        assert_eq!(json["points"].as_array().unwrap().len(), 3);
    }
}
