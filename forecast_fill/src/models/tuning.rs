//! Time-boxed parameter search for pipelines

use crate::error::Result;
use crate::metrics::Loss;
use crate::models::Pipeline;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Seed for the candidate order, so tuning is reproducible
pub const TUNING_SEED: u64 = 42;

/// Result of a tuning run
#[derive(Debug, Clone, PartialEq)]
pub struct TuningOutcome {
    /// Best configuration found
    pub best: Pipeline,
    /// Its in-sample loss, if any configuration could be scored
    pub score: Option<f64>,
    /// Number of configurations scored
    pub evaluated: usize,
}

/// Loss of one-step-ahead predictions over `series[score_from..]`.
///
/// Each point is predicted from the points before it only.
pub fn one_step_score(
    pipeline: &Pipeline,
    series: &[f64],
    score_from: usize,
    loss: Loss,
) -> Result<f64> {
    let mut node = pipeline.build()?;
    let mut forecast = Vec::with_capacity(series.len().saturating_sub(score_from));
    let mut actual = Vec::with_capacity(forecast.capacity());

    for (t, &value) in series.iter().enumerate() {
        if t >= score_from && node.is_ready() {
            forecast.push(node.forecast(1)?);
            actual.push(value);
        }
        node.update(value)?;
    }

    loss.evaluate(&forecast, &actual)
}

/// Search the parameter grid of `start` for the lowest one-step loss.
///
/// `start` is always scored; the remaining candidates are visited in a
/// seeded shuffled order until the grid is exhausted or `budget` elapses.
/// Every configuration is scored over the same trailing points.
pub fn tune(start: &Pipeline, series: &[f64], loss: Loss, budget: Duration) -> Result<TuningOutcome> {
    let deadline = Instant::now().checked_add(budget);

    let mut candidates = start.candidates();
    candidates.shuffle(&mut StdRng::seed_from_u64(TUNING_SEED));

    let pool: Vec<Pipeline> = std::iter::once(start.clone())
        .chain(candidates.into_iter().filter(|c| c != start))
        .filter(|c| c.min_observations() < series.len())
        .collect();

    let Some(score_from) = pool.iter().map(Pipeline::min_observations).max() else {
        return Ok(TuningOutcome {
            best: start.clone(),
            score: None,
            evaluated: 0,
        });
    };

    let mut best: Option<(Pipeline, f64)> = None;
    let mut evaluated = 0;
    for candidate in pool {
        let out_of_time = deadline.map_or(false, |d| Instant::now() >= d);
        if evaluated > 0 && out_of_time {
            break;
        }

        let score = one_step_score(&candidate, series, score_from, loss)?;
        evaluated += 1;
        if best.as_ref().map_or(true, |(_, b)| score < *b) {
            best = Some((candidate, score));
        }
    }

    Ok(match best {
        Some((pipeline, score)) => TuningOutcome {
            best: pipeline,
            score: Some(score),
            evaluated,
        },
        None => TuningOutcome {
            best: start.clone(),
            score: None,
            evaluated,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_one_step_score() {
        let series = [1.0, 2.0, 4.0];
        // predictions 1, 2 against 2, 4
        let mae = one_step_score(&Pipeline::Naive, &series, 1, Loss::Mae).unwrap();
        assert!((mae - 1.5).abs() < 1e-12);
        let mse = one_step_score(&Pipeline::Naive, &series, 1, Loss::Mse).unwrap();
        assert!((mse - 2.5).abs() < 1e-12);
    }

    #[test]
    fn too_short_series_keeps_start() {
        let start = Pipeline::MovingAverage { window: 3 };
        let outcome = tune(&start, &[1.0], Loss::Mae, Duration::from_secs(1)).unwrap();
        assert_eq!(outcome.best, start);
        assert_eq!(outcome.score, None);
        assert_eq!(outcome.evaluated, 0);
    }
}
