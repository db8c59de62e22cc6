//! Picking the reference series closest to an incomplete series
//!
//! Two strategies are available, chosen once per run:
//! - Quantile: smallest cosine distance between quantile profiles of the
//!   known prefix and of each reference.
//! - Correlation: highest Pearson correlation between the known prefix and
//!   each reference over their aligned leading points.
//!
//! Ties go to the reference that comes first in the library.

use crate::data::{numeric_values, Cell};
use crate::error::{FillError, Result};
use crate::horizon::{horizon, known_values};
use crate::library::ReferenceLibrary;
use crate::profile::{ProfileVector, QuantileProfiler};
use serde::{Deserialize, Serialize};
use series_math::similarity::{cosine_distance, pearson};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Run-wide choice of similarity strategy
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Cosine distance between quantile profiles
    #[default]
    Quantile,
    /// Pearson correlation over the known prefix
    Correlation,
}

impl MatchStrategy {
    /// Lowercase name, also used for output directories
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Quantile => "quantile",
            MatchStrategy::Correlation => "correlation",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = FillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quantile" => Ok(MatchStrategy::Quantile),
            "correlation" => Ok(MatchStrategy::Correlation),
            other => Err(FillError::Config(format!(
                "Unknown strategy '{}', expected 'quantile' or 'correlation'",
                other
            ))),
        }
    }
}

/// The chosen reference for one input series
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Name of the matched reference series
    pub reference: String,
    /// Cosine distance or correlation coefficient, depending on the strategy
    pub score: f64,
}

/// Nearest reference by cosine distance between quantile profiles
#[derive(Debug, Clone)]
pub struct QuantileMatcher {
    library: Arc<ReferenceLibrary>,
    profiler: QuantileProfiler,
    profiles: Vec<ProfileVector>,
}

impl QuantileMatcher {
    /// Create a matcher, profiling every reference once
    pub fn new(library: Arc<ReferenceLibrary>, profiler: QuantileProfiler) -> Result<Self> {
        if library.is_empty() {
            return Err(FillError::EmptyLibrary);
        }

        let profiles = library
            .iter()
            .map(|reference| profiler.profile(reference.values()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            library,
            profiler,
            profiles,
        })
    }

    /// Get the profiler
    pub fn profiler(&self) -> &QuantileProfiler {
        &self.profiler
    }

    /// Find the reference whose profile is nearest to the known prefix of `cells`
    pub fn best_match(&self, cells: &[Cell]) -> Result<MatchResult> {
        let known = known_values(cells)?;
        let profile = self.profiler.profile(&known)?;

        let mut best: Option<MatchResult> = None;
        for (reference, reference_profile) in self.library.iter().zip(&self.profiles) {
            let distance = match cosine_distance(profile.as_slice(), reference_profile.as_slice()) {
                Ok(distance) => distance,
                Err(e) => {
                    debug!(reference = reference.name(), error = %e, "reference not comparable");
                    continue;
                }
            };

            if best.as_ref().map_or(true, |b| distance < b.score) {
                best = Some(MatchResult {
                    reference: reference.name().to_string(),
                    score: distance,
                });
            }
        }

        best.ok_or_else(|| {
            FillError::InvalidInput("Cosine distance is undefined for every reference".to_string())
        })
    }
}

/// Reference with the highest Pearson correlation over the aligned prefix
#[derive(Debug, Clone)]
pub struct CorrelationMatcher {
    library: Arc<ReferenceLibrary>,
}

impl CorrelationMatcher {
    /// Create a matcher over a non-empty library
    pub fn new(library: Arc<ReferenceLibrary>) -> Result<Self> {
        if library.is_empty() {
            return Err(FillError::EmptyLibrary);
        }
        Ok(Self { library })
    }

    /// Number of leading points compared for an input with `known_len` known values.
    ///
    /// A longer library is cut to the known prefix; a shorter one cuts the prefix.
    pub fn aligned_len(&self, known_len: usize) -> usize {
        known_len.min(self.library.height())
    }

    /// Find the reference most correlated with the known prefix of `cells`
    pub fn best_match(&self, cells: &[Cell]) -> Result<MatchResult> {
        let known_len = cells.len() - horizon(cells);
        let aligned = self.aligned_len(known_len);
        if aligned < 2 {
            return Err(FillError::InsufficientOverlap { aligned });
        }

        let input = numeric_values(&cells[..aligned])?;

        let mut best: Option<MatchResult> = None;
        for reference in self.library.iter() {
            let coefficient = match pearson(&input, &reference.values()[..aligned]) {
                Ok(coefficient) => coefficient,
                Err(e) => {
                    debug!(reference = reference.name(), error = %e, "correlation undefined");
                    continue;
                }
            };

            if best.as_ref().map_or(true, |b| coefficient > b.score) {
                best = Some(MatchResult {
                    reference: reference.name().to_string(),
                    score: coefficient,
                });
            }
        }

        best.ok_or_else(|| {
            FillError::InvalidInput("Correlation is undefined for every reference".to_string())
        })
    }
}

/// The active matching strategy for a run
#[derive(Debug, Clone)]
pub enum Matcher {
    Quantile(QuantileMatcher),
    Correlation(CorrelationMatcher),
}

impl Matcher {
    /// Build the matcher for `strategy`
    pub fn new(
        strategy: MatchStrategy,
        library: Arc<ReferenceLibrary>,
        profiler: QuantileProfiler,
    ) -> Result<Self> {
        Ok(match strategy {
            MatchStrategy::Quantile => Matcher::Quantile(QuantileMatcher::new(library, profiler)?),
            MatchStrategy::Correlation => Matcher::Correlation(CorrelationMatcher::new(library)?),
        })
    }

    /// The strategy this matcher implements
    pub fn strategy(&self) -> MatchStrategy {
        match self {
            Matcher::Quantile(_) => MatchStrategy::Quantile,
            Matcher::Correlation(_) => MatchStrategy::Correlation,
        }
    }

    /// Pick the reference for an input series
    pub fn best_match(&self, cells: &[Cell]) -> Result<MatchResult> {
        match self {
            Matcher::Quantile(matcher) => matcher.best_match(cells),
            Matcher::Correlation(matcher) => matcher.best_match(cells),
        }
    }
}
