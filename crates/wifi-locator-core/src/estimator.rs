//! Position estimation by RSSI fingerprint voting.
//!
//! Every observed access point that appears in the [`FingerprintStore`]
//! votes for the locations where it was surveyed. The closer the observed
//! RSSI is to the surveyed RSSI, the larger the vote:
//!
//! ```text
//! diff  = |rssi_observed - rssi_reference|
//! score = 100 / (1 + diff)          (only when diff < max_diff_db)
//! ```
//!
//! Scores are summed per location and the location with the largest total
//! wins. Confidence measures how far the winner is ahead of the runner-up:
//!
//! ```text
//! confidence = 100 * best / (best + second)
//! ```
//!
//! Independently of the threshold, each matched access point also casts one
//! *primary vote* for the location with the smallest `diff`. Primary votes do
//! not affect the ranking; they are reported for diagnostics. Because a
//! primary vote creates the location's tally even when every `diff` is over
//! the threshold, a location can be ranked with a zero score. This is
//! intentional and affects the single-location confidence rule.
//!
//! The estimator is a pure, synchronous function of its inputs. Apart from
//! `tracing` diagnostics it performs no I/O and never fails.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::access_point::{AccessPointId, LocationId, ObservationSet};
use crate::domain::coordinates::CoordinateTable;
use crate::domain::fingerprint::{FingerprintStore, ReferenceReading};
use crate::domain::result::EstimationResult;

/// Number of ranked locations written to the log.
const LOGGED_RANKING: usize = 5;

/// Tuning constants of the voting heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// RSSI differences at or above this many dB contribute no score.
    pub max_diff_db: u32,
    /// Confidence reported when only one location received a tally.
    pub single_location_confidence: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_diff_db: 30,
            single_location_confidence: 80.0,
        }
    }
}

/// One scoring contribution of an access point to a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacVote {
    pub access_point_id: AccessPointId,
    pub network_name: String,
    pub observed_dbm: i32,
    pub reference_dbm: i32,
    pub diff: u32,
    pub score: f64,
}

/// Accumulated evidence for one candidate location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationTally {
    pub location_id: LocationId,
    /// Sum of all vote scores.
    pub score: f64,
    /// Number of access points whose closest reference is this location.
    pub primary_votes: u32,
    /// Individual contributions under the diff threshold.
    pub votes: Vec<MacVote>,
}

impl LocationTally {
    fn new(location_id: LocationId) -> Self {
        Self {
            location_id,
            score: 0.0,
            primary_votes: 0,
            votes: Vec::new(),
        }
    }
}

/// Full outcome of one estimation, including the ranking behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationReport {
    pub result: EstimationResult,
    /// All tallied locations, best first.
    pub ranking: Vec<LocationTally>,
    /// Observations whose access point is in the store.
    pub matched: usize,
    /// Observations whose access point is unknown to the store.
    pub unmatched: usize,
}

/// Insertion-ordered per-location accumulator.
///
/// Tallies are created with zero defaults on first touch. The creation order
/// is kept because it breaks ties in the final ranking.
#[derive(Default)]
struct Tallies {
    order: Vec<LocationTally>,
    index: HashMap<LocationId, usize>,
}

impl Tallies {
    fn entry(&mut self, location: &LocationId) -> &mut LocationTally {
        let idx = match self.index.get(location) {
            Some(&idx) => idx,
            None => {
                let idx = self.order.len();
                self.order.push(LocationTally::new(location.clone()));
                self.index.insert(location.clone(), idx);
                idx
            }
        };
        &mut self.order[idx]
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn into_ranking(self) -> Vec<LocationTally> {
        let mut ranking = self.order;
        // `sort_by` is stable: equal scores keep creation order.
        ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranking
    }
}

/// Fingerprint-voting position estimator.
#[derive(Debug, Clone, Default)]
pub struct PositionEstimator {
    config: EstimatorConfig,
}

impl PositionEstimator {
    /// Create an estimator with the default heuristic constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the location of the device that produced `scan`.
    #[must_use]
    pub fn estimate(
        &self,
        scan: &ObservationSet,
        store: &FingerprintStore,
        coords: &CoordinateTable,
    ) -> EstimationResult {
        self.estimate_detailed(scan, store, coords).result
    }

    /// Estimate the location and return the ranking that produced it.
    #[must_use]
    pub fn estimate_detailed(
        &self,
        scan: &ObservationSet,
        store: &FingerprintStore,
        coords: &CoordinateTable,
    ) -> EstimationReport {
        let mut tallies = Tallies::default();
        let mut matched = 0usize;
        let mut unmatched = 0usize;

        for obs in &scan.observations {
            let Some(readings) = store.readings(&obs.access_point_id) else {
                debug!(mac = %obs.access_point_id, ssid = %obs.network_name, "unknown access point");
                unmatched += 1;
                continue;
            };
            matched += 1;

            let candidates = rank_candidates(obs.signal_strength_dbm, readings);
            for (reading, diff) in &candidates {
                debug!(
                    mac = %obs.access_point_id,
                    location = %reading.location_id,
                    observed = obs.signal_strength_dbm,
                    reference = reading.signal_strength_dbm,
                    diff,
                    "candidate"
                );
                if *diff < self.config.max_diff_db {
                    let score = 100.0 / (1.0 + f64::from(*diff));
                    let tally = tallies.entry(&reading.location_id);
                    tally.score += score;
                    tally.votes.push(MacVote {
                        access_point_id: obs.access_point_id.clone(),
                        network_name: obs.network_name.clone(),
                        observed_dbm: obs.signal_strength_dbm,
                        reference_dbm: reading.signal_strength_dbm,
                        diff: *diff,
                        score,
                    });
                }
            }

            // `readings` is never empty, so there is always a closest location.
            if let Some((closest, diff)) = candidates.first() {
                tallies.entry(&closest.location_id).primary_votes += 1;
                debug!(mac = %obs.access_point_id, location = %closest.location_id, diff, "primary vote");
            }
        }

        if tallies.is_empty() {
            info!(device = %scan.device_id, unmatched, "no access point matched the fingerprint store");
            return EstimationReport {
                result: EstimationResult::unknown(coords.unknown()),
                ranking: Vec::new(),
                matched,
                unmatched,
            };
        }

        let ranking = tallies.into_ranking();
        for tally in ranking.iter().take(LOGGED_RANKING) {
            info!(
                device = %scan.device_id,
                location = %tally.location_id,
                score = tally.score,
                primary_votes = tally.primary_votes,
                "ranking"
            );
        }

        let best = &ranking[0];
        let confidence = match ranking.get(1) {
            Some(second) => ratio_confidence(best.score, second.score),
            None => self.config.single_location_confidence,
        };
        let result = EstimationResult::new(
            best.location_id.clone(),
            round_one_decimal(confidence.clamp(0.0, 100.0)),
            coords.resolve(best.location_id.as_str()),
        );

        debug!(
            location = %result.location_id,
            confidence = result.confidence,
            score = best.score,
            primary_votes = best.primary_votes,
            matched,
            "estimated position"
        );

        EstimationReport {
            result,
            ranking,
            matched,
            unmatched,
        }
    }
}

/// Estimate with the default configuration.
#[must_use]
pub fn estimate(
    scan: &ObservationSet,
    store: &FingerprintStore,
    coords: &CoordinateTable,
) -> EstimationResult {
    PositionEstimator::new().estimate(scan, store, coords)
}

/// Pair each reading with its RSSI difference, closest first.
///
/// The sort is stable, so equal differences keep registration order.
fn rank_candidates(observed_dbm: i32, readings: &[ReferenceReading]) -> Vec<(&ReferenceReading, u32)> {
    let mut candidates: Vec<(&ReferenceReading, u32)> = readings
        .iter()
        .map(|r| (r, observed_dbm.abs_diff(r.signal_strength_dbm)))
        .collect();
    candidates.sort_by_key(|&(_, diff)| diff);
    candidates
}

/// `100 * best / (best + second)`, capped at 100; 0 when both are zero.
fn ratio_confidence(best: f64, second: f64) -> f64 {
    let total = best + second;
    if total > 0.0 {
        (best / total * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// Round to one decimal, ties to even on the exact decimal expansion.
///
/// `{:.1}` formatting rounds the exact binary value and settles exact ties
/// to the even digit, so `56.25` becomes `56.2`.
fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Observation};
    use approx::assert_abs_diff_eq;

    const AP: &str = "AA:AA:AA:AA:AA:AA";

    fn store(rows: &[(&str, &str, i32)]) -> FingerprintStore {
        let mut builder = FingerprintStore::builder();
        for &(mac, location, rssi) in rows {
            builder.insert(AccessPointId::new(mac), ReferenceReading::new(location, rssi, "net"));
        }
        builder.build()
    }

    fn scan(obs: &[(&str, i32)]) -> ObservationSet {
        ObservationSet::new(
            "dev",
            0,
            obs.iter()
                .map(|&(mac, rssi)| Observation::new("net", mac, rssi, 6))
                .collect(),
        )
    }

    fn coords() -> CoordinateTable {
        [
            (LocationId::new("LOC1"), Coordinates::new(1.0, 1.0)),
            (LocationId::new("LOC2"), Coordinates::new(2.0, 2.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn candidates_sorted_stably_by_diff() {
        let readings = vec![
            ReferenceReading::new("A", -70, ""),
            ReferenceReading::new("B", -50, ""),
            ReferenceReading::new("C", -50, ""),
        ];
        let ranked: Vec<(&str, u32)> = rank_candidates(-55, &readings)
            .into_iter()
            .map(|(r, d)| (r.location_id.as_str(), d))
            .collect();
        assert_eq!(ranked, vec![("B", 5), ("C", 5), ("A", 15)]);
    }

    #[test]
    fn ratio_confidence_handles_zero_scores() {
        assert_eq!(ratio_confidence(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(ratio_confidence(50.0, 20.0), 71.428_571, epsilon = 1e-5);
        assert_eq!(ratio_confidence(10.0, 0.0), 100.0);
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(round_one_decimal(71.428_571), 71.4);
        assert_eq!(round_one_decimal(33.36), 33.4);
        assert_eq!(round_one_decimal(80.0), 80.0);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round_one_decimal(56.25), 56.2);
        assert_eq!(round_one_decimal(56.75), 56.8);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(12.35), 12.3);
    }

    #[test]
    fn primary_vote_goes_to_closest_location() {
        let store = store(&[(AP, "LOC1", -60), (AP, "LOC2", -65)]);
        let report = PositionEstimator::new().estimate_detailed(&scan(&[(AP, -61)]), &store, &coords());

        let loc1 = report.ranking.iter().find(|t| t.location_id.as_str() == "LOC1").unwrap();
        let loc2 = report.ranking.iter().find(|t| t.location_id.as_str() == "LOC2").unwrap();
        assert_eq!(loc1.primary_votes, 1);
        assert_eq!(loc2.primary_votes, 0);
        assert_eq!(loc2.votes.len(), 1);
        assert_eq!(loc2.votes[0].diff, 4);
    }

    #[test]
    fn over_threshold_keeps_primary_vote_without_score() {
        let store = store(&[(AP, "LOC1", -60)]);
        let report = PositionEstimator::new().estimate_detailed(&scan(&[(AP, -15)]), &store, &coords());

        assert_eq!(report.matched, 1);
        assert_eq!(report.ranking.len(), 1);
        let tally = &report.ranking[0];
        assert_eq!(tally.score, 0.0);
        assert!(tally.votes.is_empty());
        assert_eq!(tally.primary_votes, 1);
        assert_eq!(report.result.confidence, 80.0);
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let estimator = PositionEstimator::with_config(EstimatorConfig {
            max_diff_db: 5,
            ..EstimatorConfig::default()
        });
        let store = store(&[(AP, "LOC1", -60), (AP, "LOC2", -70)]);
        let report = estimator.estimate_detailed(&scan(&[(AP, -62)]), &store, &coords());

        // LOC2 (diff 8) only gets a tally when it is the closest location.
        assert_eq!(report.ranking.len(), 1);
        assert_eq!(report.ranking[0].location_id.as_str(), "LOC1");
    }

    #[test]
    fn unmatched_observations_are_counted() {
        let store = store(&[(AP, "LOC1", -60)]);
        let report = PositionEstimator::new().estimate_detailed(
            &scan(&[(AP, -60), ("BB:BB:BB:BB:BB:BB", -40)]),
            &store,
            &coords(),
        );
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, 1);
    }

    #[test]
    fn ranking_is_logged_at_info() {
        use std::io;
        use std::sync::Arc;

        use parking_lot::Mutex;
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Captured {
            type Writer = Captured;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(captured.clone())
            .finish();

        let store = store(&[(AP, "LOC1", -60), (AP, "LOC2", -65)]);
        tracing::subscriber::with_default(subscriber, || {
            PositionEstimator::new().estimate(&scan(&[(AP, -61)]), &store, &coords());
        });

        let output = String::from_utf8_lossy(&captured.0.lock()).into_owned();
        assert!(output.contains("ranking"), "{output}");
        assert!(output.contains("LOC1"), "{output}");
        assert!(output.contains("LOC2"), "{output}");
        assert!(!output.contains("candidate"), "{output}");
    }
}
