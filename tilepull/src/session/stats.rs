//! Progress accounting for a download session.

use crate::fetch::FetchResult;
use std::time::Instant;

/// How often a progress line is emitted, in completed results.
pub const PROGRESS_EVERY: u64 = 100;

/// Running statistics for one download session.
///
/// Owned exclusively by the session; updated only from the single
/// result-collection loop, so no synchronization is needed.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// Number of tiles the run will attempt.
    pub total_tiles: u64,
    /// Results tallied so far.
    pub completed: u64,
    /// Results that were not `Failed` (downloads plus overwrite-skips).
    pub succeeded: u64,
    started_at: Instant,
}

impl RunStatistics {
    /// Creates statistics for a run over `total_tiles` tiles.
    pub fn new(total_tiles: u64) -> Self {
        Self {
            total_tiles,
            completed: 0,
            succeeded: 0,
            started_at: Instant::now(),
        }
    }

    /// Tallies one fetch result.
    pub fn record(&mut self, result: &FetchResult) {
        self.completed += 1;
        if result.is_success() {
            self.succeeded += 1;
        }
    }

    /// Cumulative success rate over completed results (0.0 when nothing
    /// has completed yet).
    pub fn success_rate(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.completed as f64
        }
    }

    /// Completed results per second since the run started.
    pub fn tiles_per_second(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.completed as f64 / elapsed
        } else {
            0.0
        }
    }

    /// True when the latest recorded result is a progress-report point:
    /// the first result and every hundredth after it.
    pub fn at_report_point(&self) -> bool {
        self.completed > 0 && (self.completed - 1) % PROGRESS_EVERY == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;
    use crate::fetch::FetchResult;

    fn failed() -> FetchResult {
        FetchResult::failed(TileCoord::new(0, 0, 0))
    }

    #[test]
    fn test_record_counts_failures() {
        let mut stats = RunStatistics::new(10);
        stats.record(&failed());
        stats.record(&failed());

        assert_eq!(stats.completed, 2);
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_success_rate_empty() {
        let stats = RunStatistics::new(10);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_report_points() {
        let mut stats = RunStatistics::new(500);
        let mut report_points = Vec::new();
        for i in 1..=305u64 {
            stats.record(&failed());
            if stats.at_report_point() {
                report_points.push(i);
            }
        }
        assert_eq!(report_points, vec![1, 101, 201, 301]);
    }

    #[test]
    fn test_single_report_point_for_short_run() {
        // A five-tile run reports exactly once, on the first result.
        let mut stats = RunStatistics::new(5);
        let mut reports = 0;
        for _ in 0..5 {
            stats.record(&failed());
            if stats.at_report_point() {
                reports += 1;
            }
        }
        assert_eq!(reports, 1);
    }
}
