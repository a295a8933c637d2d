use std::collections::HashMap;
use std::time::Instant;

/// Observer for simulation session events.
///
/// Decouples the session loop from where its output goes (log crate, a UI,
/// nowhere) so each caller can watch throughput without touching the loop.
pub trait SessionLogger: Send {
    /// Report frame-level progress. `total` is 0 when the source length is unknown.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. queue depth).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running totals for one stage or metric. Constant size however long the
/// session runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl SampleStats {
    fn record(&mut self, value: f64) {
        if self.count == 0 || value > self.max {
            self.max = value;
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count.max(1) as f64
    }
}

/// Logger that keeps per-stage timing and per-metric aggregates and reports
/// them through the `log` crate when the session ends.
///
/// Progress lines are throttled to every `throttle_frames` frames.
pub struct AggregatingSessionLogger {
    throttle_frames: usize,
    timings: HashMap<String, SampleStats>,
    metrics: HashMap<String, SampleStats>,
    started: Instant,
    frames_seen: usize,
}

impl AggregatingSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            started: Instant::now(),
            frames_seen: 0,
        }
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    pub fn timing_stats(&self, stage: &str) -> Option<SampleStats> {
        self.timings.get(stage).copied()
    }

    pub fn metric_stats(&self, name: &str) -> Option<SampleStats> {
        self.metrics.get(name).copied()
    }

    /// Formatted end-of-session report, or `None` when nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.started.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({} frames, {elapsed_s:.1}s total):",
            self.frames_seen
        )];

        for (stage, stats) in sorted(&self.timings) {
            lines.push(format!(
                "  {stage:12}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.max,
                stats.sum
            ));
        }
        for (name, stats) in sorted(&self.metrics) {
            lines.push(format!("  {name}: avg {:.1}  max {:.0}", stats.mean(), stats.max));
        }

        if self.frames_seen > 0 && elapsed_s > 0.0 {
            let fps = self.frames_seen as f64 / elapsed_s;
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

fn sorted(map: &HashMap<String, SampleStats>) -> Vec<(&String, &SampleStats)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

impl Default for AggregatingSessionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl SessionLogger for AggregatingSessionLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        let at_end = total > 0 && current == total;
        if current % self.throttle_frames != 0 && !at_end {
            return;
        }
        if total > 0 {
            log::info!("Processed {current}/{total} frames");
        } else {
            log::info!("Processed {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_owned())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_owned()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullSessionLogger;
        logger.progress(1, 10);
        logger.timing("transform", 5.0);
        logger.metric("queue_depth", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_keeps_count_sum_and_max() {
        let mut logger = AggregatingSessionLogger::new(10);
        logger.timing("transform", 20.0);
        logger.timing("transform", 30.0);
        logger.timing("transform", 10.0);

        let stats = logger.timing_stats("transform").unwrap();
        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.sum, 60.0);
        assert_relative_eq!(stats.max, 30.0);
        assert_relative_eq!(stats.mean(), 20.0);
        assert!(logger.timing_stats("write").is_none());
    }

    #[test]
    fn test_hour_long_live_session_keeps_one_entry_per_stage() {
        let mut logger = AggregatingSessionLogger::new(1_000);
        let frames = 30 * 60 * 60;
        for i in 1..=frames {
            logger.progress(i, 0);
            logger.timing("transform", 2.0);
            logger.metric("queue_depth", (i % 8) as f64);
        }

        assert_eq!(logger.timings.len(), 1);
        assert_eq!(logger.metrics.len(), 1);
        assert_eq!(logger.frames_seen(), frames);
        let stats = logger.timing_stats("transform").unwrap();
        assert_eq!(stats.count, frames);
        assert_relative_eq!(stats.mean(), 2.0);
        assert_relative_eq!(logger.metric_stats("queue_depth").unwrap().max, 7.0);
    }

    #[test]
    fn test_negative_samples_still_track_max() {
        let mut stats = SampleStats::default();
        stats.record(-3.0);
        stats.record(-1.0);
        assert_relative_eq!(stats.max, -1.0);
    }

    #[test]
    fn test_summary_lists_stages_metrics_and_fps() {
        let mut logger = AggregatingSessionLogger::new(10);
        logger.progress(4, 4);
        logger.timing("transform", 12.0);
        logger.metric("queue_depth", 3.0);
        logger.metric("queue_depth", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Session summary (4 frames"));
        assert!(summary.contains("transform"));
        assert!(summary.contains("queue_depth: avg 3.5  max 4"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = AggregatingSessionLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_throttle_has_floor_of_one() {
        let logger = AggregatingSessionLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
        assert_eq!(AggregatingSessionLogger::default().throttle_frames, 30);
    }
}
