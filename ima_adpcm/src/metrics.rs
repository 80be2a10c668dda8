use std::{collections::BTreeMap, sync::Mutex, time::Duration};

/// Sink for decode timings. Shared by every worker of a decode call.
pub trait DecodeMetrics: Send + Sync {
    /// Records that `count` units of work under `label` took `elapsed` in total.
    fn record(&self, label: &'static str, elapsed: Duration, count: usize);
}

pub struct NoopMetrics;

impl DecodeMetrics for NoopMetrics {
    fn record(&self, _label: &'static str, _elapsed: Duration, _count: usize) {}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Timing {
    pub total: Duration,
    pub count: usize,
}

impl Timing {
    pub fn average(&self) -> Option<Duration> {
        let count = u32::try_from(self.count).ok().filter(|&x| x > 0)?;

        Some(self.total / count)
    }
}

/// Accumulates total time and unit count per label.
#[derive(Default)]
pub struct BenchMetrics {
    timings: Mutex<BTreeMap<&'static str, Timing>>,
}

impl BenchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timing(&self, label: &str) -> Option<Timing> {
        self.lock().get(label).copied()
    }

    /// Snapshot of every label recorded so far, ordered by label.
    pub fn timings(&self) -> Vec<(&'static str, Timing)> {
        self.lock().iter().map(|(&label, &timing)| (label, timing)).collect()
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<&'static str, Timing>> {
        // timings stay readable after a worker panicked mid-decode
        self.timings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DecodeMetrics for BenchMetrics {
    fn record(&self, label: &'static str, elapsed: Duration, count: usize) {
        let mut timings = self.lock();
        let timing = timings.entry(label).or_default();

        timing.total += elapsed;
        timing.count += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_accumulates() {
        let metrics = BenchMetrics::new();
        metrics.record("block", Duration::from_millis(30), 3);
        metrics.record("block", Duration::from_millis(10), 1);
        metrics.record("decode", Duration::from_millis(50), 1);

        let block = metrics.timing("block").unwrap();
        assert_eq!(block.total, Duration::from_millis(40));
        assert_eq!(block.count, 4);
        assert_eq!(block.average(), Some(Duration::from_millis(10)));

        assert_eq!(metrics.timings().iter().map(|x| x.0).collect::<Vec<_>>(), ["block", "decode"]);

        metrics.reset();
        assert_eq!(metrics.timing("block"), None);
    }

    #[test]
    fn test_average_of_nothing() {
        assert_eq!(Timing::default().average(), None);
    }
}
