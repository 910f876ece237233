// Pipeline stage boundaries and observers for timing them

use std::fmt::Write as _;
use std::time::Duration;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Discover,
    Extract,
    Graph,
    Insights,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Discover => "discover",
            Stage::Extract => "extract",
            Stage::Graph => "graph",
            Stage::Insights => "insights",
        }
    }
}

/// Hook called around each stage boundary
pub trait StageObserver {
    fn stage_started(&mut self, _stage: Stage) {}

    fn stage_finished(&mut self, stage: Stage, elapsed: Duration);
}

/// Default observer: stage timings go to the debug log
#[derive(Debug, Default)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn stage_finished(&mut self, stage: Stage, elapsed: Duration) {
        tracing::debug!("Stage {} finished in {:?}", stage.as_str(), elapsed);
    }
}

/// Collects stage timings for `--profile`
#[derive(Debug, Default)]
pub struct TimingCollector {
    timings: Vec<(Stage, Duration)>,
}

impl TimingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timings(&self) -> &[(Stage, Duration)] {
        &self.timings
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    /// Human-readable timing table
    pub fn report(&self) -> String {
        let mut out = String::from("Stage timings:\n");
        for (stage, elapsed) in &self.timings {
            let _ = writeln!(
                out,
                "  {:<10} {:>10.2} ms",
                stage.as_str(),
                elapsed.as_secs_f64() * 1000.0
            );
        }
        let _ = writeln!(
            out,
            "  {:<10} {:>10.2} ms",
            "total",
            self.total().as_secs_f64() * 1000.0
        );
        out
    }
}

impl StageObserver for TimingCollector {
    fn stage_finished(&mut self, stage: Stage, elapsed: Duration) {
        tracing::debug!("Stage {} finished in {:?}", stage.as_str(), elapsed);
        self.timings.push((stage, elapsed));
    }
}
