use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulated wall time and entry count of one profiled stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct StageTiming {
    pub total: Duration,
    pub calls: u32,
}

impl StageTiming {
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls
        }
    }
}

/// Scoped profiler keyed by stage name (`frame`, `quadtree_build`, ...).
#[derive(Default)]
pub struct Profiler {
    pub stages: HashMap<&'static str, StageTiming>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let stage = self.stages.entry(name).or_default();
        stage.total += elapsed;
        stage.calls += 1;
    }

    /// Stages ordered by total time, slowest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, StageTiming)> {
        let mut v: Vec<_> = self.stages.iter().map(|(n, t)| (*n, *t)).collect();
        v.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        v
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (name, t) in self.report_sorted() {
            log::info!("{:<16} total {:>10.3?}  mean {:>10.3?}  calls {}", name, t.total, t.mean(), t.calls);
        }
        self.clear();
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. The guard reports to the global profiler when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard { name, start: Instant::now() }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().record(self.name, self.start.elapsed());
    }
}

/// Profile the enclosing scope, only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
