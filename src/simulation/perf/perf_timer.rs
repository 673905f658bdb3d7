use web_time::Instant;

/// Stopwatch for one frame phase. `web_time` maps to `performance.now()` in
/// the browser and to `std::time::Instant` everywhere else.
#[derive(Clone, Copy)]
pub(crate) struct PerfTimer(Instant);

impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer(Instant::now())
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}
