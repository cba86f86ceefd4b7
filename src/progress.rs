//! Progress reporting for long-running generators
//!
//! Progress sinks only observe a run; they never touch the random source, so
//! swapping one sink for another cannot change generated values.

/// Receiver of progress updates
pub trait Progress {
    /// Called once before the first step
    fn begin(&mut self, _label: &str, _total: usize) {}

    /// Called after each completed step with the number of steps done so far
    fn advance(&mut self, _done: usize) {}

    /// Called once after the last step
    fn finish(&mut self) {}
}

/// Discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {}

/// Emits a `tracing` event at every 10% of the run
#[derive(Debug, Clone, Default)]
pub struct LogProgress {
    label: String,
    total: usize,
    next_decile: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn threshold(&self) -> usize {
        // ceil(total * decile / 10)
        (self.total * self.next_decile).div_ceil(10)
    }
}

impl Progress for LogProgress {
    fn begin(&mut self, label: &str, total: usize) {
        self.label = label.to_owned();
        self.total = total;
        self.next_decile = 1;
        tracing::info!(label, total, "started");
    }

    fn advance(&mut self, done: usize) {
        while self.next_decile <= 10 && done >= self.threshold() {
            tracing::info!(
                label = %self.label,
                done,
                total = self.total,
                "{}% complete",
                self.next_decile * 10
            );
            self.next_decile += 1;
        }
    }

    fn finish(&mut self) {
        tracing::info!(label = %self.label, total = self.total, "finished");
    }
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn begin(&mut self, label: &str, total: usize) {
        (**self).begin(label, total)
    }

    fn advance(&mut self, done: usize) {
        (**self).advance(done)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}
