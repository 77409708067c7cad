/// Per-view tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickMetrics {
    rendered: usize,
    aborted: usize,
}

impl TickMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_rendered(&mut self) {
        self.rendered += 1;
    }

    pub fn record_aborted(&mut self) {
        self.aborted += 1;
    }

    /// `(rendered, aborted)`
    pub fn snapshot(&self) -> (usize, usize) {
        (self.rendered, self.aborted)
    }

    pub fn ticks(&self) -> usize {
        self.rendered + self.aborted
    }
}
