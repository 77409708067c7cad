use crate::prelude::{FrameSource, RenderSurface, TraceError};
use crate::telemetry::{TickLogger, TickMetrics};

/// Result of one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A new frame replaced the previous one.
    Rendered,
    /// Frame assembly failed; the surface still shows the last good frame.
    Retained(TraceError),
}

impl TickOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, TickOutcome::Rendered)
    }
}

/// Owns a drawing surface and feeds it one frame per tick.
#[derive(Debug)]
pub struct RenderContext<S> {
    surface: S,
    logger: TickLogger,
    metrics: TickMetrics,
}

impl<S> RenderContext<S> {
    pub fn new(surface: S, view: impl Into<String>, warn_after: usize) -> Self {
        Self {
            surface,
            logger: TickLogger::new(view, warn_after),
            metrics: TickMetrics::new(),
        }
    }

    /// Assembles a frame and, only if that succeeds, clears and redraws.
    pub fn tick<P>(&mut self, source: &P) -> TickOutcome
    where
        P: FrameSource,
        S: RenderSurface<P::Frame>,
    {
        match source.produce_frame() {
            Ok(frame) => {
                self.surface.clear();
                self.surface.draw(frame);
                self.metrics.record_rendered();
                self.logger.record_success();
                TickOutcome::Rendered
            }
            Err(err) => {
                self.metrics.record_aborted();
                self.logger.record_failure(&err);
                TickOutcome::Retained(err)
            }
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn metrics(&self) -> TickMetrics {
        self.metrics
    }

    pub fn view(&self) -> &str {
        self.logger.view()
    }

    pub fn consecutive_failures(&self) -> usize {
        self.logger.consecutive_failures()
    }
}

/// Surface that keeps only the most recent frame, for views that redraw from state.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestFrame<F> {
    frame: Option<F>,
    clears: usize,
}

impl<F> LatestFrame<F> {
    pub fn new() -> Self {
        Self {
            frame: None,
            clears: 0,
        }
    }

    pub fn frame(&self) -> Option<&F> {
        self.frame.as_ref()
    }

    /// Number of times the surface was wiped, one per rendered tick.
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl<F> Default for LatestFrame<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> RenderSurface<F> for LatestFrame<F> {
    fn clear(&mut self) {
        self.frame = None;
        self.clears += 1;
    }

    fn draw(&mut self, frame: F) {
        self.frame = Some(frame);
    }
}
