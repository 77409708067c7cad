pub mod context;

pub use context::{LatestFrame, RenderContext, TickOutcome};
