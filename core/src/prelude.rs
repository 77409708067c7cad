use std::io;
use std::path::PathBuf;

/// Common error type for reading traces and assembling frames.
#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("trace {trace} unavailable: {source}")]
    ResourceUnavailable {
        trace: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed {trace} record at line {line}: {reason}")]
    MalformedRecord {
        trace: String,
        line: usize,
        reason: String,
    },
    #[error("cell {cell_id} maps to topology index {index}, outside 0..{len}")]
    ReferentialIntegrity { cell_id: i64, index: i64, len: usize },
    #[error("{trace} trace has no complete records yet")]
    NoData { trace: String },
    #[error("writing {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Anything that can build a fresh drawable frame from the traces on disk.
///
/// Implementations must not keep state between calls: every call re-reads its
/// inputs so that a failed call has no effect on the next one.
pub trait FrameSource {
    type Frame;

    fn produce_frame(&self) -> TraceResult<Self::Frame>;
}

/// Drawing target owned by the caller of a tick.
pub trait RenderSurface<F> {
    /// Drops everything drawn by the previous frame.
    fn clear(&mut self);
    fn draw(&mut self, frame: F);
}
