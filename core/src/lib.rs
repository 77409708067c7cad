//! Trace correlation and frame assembly for the mmWave handover visualizer.
//!
//! Every tick re-reads the simulator's flat trace files, resolves handover
//! target cells against the base-station topology and hands a complete frame to
//! a caller-owned render surface.

pub mod config;
pub mod demux;
pub mod frame;
pub mod prelude;
pub mod render;
pub mod resolver;
pub mod telemetry;
pub mod trace;

pub use config::TraceConfig;
pub use frame::{Chart, Scene, SeriesAssembler, SpatialAssembler};
pub use prelude::{FrameSource, RenderSurface, TraceError, TraceResult};
pub use render::{RenderContext, TickOutcome};
