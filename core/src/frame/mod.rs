pub mod chart;
pub mod scene;
pub mod spatial;

pub use chart::{Chart, Series, SeriesAssembler};
pub use scene::{
    Annotation, Connector, ConnectorKind, Extent, Obstacle, Point, Scene, StationKind,
    StationMarker,
};
pub use spatial::SpatialAssembler;
