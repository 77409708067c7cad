use crate::trace::{BuildingRecord, HandoverBand, PositionRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: [f64; 2]) -> Self {
        Self::new(self.x + delta[0], self.y + delta[1])
    }
}

impl From<&PositionRecord> for Point {
    fn from(record: &PositionRecord) -> Self {
        Self::new(record.x, record.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    /// Wide-area LTE station, always the last topology entry.
    Primary,
    /// Short-range mmWave station.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationMarker {
    pub cell_id: u32,
    pub position: Point,
    pub kind: StationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    /// UE to the target cell of the band's latest handover.
    Handover(HandoverBand),
    /// UE to the primary station.
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from: Point,
    pub to: Point,
    pub kind: ConnectorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub min: Point,
    pub max: Point,
}

impl From<&BuildingRecord> for Obstacle {
    fn from(record: &BuildingRecord) -> Self {
        Self {
            min: Point::new(record.x_min, record.y_min),
            max: Point::new(record.x_max, record.y_max),
        }
    }
}

/// Text placed at `placement`, optionally with an arrow pointing at `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub target: Point,
    pub placement: Point,
    pub arrow: bool,
}

/// Everything drawn for one tick of the spatial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub ue: Point,
    pub timestamp: Option<f64>,
    pub stations: Vec<StationMarker>,
    pub obstacles: Vec<Obstacle>,
    pub connectors: Vec<Connector>,
    pub annotations: Vec<Annotation>,
}

impl Scene {
    pub fn primary_station(&self) -> Option<&StationMarker> {
        self.stations
            .iter()
            .find(|station| station.kind == StationKind::Primary)
    }

    pub fn connector(&self, kind: ConnectorKind) -> Option<&Connector> {
        self.connectors
            .iter()
            .find(|connector| connector.kind == kind)
    }

    /// Bounding box of every drawn primitive, text placements included.
    pub fn extent(&self) -> Extent {
        let mut extent = Extent::around(self.ue);
        for station in &self.stations {
            extent.include(station.position);
        }
        for obstacle in &self.obstacles {
            extent.include(obstacle.min);
            extent.include(obstacle.max);
        }
        for annotation in &self.annotations {
            extent.include(annotation.placement);
        }
        extent
    }
}

/// Axis-aligned bounds in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn around(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    /// Width never reported below `floor`, so degenerate extents stay drawable.
    pub fn width(&self, floor: f64) -> f64 {
        (self.max_x - self.min_x).max(floor)
    }

    pub fn height(&self, floor: f64) -> f64 {
        (self.max_y - self.min_y).max(floor)
    }
}
