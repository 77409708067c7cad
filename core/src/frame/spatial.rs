use crate::config::{SpatialConfig, TraceConfig};
use crate::frame::scene::{
    Annotation, Connector, ConnectorKind, Obstacle, Point, Scene, StationKind, StationMarker,
};
use crate::prelude::{FrameSource, TraceError, TraceResult};
use crate::resolver::{cell_id_for_index, resolve_latest};
use crate::trace::{
    BuildingSchema, HandoverBand, HandoverLog, HandoverSchema, PositionSchema, TraceFile,
};
use log::debug;

/// Builds the spatial view: UE, stations, obstacles and serving links.
#[derive(Debug, Clone)]
pub struct SpatialAssembler {
    ue: TraceFile<PositionSchema>,
    topology: TraceFile<PositionSchema>,
    buildings: TraceFile<BuildingSchema>,
    handovers: TraceFile<HandoverSchema>,
    config: SpatialConfig,
}

impl SpatialAssembler {
    pub fn new(config: &TraceConfig) -> Self {
        let spatial = config.spatial.clone();
        Self {
            ue: TraceFile::new(
                config.trace_path(&spatial.ue_trace),
                PositionSchema::timed(),
            ),
            topology: TraceFile::new(
                config.trace_path(&spatial.topology_trace),
                PositionSchema::plain(),
            ),
            buildings: TraceFile::new(config.trace_path(&spatial.building_trace), BuildingSchema),
            handovers: TraceFile::new(config.trace_path(&spatial.handover_trace), HandoverSchema),
            config: spatial,
        }
    }
}

impl FrameSource for SpatialAssembler {
    type Frame = Scene;

    fn produce_frame(&self) -> TraceResult<Scene> {
        let track = self.ue.read_all()?;
        let topology = self.topology.read_all()?;
        let buildings = self.buildings.read_all()?;
        let handovers = HandoverLog::collect(self.handovers.open()?, self.config.band_threshold)?;

        let current = track.last().ok_or_else(|| TraceError::NoData {
            trace: self.ue.path().display().to_string(),
        })?;
        let primary_index = topology
            .len()
            .checked_sub(1)
            .ok_or_else(|| TraceError::NoData {
                trace: self.topology.path().display().to_string(),
            })?;
        let ue = Point::from(current);

        let stations = topology
            .iter()
            .enumerate()
            .map(|(index, row)| StationMarker {
                cell_id: cell_id_for_index(index),
                position: Point::from(row),
                kind: if index == primary_index {
                    StationKind::Primary
                } else {
                    StationKind::Secondary
                },
            })
            .collect::<Vec<_>>();

        let mut connectors = Vec::with_capacity(HandoverBand::ALL.len() + 1);
        for band in HandoverBand::ALL {
            match resolve_latest(&handovers, band, &topology)? {
                Some(anchor) => connectors.push(Connector {
                    from: ue,
                    to: anchor,
                    kind: ConnectorKind::Handover(band),
                }),
                None => debug!("no {} handovers yet, skipping its connector", band),
            }
        }
        connectors.push(Connector {
            from: ue,
            to: Point::from(&topology[primary_index]),
            kind: ConnectorKind::Primary,
        });

        let obstacles = buildings.iter().map(Obstacle::from).collect::<Vec<_>>();

        let mut annotations = Vec::with_capacity(2);
        if let Some(last) = obstacles.last() {
            annotations.push(Annotation {
                text: self.config.blockage_label.clone(),
                target: last.max,
                placement: last.max.offset(self.config.blockage_offset),
                arrow: true,
            });
        }
        if let Some(timestamp) = current.timestamp {
            let anchor = Point::new(
                self.config.timestamp_anchor[0],
                self.config.timestamp_anchor[1],
            );
            // Whole seconds keep their decimal point ("2.0", not "2").
            annotations.push(Annotation {
                text: format!("{:?}", timestamp),
                target: anchor,
                placement: anchor,
                arrow: false,
            });
        }

        debug!(
            "scene at t={:?}: {} stations, {} obstacles, {} connectors ({} upper / {} lower handovers)",
            current.timestamp,
            stations.len(),
            obstacles.len(),
            connectors.len(),
            handovers.count(HandoverBand::Upper),
            handovers.count(HandoverBand::Lower)
        );

        Ok(Scene {
            ue,
            timestamp: current.timestamp,
            stations,
            obstacles,
            connectors,
            annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_traces(dir: &TempDir, ue: &str, topology: &str, buildings: &str, handovers: &str) {
        let spatial = SpatialConfig::default();
        fs::write(dir.path().join(&spatial.ue_trace), ue).unwrap();
        fs::write(dir.path().join(&spatial.topology_trace), topology).unwrap();
        fs::write(dir.path().join(&spatial.building_trace), buildings).unwrap();
        fs::write(dir.path().join(&spatial.handover_trace), handovers).unwrap();
    }

    fn assembler(dir: &TempDir) -> SpatialAssembler {
        SpatialAssembler::new(&TraceConfig::default().with_base_dir(dir.path()))
    }

    #[test]
    fn last_station_is_primary_and_always_linked() {
        let dir = TempDir::new().unwrap();
        write_traces(&dir, "1 1 0 0.1\n", "0 0\n10 0\n20 0\n", "", "");
        let scene = assembler(&dir).produce_frame().unwrap();

        let primary = scene.primary_station().unwrap();
        assert_eq!(primary.position, Point::new(20.0, 0.0));
        assert_eq!(primary.cell_id, 4);
        assert_eq!(
            scene
                .stations
                .iter()
                .filter(|s| s.kind == StationKind::Secondary)
                .count(),
            2
        );
        assert_eq!(scene.connectors.len(), 1);
        assert_eq!(scene.connectors[0].kind, ConnectorKind::Primary);
    }

    #[test]
    fn blockage_annotation_points_at_last_building_corner() {
        let dir = TempDir::new().unwrap();
        write_traces(
            &dir,
            "1 1 0 0.1\n",
            "0 0\n",
            "10 20 30 40\n50 60 5 15\n",
            "",
        );
        let scene = assembler(&dir).produce_frame().unwrap();

        assert_eq!(scene.obstacles.len(), 2);
        let blockage = &scene.annotations[0];
        assert_eq!(blockage.text, "blockage");
        assert_eq!(blockage.target, Point::new(60.0, 15.0));
        assert_eq!(blockage.placement, Point::new(67.0, 18.0));
        assert!(blockage.arrow);
        let clock = &scene.annotations[1];
        assert_eq!(clock.text, "0.1");
        assert_eq!(clock.placement, Point::new(50.0, -0.5));
    }

    #[test]
    fn no_buildings_means_no_blockage_label() {
        let dir = TempDir::new().unwrap();
        write_traces(&dir, "1 1 0 2.5\n", "0 0\n", "", "");
        let scene = assembler(&dir).produce_frame().unwrap();
        assert_eq!(scene.annotations.len(), 1);
        assert_eq!(scene.annotations[0].text, "2.5");
    }

    #[test]
    fn whole_second_timestamp_keeps_its_decimal_point() {
        let dir = TempDir::new().unwrap();
        write_traces(&dir, "1 1 0 2\n", "0 0\n", "", "");
        let scene = assembler(&dir).produce_frame().unwrap();
        assert_eq!(scene.annotations[0].text, "2.0");
    }

    #[test]
    fn empty_mobility_trace_has_no_data() {
        let dir = TempDir::new().unwrap();
        write_traces(&dir, "", "0 0\n", "", "");
        assert!(matches!(
            assembler(&dir).produce_frame(),
            Err(TraceError::NoData { .. })
        ));
    }

    #[test]
    fn empty_topology_has_no_data() {
        let dir = TempDir::new().unwrap();
        write_traces(&dir, "1 1 0 0.1\n", "", "", "");
        assert!(matches!(
            assembler(&dir).produce_frame(),
            Err(TraceError::NoData { .. })
        ));
    }

    #[test]
    fn custom_band_threshold_moves_records_between_bands() {
        let dir = TempDir::new().unwrap();
        write_traces(
            &dir,
            "1 1 0 0.1\n",
            "0 0\n10 0\n20 0\n30 0\n",
            "",
            "0.1 1 1 2 4\n",
        );
        let mut config = TraceConfig::default().with_base_dir(dir.path());
        config.spatial.band_threshold = 4;
        let scene = SpatialAssembler::new(&config).produce_frame().unwrap();
        let upper = scene
            .connector(ConnectorKind::Handover(HandoverBand::Upper))
            .unwrap();
        assert_eq!(upper.to, Point::new(20.0, 0.0));
        assert!(scene
            .connector(ConnectorKind::Handover(HandoverBand::Lower))
            .is_none());
    }
}
