use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use mmwcore::demux::{demux_sinr_file, DemuxSummary};
use mmwcore::frame::{Chart, Scene, SeriesAssembler, SpatialAssembler};
use mmwcore::FrameSource;
use serde::Serialize;

/// One frame of every view, assembled back to back.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub scene: Scene,
    pub throughput: Chart,
    pub sinr: Chart,
}

/// Holds the assemblers of every view for one trace directory.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    spatial: SpatialAssembler,
    throughput: SeriesAssembler,
    sinr: SeriesAssembler,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        let spatial = SpatialAssembler::new(&config.traces);
        let throughput = SeriesAssembler::throughput(&config.traces);
        let sinr = SeriesAssembler::sinr(&config.traces);
        Self {
            config,
            spatial,
            throughput,
            sinr,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn spatial(&self) -> &SpatialAssembler {
        &self.spatial
    }

    pub fn throughput(&self) -> &SeriesAssembler {
        &self.throughput
    }

    pub fn sinr(&self) -> &SeriesAssembler {
        &self.sinr
    }

    pub fn execute_once(&self) -> anyhow::Result<Snapshot> {
        let scene = self
            .spatial
            .produce_frame()
            .context("assembling spatial scene")?;
        let throughput = self
            .throughput
            .produce_frame()
            .context("assembling throughput chart")?;
        let sinr = self
            .sinr
            .produce_frame()
            .context("assembling SINR chart")?;
        Ok(Snapshot {
            scene,
            throughput,
            sinr,
        })
    }

    pub fn demux(&self) -> anyhow::Result<DemuxSummary> {
        let traces = &self.config.traces;
        let input = traces.trace_path(&traces.demux.input);
        let output_dir = traces.trace_path(&traces.demux.output_dir);
        demux_sinr_file(&input, &output_dir)
            .with_context(|| format!("demultiplexing {}", input.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{write_trace_set, GeneratorConfig};
    use mmwcore::frame::ConnectorKind;
    use tempfile::TempDir;

    #[test]
    fn runner_assembles_every_view_from_a_synthetic_run() {
        let dir = TempDir::new().unwrap();
        write_trace_set(dir.path(), &GeneratorConfig::default()).unwrap();
        let runner = Runner::new(WorkflowConfig::for_directory(dir.path()));

        let snapshot = runner.execute_once().unwrap();
        assert_eq!(snapshot.scene.stations.len(), 9);
        assert!(snapshot
            .scene
            .connector(ConnectorKind::Primary)
            .is_some());
        assert_eq!(snapshot.throughput.series.len(), 3);
        assert_eq!(snapshot.sinr.series.len(), 1);
    }

    #[test]
    fn runner_reports_which_view_failed() {
        let dir = TempDir::new().unwrap();
        let runner = Runner::new(WorkflowConfig::for_directory(dir.path()));
        let err = runner.execute_once().unwrap_err();
        assert_eq!(err.to_string(), "assembling spatial scene");
    }

    #[test]
    fn runner_demuxes_the_synthetic_sinr_trace() {
        let dir = TempDir::new().unwrap();
        let summary = write_trace_set(dir.path(), &GeneratorConfig::default()).unwrap();
        let runner = Runner::new(WorkflowConfig::for_directory(dir.path()));
        let demux = runner.demux().unwrap();
        assert_eq!(demux.rows, summary.sinr_rows);
        assert!(!demux.outputs.is_empty());
    }
}
