use mmwcore::frame::{Chart, Scene};
use mmwcore::telemetry::TickMetrics;
use serde::Serialize;

/// Tick counters of one view as published on `/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewStatus {
    pub rendered: usize,
    pub aborted: usize,
    pub consecutive_failures: usize,
}

impl ViewStatus {
    pub fn from_metrics(metrics: TickMetrics, consecutive_failures: usize) -> Self {
        let (rendered, aborted) = metrics.snapshot();
        Self {
            rendered,
            aborted,
            consecutive_failures,
        }
    }
}

/// Last good frame of every view, shared between the tick loops and HTTP routes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisualizationModel {
    pub scene: Option<Scene>,
    pub throughput: Option<Chart>,
    pub sinr: Option<Chart>,
    pub spatial_status: ViewStatus,
    pub throughput_status: ViewStatus,
    pub sinr_status: ViewStatus,
}

/// Which chart slot of the model a surface writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Throughput,
    Sinr,
}

impl VisualizationModel {
    pub fn chart_mut(&mut self, slot: ChartSlot) -> &mut Option<Chart> {
        match slot {
            ChartSlot::Throughput => &mut self.throughput,
            ChartSlot::Sinr => &mut self.sinr,
        }
    }

    pub fn chart(&self, slot: ChartSlot) -> Option<&Chart> {
        match slot {
            ChartSlot::Throughput => self.throughput.as_ref(),
            ChartSlot::Sinr => self.sinr.as_ref(),
        }
    }
}
