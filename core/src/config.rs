use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handover target cells at or above this identifier belong to the upper band.
pub const DEFAULT_BAND_THRESHOLD: u32 = 6;

/// Top-level description of where the traces live and how each view is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub base_dir: PathBuf,
    pub spatial: SpatialConfig,
    pub throughput: ChartConfig,
    pub sinr: ChartConfig,
    pub demux: DemuxConfig,
    /// Consecutive failed ticks before a view starts warning.
    pub warn_after_failures: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            spatial: SpatialConfig::default(),
            throughput: ChartConfig::throughput(),
            sinr: ChartConfig::sinr(),
            demux: DemuxConfig::default(),
            warn_after_failures: 20,
        }
    }
}

impl TraceConfig {
    /// Returns a copy whose every trace path is anchored at `base_dir`.
    pub fn with_base_dir<P: Into<PathBuf>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn trace_path<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.base_dir.join(relative)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    pub ue_trace: PathBuf,
    pub topology_trace: PathBuf,
    pub building_trace: PathBuf,
    pub handover_trace: PathBuf,
    pub band_threshold: u32,
    pub tick_ms: u64,
    pub timestamp_anchor: [f64; 2],
    pub blockage_label: String,
    pub blockage_offset: [f64; 2],
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            ue_trace: PathBuf::from("ue1_position.txt"),
            topology_trace: PathBuf::from("enb_topology.txt"),
            building_trace: PathBuf::from("building_topology.txt"),
            handover_trace: PathBuf::from("EnbHandoverStartStats.txt"),
            band_threshold: DEFAULT_BAND_THRESHOLD,
            tick_ms: 100,
            timestamp_anchor: [50.0, -0.5],
            blockage_label: "blockage".into(),
            blockage_offset: [7.0, 3.0],
        }
    }
}

/// One line of a time-series chart and the trace feeding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSource {
    pub label: String,
    pub path: PathBuf,
}

impl SeriesSource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesSource>,
    pub tick_ms: u64,
    pub x_limits: Option<[f64; 2]>,
    pub y_limits: Option<[f64; 2]>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::throughput()
    }
}

impl ChartConfig {
    pub fn throughput() -> Self {
        Self {
            title: "Total and Path Throughput".into(),
            x_label: "time(s)".into(),
            y_label: "Throughput(Mbps)".into(),
            series: vec![
                SeriesSource::new("mmWave Throughput1", "rlc_Tput_senb2_ue1_bearer_1.txt"),
                SeriesSource::new("mmWave Throughput2", "rlc_Tput_senb1_ue1_bearer_1.txt"),
                SeriesSource::new("UDP Throughput", "udp_throughput_ue1.txt"),
            ],
            tick_ms: 1000,
            x_limits: None,
            y_limits: None,
        }
    }

    pub fn sinr() -> Self {
        Self {
            title: "SNR values of Transport Blocks (TBs)".into(),
            x_label: "Simulation time(s)".into(),
            y_label: "SNR(dB)".into(),
            series: vec![SeriesSource::new("UE 1 DL SINR", "UE-1-0-Dl-Sinr.txt")],
            tick_ms: 1000,
            x_limits: Some([0.0, 6.0]),
            y_limits: Some([0.0, 55.0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemuxConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("MmWaveSinrTime.txt"),
            output_dir: PathBuf::from("."),
        }
    }
}
