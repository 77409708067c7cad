use crate::config::{ChartConfig, TraceConfig};
use crate::frame::scene::{Extent, Point};
use crate::prelude::{FrameSource, TraceResult};
use crate::trace::{SamplePoint, SeriesSchema, TraceFile};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<SamplePoint>,
}

/// Everything drawn for one tick of a time-series view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub x_limits: Option<[f64; 2]>,
    pub y_limits: Option<[f64; 2]>,
}

impl Chart {
    /// Plot area: configured limits win, otherwise the data bounds.
    pub fn extent(&self) -> Option<Extent> {
        let data = self
            .series
            .iter()
            .flat_map(|series| series.points.iter())
            .fold(None, |acc: Option<Extent>, sample| {
                let point = Point::new(sample.time, sample.value);
                Some(match acc {
                    Some(mut extent) => {
                        extent.include(point);
                        extent
                    }
                    None => Extent::around(point),
                })
            });

        match (data, self.x_limits, self.y_limits) {
            (_, Some(x), Some(y)) => Some(Extent {
                min_x: x[0],
                max_x: x[1],
                min_y: y[0],
                max_y: y[1],
            }),
            (Some(mut extent), x, y) => {
                if let Some(x) = x {
                    extent.min_x = x[0];
                    extent.max_x = x[1];
                }
                if let Some(y) = y {
                    extent.min_y = y[0];
                    extent.max_y = y[1];
                }
                Some(extent)
            }
            (None, _, _) => None,
        }
    }
}

/// Builds a chart from one `time value` trace per series.
#[derive(Debug, Clone)]
pub struct SeriesAssembler {
    sources: Vec<(String, TraceFile<SeriesSchema>)>,
    config: ChartConfig,
}

impl SeriesAssembler {
    pub fn new(config: &TraceConfig, chart: &ChartConfig) -> Self {
        let sources = chart
            .series
            .iter()
            .map(|source| {
                (
                    source.label.clone(),
                    TraceFile::new(config.trace_path(&source.path), SeriesSchema),
                )
            })
            .collect();
        Self {
            sources,
            config: chart.clone(),
        }
    }

    pub fn throughput(config: &TraceConfig) -> Self {
        Self::new(config, &config.throughput)
    }

    pub fn sinr(config: &TraceConfig) -> Self {
        Self::new(config, &config.sinr)
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }
}

impl FrameSource for SeriesAssembler {
    type Frame = Chart;

    fn produce_frame(&self) -> TraceResult<Chart> {
        let series = self
            .sources
            .iter()
            .map(|(label, file)| -> TraceResult<Series> {
                Ok(Series {
                    label: label.clone(),
                    points: file.read_all()?,
                })
            })
            .collect::<TraceResult<Vec<_>>>()?;

        debug!(
            "chart {:?}: {} samples over {} series",
            self.config.title,
            series.iter().map(|s| s.points.len()).sum::<usize>(),
            series.len()
        );

        Ok(Chart {
            title: self.config.title.clone(),
            x_label: self.config.x_label.clone(),
            y_label: self.config.y_label.clone(),
            series,
            x_limits: self.config.x_limits,
            y_limits: self.config.y_limits,
        })
    }
}
