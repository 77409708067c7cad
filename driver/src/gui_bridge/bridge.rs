use crate::gui_bridge::model::{ChartSlot, ViewStatus, VisualizationModel};
use crate::workflow::runner::Runner;
use anyhow::Context;
use log::info;
use mmwcore::frame::{Chart, Scene};
use mmwcore::{RenderContext, RenderSurface};
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};
use warp::Filter;

type SharedModel = Arc<RwLock<VisualizationModel>>;

fn read(state: &SharedModel) -> RwLockReadGuard<'_, VisualizationModel> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &SharedModel) -> RwLockWriteGuard<'_, VisualizationModel> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

fn ticker(period_ms: u64) -> Interval {
    let mut interval = time::interval(Duration::from_millis(period_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Publishes rendered scenes into the shared model.
pub struct SceneSurface {
    state: SharedModel,
}

impl RenderSurface<Scene> for SceneSurface {
    fn clear(&mut self) {
        write(&self.state).scene = None;
    }

    fn draw(&mut self, frame: Scene) {
        write(&self.state).scene = Some(frame);
    }
}

/// Publishes rendered charts into one chart slot of the shared model.
pub struct ChartSurface {
    state: SharedModel,
    slot: ChartSlot,
}

impl RenderSurface<Chart> for ChartSurface {
    fn clear(&mut self) {
        *write(&self.state).chart_mut(self.slot) = None;
    }

    fn draw(&mut self, frame: Chart) {
        *write(&self.state).chart_mut(self.slot) = Some(frame);
    }
}

/// Bridge that runs the tick loops and serves their latest frames over HTTP.
#[derive(Clone, Default)]
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene_surface(&self) -> SceneSurface {
        SceneSurface {
            state: self.state.clone(),
        }
    }

    pub fn chart_surface(&self, slot: ChartSlot) -> ChartSurface {
        ChartSurface {
            state: self.state.clone(),
            slot,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());

        let scene_route = warp::path!("scene")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| warp::reply::json(&read(&state).scene));

        let throughput_route = warp::path!("charts" / "throughput")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                warp::reply::json(&read(&state).chart(ChartSlot::Throughput))
            });

        let sinr_route = warp::path!("charts" / "sinr")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| warp::reply::json(&read(&state).chart(ChartSlot::Sinr)));

        let status_route = warp::path!("status")
            .and(warp::get())
            .and(state_filter)
            .map(|state: SharedModel| {
                let model = read(&state);
                warp::reply::json(&json!({
                    "spatial": model.spatial_status,
                    "throughput": model.throughput_status,
                    "sinr": model.sinr_status,
                }))
            });

        scene_route
            .or(throughput_route)
            .or(sinr_route)
            .or(status_route)
    }

    /// Runs every view's tick loop and the HTTP routes until Ctrl+C.
    ///
    /// Everything shares the calling task, so one tick always finishes before
    /// the next one or an HTTP request is handled.
    pub async fn serve(&self, runner: &Runner) -> anyhow::Result<()> {
        let config = runner.config();
        let traces = &config.traces;
        let warn_after = traces.warn_after_failures;

        let mut spatial = RenderContext::new(self.scene_surface(), "spatial", warn_after);
        let mut throughput = RenderContext::new(
            self.chart_surface(ChartSlot::Throughput),
            "throughput",
            warn_after,
        );
        let mut sinr = RenderContext::new(self.chart_surface(ChartSlot::Sinr), "sinr", warn_after);

        let mut spatial_timer = ticker(traces.spatial.tick_ms);
        let mut throughput_timer = ticker(traces.throughput.tick_ms);
        let mut sinr_timer = ticker(traces.sinr.tick_ms);

        let (bound, server) = warp::serve(self.routes())
            .try_bind_ephemeral(config.bridge_addr)
            .with_context(|| format!("binding HTTP bridge to {}", config.bridge_addr))?;
        tokio::pin!(server);
        self.publish_status(&format!("HTTP bridge listening on {}", bound));

        loop {
            tokio::select! {
                _ = &mut server => anyhow::bail!("HTTP bridge stopped unexpectedly"),
                signal = tokio::signal::ctrl_c() => {
                    signal.context("awaiting Ctrl+C to exit")?;
                    self.publish_status("stopping tick loops");
                    return Ok(());
                }
                _ = spatial_timer.tick() => {
                    spatial.tick(runner.spatial());
                    let status = ViewStatus::from_metrics(spatial.metrics(), spatial.consecutive_failures());
                    write(&self.state).spatial_status = status;
                }
                _ = throughput_timer.tick() => {
                    throughput.tick(runner.throughput());
                    let status = ViewStatus::from_metrics(throughput.metrics(), throughput.consecutive_failures());
                    write(&self.state).throughput_status = status;
                }
                _ = sinr_timer.tick() => {
                    sinr.tick(runner.sinr());
                    let status = ViewStatus::from_metrics(sinr.metrics(), sinr.consecutive_failures());
                    write(&self.state).sinr_status = status;
                }
            }
        }
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    pub fn snapshot(&self) -> VisualizationModel {
        read(&self.state).clone()
    }
}
