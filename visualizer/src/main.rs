use iced::{
    mouse, time,
    widget::{
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme,
};
use log::info;
use mmwcore::frame::{Chart, ConnectorKind, Extent, Scene, StationKind};
use mmwcore::render::LatestFrame;
use mmwcore::trace::HandoverBand;
use mmwcore::{RenderContext, SeriesAssembler, SpatialAssembler, TickOutcome, TraceConfig};
use std::time::Duration;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "mmWave Handover Visualizer".into()
}

fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    Subscription::batch([
        time::every(state.spatial_period).map(|_| Message::SpatialTick),
        time::every(state.throughput_period).map(|_| Message::ThroughputTick),
        time::every(state.sinr_period).map(|_| Message::SinrTick),
    ])
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

const UE_COLOR: Color = Color::from_rgb(0.95, 0.95, 0.95);
const SECONDARY_COLOR: Color = Color::from_rgb(0.9, 0.25, 0.25);
const PRIMARY_COLOR: Color = Color::from_rgb(0.25, 0.45, 0.95);
const OBSTACLE_COLOR: Color = Color::from_rgb(0.35, 0.35, 0.38);
const LABEL_COLOR: Color = Color::from_rgb(0.8, 0.8, 0.85);
const SERIES_PALETTE: [Color; 4] = [
    Color::from_rgb(0.18, 0.72, 0.89),
    Color::from_rgb(0.95, 0.55, 0.2),
    Color::from_rgb(0.45, 0.85, 0.4),
    Color::from_rgb(0.85, 0.4, 0.85),
];

fn connector_color(kind: ConnectorKind) -> Color {
    match kind {
        ConnectorKind::Handover(HandoverBand::Upper) => Color::from_rgb(0.95, 0.55, 0.2),
        ConnectorKind::Handover(HandoverBand::Lower) => Color::from_rgb(0.45, 0.85, 0.4),
        ConnectorKind::Primary => PRIMARY_COLOR,
    }
}

#[derive(Debug)]
struct Visualizer {
    spatial: SpatialAssembler,
    throughput: SeriesAssembler,
    sinr: SeriesAssembler,
    scene_view: RenderContext<LatestFrame<Scene>>,
    throughput_view: RenderContext<LatestFrame<Chart>>,
    sinr_view: RenderContext<LatestFrame<Chart>>,
    spatial_period: Duration,
    throughput_period: Duration,
    sinr_period: Duration,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Message {
    SpatialTick,
    ThroughputTick,
    SinrTick,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let config = TraceConfig::default();
        let warn_after = config.warn_after_failures;
        info!("watching traces under {}", config.base_dir.display());
        (
            Visualizer {
                spatial: SpatialAssembler::new(&config),
                throughput: SeriesAssembler::throughput(&config),
                sinr: SeriesAssembler::sinr(&config),
                scene_view: RenderContext::new(LatestFrame::new(), "spatial", warn_after),
                throughput_view: RenderContext::new(LatestFrame::new(), "throughput", warn_after),
                sinr_view: RenderContext::new(LatestFrame::new(), "sinr", warn_after),
                spatial_period: Duration::from_millis(config.spatial.tick_ms.max(1)),
                throughput_period: Duration::from_millis(config.throughput.tick_ms.max(1)),
                sinr_period: Duration::from_millis(config.sinr.tick_ms.max(1)),
                status: "Waiting for traces...".into(),
                history: Vec::new(),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        let (view, outcome, failures) = match message {
            Message::SpatialTick => (
                "Spatial",
                state.scene_view.tick(&state.spatial),
                state.scene_view.consecutive_failures(),
            ),
            Message::ThroughputTick => (
                "Throughput",
                state.throughput_view.tick(&state.throughput),
                state.throughput_view.consecutive_failures(),
            ),
            Message::SinrTick => (
                "SINR",
                state.sinr_view.tick(&state.sinr),
                state.sinr_view.consecutive_failures(),
            ),
        };

        match outcome {
            TickOutcome::Rendered => {
                if let (Message::SpatialTick, Some(scene)) =
                    (message, state.scene_view.surface().frame())
                {
                    state.status = format!(
                        "t = {} s | UE ({:.1}, {:.1}) | {} links",
                        scene
                            .timestamp
                            .map(|t| format!("{:?}", t))
                            .unwrap_or_else(|| "?".into()),
                        scene.ue.x,
                        scene.ue.y,
                        scene.connectors.len()
                    );
                }
            }
            TickOutcome::Retained(err) => {
                state.status = format!("{view} tick skipped: {err}");
                if failures == 1 {
                    state.push_history(format!("{view}: {err}"));
                }
            }
        }
        Task::none()
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let scene = state.scene_view.surface().frame().cloned();

        let legend = column![
            text("Legend").size(16),
            text("White diamond: UE").size(12),
            text("Red: mmWave eNB | Blue: LTE eNB").size(12),
            text("Orange: upper-band link | Green: lower-band link | Blue: LTE link").size(12),
            text("Grey: buildings").size(12),
        ]
        .spacing(4)
        .padding(6);

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No trace errors yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let spatial_column = column![
            text("Topology").size(26),
            Canvas::new(SceneMap { scene })
                .width(Length::Fill)
                .height(Length::Fixed(480.0)),
            text(&state.status).size(14),
            legend,
            text("Trace errors").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::FillPortion(3));

        let chart_column = column![
            chart_panel(state.throughput_view.surface().frame()),
            chart_panel(state.sinr_view.surface().frame()),
        ]
        .spacing(20)
        .padding(16)
        .width(Length::FillPortion(2));

        let layout = row![spatial_column, chart_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn chart_panel(chart: Option<&Chart>) -> Element<'static, Message> {
    let Some(chart) = chart else {
        return column![text("Waiting for series traces...").size(16)].into();
    };

    let legend = chart.series.iter().enumerate().fold(
        Column::new().spacing(2),
        |col, (idx, series)| {
            col.push(
                text(format!("{} ({} samples)", series.label, series.points.len()))
                    .size(12)
                    .color(SERIES_PALETTE[idx % SERIES_PALETTE.len()]),
            )
        },
    );

    column![
        text(chart.title.clone()).size(20),
        Canvas::new(ChartPlot {
            chart: chart.clone()
        })
        .width(Length::Fill)
        .height(Length::Fixed(220.0)),
        text(format!("x: {} | y: {}", chart.x_label, chart.y_label)).size(12),
        legend,
    ]
    .spacing(6)
    .into()
}

/// Maps world coordinates into a canvas with a margin on every side.
struct Viewport {
    extent: Extent,
    origin: Point,
    size: Size,
}

impl Viewport {
    fn new(extent: Extent, bounds: Size, margin: f32) -> Self {
        Self {
            extent,
            origin: Point::new(margin, margin),
            size: Size::new(
                (bounds.width - 2.0 * margin).max(1.0),
                (bounds.height - 2.0 * margin).max(1.0),
            ),
        }
    }

    fn project(&self, x: f64, y: f64) -> Point {
        let nx = (x - self.extent.min_x) / self.extent.width(1e-9);
        let ny = (y - self.extent.min_y) / self.extent.height(1e-9);
        Point::new(
            self.origin.x + nx as f32 * self.size.width,
            self.origin.y + (1.0 - ny as f32) * self.size.height,
        )
    }
}

fn label(frame: &mut Frame, content: String, position: Point, size: f32) {
    frame.fill_text(canvas::Text {
        content,
        position,
        color: LABEL_COLOR,
        size: Pixels(size),
        ..canvas::Text::default()
    });
}

#[derive(Clone)]
struct SceneMap {
    scene: Option<Scene>,
}

impl canvas::Program<Message> for SceneMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        let Some(scene) = &self.scene else {
            return vec![frame.into_geometry()];
        };
        let view = Viewport::new(scene.extent(), bounds.size(), 24.0);

        for obstacle in &scene.obstacles {
            let top_left = view.project(obstacle.min.x, obstacle.max.y);
            let bottom_right = view.project(obstacle.max.x, obstacle.min.y);
            frame.fill_rectangle(
                top_left,
                Size::new(bottom_right.x - top_left.x, bottom_right.y - top_left.y),
                OBSTACLE_COLOR,
            );
        }

        for connector in &scene.connectors {
            let from = view.project(connector.from.x, connector.from.y);
            let to = view.project(connector.to.x, connector.to.y);
            let link = Path::line(from, to);
            frame.stroke(
                &link,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(connector_color(connector.kind)),
            );
        }

        for station in &scene.stations {
            let center = view.project(station.position.x, station.position.y);
            let color = match station.kind {
                StationKind::Primary => PRIMARY_COLOR,
                StationKind::Secondary => SECONDARY_COLOR,
            };
            frame.fill(&Path::circle(center, 7.0), color);
            label(
                &mut frame,
                station.cell_id.to_string(),
                Point::new(center.x + 8.0, center.y - 14.0),
                11.0,
            );
        }

        let ue = view.project(scene.ue.x, scene.ue.y);
        let diamond = Path::new(|builder| {
            builder.move_to(Point::new(ue.x, ue.y - 7.0));
            builder.line_to(Point::new(ue.x + 6.0, ue.y));
            builder.line_to(Point::new(ue.x, ue.y + 7.0));
            builder.line_to(Point::new(ue.x - 6.0, ue.y));
            builder.close();
        });
        frame.fill(&diamond, UE_COLOR);

        for annotation in &scene.annotations {
            let placement = view.project(annotation.placement.x, annotation.placement.y);
            if annotation.arrow {
                let target = view.project(annotation.target.x, annotation.target.y);
                frame.stroke(
                    &Path::line(placement, target),
                    Stroke::default().with_width(1.5).with_color(LABEL_COLOR),
                );
            }
            label(&mut frame, annotation.text.clone(), placement, 13.0);
        }

        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct ChartPlot {
    chart: Chart,
}

impl canvas::Program<Message> for ChartPlot {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let Some(extent) = self.chart.extent() else {
            return vec![frame.into_geometry()];
        };
        let view = Viewport::new(extent, bounds.size(), 28.0);

        let axes = Path::new(|builder| {
            builder.move_to(view.project(extent.min_x, extent.max_y));
            builder.line_to(view.project(extent.min_x, extent.min_y));
            builder.line_to(view.project(extent.max_x, extent.min_y));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.35, 0.35, 0.45))
                .with_width(1.0),
        );
        let corner = view.project(extent.min_x, extent.min_y);
        label(
            &mut frame,
            format!("{:.1}", extent.min_y),
            Point::new(2.0, corner.y - 12.0),
            10.0,
        );
        label(
            &mut frame,
            format!("{:.1}", extent.max_y),
            Point::new(2.0, view.project(extent.min_x, extent.max_y).y),
            10.0,
        );
        label(
            &mut frame,
            format!("{:.1}", extent.max_x),
            Point::new(view.project(extent.max_x, extent.min_y).x - 20.0, corner.y + 4.0),
            10.0,
        );

        for (idx, series) in self.chart.series.iter().enumerate() {
            if series.points.len() < 2 {
                continue;
            }
            let line = Path::new(|builder| {
                for (i, sample) in series.points.iter().enumerate() {
                    let point = view.project(sample.time, sample.value);
                    if i == 0 {
                        builder.move_to(point);
                    } else {
                        builder.line_to(point);
                    }
                }
            });
            frame.stroke(
                &line,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(SERIES_PALETTE[idx % SERIES_PALETTE.len()]),
            );
        }

        vec![frame.into_geometry()]
    }
}
