use anyhow::Context;
use mmwcore::config::{SpatialConfig, TraceConfig};
use mmwcore::resolver::cell_id_for_index;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Configuration for writing a synthetic trace set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub steps: usize,
    pub step_s: f64,
    /// Secondary stations; the first half form the lower band.
    pub mmwave_stations: usize,
    pub street_length: f64,
    pub noise: f64,
    pub seed: u64,
    pub imsi: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            steps: 60,
            step_s: 0.1,
            mmwave_stations: 8,
            street_length: 200.0,
            noise: 0.5,
            seed: 0,
            imsi: 1,
        }
    }
}

impl GeneratorConfig {
    fn lower_band_size(&self) -> usize {
        (self.mmwave_stations / 2).max(1)
    }

    /// Cell identifier separating the two halves of the station list.
    pub fn band_threshold(&self) -> u32 {
        cell_id_for_index(self.lower_band_size())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSetSummary {
    pub ue_rows: usize,
    pub handovers: usize,
    pub sinr_rows: usize,
    pub band_threshold: u32,
}

#[derive(Debug, Clone, Copy)]
struct Site {
    x: f64,
    y: f64,
}

impl Site {
    fn distance(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

fn station_layout(config: &GeneratorConfig) -> Vec<Site> {
    let lower = config.lower_band_size();
    let upper = config.mmwave_stations.saturating_sub(lower);
    let spread = |count: usize, y: f64| {
        (0..count).map(move |idx| Site {
            x: config.street_length * (idx as f64 + 0.5) / count as f64,
            y,
        })
    };

    let mut sites: Vec<Site> = spread(lower, 20.0).chain(spread(upper, -20.0)).collect();
    sites.push(Site {
        x: config.street_length / 2.0,
        y: 60.0,
    });
    sites
}

fn nearest(sites: &[Site], range: std::ops::Range<usize>, x: f64, y: f64) -> Option<usize> {
    range.min_by(|&a, &b| {
        sites[a]
            .distance(x, y)
            .total_cmp(&sites[b].distance(x, y))
    })
}

struct TraceWriter {
    name: String,
    inner: BufWriter<File>,
}

impl TraceWriter {
    fn create(dir: &Path, relative: &Path) -> anyhow::Result<Self> {
        let path = dir.join(relative);
        let file = File::create(&path)
            .with_context(|| format!("creating synthetic trace {}", path.display()))?;
        Ok(Self {
            name: path.display().to_string(),
            inner: BufWriter::new(file),
        })
    }

    fn row(&mut self, line: std::fmt::Arguments<'_>) -> anyhow::Result<()> {
        writeln!(self.inner, "{}", line).with_context(|| format!("writing {}", self.name))
    }

    fn finish(mut self) -> anyhow::Result<()> {
        self.inner
            .flush()
            .with_context(|| format!("flushing {}", self.name))
    }
}

fn jitter(rng: &mut StdRng, noise: f64) -> f64 {
    if noise > 0.0 {
        rng.gen_range(-noise..noise)
    } else {
        0.0
    }
}

/// Writes a complete, self-consistent trace set into `dir` using the default
/// file names.
pub fn write_trace_set(dir: &Path, config: &GeneratorConfig) -> anyhow::Result<TraceSetSummary> {
    let names = TraceConfig::default();
    let spatial: &SpatialConfig = &names.spatial;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let sites = station_layout(config);
    let lower = 0..config.lower_band_size();
    let upper = config.lower_band_size()..sites.len() - 1;

    let mut topology = TraceWriter::create(dir, &spatial.topology_trace)?;
    for site in &sites {
        topology.row(format_args!("{:.2} {:.2}", site.x, site.y))?;
    }
    topology.finish()?;

    let mut buildings = TraceWriter::create(dir, &spatial.building_trace)?;
    let block = config.street_length / 10.0;
    buildings.row(format_args!(
        "{:.2} {:.2} {:.2} {:.2}",
        2.0 * block,
        3.0 * block,
        5.0,
        12.0
    ))?;
    buildings.row(format_args!(
        "{:.2} {:.2} {:.2} {:.2}",
        6.0 * block,
        7.0 * block,
        -12.0,
        -5.0
    ))?;
    buildings.finish()?;

    let mut ue = TraceWriter::create(dir, &spatial.ue_trace)?;
    let mut handovers = TraceWriter::create(dir, &spatial.handover_trace)?;
    let mut throughput = names
        .throughput
        .series
        .iter()
        .map(|source| TraceWriter::create(dir, &source.path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let mut tb_sinr = names
        .sinr
        .series
        .iter()
        .map(|source| TraceWriter::create(dir, &source.path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let mut sinr = TraceWriter::create(dir, &names.demux.input)?;

    let mut serving: [Option<usize>; 2] = [None, None];
    let mut summary = TraceSetSummary {
        ue_rows: 0,
        handovers: 0,
        sinr_rows: 0,
        band_threshold: config.band_threshold(),
    };
    let rnti = 1;

    for step in 0..config.steps {
        let time = (step + 1) as f64 * config.step_s;
        let progress = step as f64 / config.steps.max(1) as f64;
        let x = config.street_length * progress;
        let y = jitter(&mut rng, config.noise);
        ue.row(format_args!("{:.3} {:.3} 0 {:.3}", x, y, time))?;
        summary.ue_rows += 1;

        for (slot, band) in [lower.clone(), upper.clone()].into_iter().enumerate() {
            let Some(best) = nearest(&sites, band, x, y) else {
                continue;
            };
            if let Some(current) = serving[slot] {
                if current != best {
                    handovers.row(format_args!(
                        "{:.6} {} {} {} {}",
                        time,
                        config.imsi,
                        rnti,
                        cell_id_for_index(current),
                        cell_id_for_index(best)
                    ))?;
                    summary.handovers += 1;
                }
            }
            serving[slot] = Some(best);

            let distance = sites[best].distance(x, y).max(1.0);
            let value = 60.0 - 20.0 * distance.log10() + jitter(&mut rng, config.noise);
            sinr.row(format_args!(
                "{:.6} {} {} {:.6}",
                time,
                config.imsi,
                cell_id_for_index(best),
                value
            ))?;
            summary.sinr_rows += 1;
        }

        for (idx, writer) in throughput.iter_mut().enumerate() {
            let phase = 2.0 * PI * progress + idx as f64;
            let value = 300.0 + 150.0 * phase.sin() + jitter(&mut rng, config.noise * 10.0);
            writer.row(format_args!("{:.3} {:.3}", time, value.max(0.0)))?;
        }
        for writer in tb_sinr.iter_mut() {
            let value = 30.0 + 15.0 * (4.0 * PI * progress).cos() + jitter(&mut rng, config.noise);
            writer.row(format_args!("{:.4} {:.4}", time, value))?;
        }
    }

    ue.finish()?;
    handovers.finish()?;
    sinr.finish()?;
    for writer in throughput.into_iter().chain(tb_sinr) {
        writer.finish()?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmwcore::frame::{ConnectorKind, SpatialAssembler};
    use mmwcore::trace::HandoverBand;
    use mmwcore::FrameSource;
    use tempfile::TempDir;

    #[test]
    fn default_layout_matches_the_cell_numbering_convention() {
        let config = GeneratorConfig::default();
        assert_eq!(config.band_threshold(), 6);
        let sites = station_layout(&config);
        assert_eq!(sites.len(), 9);
    }

    #[test]
    fn generated_run_resolves_both_bands() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig::default();
        let summary = write_trace_set(dir.path(), &config).unwrap();
        assert_eq!(summary.ue_rows, config.steps);
        assert!(summary.handovers >= 2);
        assert_eq!(summary.sinr_rows, 2 * config.steps);

        let scene = SpatialAssembler::new(&TraceConfig::default().with_base_dir(dir.path()))
            .produce_frame()
            .unwrap();
        assert!(scene
            .connector(ConnectorKind::Handover(HandoverBand::Upper))
            .is_some());
        assert!(scene
            .connector(ConnectorKind::Handover(HandoverBand::Lower))
            .is_some());
        assert_eq!(scene.obstacles.len(), 2);
    }

    #[test]
    fn same_seed_writes_identical_traces() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let config = GeneratorConfig {
            seed: 42,
            ..GeneratorConfig::default()
        };
        write_trace_set(first.path(), &config).unwrap();
        write_trace_set(second.path(), &config).unwrap();
        let name = TraceConfig::default().spatial.ue_trace;
        assert_eq!(
            std::fs::read_to_string(first.path().join(&name)).unwrap(),
            std::fs::read_to_string(second.path().join(&name)).unwrap()
        );
    }
}
