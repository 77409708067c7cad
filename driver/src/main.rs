use anyhow::Context;
use clap::Parser;
use generator::profile::{write_trace_set, GeneratorConfig};
use gui_bridge::bridge::GuiBridge;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Trace-driven driver for the mmWave handover visualizer")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Assemble one frame of every view and print it as JSON
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Split the multiplexed SINR trace into one file per UE/cell pair
    #[arg(long, default_value_t = false)]
    demux: bool,
    /// Write a synthetic trace set into this directory
    #[arg(long)]
    synthesize: Option<PathBuf>,
    #[arg(long, default_value_t = 60)]
    steps: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the tick loops and the HTTP bridge running until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // A freshly synthesized run is watched in place unless a workflow says otherwise.
    let workflow_config = match (args.workflow.as_ref(), args.synthesize.as_ref()) {
        (Some(path), _) => WorkflowConfig::load(path)?,
        (None, Some(dir)) => WorkflowConfig::for_directory(dir),
        (None, None) => WorkflowConfig::default(),
    };

    if let Some(dir) = args.synthesize.as_ref() {
        let generator_config = GeneratorConfig {
            steps: args.steps,
            seed: args.seed,
            ..Default::default()
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating trace directory {}", dir.display()))?;
        let summary = write_trace_set(dir, &generator_config)?;
        println!(
            "Synthetic run -> {} UE rows, {} handovers, {} SINR rows (band threshold {}) in {}",
            summary.ue_rows,
            summary.handovers,
            summary.sinr_rows,
            summary.band_threshold,
            dir.display()
        );
    }

    let runner = Runner::new(workflow_config);

    if args.demux {
        let summary = runner.demux()?;
        println!("Demux -> {} rows", summary.rows);
        for output in &summary.outputs {
            println!("  {}", output.display());
        }
    }

    if args.once {
        let snapshot = runner.execute_once()?;
        let rendered =
            serde_json::to_string_pretty(&snapshot).context("serializing frame snapshot")?;
        println!("{}", rendered);
    }

    if args.serve {
        let gui_bridge = GuiBridge::new();
        gui_bridge.publish_status("tick loops running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the tick loops")?;
        runtime.block_on(gui_bridge.serve(&runner))?;
    }

    Ok(())
}
