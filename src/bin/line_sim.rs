//! CLI adapter for the fastener-line simulator: argument parsing,
//! configuration loading, a progress bar during `step_until`, and a
//! minimal HTML report writer. Grounded in
//! `roboregress/scripts/run_sim.py`; no simulation logic lives here — per
//! spec.md §1 the CLI surface is a thin external collaborator, not part of
//! the core.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use fastener_line_sim::{
    build_runtime, missed_fasteners_report, overall_report, robot_reports, SimConfig, Simulation,
};

#[derive(Parser, Debug)]
#[command(name = "line-sim")]
#[command(about = "Deterministic discrete-event simulator for a fastener-removal manufacturing line")]
struct Cli {
    /// Path to the YAML line configuration.
    #[arg(short, long)]
    config: PathBuf,

    /// Simulated seconds to run. Defaults to an 8-hour shift.
    #[arg(short, long, default_value_t = 28_800)]
    time: u64,

    /// Enable the 3-D visualization collaborator. Out of scope for this
    /// build (spec.md §1 Non-goal); accepted for flag compatibility and
    /// logged as a no-op.
    #[arg(short, long, default_value_t = false)]
    visualize: bool,

    /// Where to write the HTML report. Defaults to the config file's stem
    /// with a `.html` extension.
    #[arg(short, long)]
    save_to: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.visualize {
        tracing::warn!(
            "--visualize was requested, but 3-D visualization is out of scope for this build; ignoring"
        );
    }

    let config = SimConfig::from_path(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let mut sim = build_runtime(&config).context("wiring the configuration into a runnable simulation")?;

    let target = cli.time as f64;
    let progress = ProgressBar::new(cli.time);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}s",
        )
        .expect("the progress bar template is a fixed, valid string literal")
        .progress_chars("#>-"),
    );

    {
        let mut on_progress = |t: f64| progress.set_position(t.min(target) as u64);
        sim.runtime
            .step_until(target, Some(&mut on_progress))
            .context("running the simulation")?;
    }
    progress.finish_with_message("simulation complete");

    let save_to = cli.save_to.clone().unwrap_or_else(|| cli.config.with_extension("html"));
    let html = render_report(&sim, sim.runtime.timestamp());
    std::fs::write(&save_to, html)
        .with_context(|| format!("writing report to {}", save_to.display()))?;

    tracing::info!(path = %save_to.display(), "finished simulation");
    Ok(())
}

/// A minimal, dependency-free HTML table per report accessor — not a
/// templating engine, consistent with full HTML reporting staying out of
/// the core's design content (spec.md §1 Non-goal).
fn render_report(sim: &Simulation, timestamp: f64) -> String {
    let mut robots = robot_reports(&sim.stats);
    robots.sort_by_key(|r| r.cell_id);
    let overall = overall_report(&sim.wood.borrow(), &sim.wood_stats, timestamp);
    let mut missed: Vec<(&str, u64)> = missed_fasteners_report(&sim.wood.borrow()).into_iter().collect();
    missed.sort_by_key(|(name, _)| *name);

    let mut html = String::new();
    html.push_str("<html><head><title>Fastener Line Report</title></head><body>\n");

    html.push_str("<h2>Per-Robot Utilization</h2>\n<table border=\"1\">\n");
    html.push_str(
        "<tr><th>Cell ID</th><th>Surface</th><th>Type</th><th>Work %</th><th>Wait %</th><th>Picked</th></tr>\n",
    );
    for r in &robots {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td><td>{:.1}</td><td>{}</td></tr>",
            r.cell_id,
            r.surface,
            r.type_name,
            r.work_time_ratio * 100.0,
            r.wait_time_ratio * 100.0,
            r.n_picked_fasteners
        );
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Overall</h2>\n<table border=\"1\">\n");
    let _ = writeln!(html, "<tr><th>Total Time (s)</th><td>{:.1}</td></tr>", overall.total_time);
    let _ = writeln!(html, "<tr><th>Total Fasteners Picked</th><td>{}</td></tr>", overall.total_fasteners);
    let _ = writeln!(html, "<tr><th>Processed (ft)</th><td>{:.1}</td></tr>", overall.processed_feet);
    let _ = writeln!(
        html,
        "<tr><th>Throughput (ft / 8h)</th><td>{:.1}</td></tr>",
        overall.throughput_feet_per_8h
    );
    let _ = writeln!(
        html,
        "<tr><th>Board Feet, 2x12 / 8h</th><td>{:.1}</td></tr>",
        overall.board_feet_per_8h_2x12
    );
    html.push_str("</table>\n");

    html.push_str("<h2>Missed Fasteners</h2>\n<table border=\"1\">\n<tr><th>Kind</th><th>Count</th></tr>\n");
    for (name, count) in missed {
        let _ = writeln!(html, "<tr><td>{}</td><td>{}</td></tr>", name, count);
    }
    html.push_str("</table>\n</body></html>\n");

    html
}
