mod report;

use anyhow::Context;
use clap::Parser;
use selene::aspects::{audit_chart, AspectCalculator, AspectEvaluator};
use selene::EvaluatorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Args {
    /// Chart JSON: `{ "label": ..., "bodies": [{ "id", "longitude", "speed", "distinguished" }] }`.
    #[arg(long)]
    chart: PathBuf,

    /// Settings file (otherwise configs/selene.toml, falling back to built-in defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the full report as JSON.
    #[arg(long, default_value = "target/selene_audit/audit.json")]
    out: PathBuf,

    /// Override the forward projection step (days).
    #[arg(long)]
    time_step: Option<f64>,

    /// Override the default orb filter (degrees).
    #[arg(long)]
    orb: Option<f64>,

    /// Number of disagreements to print.
    #[arg(long, default_value_t = 10)]
    show: usize,
}

fn load_settings(args: &Args) -> anyhow::Result<selene_config::SeleneSettings> {
    match &args.config {
        Some(path) => selene_config::load_settings_from(path),
        None => match selene_config::load_settings() {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("{e}; using built-in defaults");
                selene_config::parse_settings("")
            }
        },
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = load_settings(&args)?;
    let config = EvaluatorConfig::new(
        args.time_step.unwrap_or(settings.evaluator.time_step_days),
        args.orb.unwrap_or(settings.evaluator.orb_filter_deg),
    )
    .context("Invalid --time-step/--orb override")?;
    let calculator = AspectCalculator::new(AspectEvaluator::new(config)?);

    let chart = report::load_chart(&args.chart)?;
    eprintln!(
        "[selene_audit] chart: {} ({} bodies), step={}d orb={}°",
        chart.label,
        chart.bodies.len(),
        config.time_step_days,
        config.orb_filter_deg
    );

    let audit = audit_chart(&calculator, &chart, &settings.aspect_settings)
        .with_context(|| format!("Failed to audit {}", args.chart.display()))?;
    report::print_report(&audit, args.show);

    report::write_report_json(&args.out, &audit)?;
    eprintln!("[selene_audit] report -> {}", args.out.display());
    Ok(())
}
