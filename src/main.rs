use anyhow::Result;
use covidreports::{
    config::ReportConfig,
    export,
    report::{self, Session},
    source::Dataset,
};
use std::{env, path::PathBuf, time::Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = ReportConfig::resolve(config_path.as_deref())?;
    let options = config.report_options()?;
    let kinds = config.report_kinds();
    info!(
        reports = kinds.len(),
        format = config.format.extension(),
        like = ?options.location_like.as_ref().map(|p| p.as_str()),
        out = %config.output_dir.display(),
        "configured"
    );

    // ─── 3) load both datasets ───────────────────────────────────────
    let start = Instant::now();
    let dataset = match &config.bundle {
        Some(zip) => Dataset::load_bundle(zip)?,
        None => Dataset::load(&config.deaths, &config.vaccinations)?,
    };
    info!(elapsed = ?start.elapsed(), "inputs loaded");

    // ─── 4) compute reports in parallel ──────────────────────────────
    let session = Session::new();
    let reports = report::run_reports(&kinds, &dataset, &options, &session);
    debug!(tables = ?session.table_names(), "session tables");

    // ─── 5) export ───────────────────────────────────────────────────
    let mut failed = 0usize;
    for rep in &reports {
        if rep.rows.is_empty() {
            warn!(report = %rep.kind, "no rows; nothing written");
            continue;
        }
        if let Err(e) = export::write_report(rep, &config.output_dir, config.format) {
            error!(report = %rep.kind, "export failed: {:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} reports failed to export", failed, reports.len());
    }
    info!(elapsed = ?start.elapsed(), "all done");
    Ok(())
}
