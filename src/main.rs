use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use semantic_releaser::cli::Args;
use semantic_releaser::config::load_config;
use semantic_releaser::git::Git2Repository;
use semantic_releaser::hooks::ShellRunner;
use semantic_releaser::release::Releaser;
use semantic_releaser::ui;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    let repo = Git2Repository::open(".").context("Not inside a git working tree")?;

    if config.dry_run {
        ui::display_status("Dry run: no files, commits, tags or pushes will be written");
    }

    let releaser = Releaser::new(repo, ShellRunner, config);
    let report = match releaser.run_all() {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_report(&report);

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
