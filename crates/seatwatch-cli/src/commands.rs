use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use colored::Colorize;

use seatwatch_diff::diff_sections;
use seatwatch_source::{load_snapshots, JsonFileSource, StaticSource};
use seatwatch_tracker::{SectionTracker, TrackerConfig};
use seatwatch_types::{Change, SectionId, SectionSnapshot};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli { command, format, .. } = cli;
    match command {
        Command::Watch(args) => cmd_watch(args).await,
        Command::Check(args) => cmd_check(args, &format).await,
        Command::Diff(args) => cmd_diff(args, &format).await,
        Command::Show(args) => cmd_show(args, &format).await,
    }
}

async fn load(path: &Path) -> anyhow::Result<Vec<SectionSnapshot>> {
    load_snapshots(path)
        .await
        .with_context(|| format!("cannot load sections from {}", path.display()))
}

async fn cmd_watch(args: WatchArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(secs) = args.interval {
        config.interval_secs = secs;
    }
    if let Some(path) = args.export {
        config.export = true;
        config.export_path = Some(path);
    }
    config.live_print = !args.quiet;
    config.validate()?;

    let seed = load(&args.sections).await?;
    let source = Arc::new(JsonFileSource::new(args.sections.clone()));
    let tracker = SectionTracker::builder(source)
        .seed(seed)
        .config(&config)
        .build()?;
    tracker.start(config.interval(), config.initial_delay())?;

    println!(
        "{} Watching {} sections every {}s {}",
        "✓".green().bold(),
        tracker.tracked().len().to_string().bold(),
        config.interval_secs,
        "(Ctrl-C to stop)".dimmed()
    );
    if let Some(path) = &config.export_path {
        println!("  Exporting to {}", path.display().to_string().cyan());
    }

    tokio::signal::ctrl_c().await?;

    let history = tracker.history();
    let changes: usize = history.iter().map(|r| r.change_count()).sum();
    println!(
        "\nStopped. {} cycles with changes, {} changes in total.",
        history.len().to_string().bold(),
        changes.to_string().bold()
    );
    Ok(())
}

async fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let seed = load(&args.sections).await?;
    let fresh = load(&args.against).await?;
    let tracker = SectionTracker::builder(Arc::new(StaticSource::with_snapshots(fresh)))
        .seed(seed)
        .build()?;
    let report = tracker.run_cycle().await?;

    if let OutputFormat::Json = format {
        let changes: Vec<&Change> = report.changes.values().flatten().collect();
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }

    for (section, changes) in &report.changes {
        print_section_changes(section, changes);
    }
    if report.is_quiet() {
        println!("No changes.");
    }
    let unavailable = if report.failed == 0 {
        "0".normal()
    } else {
        report.failed.to_string().red()
    };
    println!(
        "{} fetched, {} unavailable, {} changes in {} sections",
        report.fetched.to_string().bold(),
        unavailable,
        report.change_count().to_string().bold(),
        report.changes.len()
    );
    Ok(())
}

async fn cmd_diff(args: DiffArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let old = by_identity(load(&args.old).await?);
    let new = by_identity(load(&args.new).await?);
    let at = Local::now();

    let mut changed = BTreeMap::new();
    for (id, before) in &old {
        if let Some(after) = new.get(id) {
            let diff = diff_sections(before, after, at)?;
            if !diff.is_empty() {
                changed.insert(id.clone(), diff.into_changes());
            }
        }
    }

    if let OutputFormat::Json = format {
        let changes: Vec<&Change> = changed.values().flatten().collect();
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }

    for (section, changes) in &changed {
        print_section_changes(section, changes);
    }
    for id in old.keys().filter(|id| !new.contains_key(*id)) {
        println!("{} {}", "only in old:".dimmed(), id.to_string().yellow());
    }
    for id in new.keys().filter(|id| !old.contains_key(*id)) {
        println!("{} {}", "only in new:".dimmed(), id.to_string().yellow());
    }
    if changed.is_empty() {
        println!("No changes.");
    }
    Ok(())
}

async fn cmd_show(args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let snapshots = load(&args.sections).await?;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No sections.");
    }
    for snapshot in &snapshots {
        let status = if snapshot.seats().is_full() {
            "FULL".red().bold()
        } else {
            "open".green()
        };
        println!(
            "{}  {}  term {}  {}  [{}]",
            snapshot.id().to_string().yellow().bold(),
            snapshot.activity(),
            snapshot.term(),
            snapshot.instructor().cyan(),
            status
        );
        for line in snapshot.seats().to_string().lines() {
            println!("  {line}");
        }
    }
    Ok(())
}

fn by_identity(snapshots: Vec<SectionSnapshot>) -> BTreeMap<SectionId, SectionSnapshot> {
    let mut map = BTreeMap::new();
    for snapshot in snapshots {
        map.entry(snapshot.id().clone()).or_insert(snapshot);
    }
    map
}

fn print_section_changes(section: &SectionId, changes: &[Change]) {
    println!("{}", section.to_string().yellow().bold());
    for change in changes {
        println!(
            "  {}: {} -> {}",
            change.field(),
            change.old_value().red(),
            change.new_value().green()
        );
    }
}
