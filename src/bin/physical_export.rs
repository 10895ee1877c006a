use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use physical_terminal::aggregate::{self, Matchdays, Method};
use physical_terminal::config::AppConfig;
use physical_terminal::dataset;
use physical_terminal::export;
use physical_terminal::league::League;
use physical_terminal::metrics::Metric;

fn main() -> Result<()> {
    let config = AppConfig::load();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let league = match arg_value(&args, "--league") {
        Some(raw) => League::parse(&raw).ok_or_else(|| anyhow!("unknown league `{raw}`"))?,
        None => config.default_league,
    };
    let metric = match arg_value(&args, "--metric") {
        Some(raw) => Metric::from_column(&raw).ok_or_else(|| anyhow!("unknown metric `{raw}`"))?,
        None => Metric::Distance,
    };
    let method = match arg_value(&args, "--method") {
        Some(raw) => Method::parse(&raw).ok_or_else(|| anyhow!("unknown method `{raw}`"))?,
        None => Method::Max,
    };
    let data_dir = arg_value(&args, "--data")
        .map(PathBuf::from)
        .unwrap_or(config.data_dir);

    let table = dataset::load_league(&data_dir, league);
    for err in &table.errors {
        eprintln!("warning: {err}");
    }

    let totals = aggregate::team_match_totals(&table.records);
    let matchdays = Matchdays::from_totals(&totals);
    let ranking = aggregate::rank_teams(&totals, metric, method);

    println!("{} Team {} Ranking: {}", league.key(), method.label(), ranking.title());
    if ranking.is_empty() {
        println!("No data");
        return Ok(());
    }
    for (idx, row) in ranking.rows.iter().enumerate() {
        println!(
            "{:>3}. {:<32} {:>12.2}  ({} matches)",
            idx + 1,
            row.team,
            row.display_value(),
            row.matches
        );
    }

    let out = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export_dir.join(export::default_export_name(league, &ranking)));
    let report = export::export_ranking(&out, league, &ranking, &totals, &matchdays)
        .context("export ranking workbook")?;
    println!(
        "Wrote {} teams and {} match totals to {}",
        report.ranking_rows,
        report.total_rows,
        report.path.display()
    );
    Ok(())
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
