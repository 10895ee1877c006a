use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use csv::Writer;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::league::{ALL_LEAGUES, League};
use crate::metrics::{ALL_METRICS, METRIC_COUNT, Metric};

const PLAYERS_PER_MATCH: usize = 14;

fn seed_teams(league: League) -> &'static [&'static str] {
    match league {
        League::J1 => &[
            "Kashima Antlers",
            "Urawa Red Diamonds",
            "Kawasaki Frontale",
            "Yokohama F. Marinos",
            "Gamba Osaka",
            "Vissel Kobe",
            "Sanfrecce Hiroshima",
            "Nagoya Grampus",
        ],
        League::J2 => &[
            "Vegalta Sendai",
            "Omiya Ardija",
            "JEF United Ichihara Chiba",
            "Ventforet Kofu",
            "Jubilo Iwata",
            "Sagan Tosu",
        ],
        League::J3 => &[
            "Vanraure Hachinohe",
            "Tochigi SC",
            "SC Sagamihara",
            "FC Gifu",
            "FC Osaka",
            "Nara Club",
        ],
    }
}

/// Synthetic player-match rows for one league: a double round robin with
/// plausible per-player physical numbers. Match ids are shuffled so they do not
/// follow kickoff order.
pub fn generate_league_rows(league: League, rng: &mut impl Rng) -> Vec<Vec<String>> {
    let teams = seed_teams(league);
    let mut rows = Vec::new();
    let season_start = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap_or_default();

    let mut fixtures = Vec::new();
    for (i, home) in teams.iter().enumerate() {
        for (j, away) in teams.iter().enumerate() {
            if i != j {
                fixtures.push((*home, *away));
            }
        }
    }

    for (round, (home, away)) in fixtures.iter().enumerate() {
        let match_id = 10_000 + rng.gen_range(0..90_000u32);
        let match_id = format!("{match_id}{round:03}");
        let date = season_start + Duration::days((round / (teams.len() / 2)) as i64 * 7);
        // Roughly one match in forty loses its sprint tracking.
        let sprint_failure = rng.gen_bool(0.025);
        for team in [home, away] {
            for p in 0..PLAYERS_PER_MATCH {
                let minutes = if p < 11 { 90.0 } else { rng.gen_range(5.0..35.0) };
                let values = player_metrics(rng, minutes, sprint_failure);
                let mut row = vec![
                    format!("{} #{}", team, p + 1),
                    team.to_string(),
                    match_id.clone(),
                    date.format("%Y-%m-%d").to_string(),
                ];
                row.extend(values.iter().map(|v| format!("{v:.1}")));
                rows.push(row);
            }
        }
    }
    rows
}

fn player_metrics(rng: &mut impl Rng, minutes: f64, sprint_failure: bool) -> [f64; METRIC_COUNT] {
    let share = minutes / 90.0;
    let mut out = [0.0; METRIC_COUNT];

    let distance = rng.gen_range(9_500.0..12_000.0) * share;
    let running = distance * rng.gen_range(0.18..0.26);
    let hsr = running * rng.gen_range(0.30..0.40);
    let sprint_distance = hsr * rng.gen_range(0.25..0.40);
    let sprint_count = if sprint_failure {
        0.0
    } else {
        (rng.gen_range(8.0..28.0) * share).round()
    };
    let hi_distance = hsr + sprint_distance;
    let hi_count = (rng.gen_range(40.0..90.0) * share).round();
    let tip = rng.gen_range(0.40..0.60);

    out[Metric::Distance.index()] = distance;
    out[Metric::RunningDistance.index()] = running;
    out[Metric::HsrDistance.index()] = hsr;
    out[Metric::SprintCount.index()] = sprint_count;
    out[Metric::HiDistance.index()] = hi_distance;
    out[Metric::HiCount.index()] = hi_count;
    split(&mut out, Metric::DistanceTip, Metric::DistanceOtip, distance, tip);
    split(&mut out, Metric::RunningDistanceTip, Metric::RunningDistanceOtip, running, tip);
    split(&mut out, Metric::HsrDistanceTip, Metric::HsrDistanceOtip, hsr, tip);
    split(&mut out, Metric::HsrCountTip, Metric::HsrCountOtip, (hi_count * 0.6).round(), tip);
    split(&mut out, Metric::SprintDistanceTip, Metric::SprintDistanceOtip, sprint_distance, tip);
    split(&mut out, Metric::SprintCountTip, Metric::SprintCountOtip, sprint_count, tip);
    out
}

fn split(out: &mut [f64; METRIC_COUNT], tip: Metric, otip: Metric, value: f64, share: f64) {
    out[tip.index()] = value * share;
    out[otip.index()] = value * (1.0 - share);
}

pub fn header() -> Vec<String> {
    let mut header = vec![
        "Player".to_string(),
        "Team".to_string(),
        "Match ID".to_string(),
        "Match Date".to_string(),
    ];
    header.extend(ALL_METRICS.iter().map(|m| m.column().to_string()));
    header
}

pub fn write_league_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(header()).context("write header")?;
    for row in rows {
        writer.write_record(row).context("write row")?;
    }
    writer.flush().context("flush csv")?;
    Ok(())
}

/// Write demo files for every league into `dir`. Same seed, same files.
pub fn write_demo_leagues(dir: &Path, seed: u64) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut written = Vec::new();
    for league in ALL_LEAGUES {
        let path = league.data_path(dir);
        let rows = generate_league_rows(league, &mut rng);
        write_league_csv(&path, &rows)?;
        log::info!("wrote {} demo rows to {}", rows.len(), path.display());
        written.push(path);
    }
    Ok(written)
}
