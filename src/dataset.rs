use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::league::League;
use crate::metrics::{ALL_METRICS, METRIC_COUNT, Metric};

const TEAM_COLUMNS: &[&str] = &["Team", "Team Name"];
const MATCH_COLUMNS: &[&str] = &["Match ID", "MatchId", "Match"];
const DATE_COLUMNS: &[&str] = &["Match Date", "Date"];
const PLAYER_COLUMNS: &[&str] = &["Player", "Player Name"];

/// One player's tracking line for one match.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMatchRecord {
    pub league: League,
    pub team: String,
    pub match_id: String,
    pub player: Option<String>,
    pub match_date: Option<NaiveDate>,
    pub metrics: [f64; METRIC_COUNT],
}

impl PlayerMatchRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        self.metrics[metric.index()]
    }
}

/// Raw rows for one league plus whatever went wrong while reading them.
#[derive(Debug, Clone)]
pub struct LeagueTable {
    pub league: League,
    pub source: PathBuf,
    pub records: Vec<PlayerMatchRecord>,
    pub errors: Vec<String>,
}

impl LeagueTable {
    pub fn empty(league: League, source: PathBuf) -> Self {
        Self {
            league,
            source,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load a league file. Never fails: an unreadable file yields an empty table
/// with the error recorded, so the dashboard can show a "no data" state.
pub fn load_league(data_dir: &Path, league: League) -> LeagueTable {
    let path = league.data_path(data_dir);
    match read_league_csv(&path, league) {
        Ok(table) => {
            log::info!(
                "loaded {} rows for {} from {}",
                table.records.len(),
                league.key(),
                path.display()
            );
            for err in &table.errors {
                log::warn!("{}: {err}", league.key());
            }
            table
        }
        Err(err) => {
            log::warn!("failed loading {}: {err:#}", league.key());
            let mut table = LeagueTable::empty(league, path);
            table.errors.push(format!("{err:#}"));
            table
        }
    }
}

pub fn read_league_csv(path: &Path, league: League) -> Result<LeagueTable> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let (records, errors) = parse_league_csv(file, league)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(LeagueTable {
        league,
        source: path.to_path_buf(),
        records,
        errors,
    })
}

struct ColumnMap {
    team: usize,
    match_id: usize,
    date: Option<usize>,
    player: Option<usize>,
    metrics: [Option<usize>; METRIC_COUNT],
}

/// First alias (in priority order) present in the header row.
fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(n))
    })
}

fn map_columns(headers: &StringRecord) -> Result<ColumnMap> {
    let team = find_column(headers, TEAM_COLUMNS).ok_or_else(|| anyhow!("missing `Team` column"))?;
    let match_id =
        find_column(headers, MATCH_COLUMNS).ok_or_else(|| anyhow!("missing `Match ID` column"))?;
    let mut metrics = [None; METRIC_COUNT];
    for metric in ALL_METRICS {
        metrics[metric.index()] = find_column(headers, &[metric.column()]);
    }
    Ok(ColumnMap {
        team,
        match_id,
        date: find_column(headers, DATE_COLUMNS),
        player: find_column(headers, PLAYER_COLUMNS),
        metrics,
    })
}

/// Decode league rows from any CSV source. Returns the records and a list of
/// non-fatal warnings (missing metric columns, skipped rows, bad numbers).
pub fn parse_league_csv<R: Read>(
    reader: R,
    league: League,
) -> Result<(Vec<PlayerMatchRecord>, Vec<String>)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().context("read csv header")?.clone();
    let columns = map_columns(&headers)?;

    let mut errors = Vec::new();
    let missing: Vec<&str> = ALL_METRICS
        .iter()
        .filter(|m| columns.metrics[m.index()].is_none())
        .map(|m| m.column())
        .collect();
    if !missing.is_empty() {
        errors.push(format!("missing metric columns read as 0: {}", missing.join(", ")));
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut bad_numbers = 0usize;
    for (idx, row) in rdr.records().enumerate() {
        let row = row.with_context(|| format!("read csv row {}", idx + 2))?;
        let team = row.get(columns.team).unwrap_or("").trim();
        let match_id = row.get(columns.match_id).unwrap_or("").trim();
        if team.is_empty() || match_id.is_empty() {
            skipped += 1;
            continue;
        }

        let mut metrics = [0.0; METRIC_COUNT];
        for (slot, col) in metrics.iter_mut().zip(columns.metrics.iter()) {
            let Some(col) = col else { continue };
            let raw = row.get(*col).unwrap_or("");
            match parse_number(raw) {
                Some(v) => *slot = v,
                None if raw.trim().is_empty() => {}
                None => bad_numbers += 1,
            }
        }

        records.push(PlayerMatchRecord {
            league,
            team: team.to_string(),
            match_id: match_id.to_string(),
            player: columns
                .player
                .and_then(|c| row.get(c))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            match_date: columns.date.and_then(|c| row.get(c)).and_then(parse_match_date),
            metrics,
        });
    }

    if skipped > 0 {
        errors.push(format!("skipped {skipped} rows without team or match id"));
    }
    if bad_numbers > 0 {
        errors.push(format!("{bad_numbers} unparseable metric cells read as 0"));
    }
    Ok((records, errors))
}

/// Best-effort date parsing; `None` for anything unrecognised.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y", "%Y%m%d"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Drop a trailing zone designator like `Z` or `+09:00`.
    let s = s.trim_end_matches('Z');
    let s = match s.get(19..) {
        Some(tail) if tail.starts_with('+') || tail.starts_with('-') => &s[..19],
        _ => s,
    };
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned = s.replace(',', "");
    let v = cleaned.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}
