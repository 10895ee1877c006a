use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::{LeagueTable, PlayerMatchRecord};
use crate::metrics::{METRIC_COUNT, Metric, to_display};

/// Reduction applied across a team's match totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Max,
    Min,
    Average,
    Total,
}

pub const ALL_METHODS: [Method; 4] = [Method::Max, Method::Min, Method::Average, Method::Total];

impl Method {
    pub fn label(self) -> &'static str {
        match self {
            Method::Max => "Max",
            Method::Min => "Min",
            Method::Average => "Average",
            Method::Total => "Total",
        }
    }

    pub fn next(self) -> Method {
        match self {
            Method::Max => Method::Min,
            Method::Min => Method::Average,
            Method::Average => Method::Total,
            Method::Total => Method::Max,
        }
    }

    pub fn parse(raw: &str) -> Option<Method> {
        let s = raw.trim().to_ascii_lowercase();
        match s.as_str() {
            "max" | "maximum" => Some(Method::Max),
            "min" | "minimum" => Some(Method::Min),
            "average" | "avg" | "mean" => Some(Method::Average),
            "total" | "sum" => Some(Method::Total),
            _ => None,
        }
    }

    /// Min ranks smallest first; everything else ranks largest first.
    pub fn ascending(self) -> bool {
        matches!(self, Method::Min)
    }

    fn reduce(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let v = match self {
            Method::Total => values.iter().sum(),
            Method::Average => values.iter().sum::<f64>() / values.len() as f64,
            Method::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Method::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        };
        Some(v)
    }
}

/// Sum of every metric over all players of one team in one match.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMatchTotal {
    pub team: String,
    pub match_id: String,
    pub match_date: Option<NaiveDate>,
    pub players: usize,
    pub metrics: [f64; METRIC_COUNT],
}

impl TeamMatchTotal {
    pub fn value(&self, metric: Metric) -> f64 {
        self.metrics[metric.index()]
    }
}

/// Collapse player rows into one row per (team, match id), keeping first-appearance order.
pub fn team_match_totals(records: &[PlayerMatchRecord]) -> Vec<TeamMatchTotal> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out: Vec<TeamMatchTotal> = Vec::new();

    for rec in records {
        let key = (rec.team.as_str(), rec.match_id.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            out.push(TeamMatchTotal {
                team: rec.team.clone(),
                match_id: rec.match_id.clone(),
                match_date: None,
                players: 0,
                metrics: [0.0; METRIC_COUNT],
            });
            out.len() - 1
        });
        let total = &mut out[slot];
        total.players += 1;
        if total.match_date.is_none() {
            total.match_date = rec.match_date;
        }
        for (acc, v) in total.metrics.iter_mut().zip(rec.metrics.iter()) {
            *acc += v;
        }
    }

    out
}

/// Drop team-match rows whose total for `metric` is exactly zero (measurement failure).
/// Only the analysed column is checked.
pub fn filter_zero_matches(totals: &[TeamMatchTotal], metric: Metric) -> Vec<&TeamMatchTotal> {
    totals.iter().filter(|t| t.value(metric) != 0.0).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRanking {
    pub team: String,
    pub metric: Metric,
    pub method: Method,
    /// Raw value in storage units.
    pub value: f64,
    pub matches: usize,
}

impl TeamRanking {
    pub fn display_value(&self) -> f64 {
        to_display(self.metric, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub metric: Metric,
    pub method: Method,
    pub rows: Vec<TeamRanking>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, team: &str) -> Option<&TeamRanking> {
        self.rows.iter().find(|r| r.team == team)
    }

    pub fn title(&self) -> String {
        format!("{} of {}", self.method.label(), self.metric.display_name())
    }
}

/// Zero-filter, group by team and reduce. Rows come back in ranking order:
/// descending for Max/Average/Total, ascending for Min, ties by team name.
pub fn rank_teams(totals: &[TeamMatchTotal], metric: Metric, method: Method) -> Ranking {
    let mut per_team: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for t in filter_zero_matches(totals, metric) {
        per_team.entry(t.team.as_str()).or_default().push(t.value(metric));
    }

    let mut rows: Vec<TeamRanking> = per_team
        .into_iter()
        .filter_map(|(team, values)| {
            let value = method.reduce(&values)?;
            Some(TeamRanking {
                team: team.to_string(),
                metric,
                method,
                value,
                matches: values.len(),
            })
        })
        .collect();
    sort_rows(&mut rows, method);

    log::debug!(
        "ranked {} teams on {} ({})",
        rows.len(),
        metric.column(),
        method.label()
    );
    Ranking {
        metric,
        method,
        rows,
    }
}

fn sort_rows(rows: &mut [TeamRanking], method: Method) {
    rows.sort_by(|a, b| {
        let by_value = if method.ascending() {
            a.value.total_cmp(&b.value)
        } else {
            b.value.total_cmp(&a.value)
        };
        match by_value {
            Ordering::Equal => a.team.cmp(&b.team),
            other => other,
        }
    });
}

/// Per-team sequential match numbers, starting at 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matchdays {
    map: HashMap<(String, String), u32>,
}

impl Matchdays {
    pub fn get(&self, team: &str, match_id: &str) -> Option<u32> {
        self.map.get(&(team.to_string(), match_id.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn from_totals(totals: &[TeamMatchTotal]) -> Self {
        number_matches(
            totals
                .iter()
                .map(|t| (t.team.as_str(), t.match_id.as_str(), t.match_date)),
        )
    }
}

/// Number each team's distinct matches. A team whose matches all carry a date
/// is ordered by date; otherwise by the order its match ids first appear.
pub fn assign_matchdays(records: &[PlayerMatchRecord]) -> Matchdays {
    number_matches(
        records
            .iter()
            .map(|r| (r.team.as_str(), r.match_id.as_str(), r.match_date)),
    )
}

fn number_matches<'a>(
    rows: impl Iterator<Item = (&'a str, &'a str, Option<NaiveDate>)>,
) -> Matchdays {
    // team -> matches in encounter order with their first known date
    let mut per_team: HashMap<&str, Vec<(&str, Option<NaiveDate>)>> = HashMap::new();
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();

    for (team, match_id, date) in rows {
        let matches = per_team.entry(team).or_default();
        match seen.get(&(team, match_id)) {
            Some(&pos) => {
                if matches[pos].1.is_none() {
                    matches[pos].1 = date;
                }
            }
            None => {
                seen.insert((team, match_id), matches.len());
                matches.push((match_id, date));
            }
        }
    }

    let mut map = HashMap::new();
    for (team, mut matches) in per_team {
        if matches.iter().all(|(_, d)| d.is_some()) {
            // stable: same-day matches keep encounter order
            matches.sort_by_key(|(_, d)| *d);
        }
        for (idx, (match_id, _)) in matches.into_iter().enumerate() {
            map.insert((team.to_string(), match_id.to_string()), idx as u32 + 1);
        }
    }
    Matchdays { map }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub team: String,
    /// (matchday, raw value) ordered by matchday.
    pub points: Vec<(u32, f64)>,
}

/// Per-team season line for one metric. Zero totals are left out.
pub fn trend_series(
    totals: &[TeamMatchTotal],
    matchdays: &Matchdays,
    metric: Metric,
) -> Vec<TrendSeries> {
    let mut per_team: BTreeMap<&str, Vec<(u32, f64)>> = BTreeMap::new();
    for t in filter_zero_matches(totals, metric) {
        let Some(day) = matchdays.get(&t.team, &t.match_id) else {
            continue;
        };
        per_team
            .entry(t.team.as_str())
            .or_default()
            .push((day, t.value(metric)));
    }

    per_team
        .into_iter()
        .map(|(team, mut points)| {
            points.sort_by_key(|(day, _)| *day);
            TrendSeries {
                team: team.to_string(),
                points,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub team: String,
    /// Raw values; scale with each axis metric's unit policy.
    pub x: f64,
    pub y: f64,
}

/// One point per team with a ranking value on both metrics, ordered by team.
pub fn scatter_points(
    totals: &[TeamMatchTotal],
    x_metric: Metric,
    y_metric: Metric,
    method: Method,
) -> Vec<ScatterPoint> {
    let x_rank = rank_teams(totals, x_metric, method);
    let y_rank = rank_teams(totals, y_metric, method);
    let y_by_team: HashMap<&str, f64> = y_rank
        .rows
        .iter()
        .map(|r| (r.team.as_str(), r.value))
        .collect();

    let mut points: Vec<ScatterPoint> = x_rank
        .rows
        .iter()
        .filter_map(|r| {
            let y = y_by_team.get(r.team.as_str())?;
            Some(ScatterPoint {
                team: r.team.clone(),
                x: r.value,
                y: *y,
            })
        })
        .collect();
    points.sort_by(|a, b| a.team.cmp(&b.team));
    points
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueOverview {
    pub player_rows: usize,
    pub teams: usize,
    pub matches: usize,
    pub team_matches: usize,
    pub warnings: usize,
}

pub fn league_overview(table: &LeagueTable, totals: &[TeamMatchTotal]) -> LeagueOverview {
    let teams: HashSet<&str> = totals.iter().map(|t| t.team.as_str()).collect();
    let matches: HashSet<&str> = totals.iter().map(|t| t.match_id.as_str()).collect();
    LeagueOverview {
        player_rows: table.records.len(),
        teams: teams.len(),
        matches: matches.len(),
        team_matches: totals.len(),
        warnings: table.errors.len(),
    }
}
