use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    self, LeagueOverview, Matchdays, Method, Ranking, ScatterPoint, TeamMatchTotal, TrendSeries,
};
use crate::dataset::LeagueTable;
use crate::league::League;
use crate::metrics::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Ranking,
    Scatter,
    Trend,
    Detail,
}

impl View {
    pub fn next(self) -> View {
        match self {
            View::Ranking => View::Scatter,
            View::Scatter => View::Trend,
            View::Trend => View::Detail,
            View::Detail => View::Ranking,
        }
    }
}

pub fn view_label(view: View) -> &'static str {
    match view {
        View::Ranking => "RANKING",
        View::Scatter => "SCATTER",
        View::Trend => "TREND",
        View::Detail => "DETAIL",
    }
}

/// What the user has picked. Everything else in `AppState` derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub league: League,
    pub metric: Metric,
    pub method: Method,
    pub view: View,
    pub scatter_x: Metric,
}

impl Selection {
    pub fn new(league: League) -> Self {
        Self {
            league,
            metric: Metric::Distance,
            method: Method::Max,
            view: View::Ranking,
            scatter_x: Metric::Distance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub selection: Selection,
    pub table: Option<Arc<LeagueTable>>,
    pub totals: Vec<TeamMatchTotal>,
    pub matchdays: Matchdays,
    pub overview: LeagueOverview,
    pub ranking: Ranking,
    pub scatter: Vec<ScatterPoint>,
    pub trends: Vec<TrendSeries>,
    pub scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    /// Last table per league whose load warnings reached the console.
    warned: HashMap<League, Weak<LeagueTable>>,
}

impl AppState {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            table: None,
            totals: Vec::new(),
            matchdays: Matchdays::default(),
            overview: LeagueOverview::default(),
            ranking: Ranking {
                metric: selection.metric,
                method: selection.method,
                rows: Vec::new(),
            },
            scatter: Vec::new(),
            trends: Vec::new(),
            scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
            warned: HashMap::new(),
        }
    }

    /// Swap in a freshly loaded league table and rebuild everything derived from it.
    pub fn set_table(&mut self, table: Arc<LeagueTable>) {
        let already_warned = self
            .warned
            .get(&table.league)
            .and_then(Weak::upgrade)
            .is_some_and(|seen| Arc::ptr_eq(&seen, &table));
        if !already_warned {
            for err in &table.errors {
                self.push_log(format!("[WARN] {}: {err}", table.league.key()));
            }
            self.warned.insert(table.league, Arc::downgrade(&table));
        }
        self.totals = aggregate::team_match_totals(&table.records);
        self.matchdays = Matchdays::from_totals(&self.totals);
        self.overview = aggregate::league_overview(&table, &self.totals);
        self.push_log(format!(
            "[INFO] {} loaded: {} rows, {} teams, {} team-matches",
            table.league.key(),
            self.overview.player_rows,
            self.overview.teams,
            self.overview.team_matches
        ));
        self.table = Some(table);
        self.scroll = 0;
        self.recompute();
    }

    /// Rebuild ranking, scatter and trend for the current selection.
    pub fn recompute(&mut self) {
        let sel = self.selection;
        self.ranking = aggregate::rank_teams(&self.totals, sel.metric, sel.method);
        self.scatter = aggregate::scatter_points(&self.totals, sel.scatter_x, sel.metric, sel.method);
        self.trends = aggregate::trend_series(&self.totals, &self.matchdays, sel.metric);
        if self.ranking.is_empty() && !self.totals.is_empty() {
            self.push_log(format!(
                "[INFO] No non-zero {} values in {}",
                sel.metric.column(),
                sel.league.key()
            ));
        }
    }

    pub fn has_data(&self) -> bool {
        !self.ranking.is_empty()
    }

    /// Returns the newly selected league; the caller loads its table.
    pub fn cycle_league(&mut self) -> League {
        self.selection.league = self.selection.league.next();
        self.table = None;
        self.totals.clear();
        self.matchdays = Matchdays::default();
        self.overview = LeagueOverview::default();
        self.scroll = 0;
        self.recompute();
        self.selection.league
    }

    pub fn next_metric(&mut self) {
        self.selection.metric = self.selection.metric.next();
        self.scroll = 0;
        self.recompute();
    }

    pub fn prev_metric(&mut self) {
        self.selection.metric = self.selection.metric.prev();
        self.scroll = 0;
        self.recompute();
    }

    pub fn cycle_method(&mut self) {
        self.selection.method = self.selection.method.next();
        self.scroll = 0;
        self.recompute();
    }

    pub fn cycle_scatter_x(&mut self) {
        self.selection.scatter_x = self.selection.scatter_x.next();
        self.recompute();
    }

    pub fn cycle_view(&mut self) {
        self.selection.view = self.selection.view.next();
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self) {
        let max = self.scroll_len().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn scroll_len(&self) -> usize {
        match self.selection.view {
            View::Ranking => self.ranking.rows.len(),
            View::Scatter => self.scatter.len(),
            View::Trend => self.trends.len(),
            View::Detail => self.totals.len(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
