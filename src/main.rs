use std::fs::OpenOptions;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
};

use physical_terminal::cache::LeagueCache;
use physical_terminal::config::AppConfig;
use physical_terminal::export;
use physical_terminal::league::league_label;
use physical_terminal::metrics::to_display;
use physical_terminal::palette::team_color;
use physical_terminal::persist;
use physical_terminal::state::{AppState, Selection, View, view_label};

struct App {
    state: AppState,
    cache: LeagueCache,
    config: AppConfig,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let selection =
            persist::load_selection().unwrap_or_else(|| Selection::new(config.default_league));
        let mut app = Self {
            state: AppState::new(selection),
            cache: LeagueCache::new(config.data_dir.clone(), config.cache_ttl),
            config,
            should_quit: false,
        };
        app.load_league();
        app
    }

    fn load_league(&mut self) {
        let table = self.cache.get(self.state.selection.league);
        if table.is_empty() {
            self.state.push_log(format!(
                "[WARN] No data for {} in {}",
                table.league.key(),
                self.cache.data_dir().display()
            ));
        }
        self.state.set_table(table);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.state.cycle_league();
                self.load_league();
            }
            KeyCode::Char('m') => self.state.next_metric(),
            KeyCode::Char('M') => self.state.prev_metric(),
            KeyCode::Char('a') | KeyCode::Char('A') => self.state.cycle_method(),
            KeyCode::Char('v') | KeyCode::Char('V') | KeyCode::Tab => self.state.cycle_view(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.state.cycle_scatter_x(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.cache.invalidate(self.state.selection.league);
                self.state.push_log("[INFO] Reloading league data");
                self.load_league();
            }
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn export(&mut self) {
        if !self.state.has_data() {
            self.state.push_log("[WARN] Nothing to export");
            return;
        }
        let league = self.state.selection.league;
        let name = export::default_export_name(league, &self.state.ranking);
        let path = self.config.export_dir.join(name);
        match export::export_ranking(
            &path,
            league,
            &self.state.ranking,
            &self.state.totals,
            &self.state.matchdays,
        ) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} teams / {} match totals to {}",
                report.ranking_rows,
                report.total_rows,
                report.path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn init_logging(config: &AppConfig) {
    // The TUI owns stdout/stderr, so logs only go to a file when one is configured.
    let Some(path) = config.log_file.as_ref() else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> io::Result<()> {
    let config = AppConfig::load();
    init_logging(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = persist::save_selection(&app.state.selection) {
        eprintln!("warning: could not save session: {err:#}");
    }
    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let state = &app.state;
    if state.totals.is_empty() || (!state.has_data() && state.selection.view != View::Detail) {
        render_no_data(frame, chunks[1], state);
    } else {
        match state.selection.view {
            View::Ranking => render_ranking(frame, chunks[1], state),
            View::Scatter => render_scatter(frame, chunks[1], state),
            View::Trend => render_trend(frame, chunks[1], state),
            View::Detail => render_detail(frame, chunks[1], state),
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let sel = &state.selection;
    let line1 = format!(
        "PHYSICAL | {} | {} | {} of {}",
        league_label(sel.league),
        view_label(sel.view),
        sel.method.label(),
        sel.metric.display_name()
    );
    let line2 = match sel.view {
        View::Scatter => format!(
            "x: {}  y: {}",
            sel.scatter_x.display_name(),
            sel.metric.display_name()
        ),
        _ => format!(
            "{} teams | {} team-matches | {} rows",
            state.overview.teams, state.overview.team_matches, state.overview.player_rows
        ),
    };
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "l League | m/M Metric | a Method | v View | x Scatter X | j/k Scroll | e Export | r Reload | ? Help | q Quit"
}

fn render_no_data(frame: &mut Frame, area: Rect, state: &AppState) {
    let msg = if state.totals.is_empty() {
        format!(
            "No data for {}. Check the league CSV or press r to reload.",
            state.selection.league.key()
        )
    } else {
        format!(
            "No team has a non-zero {} value.",
            state.selection.metric.column()
        )
    };
    let empty = Paragraph::new(msg)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(empty, area);
}

fn render_ranking(frame: &mut Frame, area: Rect, state: &AppState) {
    let ranking = &state.ranking;
    let block = Block::default()
        .title(format!(
            "{} Team {} Ranking",
            state.selection.league.key(),
            ranking.method.label()
        ))
        .borders(Borders::ALL);
    let visible = block.inner(area).height as usize;
    let (start, end) = visible_range(state.scroll, ranking.rows.len(), visible);

    // BarChart takes integers; keep two decimals of the displayed value.
    let max = ranking
        .rows
        .iter()
        .map(|r| r.display_value())
        .fold(0.0_f64, f64::max);
    let bars: Vec<Bar> = ranking.rows[start..end]
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let shown = row.display_value();
            Bar::default()
                .value((shown.max(0.0) * 100.0).round() as u64)
                .label(Line::from(format!("{:>2} {}", start + i + 1, row.team)))
                .text_value(format!("{shown:.2}"))
                .style(Style::default().fg(team_color(&row.team)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars))
        .max((max.max(0.0) * 100.0).round() as u64);
    frame.render_widget(chart, area);
}

fn render_scatter(frame: &mut Frame, area: Rect, state: &AppState) {
    let sel = &state.selection;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)])
        .split(area);

    let points: Vec<(String, [(f64, f64); 1])> = state
        .scatter
        .iter()
        .map(|p| {
            (
                p.team.clone(),
                [(to_display(sel.scatter_x, p.x), to_display(sel.metric, p.y))],
            )
        })
        .collect();
    let selected = state.scroll.min(points.len().saturating_sub(1));

    let datasets: Vec<Dataset> = points
        .iter()
        .enumerate()
        .map(|(idx, (team, data))| {
            let marker = if idx == selected {
                symbols::Marker::Block
            } else {
                symbols::Marker::Dot
            };
            Dataset::default()
                .name(team.clone())
                .marker(marker)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(team_color(team)))
                .data(data)
        })
        .collect();

    let xs = points.iter().map(|(_, d)| d[0].0);
    let ys = points.iter().map(|(_, d)| d[0].1);
    let x_bounds = padded_bounds(xs);
    let y_bounds = padded_bounds(ys);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!("{} Team {} Comparison", sel.league.key(), sel.method.label()))
                .borders(Borders::ALL),
        )
        .legend_position(None)
        .x_axis(
            Axis::default()
                .title(sel.scatter_x.display_name())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(sel.metric.display_name())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );
    frame.render_widget(chart, cols[0]);

    let legend_block = Block::default().title("Teams").borders(Borders::ALL);
    let visible = legend_block.inner(cols[1]).height as usize;
    let (start, end) = visible_range(selected, points.len(), visible);
    let lines: Vec<Line> = points[start..end]
        .iter()
        .enumerate()
        .map(|(i, (team, data))| {
            let mut style = Style::default().fg(team_color(team));
            if start + i == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(
                format!("{team} ({:.1}, {:.1})", data[0].0, data[0].1),
                style,
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(legend_block), cols[1]);
}

fn render_trend(frame: &mut Frame, area: Rect, state: &AppState) {
    let sel = &state.selection;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(32)])
        .split(area);

    let series: Vec<(String, Vec<(f64, f64)>)> = state
        .trends
        .iter()
        .map(|s| {
            let pts = s
                .points
                .iter()
                .map(|(day, v)| (*day as f64, to_display(sel.metric, *v)))
                .collect();
            (s.team.clone(), pts)
        })
        .collect();
    let highlighted = state.scroll.min(series.len().saturating_sub(1));

    // Draw the highlighted team last so it sits on top.
    let mut order: Vec<usize> = (0..series.len()).filter(|i| *i != highlighted).collect();
    if !series.is_empty() {
        order.push(highlighted);
    }
    let datasets: Vec<Dataset> = order
        .into_iter()
        .map(|idx| {
            let (team, pts) = &series[idx];
            let style = if idx == highlighted {
                Style::default().fg(team_color(team)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Dataset::default()
                .name(team.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(pts)
        })
        .collect();

    let x_bounds = padded_bounds(series.iter().flat_map(|(_, p)| p.iter().map(|(x, _)| *x)));
    let y_bounds = padded_bounds(series.iter().flat_map(|(_, p)| p.iter().map(|(_, y)| *y)));

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!("{} {} by Matchday", sel.league.key(), sel.metric.display_name()))
                .borders(Borders::ALL),
        )
        .legend_position(None)
        .x_axis(
            Axis::default()
                .title("Matchday")
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(sel.metric.display_name())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );
    frame.render_widget(chart, cols[0]);

    let list_block = Block::default().title("Teams (j/k)").borders(Borders::ALL);
    let visible = list_block.inner(cols[1]).height as usize;
    let (start, end) = visible_range(highlighted, series.len(), visible);
    let lines: Vec<Line> = series[start..end]
        .iter()
        .enumerate()
        .map(|(i, (team, pts))| {
            let prefix = if start + i == highlighted { "> " } else { "  " };
            Line::styled(
                format!("{prefix}{team} ({})", pts.len()),
                Style::default().fg(team_color(team)),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(list_block), cols[1]);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let sel = &state.selection;
    let block = Block::default()
        .title("Team-match totals (sum of all players per match)")
        .borders(Borders::ALL);
    let visible = (block.inner(area).height as usize).saturating_sub(1);
    let (start, end) = visible_range(state.scroll, state.totals.len(), visible);

    let mut lines = vec![Line::styled(
        format!(
            "{:<28} {:>12} {:>10} {:>4} {:>8} {:>14}",
            "Team",
            "Match ID",
            "Date",
            "MD",
            "Players",
            sel.metric.column()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for t in &state.totals[start..end] {
        let value = t.value(sel.metric);
        let style = if value == 0.0 {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let date = t
            .match_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let matchday = state
            .matchdays
            .get(&t.team, &t.match_id)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::styled(
            format!(
                "{:<28} {:>12} {:>10} {:>4} {:>8} {:>14.1}",
                truncate(&t.team, 28),
                truncate(&t.match_id, 12),
                date,
                matchday,
                t.players,
                value
            ),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    [lo - pad, hi + pad]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| Span::raw(format!("{v:.1}")))
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(['…']).collect()
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Physical Terminal - Help",
        "",
        "Selection:",
        "  l            Cycle league (J1/J2/J3)",
        "  m / M        Next / previous metric",
        "  a            Cycle method (Max/Min/Average/Total)",
        "  v / Tab      Cycle view (Ranking/Scatter/Trend/Detail)",
        "  x            Scatter x-axis metric",
        "",
        "Other:",
        "  j/k or ↑/↓   Scroll / highlight team",
        "  e            Export ranking to .xlsx",
        "  r            Reload league file",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Matches whose total for the metric is 0 are treated as",
        "tracking failures and left out. Distances are shown in km.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
