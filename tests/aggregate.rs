use std::path::PathBuf;

use physical_terminal::aggregate::{
    self, Matchdays, Method, TeamMatchTotal, filter_zero_matches, rank_teams, team_match_totals,
};
use physical_terminal::dataset::{PlayerMatchRecord, read_league_csv};
use physical_terminal::league::League;
use physical_terminal::metrics::{METRIC_COUNT, Metric};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn sample_totals() -> Vec<TeamMatchTotal> {
    let table = read_league_csv(&fixture_path("league_sample.csv"), League::J1)
        .expect("fixture should parse");
    team_match_totals(&table.records)
}

fn record(team: &str, match_id: &str, distance: f64, sprints: f64) -> PlayerMatchRecord {
    let mut metrics = [0.0; METRIC_COUNT];
    metrics[Metric::Distance.index()] = distance;
    metrics[Metric::SprintCount.index()] = sprints;
    PlayerMatchRecord {
        league: League::J1,
        team: team.to_string(),
        match_id: match_id.to_string(),
        player: None,
        match_date: None,
        metrics,
    }
}

fn ranked(totals: &[TeamMatchTotal], metric: Metric, method: Method) -> Vec<(String, f64)> {
    rank_teams(totals, metric, method)
        .rows
        .into_iter()
        .map(|r| {
            let shown = r.display_value();
            (r.team, shown)
        })
        .collect()
}

#[test]
fn totals_have_one_row_per_team_match() {
    let totals = sample_totals();
    assert_eq!(totals.len(), 8);

    let alpha_2 = totals
        .iter()
        .find(|t| t.team == "Alpha FC" && t.match_id == "2")
        .expect("alpha match 2 total");
    assert_eq!(alpha_2.players, 2);
    assert_eq!(alpha_2.value(Metric::Distance), 120_000.0);
    assert_eq!(alpha_2.value(Metric::SprintCount), 17.0);
    assert_eq!(alpha_2.value(Metric::HsrDistance), 1_800.0);
    // Columns absent from the file stay at zero.
    assert_eq!(alpha_2.value(Metric::HiCount), 0.0);
}

#[test]
fn totals_keep_first_appearance_order() {
    let totals = sample_totals();
    let keys: Vec<(&str, &str)> = totals
        .iter()
        .map(|t| (t.team.as_str(), t.match_id.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Alpha FC", "5"),
            ("Beta FC", "5"),
            ("Alpha FC", "2"),
            ("Beta FC", "2"),
            ("Gamma FC", "9"),
            ("Alpha FC", "9"),
            ("Beta FC", "9"),
            ("Gamma FC", "2"),
        ]
    );
}

#[test]
fn totals_sum_every_metric_across_players() {
    let records = vec![
        record("A", "1", 10.0, 1.0),
        record("A", "1", 20.0, 2.0),
        record("B", "1", 5.0, 0.0),
        record("A", "2", 7.0, 3.0),
        record("A", "1", 30.0, 4.0),
    ];
    let totals = team_match_totals(&records);
    assert_eq!(totals.len(), 3);
    assert_eq!(totals[0].value(Metric::Distance), 60.0);
    assert_eq!(totals[0].value(Metric::SprintCount), 7.0);
    assert_eq!(totals[0].players, 3);
    assert_eq!(totals[1].team, "B");
    assert_eq!(totals[2].match_id, "2");
}

#[test]
fn empty_input_gives_empty_ranking() {
    let totals = team_match_totals(&[]);
    assert!(totals.is_empty());
    let ranking = rank_teams(&totals, Metric::Distance, Method::Average);
    assert!(ranking.is_empty());
}

#[test]
fn distance_example_in_kilometers() {
    let records = vec![
        record("A", "1", 100_000.0, 10.0),
        record("A", "2", 120_000.0, 10.0),
        record("A", "3", 80_000.0, 10.0),
    ];
    let totals = team_match_totals(&records);
    let value = |method| {
        rank_teams(&totals, Metric::Distance, method).rows[0].display_value()
    };
    assert!((value(Method::Max) - 120.0).abs() < 1e-9);
    assert!((value(Method::Min) - 80.0).abs() < 1e-9);
    assert!((value(Method::Average) - 100.0).abs() < 1e-9);
    assert!((value(Method::Total) - 300.0).abs() < 1e-9);
}

#[test]
fn zero_sprint_match_only_drops_out_of_sprint_ranking() {
    let totals = sample_totals();

    let sprint = rank_teams(&totals, Metric::SprintCount, Method::Total);
    let beta = sprint.get("Beta FC").expect("beta ranked on sprints");
    assert_eq!(beta.matches, 2);
    assert_eq!(beta.value, 50.0);

    let distance = rank_teams(&totals, Metric::Distance, Method::Total);
    let beta = distance.get("Beta FC").expect("beta ranked on distance");
    assert_eq!(beta.matches, 3);
    assert_eq!(beta.value, 300_000.0);
}

#[test]
fn team_with_only_zero_matches_is_absent() {
    let totals = sample_totals();
    let sprint = rank_teams(&totals, Metric::SprintCount, Method::Max);
    assert!(sprint.get("Gamma FC").is_none());
    assert_eq!(sprint.rows.len(), 2);

    let distance = rank_teams(&totals, Metric::Distance, Method::Max);
    assert!(distance.get("Gamma FC").is_some());
}

#[test]
fn metric_missing_from_file_yields_no_data() {
    let totals = sample_totals();
    let ranking = rank_teams(&totals, Metric::SprintCountOtip, Method::Total);
    assert!(ranking.is_empty());
}

#[test]
fn filter_only_checks_selected_column() {
    let totals = sample_totals();
    assert_eq!(filter_zero_matches(&totals, Metric::Distance).len(), 8);
    assert_eq!(filter_zero_matches(&totals, Metric::SprintCount).len(), 5);
}

#[test]
fn descending_for_max_ascending_for_min() {
    let totals = sample_totals();
    assert_eq!(
        ranked(&totals, Metric::Distance, Method::Max),
        vec![
            ("Alpha FC".to_string(), 120.0),
            ("Beta FC".to_string(), 110.0),
            ("Gamma FC".to_string(), 81.0),
        ]
    );
    assert_eq!(
        ranked(&totals, Metric::Distance, Method::Min),
        vec![
            ("Gamma FC".to_string(), 79.0),
            ("Alpha FC".to_string(), 80.0),
            ("Beta FC".to_string(), 90.0),
        ]
    );
}

#[test]
fn ties_break_by_team_name() {
    let totals = sample_totals();
    let avg = rank_teams(&totals, Metric::Distance, Method::Average);
    let teams: Vec<&str> = avg.rows.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(teams, vec!["Alpha FC", "Beta FC", "Gamma FC"]);
    assert_eq!(avg.rows[0].value, avg.rows[1].value);

    // Same tie under ascending order still lists Alpha first.
    let records = vec![record("Zeta", "1", 5.0, 1.0), record("Eta", "1", 5.0, 1.0)];
    let min = rank_teams(&team_match_totals(&records), Metric::Distance, Method::Min);
    assert_eq!(min.rows[0].team, "Eta");
}

#[test]
fn count_metrics_are_not_rescaled() {
    let totals = sample_totals();
    let sprint = rank_teams(&totals, Metric::SprintCount, Method::Average);
    let beta = sprint.get("Beta FC").expect("beta");
    assert_eq!(beta.display_value(), 25.0);
    assert_eq!(sprint.title(), "Average of Sprint Count");
}

#[test]
fn scatter_requires_both_axes() {
    let totals = sample_totals();
    let points =
        aggregate::scatter_points(&totals, Metric::Distance, Metric::SprintCount, Method::Max);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].team, "Alpha FC");
    assert_eq!(points[0].x, 120_000.0);
    assert_eq!(points[0].y, 22.0);
    assert_eq!(points[1].team, "Beta FC");
    assert_eq!(points[1].y, 30.0);
}

#[test]
fn trend_orders_by_matchday_and_skips_zero_totals() {
    let totals = sample_totals();
    let matchdays = Matchdays::from_totals(&totals);
    let trends = aggregate::trend_series(&totals, &matchdays, Metric::SprintCount);

    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0].team, "Alpha FC");
    assert_eq!(trends[0].points, vec![(1, 17.0), (2, 22.0), (3, 15.0)]);
    assert_eq!(trends[1].team, "Beta FC");
    assert_eq!(trends[1].points, vec![(2, 20.0), (3, 30.0)]);
}

#[test]
fn overview_counts_rows_teams_and_matches() {
    let table = read_league_csv(&fixture_path("league_sample.csv"), League::J1)
        .expect("fixture should parse");
    let totals = team_match_totals(&table.records);
    let overview = aggregate::league_overview(&table, &totals);
    assert_eq!(overview.player_rows, 16);
    assert_eq!(overview.teams, 3);
    assert_eq!(overview.matches, 3);
    assert_eq!(overview.team_matches, 8);
    assert_eq!(overview.warnings, 1);
}
