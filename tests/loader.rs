use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use physical_terminal::aggregate::{Method, rank_teams, team_match_totals};
use physical_terminal::dataset::{load_league, parse_league_csv, read_league_csv};
use physical_terminal::league::League;
use physical_terminal::metrics::Metric;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn reads_sample_fixture() {
    let table = read_league_csv(&fixture_path("league_sample.csv"), League::J1)
        .expect("fixture should parse");
    assert_eq!(table.league, League::J1);
    assert_eq!(table.records.len(), 16);

    let first = &table.records[0];
    assert_eq!(first.team, "Alpha FC");
    assert_eq!(first.match_id, "5");
    assert_eq!(first.player.as_deref(), Some("A1"));
    assert_eq!(first.match_date, NaiveDate::from_ymd_opt(2025, 3, 1));
    assert_eq!(first.value(Metric::Distance), 60_000.0);
    assert_eq!(first.value(Metric::SprintCount), 10.0);

    let gamma = table
        .records
        .iter()
        .find(|r| r.team == "Gamma FC")
        .expect("gamma row");
    assert!(gamma.match_date.is_none());
}

#[test]
fn sample_reports_missing_metric_columns() {
    let table = read_league_csv(&fixture_path("league_sample.csv"), League::J1)
        .expect("fixture should parse");
    assert_eq!(table.errors.len(), 1);
    assert!(table.errors[0].contains("Running Distance"));
    assert!(!table.errors[0].contains("HSR Distance,"));
}

#[test]
fn messy_rows_are_skipped_or_zeroed() {
    let raw = fs::read(fixture_path("league_messy.csv")).expect("fixture file should be readable");
    let (records, errors) = parse_league_csv(raw.as_slice(), League::J3).expect("should parse");

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].value(Metric::Distance), 10_500.0);
    assert_eq!(records[0].value(Metric::SprintCount), 0.0);
    assert_eq!(records[1].value(Metric::Distance), 0.0);
    assert_eq!(records[1].value(Metric::SprintCount), 5.0);
    assert_eq!(records[2].team, "Beta FC");
    assert_eq!(records[2].value(Metric::Distance), 9_800.5);
    assert!(records.iter().all(|r| r.match_date.is_none() && r.player.is_none()));

    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.contains("skipped 2 rows")));
    assert!(errors.iter().any(|e| e.contains("1 unparseable")));
}

#[test]
fn canonical_headers_win_over_aliases() {
    let raw = "Player,Team,Match,Match ID,Date,Match Date,Distance\n\
               P1,Alpha,Alpha vs Beta,101,2025-01-01,2025-03-01,50000\n\
               P2,Alpha,Alpha vs Beta,101,2025-01-01,2025-03-01,50000\n\
               P1,Alpha,Alpha vs Beta,202,2025-01-01,2025-03-08,60000\n";
    let (records, _) = parse_league_csv(raw.as_bytes(), League::J1).expect("should parse");
    assert_eq!(records[0].match_id, "101");
    assert_eq!(records[2].match_id, "202");
    assert_eq!(records[0].match_date, NaiveDate::from_ymd_opt(2025, 3, 1));

    let totals = team_match_totals(&records);
    assert_eq!(totals.len(), 2);
    let ranking = rank_teams(&totals, Metric::Distance, Method::Max);
    assert_eq!(ranking.rows[0].display_value(), 100.0);
}

#[test]
fn missing_team_column_is_an_error() {
    let raw = "Club,Match ID,Distance\nAlpha,1,100\n";
    let err = parse_league_csv(raw.as_bytes(), League::J1).expect_err("no team column");
    assert!(err.to_string().contains("Team"));
}

#[test]
fn header_only_file_is_empty() {
    let raw = "Team,Match ID,Distance\n";
    let (records, _) = parse_league_csv(raw.as_bytes(), League::J1).expect("should parse");
    assert!(records.is_empty());
}

#[test]
fn missing_file_yields_empty_table_with_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let table = load_league(dir.path(), League::J2);
    assert!(table.is_empty());
    assert_eq!(table.errors.len(), 1);
    assert!(table.errors[0].contains("2025_J2_physical_data.csv"));
    assert_eq!(table.source, dir.path().join("2025_J2_physical_data.csv"));
}

#[test]
fn load_league_reads_from_data_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(
        fixture_path("league_sample.csv"),
        dir.path().join(League::J1.file_name()),
    )
    .expect("copy fixture");
    let table = load_league(dir.path(), League::J1);
    assert_eq!(table.records.len(), 16);
}
