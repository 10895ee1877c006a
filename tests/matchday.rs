use chrono::NaiveDate;

use physical_terminal::aggregate::{Matchdays, assign_matchdays, team_match_totals};
use physical_terminal::dataset::{PlayerMatchRecord, parse_match_date};
use physical_terminal::league::League;
use physical_terminal::metrics::METRIC_COUNT;

fn row(team: &str, match_id: &str, date: Option<&str>) -> PlayerMatchRecord {
    PlayerMatchRecord {
        league: League::J2,
        team: team.to_string(),
        match_id: match_id.to_string(),
        player: None,
        match_date: date.and_then(parse_match_date),
        metrics: [1.0; METRIC_COUNT],
    }
}

#[test]
fn orders_by_date_when_every_match_has_one() {
    let records = vec![
        row("A", "5", Some("2025-03-01")),
        row("A", "2", Some("2025-02-01")),
        row("A", "9", Some("2025-04-01")),
    ];
    let days = assign_matchdays(&records);
    assert_eq!(days.get("A", "5"), Some(2));
    assert_eq!(days.get("A", "2"), Some(1));
    assert_eq!(days.get("A", "9"), Some(3));
}

#[test]
fn falls_back_to_encounter_order_without_dates() {
    let records = vec![
        row("A", "30", None),
        row("A", "10", None),
        row("A", "30", None),
        row("A", "20", Some("not a date")),
    ];
    let days = assign_matchdays(&records);
    assert_eq!(days.len(), 3);
    assert_eq!(days.get("A", "30"), Some(1));
    assert_eq!(days.get("A", "10"), Some(2));
    assert_eq!(days.get("A", "20"), Some(3));
}

#[test]
fn partially_dated_team_uses_encounter_order() {
    let records = vec![
        row("A", "1", Some("2025-05-01")),
        row("A", "2", None),
        row("A", "3", Some("2025-01-01")),
    ];
    let days = assign_matchdays(&records);
    assert_eq!(days.get("A", "1"), Some(1));
    assert_eq!(days.get("A", "2"), Some(2));
    assert_eq!(days.get("A", "3"), Some(3));
}

#[test]
fn later_row_can_supply_missing_date() {
    let records = vec![
        row("A", "1", None),
        row("A", "2", Some("2025-02-01")),
        row("A", "1", Some("2025-03-01")),
    ];
    let days = assign_matchdays(&records);
    assert_eq!(days.get("A", "2"), Some(1));
    assert_eq!(days.get("A", "1"), Some(2));
}

#[test]
fn numbering_is_per_team() {
    let records = vec![
        row("A", "1", None),
        row("B", "2", None),
        row("B", "1", None),
        row("A", "3", None),
    ];
    let days = assign_matchdays(&records);
    assert_eq!(days.get("A", "1"), Some(1));
    assert_eq!(days.get("A", "3"), Some(2));
    assert_eq!(days.get("B", "2"), Some(1));
    assert_eq!(days.get("B", "1"), Some(2));
    assert_eq!(days.get("A", "2"), None);
}

#[test]
fn same_day_matches_keep_encounter_order() {
    let records = vec![
        row("A", "b", Some("2025-02-01")),
        row("A", "a", Some("2025-02-01")),
        row("A", "c", Some("2025-01-01")),
    ];
    let days = assign_matchdays(&records);
    assert_eq!(days.get("A", "c"), Some(1));
    assert_eq!(days.get("A", "b"), Some(2));
    assert_eq!(days.get("A", "a"), Some(3));
}

#[test]
fn totals_and_records_agree() {
    let records = vec![
        row("A", "5", Some("2025-03-01")),
        row("A", "5", Some("2025-03-01")),
        row("B", "5", Some("2025-03-01")),
        row("A", "2", Some("2025-02-01")),
        row("B", "7", None),
    ];
    let from_records = assign_matchdays(&records);
    let totals = team_match_totals(&records);
    assert_eq!(
        totals[0].match_date,
        NaiveDate::from_ymd_opt(2025, 3, 1)
    );
    assert_eq!(Matchdays::from_totals(&totals), from_records);
}

#[test]
fn empty_input_has_no_matchdays() {
    assert!(assign_matchdays(&[]).is_empty());
}
