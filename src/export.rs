use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{Matchdays, Ranking, TeamMatchTotal};
use crate::league::League;
use crate::metrics::ALL_METRICS;

pub struct ExportReport {
    pub path: PathBuf,
    pub ranking_rows: usize,
    pub total_rows: usize,
}

enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

/// `J1_Sprint_Count_Max.xlsx` style file name for a selection.
pub fn default_export_name(league: League, ranking: &Ranking) -> String {
    let metric: String = ranking
        .metric
        .column()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}_{}.xlsx", league.key(), metric, ranking.method.label())
}

/// Write the ranking (display units) and the team-match totals behind it (raw units).
pub fn export_ranking(
    path: &Path,
    league: League,
    ranking: &Ranking,
    totals: &[TeamMatchTotal],
    matchdays: &Matchdays,
) -> Result<ExportReport> {
    let mut ranking_rows = vec![vec![
        Cell::Text("Rank".to_string()),
        Cell::Text("Team".to_string()),
        Cell::Text(ranking.title()),
        Cell::Text("Matches".to_string()),
    ]];
    for (idx, row) in ranking.rows.iter().enumerate() {
        ranking_rows.push(vec![
            Cell::Number((idx + 1) as f64),
            Cell::Text(row.team.clone()),
            Cell::Number(row.display_value()),
            Cell::Number(row.matches as f64),
        ]);
    }

    let mut header = vec![
        Cell::Text("Team".to_string()),
        Cell::Text("Match ID".to_string()),
        Cell::Text("Match Date".to_string()),
        Cell::Text("Matchday".to_string()),
        Cell::Text("Players".to_string()),
    ];
    header.extend(ALL_METRICS.iter().map(|m| Cell::Text(m.column().to_string())));
    let mut total_rows = vec![header];
    for t in totals {
        let mut row = vec![
            Cell::Text(t.team.clone()),
            Cell::Text(t.match_id.clone()),
            t.match_date
                .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Cell::Blank),
            matchdays
                .get(&t.team, &t.match_id)
                .map(|d| Cell::Number(d as f64))
                .unwrap_or(Cell::Blank),
            Cell::Number(t.players as f64),
        ];
        row.extend(t.metrics.iter().map(|v| Cell::Number(*v)));
        total_rows.push(row);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Ranking")?;
        sheet.set_column_width(1, 32)?;
        sheet.set_column_width(2, 28)?;
        write_rows(sheet, &ranking_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("MatchTotals")?;
        sheet.set_column_width(0, 32)?;
        write_rows(sheet, &total_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    log::info!(
        "exported {} {} ranking rows to {}",
        league.key(),
        ranking.rows.len(),
        path.display()
    );

    Ok(ExportReport {
        path: path.to_path_buf(),
        ranking_rows: ranking_rows.len().saturating_sub(1),
        total_rows: total_rows.len().saturating_sub(1),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(s) => worksheet.write_string(r, c, s),
                Cell::Number(n) => worksheet.write_number(r, c, *n),
                Cell::Blank => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
