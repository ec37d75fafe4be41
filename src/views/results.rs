use std::io::{self, Write};

use serde::Serialize;

use crate::model::{RecommendationRequest, RecommendationRow};

use super::router::{NavState, Navigation, details_path};

pub const EMPTY_RESULTS: &str = "No results yet.";

pub fn row_title(row: &RecommendationRow, index: usize) -> String {
    [
        &row.method_label,
        &row.approach_label,
        &row.approach,
        &row.method,
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.is_empty())
    .cloned()
    .unwrap_or_else(|| format!("Result {}", index + 1))
}

pub fn stat(value: Option<f64>) -> f64 {
    value.filter(|number| number.is_finite()).unwrap_or(0.0)
}

pub fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowStats {
    pub supporting_articles: f64,
    pub task_matches: f64,
    pub condition_matches: f64,
    pub performance_matches: f64,
}

impl RowStats {
    pub fn from_row(row: &RecommendationRow) -> Self {
        Self {
            supporting_articles: stat(row.supporting_articles),
            task_matches: stat(row.task_matches.or(row.task_match)),
            condition_matches: stat(row.possible_if_matches),
            performance_matches: stat(row.performance_matches),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub rank: usize,
    pub title: String,
    pub approach_iri: Option<String>,
    pub details_path: Option<String>,
    #[serde(flatten)]
    pub stats: RowStats,
}

fn approach_of(row: &RecommendationRow) -> Option<&str> {
    row.approach.as_deref().filter(|iri| !iri.is_empty())
}

pub fn build_cards(
    rows: &[RecommendationRow],
    remembered: Option<&RecommendationRequest>,
) -> Vec<ResultCard> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let approach = approach_of(row);
            ResultCard {
                rank: idx + 1,
                title: row_title(row, idx),
                approach_iri: approach.map(ToOwned::to_owned),
                details_path: approach
                    .filter(|_| remembered.is_some())
                    .map(details_path),
                stats: RowStats::from_row(row),
            }
        })
        .collect()
}

pub fn activate(
    rows: &[RecommendationRow],
    index: usize,
    remembered: Option<&RecommendationRequest>,
) -> Option<Navigation> {
    let row = rows.get(index)?;
    let approach = approach_of(row)?;
    let request = remembered?;

    Some(Navigation {
        path: details_path(approach),
        state: Some(NavState {
            request: request.clone(),
            title: Some(row_title(row, index)),
        }),
    })
}

pub fn render_results(cards: &[ResultCard], out: &mut impl Write) -> io::Result<()> {
    if cards.is_empty() {
        return writeln!(out, "{EMPTY_RESULTS}");
    }

    for card in cards {
        match &card.details_path {
            Some(path) => writeln!(out, "{}. {}  -> open {} ({path})", card.rank, card.title, card.rank)?,
            None => writeln!(out, "{}. {}", card.rank, card.title)?,
        }
        writeln!(
            out,
            "\tSupporting articles: {}",
            format_stat(card.stats.supporting_articles)
        )?;
        writeln!(out, "\tTask matches: {}", format_stat(card.stats.task_matches))?;
        writeln!(
            out,
            "\tCondition matches: {}",
            format_stat(card.stats.condition_matches)
        )?;
        writeln!(
            out,
            "\tPerformance matches: {}",
            format_stat(card.stats.performance_matches)
        )?;
    }
    Ok(())
}
