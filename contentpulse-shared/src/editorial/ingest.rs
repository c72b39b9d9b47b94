//! Suggestion ingestion: parse generated CSV into plan rows.
//!
//! Generated text is untrusted. It must carry the exact header below, every
//! record must have all fourteen fields, and every row must coerce; otherwise
//! the batch is rejected as a whole and nothing reaches reconciliation.

use csv::{ReaderBuilder, StringRecord, Trim};
use uuid::Uuid;

use super::coerce::{CoercionError, KeywordsInput, NumberInput};
use super::grid::{GridRow, WorkingRow};
use crate::error::PlanError;
use crate::models::editorial_plan::PlanItemFields;

/// Header the generator is instructed to emit, in order.
pub const SUGGESTION_COLUMNS: [&str; 14] = [
    "title",
    "content_type",
    "theme",
    "keywords",
    "author",
    "planned_publication_date",
    "status",
    "target_persona",
    "customer_journey_stage",
    "main_cta",
    "url",
    "views",
    "engagements",
    "conversions",
];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unexpected header {found:?}")]
    Header { found: Vec<String> },

    #[error("malformed suggestion table: {0}")]
    Csv(#[from] csv::Error),

    #[error("suggestion {line}: {source}")]
    Row {
        /// One-based data line, header excluded
        line: usize,
        #[source]
        source: CoercionError,
    },

    #[error("suggestion table has no rows")]
    Empty,
}

impl From<IngestError> for PlanError {
    fn from(err: IngestError) -> Self {
        PlanError::ExternalService(err.to_string())
    }
}

/// A parsed suggestion stamped with the tenant it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedItem {
    pub company_id: Uuid,
    pub fields: PlanItemFields,
}

/// Removes a surrounding Markdown code fence, if any.
///
/// ```
/// use contentpulse_shared::editorial::ingest::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```csv\na,b\n```"), "a,b");
/// assert_eq!(strip_code_fence("a,b"), "a,b");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("csv") along with the opening fence line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => "",
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parses a generated suggestion table into plan fields.
pub fn parse_suggestions(text: &str) -> Result<Vec<PlanItemFields>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(strip_code_fence(text).as_bytes());

    let headers = reader.headers()?.clone();
    if !headers.iter().eq(SUGGESTION_COLUMNS.iter().copied()) {
        return Err(IngestError::Header {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut items = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = grid_row(&record)
            .coerce()
            .map_err(|source| IngestError::Row {
                line: index + 1,
                source,
            })?;
        items.push(row.fields);
    }

    if items.is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(items)
}

fn grid_row(record: &StringRecord) -> GridRow {
    let text = |index: usize| record.get(index).map(str::to_string);
    let number = |index: usize| text(index).map(NumberInput::Text);

    GridRow {
        id: None,
        title: text(0),
        content_type: text(1),
        theme: text(2),
        keywords: text(3).map(KeywordsInput::Text),
        author: text(4),
        planned_publication_date: text(5),
        status: text(6),
        target_persona: text(7),
        customer_journey_stage: text(8),
        main_cta: text(9),
        url: text(10),
        views: number(11),
        engagements: number(12),
        conversions: number(13),
    }
}

pub fn stamp_tenant(company_id: Uuid, items: Vec<PlanItemFields>) -> Vec<SuggestedItem> {
    items
        .into_iter()
        .map(|fields| SuggestedItem { company_id, fields })
        .collect()
}

/// Appends suggestions to a working set as new rows.
///
/// Suggestions stamped for another company are dropped.
pub fn merge_suggestions(
    company_id: Uuid,
    mut working: Vec<WorkingRow>,
    suggestions: Vec<SuggestedItem>,
) -> Vec<WorkingRow> {
    working.extend(
        suggestions
            .into_iter()
            .filter(|s| s.company_id == company_id)
            .map(|s| WorkingRow::new(s.fields)),
    );
    working
}
