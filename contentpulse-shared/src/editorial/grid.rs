//! Rows of the editable plan grid.
//!
//! A [`GridRow`] is what the client sends back after editing: every cell is
//! optional and loosely typed. [`coerce_rows`] turns the whole working set
//! into [`WorkingRow`]s or fails on the first bad row, naming it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coerce::{
    coerce_date, coerce_keywords, coerce_metric, coerce_text, require_text, CoercionError,
    KeywordsInput, NumberInput,
};
use crate::error::{PlanError, RowRef};
use crate::models::editorial_plan::{EditorialPlanItem, FunnelStage, PlanItemFields, PlanStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridRow {
    /// `None` for rows that have never been saved
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub content_type: Option<String>,
    pub theme: Option<String>,
    pub keywords: Option<KeywordsInput>,
    pub author: Option<String>,
    pub planned_publication_date: Option<String>,
    pub status: Option<String>,
    pub target_persona: Option<String>,
    pub customer_journey_stage: Option<String>,
    pub main_cta: Option<String>,
    pub url: Option<String>,
    pub views: Option<NumberInput>,
    pub engagements: Option<NumberInput>,
    pub conversions: Option<NumberInput>,
}

/// A coerced row, ready for reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRow {
    pub id: Option<Uuid>,
    pub fields: PlanItemFields,
}

impl WorkingRow {
    pub fn new(fields: PlanItemFields) -> Self {
        Self { id: None, fields }
    }
}

impl From<&EditorialPlanItem> for WorkingRow {
    fn from(item: &EditorialPlanItem) -> Self {
        Self {
            id: Some(item.id),
            fields: item.fields(),
        }
    }
}

impl GridRow {
    pub fn coerce(self) -> Result<WorkingRow, CoercionError> {
        let status = match coerce_text(self.status) {
            None => PlanStatus::Planned,
            Some(label) => {
                PlanStatus::from_label(&label).ok_or(CoercionError::UnknownStatus { value: label })?
            }
        };

        let customer_journey_stage = match coerce_text(self.customer_journey_stage) {
            None => None,
            Some(label) => Some(
                FunnelStage::from_label(&label).ok_or(CoercionError::UnknownStage { value: label })?,
            ),
        };

        let fields = PlanItemFields {
            title: require_text("title", self.title)?,
            content_type: require_text("content_type", self.content_type)?,
            theme: coerce_text(self.theme),
            keywords: coerce_keywords(self.keywords.as_ref()),
            author: coerce_text(self.author),
            planned_publication_date: coerce_date(self.planned_publication_date.as_deref())?,
            status,
            target_persona: coerce_text(self.target_persona),
            customer_journey_stage,
            main_cta: coerce_text(self.main_cta),
            url: coerce_text(self.url),
            views: coerce_metric("views", self.views.as_ref())?,
            engagements: coerce_metric("engagements", self.engagements.as_ref())?,
            conversions: coerce_metric("conversions", self.conversions.as_ref())?,
        };

        Ok(WorkingRow {
            id: self.id,
            fields,
        })
    }
}

/// Coerces a working set; the error names the first failing row.
pub fn coerce_rows(rows: Vec<GridRow>) -> Result<Vec<WorkingRow>, PlanError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            row.coerce()
                .map_err(|e| PlanError::invalid_row(RowRef::Position(index), e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(title: &str) -> GridRow {
        GridRow {
            title: Some(title.to_string()),
            content_type: Some("Blog Post".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_row_defaults() {
        let working = row("Hello").coerce().unwrap();
        assert_eq!(working.id, None);
        assert_eq!(working.fields.title, "Hello");
        assert_eq!(working.fields.status, PlanStatus::Planned);
        assert_eq!(working.fields.customer_journey_stage, None);
        assert!(working.fields.keywords.is_empty());
    }

    #[test]
    fn test_full_row_from_json() {
        let grid: GridRow = serde_json::from_value(serde_json::json!({
            "title": "  Pricing page teardown ",
            "content_type": "Blog Post",
            "keywords": "pricing, saas",
            "planned_publication_date": "2024-06-03",
            "status": "En cours",
            "target_persona": "CTO",
            "customer_journey_stage": "Décision",
            "views": "120",
            "engagements": "",
            "conversions": 3
        }))
        .unwrap();

        let fields = grid.coerce().unwrap().fields;
        assert_eq!(fields.title, "Pricing page teardown");
        assert_eq!(fields.keywords, vec!["pricing", "saas"]);
        assert_eq!(fields.planned_publication_date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(fields.status, PlanStatus::InProgress);
        assert_eq!(fields.customer_journey_stage, Some(FunnelStage::Decision));
        assert_eq!(fields.views, Some(120));
        assert_eq!(fields.engagements, None);
        assert_eq!(fields.conversions, Some(3));
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let mut grid = row("x");
        grid.title = Some("   ".to_string());
        assert_eq!(
            grid.coerce(),
            Err(CoercionError::Missing { field: "title" })
        );
    }

    #[test]
    fn test_unknown_labels_are_rejected() {
        let mut grid = row("x");
        grid.status = Some("draft".to_string());
        assert!(matches!(grid.coerce(), Err(CoercionError::UnknownStatus { .. })));

        let mut grid = row("x");
        grid.customer_journey_stage = Some("upsell".to_string());
        assert!(matches!(grid.coerce(), Err(CoercionError::UnknownStage { .. })));
    }

    #[test]
    fn test_coerce_rows_names_failing_row() {
        let rows = vec![row("ok"), row("fine"), GridRow::default()];
        let err = coerce_rows(rows).unwrap_err();
        assert_eq!(err.row(), Some(RowRef::Position(2)));
        assert!(matches!(err, PlanError::Validation { .. }));
    }

    #[test]
    fn test_snapshot_item_becomes_identified_row() {
        let item = EditorialPlanItem {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "T".to_string(),
            content_type: "Video".to_string(),
            theme: None,
            keywords: vec!["k".to_string()],
            author: None,
            planned_publication_date: None,
            status: PlanStatus::Published,
            target_persona: None,
            customer_journey_stage: None,
            main_cta: None,
            url: None,
            views: Some(0),
            engagements: None,
            conversions: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let working = WorkingRow::from(&item);
        assert_eq!(working.id, Some(item.id));
        assert_eq!(working.fields, item.fields());
    }
}
