//! Grid reconciliation: turn an edited working set into inserts, updates and
//! deletes against the persisted plan, and apply them atomically.
//!
//! Classification rules, applied per working row:
//!
//! - no identifier: insert
//! - identifier marked for removal: delete only, edits are dropped
//! - identifier in the snapshot with identical fields: unchanged, no write
//! - any other identifier: update, unconditionally (last write wins)
//!
//! Applying runs in one transaction that first locks the company row, so two
//! saves for the same company never interleave. Any failing statement aborts
//! the whole pass and the error names the triggering row.
//!
//! The (title, date) uniqueness constraint is deferred, so it is checked
//! against the final state of the pass. Rows may trade titles freely.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

use super::grid::WorkingRow;
use crate::error::{PlanError, RowRef};
use crate::models::company::Company;
use crate::models::editorial_plan::{EditorialPlanItem, PlanItemFields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInsert {
    /// Position in the working set
    pub position: usize,
    pub fields: PlanItemFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    pub position: usize,
    pub id: Uuid,
    pub fields: PlanItemFields,
}

/// The writes one reconciliation pass will make
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub inserts: Vec<PendingInsert>,
    pub updates: Vec<PendingUpdate>,
    pub deletes: Vec<Uuid>,
    pub unchanged: usize,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// What a pass actually did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub inserted: Vec<Uuid>,
    pub updated: usize,
    pub deleted: u64,
    pub unchanged: usize,
    /// Updates whose id matched no row of this company
    pub missing: usize,
}

/// Classifies `working` against `snapshot`. Pure; touches no storage.
pub fn classify(
    snapshot: &[EditorialPlanItem],
    working: Vec<WorkingRow>,
    removed: &[Uuid],
) -> ReconcilePlan {
    let persisted: HashMap<Uuid, PlanItemFields> =
        snapshot.iter().map(|item| (item.id, item.fields())).collect();

    let mut seen = HashSet::new();
    let deletes: Vec<Uuid> = removed.iter().copied().filter(|id| seen.insert(*id)).collect();
    let removed: HashSet<Uuid> = deletes.iter().copied().collect();

    let mut plan = ReconcilePlan {
        deletes,
        ..ReconcilePlan::default()
    };

    for (position, row) in working.into_iter().enumerate() {
        match row.id {
            None => plan.inserts.push(PendingInsert {
                position,
                fields: row.fields,
            }),
            Some(id) if removed.contains(&id) => {}
            Some(id) if persisted.get(&id) == Some(&row.fields) => plan.unchanged += 1,
            Some(id) => plan.updates.push(PendingUpdate {
                position,
                id,
                fields: row.fields,
            }),
        }
    }

    plan
}

/// Highest working-set position written by `plan` whose (title, date) is in `keys`.
fn conflicting_position(plan: &ReconcilePlan, keys: &[(String, NaiveDate)]) -> Option<usize> {
    let updates = plan.updates.iter().map(|u| (u.position, &u.fields));
    let inserts = plan.inserts.iter().map(|i| (i.position, &i.fields));

    updates
        .chain(inserts)
        .filter(|(_, fields)| {
            keys.iter().any(|(title, date)| {
                fields.title == *title && fields.planned_publication_date == Some(*date)
            })
        })
        .map(|(position, _)| position)
        .max()
}

/// Runs the deferred uniqueness check now, inside a savepoint, so a violation
/// can still be traced to the row that caused it.
async fn check_unique_titles(
    tx: &mut Transaction<'_, Postgres>,
    company_id: Uuid,
    plan: &ReconcilePlan,
) -> Result<(), PlanError> {
    let mut savepoint = tx.begin().await?;
    let checked = sqlx::query("SET CONSTRAINTS editorial_plan_title_date_unique IMMEDIATE")
        .execute(&mut *savepoint)
        .await;

    match checked {
        Ok(_) => {
            savepoint.commit().await?;
            Ok(())
        }
        Err(source) => {
            savepoint.rollback().await?;
            let keys = EditorialPlanItem::duplicate_keys(&mut **tx, company_id).await?;
            Err(PlanError::Persistence {
                row: conflicting_position(plan, &keys).map(RowRef::Position),
                source,
            })
        }
    }
}

/// Reconciles `working` against the company's current plan in one transaction.
///
/// The snapshot is read after the company lock is taken, so it reflects every
/// save that committed before this one.
///
/// # Errors
///
/// - `PlanError::NotFound` when the company no longer exists
/// - `PlanError::Persistence` naming the row whose statement failed; nothing
///   from the pass is kept
pub async fn reconcile(
    pool: &PgPool,
    company_id: Uuid,
    working: Vec<WorkingRow>,
    removed: &[Uuid],
) -> Result<ReconcileOutcome, PlanError> {
    let mut tx = pool.begin().await?;

    if !Company::lock_for_update(&mut *tx, company_id).await? {
        return Err(PlanError::not_found("company"));
    }

    let snapshot = EditorialPlanItem::snapshot(&mut *tx, company_id).await?;
    let plan = classify(&snapshot, working, removed);

    debug!(
        company_id = %company_id,
        inserts = plan.inserts.len(),
        updates = plan.updates.len(),
        deletes = plan.deletes.len(),
        unchanged = plan.unchanged,
        "Reconciliation plan"
    );

    let mut outcome = ReconcileOutcome {
        unchanged: plan.unchanged,
        ..ReconcileOutcome::default()
    };

    if plan.is_empty() {
        tx.commit().await?;
        return Ok(outcome);
    }

    outcome.deleted = EditorialPlanItem::delete_many(&mut *tx, company_id, &plan.deletes).await?;

    for update in &plan.updates {
        let matched = EditorialPlanItem::update(&mut *tx, company_id, update.id, &update.fields)
            .await
            .map_err(|e| PlanError::persistence_at(RowRef::Position(update.position), e))?;

        if matched {
            outcome.updated += 1;
        } else {
            outcome.missing += 1;
        }
    }

    for insert in &plan.inserts {
        let item = EditorialPlanItem::insert(&mut *tx, company_id, &insert.fields)
            .await
            .map_err(|e| PlanError::persistence_at(RowRef::Position(insert.position), e))?;
        outcome.inserted.push(item.id);
    }

    check_unique_titles(&mut tx, company_id, &plan).await?;
    tx.commit().await?;

    info!(
        company_id = %company_id,
        inserted = outcome.inserted.len(),
        updated = outcome.updated,
        deleted = outcome.deleted,
        unchanged = outcome.unchanged,
        missing = outcome.missing,
        "Editorial plan reconciled"
    );

    Ok(outcome)
}
