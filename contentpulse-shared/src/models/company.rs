/// Companies: the tenant boundary for every catalog and plan row.
///
/// A company is created by a signed-in user, who becomes its `admin`. The
/// default catalogs are seeded in the same transaction, so a company is never
/// observable without them. Deleting a company is a hard delete; every
/// per-company table references `companies(id) ON DELETE CASCADE`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use contentpulse_shared::models::company::{Company, CreateCompany};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let acme = Company::create_with_admin(&pool, CreateCompany {
///     name: "Acme".to_string(),
///     description: None,
/// }, user_id).await?;
///
/// let mine = Company::list_for_user(&pool, user_id).await?;
/// assert!(mine.iter().any(|c| c.id == acme.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use super::membership::{CompanyMembership, MembershipRole};
use crate::db::seed::seed_company_defaults;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A company as seen by one of its members
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberCompany {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub role: MembershipRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub description: Option<String>,
}

impl Company {
    /// Creates a company, makes `admin_user_id` its admin, and seeds the
    /// default catalogs. All three happen in one transaction.
    ///
    /// # Errors
    ///
    /// Foreign-key violation when the user does not exist; any other failure
    /// rolls the whole creation back.
    pub async fn create_with_admin(
        pool: &PgPool,
        data: CreateCompany,
        admin_user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&mut *tx)
        .await?;

        CompanyMembership::create(&mut *tx, company.id, admin_user_id, MembershipRole::Admin)
            .await?;

        let seeded = seed_company_defaults(&mut *tx, company.id, &company.name).await?;

        tx.commit().await?;

        info!(
            company_id = %company.id,
            admin_user_id = %admin_user_id,
            seeded_rows = seeded.total(),
            "Company created"
        );

        Ok(company)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, description, created_at FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Companies `user_id` belongs to, ordered by name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<MemberCompany>, sqlx::Error> {
        let companies = sqlx::query_as::<_, MemberCompany>(
            r#"
            SELECT c.id, c.name, c.description, c.created_at, cu.role
            FROM companies c
            JOIN company_users cu ON cu.company_id = c.id
            WHERE cu.user_id = $1
            ORDER BY c.name, c.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(companies)
    }

    /// Locks the company row until the surrounding transaction ends.
    ///
    /// Writers that must not interleave for the same company (grid saves,
    /// suggestion ingestion) take this lock first. Returns `false` when the
    /// company does not exist.
    pub async fn lock_for_update(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM companies WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(locked.is_some())
    }

    /// Hard-deletes the company; catalogs, plan, generated content and
    /// memberships cascade with it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(company_id = %id, "Company deleted");
        }

        Ok(result.rows_affected() > 0)
    }
}
