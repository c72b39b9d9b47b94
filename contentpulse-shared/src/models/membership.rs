/// Company memberships: which users may act inside which company, and how.
///
/// Exactly one row exists per (company, user) pair; the composite primary key
/// enforces it. Rows cascade away with either side.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE membership_role AS ENUM ('admin', 'editor', 'viewer');
///
/// CREATE TABLE company_users (
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role membership_role NOT NULL DEFAULT 'editor',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (company_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Role within one company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Everything, including deleting the company
    Admin,

    /// Edits catalogs and the editorial plan
    Editor,

    /// Read-only
    Viewer,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Admin => "admin",
            MembershipRole::Editor => "editor",
            MembershipRole::Viewer => "viewer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(MembershipRole::Admin),
            "editor" => Some(MembershipRole::Editor),
            "viewer" => Some(MembershipRole::Viewer),
            _ => None,
        }
    }

    /// Hierarchy: Admin > Editor > Viewer
    pub fn has_permission(&self, required: &MembershipRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    fn permission_level(&self) -> u8 {
        match self {
            MembershipRole::Admin => 3,
            MembershipRole::Editor => 2,
            MembershipRole::Viewer => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyMembership {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub created_at: DateTime<Utc>,
}

impl CompanyMembership {
    /// Adds `user_id` to `company_id`.
    ///
    /// Accepts any executor so company creation can run it inside its
    /// transaction.
    ///
    /// # Errors
    ///
    /// Unique violation if the pair already exists; foreign-key violation if
    /// either side is missing.
    pub async fn create<'e, E>(
        executor: E,
        company_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let membership = sqlx::query_as::<_, CompanyMembership>(
            r#"
            INSERT INTO company_users (company_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING company_id, user_id, role, created_at
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    pub async fn find(
        pool: &PgPool,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, CompanyMembership>(
            r#"
            SELECT company_id, user_id, role, created_at
            FROM company_users
            WHERE company_id = $1 AND user_id = $2
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// The user's role in the company, or `None` when not a member.
    pub async fn get_role(
        pool: &PgPool,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipRole>, sqlx::Error> {
        let role = sqlx::query_scalar::<_, MembershipRole>(
            "SELECT role FROM company_users WHERE company_id = $1 AND user_id = $2",
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [
            MembershipRole::Admin,
            MembershipRole::Editor,
            MembershipRole::Viewer,
        ] {
            assert_eq!(MembershipRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(MembershipRole::from_str("owner"), None);
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(MembershipRole::Admin.has_permission(&MembershipRole::Editor));
        assert!(MembershipRole::Editor.has_permission(&MembershipRole::Editor));
        assert!(MembershipRole::Editor.has_permission(&MembershipRole::Viewer));
        assert!(!MembershipRole::Viewer.has_permission(&MembershipRole::Editor));
        assert!(!MembershipRole::Editor.has_permission(&MembershipRole::Admin));
    }
}
