/// Company-level authorization.
///
/// A request for company data is allowed when the signed-in user has a
/// membership in that company whose role meets the permission the operation
/// needs:
///
/// | Permission | Minimum role | Used for                              |
/// |------------|--------------|---------------------------------------|
/// | `Read`     | viewer       | listing catalogs, plan, content       |
/// | `Write`    | editor       | catalog edits, grid saves, generation |
/// | `Manage`   | admin        | deleting the company                  |
///
/// A company the user does not belong to is reported as not found, never as
/// forbidden, so its existence does not leak.

use sqlx::PgPool;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::context::TenantContext;
use crate::models::membership::{CompanyMembership, MembershipRole};

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("Company {0} not found")]
    NotMember(Uuid),

    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: MembershipRole,
        actual: MembershipRole,
    },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Write,
    Manage,
}

impl Permission {
    pub fn min_role(&self) -> MembershipRole {
        match self {
            Permission::Read => MembershipRole::Viewer,
            Permission::Write => MembershipRole::Editor,
            Permission::Manage => MembershipRole::Admin,
        }
    }
}

/// Resolves the request-scoped tenant context for `company_id`.
///
/// # Errors
///
/// `AuthzError::NotMember` when the user has no membership in the company
/// (including when the company does not exist).
pub async fn authorize_company(
    pool: &PgPool,
    auth: &AuthContext,
    company_id: Uuid,
) -> Result<TenantContext, AuthzError> {
    let role = CompanyMembership::get_role(pool, company_id, auth.user_id)
        .await?
        .ok_or(AuthzError::NotMember(company_id))?;

    Ok(TenantContext {
        user_id: auth.user_id,
        username: auth.username.clone(),
        company_id,
        role,
    })
}

/// Fails unless the context's role meets `permission`.
pub fn require_permission(ctx: &TenantContext, permission: Permission) -> Result<(), AuthzError> {
    let required = permission.min_role();

    if !ctx.role.has_permission(&required) {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: ctx.role,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: MembershipRole) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            company_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_min_roles() {
        assert_eq!(Permission::Read.min_role(), MembershipRole::Viewer);
        assert_eq!(Permission::Write.min_role(), MembershipRole::Editor);
        assert_eq!(Permission::Manage.min_role(), MembershipRole::Admin);
    }

    #[test]
    fn test_viewer_can_only_read() {
        let viewer = ctx(MembershipRole::Viewer);
        assert!(require_permission(&viewer, Permission::Read).is_ok());
        assert!(matches!(
            require_permission(&viewer, Permission::Write),
            Err(AuthzError::InsufficientRole { .. })
        ));
    }

    #[test]
    fn test_editor_cannot_manage() {
        let editor = ctx(MembershipRole::Editor);
        assert!(require_permission(&editor, Permission::Write).is_ok());
        assert!(require_permission(&editor, Permission::Manage).is_err());
    }

    #[test]
    fn test_admin_can_do_everything() {
        let admin = ctx(MembershipRole::Admin);
        for permission in [Permission::Read, Permission::Write, Permission::Manage] {
            assert!(require_permission(&admin, permission).is_ok());
        }
    }
}
