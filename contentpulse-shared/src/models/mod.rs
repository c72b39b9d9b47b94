/// Database models: the tenant-scoped repository.
///
/// Users and companies are global. Everything else belongs to one company and
/// every statement against it is parameterized by `company_id`: reads only see
/// that company's rows, writes stamp it, and updates or deletes that target a
/// different company's row match nothing (a silent no-op, reported as `false`
/// or a zero count).
///
/// # Models
///
/// - `user`: accounts
/// - `company`: tenants, creation with admin membership and default seed
/// - `membership`: user/company roles
/// - `persona`, `content_type`, `business_objective`: selectable catalogs
/// - `build_matrix`: per-persona pain points and pain killers
/// - `branding`: one brand profile per company
/// - `editorial_plan`: the editorial calendar
/// - `generated_content`: append-only generated article bodies

pub mod branding;
pub mod build_matrix;
pub mod business_objective;
pub mod company;
pub mod content_type;
pub mod editorial_plan;
pub mod generated_content;
pub mod membership;
pub mod persona;
pub mod user;
