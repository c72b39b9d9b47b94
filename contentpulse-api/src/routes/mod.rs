/// API route handlers, one module per resource
///
/// - `health`: health check
/// - `auth`: register, login, current session
/// - `companies`: tenant listing, creation and deletion
/// - `catalog`: personas, content types, objectives, build matrix, branding
/// - `plan`: editorial plan, suggestions and drafted articles

pub mod auth;
pub mod catalog;
pub mod companies;
pub mod health;
pub mod plan;
