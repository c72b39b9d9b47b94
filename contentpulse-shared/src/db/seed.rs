//! Default catalog seed applied once per company, at creation time.
//!
//! Every insert is `ON CONFLICT DO NOTHING`, so running the seed again for the
//! same company changes nothing.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

/// Personas seeded as selected
pub const DEFAULT_PERSONAS: &[&str] = &[
    "Business Owner",
    "Marketing Manager",
    "Sales Manager",
    "IT Manager",
    "Entrepreneur",
];

/// (name, selected, target per week, max per week, max per month)
pub const DEFAULT_CONTENT_TYPES: &[(&str, bool, i32, i32, i32)] = &[
    ("Blog Post", true, 1, 2, 8),
    ("Web Page", true, 1, 2, 8),
    ("E-book", true, 1, 2, 8),
    ("Infographic", true, 1, 2, 8),
    ("Video", true, 1, 2, 8),
    ("Podcast", false, 0, 0, 0),
    ("Webinar", false, 0, 0, 0),
    ("Case Study", false, 0, 0, 0),
    ("White Paper", false, 0, 0, 0),
    ("Newsletter", false, 0, 0, 0),
    ("Social Media Post", false, 0, 0, 0),
    ("Presentation", false, 0, 0, 0),
    ("How-to Guide", false, 0, 0, 0),
    ("FAQ", false, 0, 0, 0),
    ("Customer Testimonial", false, 0, 0, 0),
];

/// Business objectives seeded as selected
pub const DEFAULT_BUSINESS_OBJECTIVES: &[&str] = &[
    "Increase traffic",
    "Generate leads",
    "Improve brand awareness",
];

const DEFAULT_MATRIX_PERSONA: &str = "Business Owner";
const DEFAULT_PAIN_POINTS: &str = "Lack of visibility into business performance";
const DEFAULT_PAIN_KILLERS: &str = "A custom dashboard that tracks the key indicators";

/// Rows actually inserted by one seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub personas: u64,
    pub content_types: u64,
    pub business_objectives: u64,
    pub build_matrix: u64,
    pub branding: u64,
}

impl SeedReport {
    pub fn total(&self) -> u64 {
        self.personas + self.content_types + self.business_objectives + self.build_matrix + self.branding
    }
}

/// Seeds the default catalogs for `company_id`.
///
/// Runs on the caller's connection so it joins the company-creation
/// transaction.
pub async fn seed_company_defaults(
    conn: &mut PgConnection,
    company_id: Uuid,
    company_name: &str,
) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();

    for name in DEFAULT_PERSONAS {
        report.personas += sqlx::query(
            r#"
            INSERT INTO personas (id, company_id, name, is_selected)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (company_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(*name)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    for (name, selected, target, max_week, max_month) in DEFAULT_CONTENT_TYPES {
        report.content_types += sqlx::query(
            r#"
            INSERT INTO content_types
                (id, company_id, name, is_selected, target_per_week,
                 max_frequency_per_week, max_frequency_per_month)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (company_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(*name)
        .bind(*selected)
        .bind(*target)
        .bind(*max_week)
        .bind(*max_month)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    for name in DEFAULT_BUSINESS_OBJECTIVES {
        report.business_objectives += sqlx::query(
            r#"
            INSERT INTO business_objectives (id, company_id, name, is_selected)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (company_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(*name)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    report.build_matrix = sqlx::query(
        r#"
        INSERT INTO build_matrix (id, company_id, persona, pain_points, pain_killers)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (company_id, persona) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(DEFAULT_MATRIX_PERSONA)
    .bind(DEFAULT_PAIN_POINTS)
    .bind(DEFAULT_PAIN_KILLERS)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    report.branding = sqlx::query(
        r#"
        INSERT INTO branding
            (company_id, company_name, core_values, brand_personality,
             tone_of_voice, value_proposition, target_audience)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (company_id) DO NOTHING
        "#,
    )
    .bind(company_id)
    .bind(company_name)
    .bind("Innovation, quality, customer service")
    .bind("Professional and innovative")
    .bind("Formal but approachable")
    .bind("We help companies work smarter")
    .bind("Small and mid-sized businesses")
    .execute(&mut *conn)
    .await?
    .rows_affected();

    debug!(company_id = %company_id, rows = report.total(), "Seeded default catalogs");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_names_are_unique() {
        let personas: HashSet<_> = DEFAULT_PERSONAS.iter().collect();
        assert_eq!(personas.len(), DEFAULT_PERSONAS.len());

        let types: HashSet<_> = DEFAULT_CONTENT_TYPES.iter().map(|t| t.0).collect();
        assert_eq!(types.len(), DEFAULT_CONTENT_TYPES.len());

        let objectives: HashSet<_> = DEFAULT_BUSINESS_OBJECTIVES.iter().collect();
        assert_eq!(objectives.len(), DEFAULT_BUSINESS_OBJECTIVES.len());
    }

    #[test]
    fn test_selected_content_types_have_frequencies() {
        for (name, selected, target, max_week, max_month) in DEFAULT_CONTENT_TYPES {
            assert!(*target >= 0 && *max_week >= 0 && *max_month >= 0, "{}", name);
            if *selected {
                assert!(*max_week >= *target, "{}", name);
                assert!(*max_month >= *max_week, "{}", name);
            }
        }
        assert_eq!(DEFAULT_CONTENT_TYPES.len(), 15);
    }

    #[test]
    fn test_matrix_persona_is_a_default_persona() {
        assert!(DEFAULT_PERSONAS.contains(&DEFAULT_MATRIX_PERSONA));
    }

    #[test]
    fn test_report_total() {
        let report = SeedReport {
            personas: 5,
            content_types: 15,
            business_objectives: 3,
            build_matrix: 1,
            branding: 1,
        };
        assert_eq!(report.total(), 25);
    }
}
