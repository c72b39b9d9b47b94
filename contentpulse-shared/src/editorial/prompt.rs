//! Prompt construction for the text generator.
//!
//! Prompts are assembled from the company's selected catalog entries, its
//! build matrix and its branding profile. Building a suggestion prompt fails
//! with a validation error when any of those are missing.

use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use super::ingest::SUGGESTION_COLUMNS;
use crate::error::PlanError;
use crate::generation::{GenerationRequest, ModelSettings};
use crate::models::branding::BrandingProfile;
use crate::models::build_matrix::BuildMatrixEntry;
use crate::models::business_objective::BusinessObjective;
use crate::models::content_type::ContentType;
use crate::models::editorial_plan::EditorialPlanItem;
use crate::models::persona::Persona;

const SUGGESTION_SYSTEM: &str = "You are a content marketing strategist. \
You answer with a CSV table only, starting with the header row, with no other text.";

const ARTICLE_SYSTEM: &str = "You are an experienced content writer. \
You write complete, structured, engaging content in Markdown.";

/// Everything a prompt may draw on for one company.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    pub personas: Vec<Persona>,
    pub content_types: Vec<ContentType>,
    pub business_objectives: Vec<BusinessObjective>,
    pub build_matrix: Vec<BuildMatrixEntry>,
    pub branding: Option<BrandingProfile>,
}

impl PlanningContext {
    /// Loads the selected catalog entries, the build matrix and branding.
    pub async fn load(pool: &PgPool, company_id: Uuid) -> Result<Self, sqlx::Error> {
        Ok(Self {
            personas: Persona::list_selected(pool, company_id).await?,
            content_types: ContentType::list_selected(pool, company_id).await?,
            business_objectives: BusinessObjective::list_selected(pool, company_id).await?,
            build_matrix: BuildMatrixEntry::list(pool, company_id).await?,
            branding: BrandingProfile::find(pool, company_id).await?,
        })
    }

    /// Names of the inputs a suggestion prompt needs but does not have.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.personas.is_empty() {
            missing.push("personas");
        }
        if self.content_types.is_empty() {
            missing.push("content types");
        }
        if self.business_objectives.is_empty() {
            missing.push("business objectives");
        }
        if self.build_matrix.is_empty() {
            missing.push("build matrix");
        }
        if self.branding.is_none() {
            missing.push("branding");
        }
        missing
    }

    pub fn suggestion_request(
        &self,
        today: NaiveDate,
        settings: ModelSettings,
    ) -> Result<GenerationRequest, PlanError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(PlanError::validation(format!(
                "cannot suggest content without {}",
                missing.join(", ")
            )));
        }

        let dates = candidate_dates(today)
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let frequencies: String = self
            .content_types
            .iter()
            .map(|ct| {
                format!(
                    "- {}: target per week {}, max per week {}, max per month {}\n",
                    ct.name, ct.target_per_week, ct.max_frequency_per_week, ct.max_frequency_per_month
                )
            })
            .collect();

        let mut user = format!(
            "Suggest varied content for the next four weeks based on the following.\n\
             \nPersonas: {}\n\
             \nContent types and their frequencies:\n{}\
             \nBusiness objectives: {}\n",
            names(&self.personas, |p| &p.name),
            frequencies,
            names(&self.business_objectives, |o| &o.name),
        );
        if let Some(branding) = &self.branding {
            user.push_str("\nBranding:\n");
            user.push_str(&branding_lines(branding));
        }
        user.push_str("\nBuild matrix:\n");
        user.push_str(&matrix_lines(&self.build_matrix));
        user.push_str(&format!(
            "\nReturn a CSV table with exactly these columns, comma separated, quoting fields when needed:\n{}\n\
             \nMake sure that:\n\
             - each suggestion reflects the brand personality, tone of voice and value proposition\n\
             - content fits the target audience and the personas listed\n\
             - planned_publication_date uses only these dates: {}\n\
             - the number of suggestions per content type respects its frequency limits\n\
             - status is \"Planifié\" for every suggestion\n\
             - views, engagements and conversions are left empty\n",
            SUGGESTION_COLUMNS.join(","),
            dates,
        ));

        Ok(GenerationRequest {
            system: SUGGESTION_SYSTEM.to_string(),
            user,
            settings,
        })
    }

    pub fn article_request(
        &self,
        item: &EditorialPlanItem,
        settings: ModelSettings,
    ) -> GenerationRequest {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut user = format!(
            "Write the content for \"{}\".\n\
             \nItem:\n\
             - Content type: {}\n\
             - Theme: {}\n\
             - Keywords: {}\n\
             - Target persona: {}\n\
             - Funnel stage: {}\n\
             - Main call to action: {}\n",
            item.title,
            item.content_type,
            optional(&item.theme),
            item.keywords.join(", "),
            optional(&item.target_persona),
            item.customer_journey_stage
                .map(|stage| stage.as_str())
                .unwrap_or_default(),
            optional(&item.main_cta),
        );

        if let Some(branding) = &self.branding {
            user.push_str("\nBranding:\n");
            user.push_str(&branding_lines(branding));
        }
        user.push_str(&format!("\nPersonas: {}\n", names(&self.personas, |p| &p.name)));
        user.push_str("\nBuild matrix:\n");
        user.push_str(&matrix_lines(&self.build_matrix));
        user.push_str(&format!(
            "\nBusiness objectives: {}\n\
             \nProduce detailed, structured content suited to the format above.\n",
            names(&self.business_objectives, |o| &o.name)
        ));

        GenerationRequest {
            system: ARTICLE_SYSTEM.to_string(),
            user,
            settings,
        }
    }
}

/// Publication dates offered to the generator: one, two, three and four weeks out.
///
/// ```
/// use chrono::NaiveDate;
/// use contentpulse_shared::editorial::prompt::candidate_dates;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// assert_eq!(candidate_dates(today)[0], NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
/// ```
pub fn candidate_dates(today: NaiveDate) -> [NaiveDate; 4] {
    [1, 2, 3, 4].map(|weeks| today + Duration::weeks(weeks))
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &String) -> String {
    items
        .iter()
        .map(|item| name(item).as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn branding_lines(branding: &BrandingProfile) -> String {
    format!(
        "- Company name: {}\n\
         - Core values: {}\n\
         - Brand personality: {}\n\
         - Tone of voice: {}\n\
         - Value proposition: {}\n\
         - Target audience: {}\n",
        branding.company_name,
        branding.core_values,
        branding.brand_personality,
        branding.tone_of_voice,
        branding.value_proposition,
        branding.target_audience,
    )
}

fn matrix_lines(entries: &[BuildMatrixEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "- {}: pain points: {}; pain killers: {}\n",
                entry.persona, entry.pain_points, entry.pain_killers
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::editorial_plan::{FunnelStage, PlanStatus};
    use chrono::Utc;

    fn context() -> PlanningContext {
        let company_id = Uuid::new_v4();
        PlanningContext {
            personas: vec![Persona {
                id: Uuid::new_v4(),
                company_id,
                name: "CTO".to_string(),
                is_selected: true,
                created_at: Utc::now(),
            }],
            content_types: vec![ContentType {
                id: Uuid::new_v4(),
                company_id,
                name: "Blog Post".to_string(),
                is_selected: true,
                target_per_week: 1,
                max_frequency_per_week: 2,
                max_frequency_per_month: 8,
                created_at: Utc::now(),
            }],
            business_objectives: vec![BusinessObjective {
                id: Uuid::new_v4(),
                company_id,
                name: "Generate leads".to_string(),
                is_selected: true,
                created_at: Utc::now(),
            }],
            build_matrix: vec![BuildMatrixEntry {
                id: Uuid::new_v4(),
                company_id,
                persona: "CTO".to_string(),
                pain_points: "Legacy stack".to_string(),
                pain_killers: "Managed platform".to_string(),
                updated_at: Utc::now(),
            }],
            branding: Some(BrandingProfile {
                company_id,
                company_name: "Acme".to_string(),
                logo_url: None,
                primary_color: None,
                secondary_color: None,
                font: None,
                core_values: "Craft".to_string(),
                brand_personality: "Calm".to_string(),
                tone_of_voice: "Plain".to_string(),
                value_proposition: "Less toil".to_string(),
                target_audience: "Engineering leads".to_string(),
                updated_at: Utc::now(),
            }),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_candidate_dates_are_weekly() {
        let dates = candidate_dates(today());
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
        assert_eq!(dates[3], NaiveDate::from_ymd_opt(2026, 11, 16).unwrap());
    }

    #[test]
    fn test_suggestion_request_contents() {
        let request = context()
            .suggestion_request(today(), ModelSettings::suggestions())
            .unwrap();

        assert!(request.user.contains("Personas: CTO"));
        assert!(request.user.contains("Blog Post: target per week 1, max per week 2, max per month 8"));
        assert!(request.user.contains("Generate leads"));
        assert!(request.user.contains("Tone of voice: Plain"));
        assert!(request.user.contains("CTO: pain points: Legacy stack"));
        assert!(request.user.contains(&SUGGESTION_COLUMNS.join(",")));
        assert!(request.user.contains("2026-10-26, 2026-11-02, 2026-11-09, 2026-11-16"));
        assert_eq!(request.settings.temperature, 0.0);
    }

    #[test]
    fn test_suggestion_request_sections_are_line_based() {
        let request = context()
            .suggestion_request(today(), ModelSettings::suggestions())
            .unwrap();
        let lines: Vec<&str> = request.user.lines().collect();

        let section = |title: &str| lines.iter().position(|l| *l == title).unwrap();
        let branding = section("Branding:");
        let matrix = section("Build matrix:");
        assert!(branding < matrix);
        assert_eq!(lines[matrix + 1], "- CTO: pain points: Legacy stack; pain killers: Managed platform");
        assert!(lines.contains(&SUGGESTION_COLUMNS.join(",").as_str()));
        assert!(lines.contains(&"- status is \"Planifié\" for every suggestion"));
        assert_eq!(lines.last(), Some(&"- views, engagements and conversions are left empty"));
    }

    #[test]
    fn test_suggestion_request_names_missing_inputs() {
        let mut ctx = context();
        ctx.build_matrix.clear();
        ctx.branding = None;

        match ctx.suggestion_request(today(), ModelSettings::suggestions()) {
            Err(PlanError::Validation { message, .. }) => {
                assert!(message.contains("build matrix"));
                assert!(message.contains("branding"));
                assert!(!message.contains("personas"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_article_request_describes_item() {
        let ctx = context();
        let item = EditorialPlanItem {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Retiring the monolith".to_string(),
            content_type: "Blog Post".to_string(),
            theme: Some("Modernization".to_string()),
            keywords: vec!["monolith".to_string(), "migration".to_string()],
            author: None,
            planned_publication_date: None,
            status: PlanStatus::Planned,
            target_persona: Some("CTO".to_string()),
            customer_journey_stage: Some(FunnelStage::Decision),
            main_cta: Some("Talk to us".to_string()),
            url: None,
            views: None,
            engagements: None,
            conversions: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let request = ctx.article_request(&item, ModelSettings::article());
        assert!(request.user.contains("\"Retiring the monolith\""));
        assert!(request.user.contains("Keywords: monolith, migration"));
        assert!(request.user.contains("Funnel stage: decision"));
        assert!(request.user.contains("Company name: Acme"));
        assert_eq!(request.settings.model, "gpt-4o");
    }
}
