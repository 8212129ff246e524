use crate::model::{ContentType, Locale, NewEnumValue, NewQuestion, QuestionId, Translation, Unit};
use crate::store::traits::QuestionStore;
use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;

/// One row of the demonstration questionnaire. `parent` refers to the `key`
/// of an earlier row; options are `(en, fr)` pairs and the English text is
/// stored as the canonical value.
struct SeedQuestion {
    key: &'static str,
    parent: Option<&'static str>,
    content: Option<ContentType>,
    order: i32,
    unit: Option<Unit>,
    en: &'static str,
    fr: &'static str,
    options: &'static [(&'static str, &'static str)],
}

const fn section(
    key: &'static str,
    parent: Option<&'static str>,
    order: i32,
    en: &'static str,
    fr: &'static str,
) -> SeedQuestion {
    SeedQuestion {
        key,
        parent,
        content: None,
        order,
        unit: None,
        en,
        fr,
        options: &[],
    }
}

const fn field(
    key: &'static str,
    parent: &'static str,
    content: ContentType,
    order: i32,
    en: &'static str,
    fr: &'static str,
) -> SeedQuestion {
    SeedQuestion {
        key,
        parent: Some(parent),
        content: Some(content),
        order,
        unit: None,
        en,
        fr,
        options: &[],
    }
}

const YES_NO: &[(&str, &str)] = &[("Yes", "Oui"), ("No", "Non")];

const ESG_QUESTIONNAIRE: &[SeedQuestion] = &[
    section("general", None, 0, "General information", "Informations générales"),
    field("company", "general", ContentType::Text, 0, "Company name", "Nom de l'entreprise"),
    field("employees", "general", ContentType::Number, 1, "Number of employees", "Nombre d'employés"),
    SeedQuestion {
        key: "sector",
        parent: Some("general"),
        content: Some(ContentType::Enum),
        order: 2,
        unit: None,
        en: "Business sector",
        fr: "Secteur d'activité",
        options: &[
            ("Industry", "Industrie"),
            ("Services", "Services"),
            ("Retail", "Commerce"),
            ("Agriculture", "Agriculture"),
        ],
    },
    section("environment", None, 1, "Environment", "Environnement"),
    section("energy", Some("environment"), 0, "Energy", "Énergie"),
    section("renewables", Some("energy"), 0, "Renewable sources", "Sources renouvelables"),
    SeedQuestion {
        key: "renewable_share",
        parent: Some("renewables"),
        content: Some(ContentType::Number),
        order: 0,
        unit: Some(Unit::Percentage),
        en: "Share of renewable energy",
        fr: "Part d'énergie renouvelable",
        options: &[],
    },
    SeedQuestion {
        key: "energy_audit",
        parent: Some("renewables"),
        content: Some(ContentType::Enum),
        order: 1,
        unit: None,
        en: "Energy audit performed in the last four years",
        fr: "Audit énergétique réalisé au cours des quatre dernières années",
        options: YES_NO,
    },
    field(
        "emissions",
        "environment",
        ContentType::Table,
        1,
        "Greenhouse gas emissions",
        "Émissions de gaz à effet de serre",
    ),
    field("emissions_source", "emissions", ContentType::Text, 0, "Emission source", "Source d'émission"),
    field(
        "emissions_tonnes",
        "emissions",
        ContentType::Number,
        1,
        "Tonnes of CO2 equivalent",
        "Tonnes équivalent CO2",
    ),
    section("social", None, 2, "Social", "Social"),
    SeedQuestion {
        key: "women_share",
        parent: Some("social"),
        content: Some(ContentType::Number),
        order: 0,
        unit: Some(Unit::Percentage),
        en: "Share of women in management",
        fr: "Part des femmes dans l'encadrement",
        options: &[],
    },
    SeedQuestion {
        key: "code_of_conduct",
        parent: Some("social"),
        content: Some(ContentType::Enum),
        order: 1,
        unit: None,
        en: "Code of conduct published",
        fr: "Code de conduite publié",
        options: YES_NO,
    },
];

/// Replace the stored questionnaire with the built-in ESG demonstration set
pub async fn load_seed_data<S: QuestionStore + ?Sized>(store: &S) -> Result<()> {
    store
        .clear_questions()
        .await
        .context("Failed to clear existing questionnaire")?;

    let mut ids: HashMap<&'static str, QuestionId> = HashMap::new();

    for seed in ESG_QUESTIONNAIRE {
        let parent_id = seed
            .parent
            .map(|parent| {
                ids.get(parent).copied().with_context(|| {
                    format!("Seed question '{}' has unknown parent '{}'", seed.key, parent)
                })
            })
            .transpose()?;

        let id = store
            .create_question(NewQuestion {
                parent_id,
                content: seed.content,
                order: seed.order,
                unit: seed.unit,
                labels: labels(seed.en, seed.fr),
            })
            .await
            .with_context(|| format!("Failed to seed question '{}'", seed.key))?;

        for (order, (en, fr)) in seed.options.iter().enumerate() {
            store
                .create_enum_value(
                    id,
                    NewEnumValue {
                        value: en.to_string(),
                        order: order as i32,
                        labels: labels(en, fr),
                    },
                )
                .await
                .with_context(|| format!("Failed to seed option '{}' of '{}'", en, seed.key))?;
        }

        ids.insert(seed.key, id);
    }

    info!("Seeded {} questions", ids.len());
    Ok(())
}

fn labels(en: &str, fr: &str) -> Vec<Translation> {
    vec![Translation::new(Locale::En, en), Translation::new(Locale::Fr, fr)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{build_forest, count_nodes, resolve_questions};
    use crate::store::MemoryStore;

    fn depth(questions: &[crate::model::Question]) -> usize {
        questions
            .iter()
            .map(|q| 1 + depth(&q.children))
            .max()
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_seed_builds_complete_tree() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();

        let records = store.list_question_records(Locale::En).await.unwrap();
        assert_eq!(records.len(), ESG_QUESTIONNAIRE.len());

        let forest = build_forest(resolve_questions(Locale::En, &records));
        assert_eq!(count_nodes(&forest), ESG_QUESTIONNAIRE.len());
        assert_eq!(forest.len(), 3);
        assert_eq!(forest[0].label, "General information");
        assert!(depth(&forest) >= 4);
    }

    #[tokio::test]
    async fn test_seed_is_bilingual_and_repeatable() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();
        load_seed_data(&store).await.unwrap();

        let records = store.list_question_records(Locale::Fr).await.unwrap();
        assert_eq!(records.len(), ESG_QUESTIONNAIRE.len());

        let questions = resolve_questions(Locale::Fr, &records);
        let sector = questions
            .iter()
            .find(|q| q.label == "Secteur d'activité")
            .unwrap();
        let options: Vec<(&str, &str)> = sector
            .enum_values
            .iter()
            .map(|ev| (ev.value.as_str(), ev.label.as_str()))
            .collect();
        assert_eq!(options[0], ("Industry", "Industrie"));
        assert_eq!(options.len(), 4);

        assert!(questions
            .iter()
            .any(|q| q.unit == Some(Unit::Percentage)));
    }
}
