//! Graph vocabulary: entity types, relation labels and disease properties.
//!
//! Every label that ends up in the graph store or in an export file name is
//! defined here, so stores never splice free-form strings into queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of nodes in the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Drug,
    Recipe,
    Food,
    Check,
    Department,
    Producer,
    Disease,
    Symptom,
}

impl EntityKind {
    /// All entity kinds, in the order nodes are created and exported.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Drug,
        EntityKind::Recipe,
        EntityKind::Food,
        EntityKind::Check,
        EntityKind::Department,
        EntityKind::Producer,
        EntityKind::Disease,
        EntityKind::Symptom,
    ];

    /// Node label used by graph stores.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Drug => "Drug",
            EntityKind::Recipe => "Recipe",
            EntityKind::Food => "Food",
            EntityKind::Check => "Check",
            EntityKind::Department => "Department",
            EntityKind::Producer => "Producer",
            EntityKind::Disease => "Disease",
            EntityKind::Symptom => "Symptom",
        }
    }

    /// File name of the JSON snapshot for this kind.
    pub fn export_file(&self) -> &'static str {
        match self {
            EntityKind::Drug => "drugs.json",
            EntityKind::Recipe => "recipes.json",
            EntityKind::Food => "foods.json",
            EntityKind::Check => "checks.json",
            EntityKind::Department => "departments.json",
            EntityKind::Producer => "producers.json",
            EntityKind::Disease => "diseases.json",
            EntityKind::Symptom => "symptoms.json",
        }
    }

    /// Parse a label, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Types of relationships between nodes.
///
/// Each relation has exactly one source and one target kind, so a relation
/// label is enough to know which node sets an edge connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Department→Department (child belongs to parent)
    BelongsTo,
    /// Disease→Food
    NotEat,
    /// Disease→Food
    DoEat,
    /// Disease→Recipe
    RecommendRecipes,
    /// Disease→Drug
    HasCommonDrug,
    /// Disease→Drug
    RecommendDrug,
    /// Disease→Check
    NeedCheck,
    /// Producer→Drug
    Production,
    /// Disease→Symptom
    HasSymptom,
    /// Disease→Disease
    AccompanyWith,
    /// Disease→Department
    CureDepartment,
}

impl RelationKind {
    /// All relation kinds, in the order edges are created and exported.
    pub const ALL: [RelationKind; 11] = [
        RelationKind::BelongsTo,
        RelationKind::NotEat,
        RelationKind::DoEat,
        RelationKind::RecommendRecipes,
        RelationKind::HasCommonDrug,
        RelationKind::RecommendDrug,
        RelationKind::NeedCheck,
        RelationKind::Production,
        RelationKind::HasSymptom,
        RelationKind::AccompanyWith,
        RelationKind::CureDepartment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::NotEat => "not_eat",
            RelationKind::DoEat => "do_eat",
            RelationKind::RecommendRecipes => "recommend_recipes",
            RelationKind::HasCommonDrug => "has_common_drug",
            RelationKind::RecommendDrug => "recommend_drug",
            RelationKind::NeedCheck => "need_check",
            RelationKind::Production => "production",
            RelationKind::HasSymptom => "has_symptom",
            RelationKind::AccompanyWith => "accompany_with",
            RelationKind::CureDepartment => "cure_department",
        }
    }

    pub fn source_kind(&self) -> EntityKind {
        match self {
            RelationKind::BelongsTo => EntityKind::Department,
            RelationKind::Production => EntityKind::Producer,
            _ => EntityKind::Disease,
        }
    }

    pub fn target_kind(&self) -> EntityKind {
        match self {
            RelationKind::BelongsTo | RelationKind::CureDepartment => EntityKind::Department,
            RelationKind::NotEat | RelationKind::DoEat => EntityKind::Food,
            RelationKind::RecommendRecipes => EntityKind::Recipe,
            RelationKind::HasCommonDrug
            | RelationKind::RecommendDrug
            | RelationKind::Production => EntityKind::Drug,
            RelationKind::NeedCheck => EntityKind::Check,
            RelationKind::HasSymptom => EntityKind::Symptom,
            RelationKind::AccompanyWith => EntityKind::Disease,
        }
    }

    /// File name of the JSON snapshot for this relation.
    pub fn export_file(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "rels_department.json",
            RelationKind::NotEat => "rels_not_eat.json",
            RelationKind::DoEat => "rels_do_eat.json",
            RelationKind::RecommendRecipes => "rels_recommend_eat.json",
            RelationKind::HasCommonDrug => "rels_common_drug.json",
            RelationKind::RecommendDrug => "rels_recommend_drug.json",
            RelationKind::NeedCheck => "rels_check.json",
            RelationKind::Production => "rels_drug_producer.json",
            RelationKind::HasSymptom => "rels_symptom.json",
            RelationKind::AccompanyWith => "rels_accompany.json",
            RelationKind::CureDepartment => "rels_category.json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.label() == s)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Scalar attributes carried by every disease record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiseaseProperty {
    Description,
    Prevention,
    Cause,
    Probability,
    AtRiskPopulation,
    CureMethod,
    CureDuration,
    CureProbability,
}

impl DiseaseProperty {
    pub const ALL: [DiseaseProperty; 8] = [
        DiseaseProperty::Description,
        DiseaseProperty::Prevention,
        DiseaseProperty::Cause,
        DiseaseProperty::Probability,
        DiseaseProperty::AtRiskPopulation,
        DiseaseProperty::CureMethod,
        DiseaseProperty::CureDuration,
        DiseaseProperty::CureProbability,
    ];

    /// Key in the source record, also used as the stored property name.
    pub fn key(&self) -> &'static str {
        match self {
            DiseaseProperty::Description => "desc",
            DiseaseProperty::Prevention => "prevent",
            DiseaseProperty::Cause => "cause",
            DiseaseProperty::Probability => "get_prob",
            DiseaseProperty::AtRiskPopulation => "easy_get",
            DiseaseProperty::CureMethod => "cure_way",
            DiseaseProperty::CureDuration => "cure_lasttime",
            DiseaseProperty::CureProbability => "cured_prob",
        }
    }
}

/// Property holding the raw department list of a disease.
pub const CURE_DEPARTMENT_KEY: &str = "cure_department";
