//! Data model produced by the record parser.
//!
//! A [`ParsedCorpus`] is built once per parse pass and is read-only
//! afterwards: persistence and export only ever borrow it.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::schema::{DiseaseProperty, EntityKind, RelationKind};

/// A property value stored on a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::List(_) => None,
        }
    }

    /// Convert a raw JSON value from a record.
    ///
    /// Strings and string lists map directly; other scalars keep their JSON
    /// text and `null` becomes the empty string.
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => PropertyValue::Text(s),
            Value::Null => PropertyValue::Text(String::new()),
            Value::Array(items) => PropertyValue::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => PropertyValue::Text(other.to_string()),
        }
    }
}

impl Default for PropertyValue {
    fn default() -> Self {
        PropertyValue::Text(String::new())
    }
}

/// Property name → value, ordered for stable output.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A relationship triple `(source, relation, target)`.
///
/// Serializes as a 3-element array `[source, label, target]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub source: String,
    pub relation: RelationKind,
    pub target: String,
}

impl Triple {
    pub fn new(
        source: impl Into<String>,
        relation: RelationKind,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relation,
            target: target.into(),
        }
    }
}

impl Serialize for Triple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.source, self.relation.label(), &self.target).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Triple {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (source, label, target) = <(String, String, String)>::deserialize(deserializer)?;
        let relation = RelationKind::parse(&label)
            .ok_or_else(|| D::Error::custom(format!("unknown relation label: {}", label)))?;
        Ok(Self {
            source,
            relation,
            target,
        })
    }
}

/// The attribute record of one disease line.
///
/// Every record carries all eight [`DiseaseProperty`] keys (empty string when
/// absent in the source) and, if present, the raw `cure_department` list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub name: String,
    pub properties: PropertyMap,
}

impl DiseaseRecord {
    /// Create a record with every disease property defaulted to `""`.
    pub fn new(name: impl Into<String>) -> Self {
        let properties = DiseaseProperty::ALL
            .iter()
            .map(|p| (p.key().to_string(), PropertyValue::default()))
            .collect();
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

/// Entity names collected per type, duplicates included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityLists {
    pub drugs: Vec<String>,
    pub recipes: Vec<String>,
    pub foods: Vec<String>,
    pub checks: Vec<String>,
    pub departments: Vec<String>,
    pub producers: Vec<String>,
    pub diseases: Vec<String>,
    pub symptoms: Vec<String>,
}

impl EntityLists {
    pub fn get(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Drug => &self.drugs,
            EntityKind::Recipe => &self.recipes,
            EntityKind::Food => &self.foods,
            EntityKind::Check => &self.checks,
            EntityKind::Department => &self.departments,
            EntityKind::Producer => &self.producers,
            EntityKind::Disease => &self.diseases,
            EntityKind::Symptom => &self.symptoms,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: EntityKind) -> &mut Vec<String> {
        match kind {
            EntityKind::Drug => &mut self.drugs,
            EntityKind::Recipe => &mut self.recipes,
            EntityKind::Food => &mut self.foods,
            EntityKind::Check => &mut self.checks,
            EntityKind::Department => &mut self.departments,
            EntityKind::Producer => &mut self.producers,
            EntityKind::Disease => &mut self.diseases,
            EntityKind::Symptom => &mut self.symptoms,
        }
    }

    /// Total number of collected names, duplicates included.
    pub fn total(&self) -> usize {
        EntityKind::ALL.iter().map(|k| self.get(*k).len()).sum()
    }
}

/// Relationship triples collected per relation, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationLists {
    pub department: Vec<Triple>,
    pub not_eat: Vec<Triple>,
    pub do_eat: Vec<Triple>,
    pub recommend_eat: Vec<Triple>,
    pub common_drug: Vec<Triple>,
    pub recommend_drug: Vec<Triple>,
    pub check: Vec<Triple>,
    pub drug_producer: Vec<Triple>,
    pub symptom: Vec<Triple>,
    pub accompany: Vec<Triple>,
    pub category: Vec<Triple>,
}

impl RelationLists {
    pub fn get(&self, kind: RelationKind) -> &[Triple] {
        match kind {
            RelationKind::BelongsTo => &self.department,
            RelationKind::NotEat => &self.not_eat,
            RelationKind::DoEat => &self.do_eat,
            RelationKind::RecommendRecipes => &self.recommend_eat,
            RelationKind::HasCommonDrug => &self.common_drug,
            RelationKind::RecommendDrug => &self.recommend_drug,
            RelationKind::NeedCheck => &self.check,
            RelationKind::Production => &self.drug_producer,
            RelationKind::HasSymptom => &self.symptom,
            RelationKind::AccompanyWith => &self.accompany,
            RelationKind::CureDepartment => &self.category,
        }
    }

    /// Append a triple to the collection of its relation.
    pub(crate) fn push(&mut self, triple: Triple) {
        let list = match triple.relation {
            RelationKind::BelongsTo => &mut self.department,
            RelationKind::NotEat => &mut self.not_eat,
            RelationKind::DoEat => &mut self.do_eat,
            RelationKind::RecommendRecipes => &mut self.recommend_eat,
            RelationKind::HasCommonDrug => &mut self.common_drug,
            RelationKind::RecommendDrug => &mut self.recommend_drug,
            RelationKind::NeedCheck => &mut self.check,
            RelationKind::Production => &mut self.drug_producer,
            RelationKind::HasSymptom => &mut self.symptom,
            RelationKind::AccompanyWith => &mut self.accompany,
            RelationKind::CureDepartment => &mut self.category,
        };
        list.push(triple);
    }

    pub fn total(&self) -> usize {
        RelationKind::ALL.iter().map(|k| self.get(*k).len()).sum()
    }
}

/// Everything extracted from one corpus file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCorpus {
    /// Number of records (non-blank lines) parsed
    pub record_count: usize,
    pub entities: EntityLists,
    pub relations: RelationLists,
    /// One attribute record per input line, in input order
    pub diseases: Vec<DiseaseRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_serializes_as_array() {
        let triple = Triple::new("流感", RelationKind::HasSymptom, "发热");
        let json = serde_json::to_string(&triple).unwrap();
        assert_eq!(json, r#"["流感","has_symptom","发热"]"#);

        let back: Triple = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triple);
    }

    #[test]
    fn test_triple_rejects_unknown_label() {
        let result: Result<Triple, _> = serde_json::from_str(r#"["a","treats","b"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_disease_record_defaults() {
        let record = DiseaseRecord::new("感冒");
        assert_eq!(record.properties.len(), 8);
        for prop in DiseaseProperty::ALL {
            assert_eq!(
                record.property(prop.key()),
                Some(&PropertyValue::Text(String::new()))
            );
        }
    }

    #[test]
    fn test_property_value_from_json() {
        use serde_json::json;

        assert_eq!(
            PropertyValue::from_json(json!("0.5%")),
            PropertyValue::Text("0.5%".into())
        );
        assert_eq!(
            PropertyValue::from_json(json!(["药物治疗", "手术治疗"])),
            PropertyValue::List(vec!["药物治疗".into(), "手术治疗".into()])
        );
        assert_eq!(PropertyValue::from_json(json!(null)), PropertyValue::default());
        assert_eq!(
            PropertyValue::from_json(json!(12)),
            PropertyValue::Text("12".into())
        );
    }

    #[test]
    fn test_relation_lists_push_routes_by_relation() {
        let mut rels = RelationLists::default();
        rels.push(Triple::new("a", RelationKind::Production, "b"));
        rels.push(Triple::new("c", RelationKind::BelongsTo, "d"));
        assert_eq!(rels.get(RelationKind::Production).len(), 1);
        assert_eq!(rels.department.len(), 1);
        assert_eq!(rels.total(), 2);
    }
}
