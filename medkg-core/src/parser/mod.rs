//! Line-delimited JSON record parser.
//!
//! Each non-blank line of the corpus is one disease record. The parser
//! collects typed entity names, typed relationship triples and one
//! [`DiseaseRecord`] per line into a [`ParsedCorpus`]. Nothing is
//! deduplicated here; stores and the exporter do that.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::ParseError;
use crate::schema::{DiseaseProperty, EntityKind, RelationKind, CURE_DEPARTMENT_KEY};
use crate::types::{DiseaseRecord, EntityLists, ParsedCorpus, PropertyValue, RelationLists, Triple};

mod drug_detail;
mod record;

pub use drug_detail::{split_drug_detail, DrugDetail};

use record::RawRecord;

/// Parse a corpus file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedCorpus, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let corpus = parse_lines(BufReader::new(file), path)?;
    info!(
        path = %path.display(),
        records = corpus.record_count,
        entities = corpus.entities.total(),
        relations = corpus.relations.total(),
        "Parsed corpus"
    );
    Ok(corpus)
}

/// Parse a corpus from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParsedCorpus, ParseError> {
    parse_lines(reader, Path::new("<reader>"))
}

/// Parse a corpus held in memory.
pub fn parse_str(text: &str) -> Result<ParsedCorpus, ParseError> {
    parse_reader(text.as_bytes())
}

fn parse_lines<R: BufRead>(reader: R, origin: &Path) -> Result<ParsedCorpus, ParseError> {
    let mut builder = CorpusBuilder::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| ParseError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawRecord = serde_json::from_str(&line).map_err(|source| {
            ParseError::MalformedLine {
                line: line_no,
                source,
            }
        })?;
        builder.add_record(raw, line_no)?;
    }

    Ok(builder.finish())
}

/// Accumulates one parse pass. Only [`CorpusBuilder::finish`] hands the
/// collections out, as an immutable corpus.
#[derive(Default)]
struct CorpusBuilder {
    entities: EntityLists,
    relations: RelationLists,
    diseases: Vec<DiseaseRecord>,
    records: usize,
}

impl CorpusBuilder {
    fn add_record(&mut self, raw: RawRecord, line: usize) -> Result<(), ParseError> {
        let disease = raw
            .disease_name()
            .ok_or(ParseError::MissingName { line })?
            .to_string();

        self.records += 1;
        self.entity(EntityKind::Disease, disease.clone());
        let mut info = DiseaseRecord::new(disease.clone());

        if let Some(symptoms) = raw.symptom {
            self.link_all(&disease, RelationKind::HasSymptom, symptoms);
        }

        if let Some(accompany) = raw.acompany {
            self.link_all(&disease, RelationKind::AccompanyWith, accompany);
        }

        for prop in DiseaseProperty::ALL {
            if let Some(value) = raw.rest.get(prop.key()) {
                info.properties
                    .insert(prop.key().to_string(), PropertyValue::from_json(value.clone()));
            }
        }

        if let Some(departments) = raw.cure_department {
            match departments.as_slice() {
                [only] => self.relation(&disease, RelationKind::CureDepartment, only),
                [parent, child] => {
                    self.relation(child, RelationKind::BelongsTo, parent);
                    self.relation(&disease, RelationKind::CureDepartment, child);
                }
                other => {
                    debug!(
                        disease = %disease,
                        len = other.len(),
                        "Department list derives no relationship"
                    );
                }
            }
            info.properties.insert(
                CURE_DEPARTMENT_KEY.to_string(),
                PropertyValue::List(departments.clone()),
            );
            self.entities
                .get_mut(EntityKind::Department)
                .extend(departments);
        }

        if let Some(drugs) = raw.common_drug {
            self.link_all(&disease, RelationKind::HasCommonDrug, drugs);
        }
        if let Some(drugs) = raw.recommand_drug {
            self.link_all(&disease, RelationKind::RecommendDrug, drugs);
        }
        if let Some(foods) = raw.not_eat {
            self.link_all(&disease, RelationKind::NotEat, foods);
        }
        if let Some(foods) = raw.do_eat {
            self.link_all(&disease, RelationKind::DoEat, foods);
        }
        if let Some(recipes) = raw.recommand_eat {
            self.link_all(&disease, RelationKind::RecommendRecipes, recipes);
        }
        if let Some(checks) = raw.check {
            self.link_all(&disease, RelationKind::NeedCheck, checks);
        }

        for detail in raw.drug_detail.iter().flatten() {
            match split_drug_detail(detail) {
                DrugDetail::Produced { producer, drug } => {
                    self.relation(&producer, RelationKind::Production, &drug);
                    self.entity(EntityKind::Producer, producer);
                    self.entity(EntityKind::Drug, drug);
                }
                DrugDetail::Bare(drug) => self.entity(EntityKind::Drug, drug),
            }
        }

        self.diseases.push(info);
        Ok(())
    }

    /// Link the disease to every target and record each target as an entity
    /// of the relation's target kind.
    fn link_all(&mut self, disease: &str, relation: RelationKind, targets: Vec<String>) {
        for target in &targets {
            self.relation(disease, relation, target);
        }
        self.entities
            .get_mut(relation.target_kind())
            .extend(targets);
    }

    fn relation(&mut self, source: &str, relation: RelationKind, target: &str) {
        self.relations.push(Triple::new(source, relation, target));
    }

    fn entity(&mut self, kind: EntityKind, name: String) {
        self.entities.get_mut(kind).push(name);
    }

    fn finish(self) -> ParsedCorpus {
        ParsedCorpus {
            record_count: self.records,
            entities: self.entities,
            relations: self.relations,
            diseases: self.diseases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(source: &str, relation: RelationKind, target: &str) -> Triple {
        Triple::new(source, relation, target)
    }

    #[test]
    fn test_symptoms_and_department_hierarchy() {
        let corpus = parse_str(
            r#"{"name":"流感","symptom":["发热","咳嗽"],"cure_department":["内科","呼吸内科"]}"#,
        )
        .unwrap();

        assert_eq!(corpus.record_count, 1);
        assert_eq!(corpus.entities.diseases, vec!["流感"]);
        assert_eq!(corpus.entities.symptoms, vec!["发热", "咳嗽"]);
        assert_eq!(corpus.entities.departments, vec!["内科", "呼吸内科"]);
        assert_eq!(
            corpus.relations.symptom,
            vec![
                triple("流感", RelationKind::HasSymptom, "发热"),
                triple("流感", RelationKind::HasSymptom, "咳嗽"),
            ]
        );
        assert_eq!(
            corpus.relations.department,
            vec![triple("呼吸内科", RelationKind::BelongsTo, "内科")]
        );
        assert_eq!(
            corpus.relations.category,
            vec![triple("流感", RelationKind::CureDepartment, "呼吸内科")]
        );
    }

    #[test]
    fn test_drug_detail_with_producer() {
        let corpus =
            parse_str(r#"{"name":"感冒","drug_detail":["某药厂(感冒灵)"]}"#).unwrap();
        assert_eq!(corpus.entities.producers, vec!["某药厂"]);
        assert_eq!(corpus.entities.drugs, vec!["感冒灵"]);
        assert_eq!(
            corpus.relations.drug_producer,
            vec![triple("某药厂", RelationKind::Production, "感冒灵")]
        );
    }

    #[test]
    fn test_bare_drug_detail_has_no_producer() {
        let corpus = parse_str(r#"{"name":"感冒","drug_detail":["板蓝根颗粒"]}"#).unwrap();
        assert_eq!(corpus.entities.drugs, vec!["板蓝根颗粒"]);
        assert!(corpus.entities.producers.is_empty());
        assert!(corpus.relations.drug_producer.is_empty());
    }

    #[test]
    fn test_single_department_links_disease() {
        let corpus = parse_str(r#"{"name":"龋齿","cure_department":["口腔科"]}"#).unwrap();
        assert!(corpus.relations.department.is_empty());
        assert_eq!(
            corpus.relations.category,
            vec![triple("龋齿", RelationKind::CureDepartment, "口腔科")]
        );
    }

    #[test]
    fn test_long_department_list_derives_nothing() {
        let corpus =
            parse_str(r#"{"name":"x","cure_department":["外科","骨外科","手外科"]}"#).unwrap();
        assert!(corpus.relations.department.is_empty());
        assert!(corpus.relations.category.is_empty());
        assert_eq!(corpus.entities.departments.len(), 3);
        assert_eq!(
            corpus.diseases[0].property(CURE_DEPARTMENT_KEY),
            Some(&PropertyValue::List(vec![
                "外科".into(),
                "骨外科".into(),
                "手外科".into()
            ]))
        );
    }

    #[test]
    fn test_missing_optional_fields_add_nothing() {
        let corpus = parse_str(r#"{"name":"流感"}"#).unwrap();
        assert_eq!(corpus.entities.total(), 1);
        assert_eq!(corpus.relations.total(), 0);
        assert_eq!(corpus.diseases.len(), 1);
        assert!(corpus.diseases[0].property(CURE_DEPARTMENT_KEY).is_none());
    }

    #[test]
    fn test_accompany_feeds_diseases() {
        let corpus = parse_str(r#"{"name":"流感","acompany":["肺炎"]}"#).unwrap();
        assert_eq!(corpus.entities.diseases, vec!["流感", "肺炎"]);
        assert_eq!(
            corpus.relations.accompany,
            vec![triple("流感", RelationKind::AccompanyWith, "肺炎")]
        );
    }

    #[test]
    fn test_feeders_share_entity_lists() {
        let corpus = parse_str(
            r#"{"name":"d","common_drug":["a"],"recommand_drug":["b"],"not_eat":["c"],"do_eat":["e"],"recommand_eat":["f"],"check":["g"]}"#,
        )
        .unwrap();
        assert_eq!(corpus.entities.drugs, vec!["a", "b"]);
        assert_eq!(corpus.entities.foods, vec!["c", "e"]);
        assert_eq!(corpus.entities.recipes, vec!["f"]);
        assert_eq!(corpus.entities.checks, vec!["g"]);
        assert_eq!(corpus.relations.common_drug.len(), 1);
        assert_eq!(corpus.relations.recommend_drug.len(), 1);
        assert_eq!(
            corpus.relations.recommend_eat,
            vec![triple("d", RelationKind::RecommendRecipes, "f")]
        );
        assert_eq!(
            corpus.relations.check,
            vec![triple("d", RelationKind::NeedCheck, "g")]
        );
    }

    #[test]
    fn test_properties_default_and_override() {
        let corpus = parse_str(
            r#"{"_id":1,"name":"流感","desc":"病毒感染","cure_way":["药物治疗","支持性治疗"]}"#,
        )
        .unwrap();
        let record = &corpus.diseases[0];
        assert_eq!(record.name, "流感");
        assert_eq!(record.property("desc"), Some(&PropertyValue::Text("病毒感染".into())));
        assert_eq!(
            record.property("cure_way"),
            Some(&PropertyValue::List(vec!["药物治疗".into(), "支持性治疗".into()]))
        );
        assert_eq!(record.property("prevent"), Some(&PropertyValue::default()));
        assert!(record.property("_id").is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let corpus = parse_str(
            "{\"name\":\"a\",\"symptom\":[\"s\",\"s\"]}\n{\"name\":\"a\",\"symptom\":[\"s\"]}\n",
        )
        .unwrap();
        assert_eq!(corpus.entities.diseases, vec!["a", "a"]);
        assert_eq!(corpus.entities.symptoms.len(), 3);
        assert_eq!(corpus.relations.symptom.len(), 3);
        assert_eq!(corpus.diseases.len(), 2);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let corpus = parse_str("\n{\"name\":\"a\"}\n   \n{\"name\":\"b\"}\n").unwrap();
        assert_eq!(corpus.record_count, 2);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse_str("{\"name\":\"a\"}\n{not json}\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let err = parse_str("{\"name\":\"a\"}\n\n{\"symptom\":[\"x\"]}\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingName { line: 3 }));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
