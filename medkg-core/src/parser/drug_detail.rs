//! Splitting of `"<producer>(<drug>)"` strings.

/// Result of splitting one `drug_detail` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrugDetail {
    /// A producer and the drug it makes.
    Produced { producer: String, drug: String },
    /// A drug name with no producer.
    Bare(String),
}

impl DrugDetail {
    pub fn drug(&self) -> &str {
        match self {
            DrugDetail::Produced { drug, .. } => drug,
            DrugDetail::Bare(drug) => drug,
        }
    }

    pub fn producer(&self) -> Option<&str> {
        match self {
            DrugDetail::Produced { producer, .. } => Some(producer),
            DrugDetail::Bare(_) => None,
        }
    }
}

/// Split a drug detail string at its parenthesis.
///
/// Exactly one `(` yields a producer and a drug; trailing `)` are trimmed
/// from the drug. When the producer repeats the drug name at its end (and not
/// at its start) that suffix is dropped, so `"某药厂感冒灵(感冒灵)"` gives
/// producer `某药厂`. With zero or several `(` the text before the first one
/// is taken as a bare drug name.
pub fn split_drug_detail(text: &str) -> DrugDetail {
    let parts: Vec<&str> = text.split('(').collect();
    if parts.len() != 2 {
        return DrugDetail::Bare(parts[0].to_string());
    }

    let drug = parts[1].trim_end_matches(')');
    let mut producer = parts[0];
    if !drug.is_empty() && matches!(producer.find(drug), Some(i) if i > 0) {
        if let Some(stripped) = producer.strip_suffix(drug) {
            producer = stripped;
        }
    }

    DrugDetail::Produced {
        producer: producer.to_string(),
        drug: drug.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produced(producer: &str, drug: &str) -> DrugDetail {
        DrugDetail::Produced {
            producer: producer.to_string(),
            drug: drug.to_string(),
        }
    }

    #[test]
    fn test_plain_producer() {
        assert_eq!(split_drug_detail("某药厂(感冒灵)"), produced("某药厂", "感冒灵"));
    }

    #[test]
    fn test_producer_ending_with_drug_is_trimmed() {
        assert_eq!(
            split_drug_detail("北京同仁堂感冒清热颗粒(感冒清热颗粒)"),
            produced("北京同仁堂", "感冒清热颗粒")
        );
    }

    #[test]
    fn test_producer_containing_drug_in_middle_is_kept() {
        assert_eq!(
            split_drug_detail("华润阿莫西林制药厂(阿莫西林)"),
            produced("华润阿莫西林制药厂", "阿莫西林")
        );
    }

    #[test]
    fn test_producer_equal_to_drug_is_kept() {
        // Match at position 0 does not count.
        assert_eq!(
            split_drug_detail("阿莫西林(阿莫西林)"),
            produced("阿莫西林", "阿莫西林")
        );
    }

    #[test]
    fn test_trailing_parens_trimmed() {
        assert_eq!(split_drug_detail("药厂(药))"), produced("药厂", "药"));
    }

    #[test]
    fn test_bare_drug() {
        let detail = split_drug_detail("板蓝根颗粒");
        assert_eq!(detail, DrugDetail::Bare("板蓝根颗粒".into()));
        assert_eq!(detail.producer(), None);
        assert_eq!(detail.drug(), "板蓝根颗粒");
    }

    #[test]
    fn test_multiple_parens_degrade_to_bare() {
        assert_eq!(
            split_drug_detail("药厂(复方(甘草)片)"),
            DrugDetail::Bare("药厂".into())
        );
    }

    #[test]
    fn test_empty_drug() {
        assert_eq!(split_drug_detail("药厂()"), produced("药厂", ""));
    }
}
