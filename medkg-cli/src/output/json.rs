//! JSON output formatting for machine-readable output.

use super::OutputConfig;
use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as pretty-printed JSON.
    pub fn format<T: Serialize + ?Sized>(data: &T, _config: &OutputConfig) -> String {
        serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_pretty() {
        let mut data = BTreeMap::new();
        data.insert("Disease", 2);
        let out = JsonOutput::format(&data, &OutputConfig::new(OutputFormat::Json));
        assert_eq!(out, "{\n  \"Disease\": 2\n}");
    }

    #[test]
    fn test_format_keeps_non_ascii() {
        let out = JsonOutput::format(&["呼吸内科"], &OutputConfig::new(OutputFormat::Json));
        assert!(out.contains("呼吸内科"));
    }
}
