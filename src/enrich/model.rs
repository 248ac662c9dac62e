use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Advisory test suggestions attached to a descriptor. Never consulted when
/// selectors or scripts are generated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performance: Vec<String>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
            && self.assertions.is_empty()
            && self.edge_cases.is_empty()
            && self.performance.is_empty()
    }

    /// Parse a service reply. Invalid JSON yields an empty enrichment; a key
    /// that is missing or not an array yields an empty list; non-string
    /// array items are dropped.
    pub fn from_json_lenient(text: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Self::default();
        };

        Self {
            selectors: string_list(&value, "selectors"),
            assertions: string_list(&value, "assertions"),
            edge_cases: string_list(&value, "edge_cases"),
            performance: string_list(&value, "performance"),
        }
    }
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
