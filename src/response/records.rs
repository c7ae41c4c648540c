// Flattening of raw result documents into records
use serde::Serialize;
use serde_json::{Map, Value};

/// One search hit
///
/// `data` holds the requested properties as lower-cased id -> first value.
/// Every other field of the raw result (id, content snippet, relevance...)
/// is kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Record {
    pub data: Map<String, Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Flattened property value by (case-insensitive) id
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.data.get(&property.to_lowercase())
    }

    /// Flattened property value as a string
    pub fn get_str(&self, property: &str) -> Option<&str> {
        self.get(property).and_then(Value::as_str)
    }
}

/// Turn the raw `resultset.results` array into records
pub fn flatten_results(results: Vec<Value>) -> Vec<Record> {
    results
        .into_iter()
        .filter_map(|result| match result {
            Value::Object(fields) => Some(flatten_result(fields)),
            other => {
                tracing::warn!("Skipping result that is not an object: {}", other);
                None
            }
        })
        .collect()
}

fn flatten_result(mut fields: Map<String, Value>) -> Record {
    let properties = fields.remove("properties");
    fields.remove("data");

    let mut data = Map::new();
    if let Some(Value::Array(properties)) = properties {
        for property in properties {
            let Some(id) = property.get("id").and_then(Value::as_str) else {
                tracing::warn!("Skipping property without an id: {}", property);
                continue;
            };

            let value = property
                .get("data")
                .and_then(Value::as_array)
                .and_then(|values| values.first())
                .cloned()
                .unwrap_or(Value::Null);

            data.insert(id.to_lowercase(), value);
        }
    }

    Record { data, fields }
}
