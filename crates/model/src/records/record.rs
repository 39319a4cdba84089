use crate::core::value::Value;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// A schema-conformant record ready for submission.
///
/// Serializes as a JSON object in field order. Absent optional fields are
/// not stored, so they never appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    /// Index of the `ImportRow` this record was built from.
    pub index: usize,
    fields: Vec<(String, Value)>,
}

impl ValidatedRecord {
    pub fn new(index: usize) -> Self {
        ValidatedRecord {
            index,
            fields: Vec::new(),
        }
    }

    /// Sets `name`, replacing an earlier value for the same field.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl Serialize for ValidatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
