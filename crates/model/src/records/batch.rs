use crate::{records::record::ValidatedRecord, schema::resource::Resource};

/// The unit handed to the batch submitter. Built once from the preview and
/// consumed by exactly one submission.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub id: String,
    pub resource: Resource,
    pub records: Vec<ValidatedRecord>,
    pub ts: chrono::DateTime<chrono::Utc>,
}

impl RecordBatch {
    pub fn new(resource: Resource, records: Vec<ValidatedRecord>) -> Self {
        RecordBatch {
            id: uuid::Uuid::new_v4().to_string(),
            resource,
            records,
            ts: chrono::Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// JSON body for the resource's batch endpoint: `{ <body_key>: [...] }`.
    pub fn to_body(&self) -> serde_json::Value {
        let records = self
            .records
            .iter()
            .map(ValidatedRecord::to_json)
            .collect::<Vec<_>>();
        let mut body = serde_json::Map::new();
        body.insert(
            self.resource.body_key().to_string(),
            serde_json::Value::Array(records),
        );
        serde_json::Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_uses_resource_key() {
        let batch = RecordBatch::new(
            Resource::Grades,
            vec![ValidatedRecord::new(0).with("roll_number", "X1")],
        );

        let body = batch.to_body();
        assert_eq!(body["grades"][0]["roll_number"], "X1");
        assert_eq!(batch.len(), 1);
    }
}
