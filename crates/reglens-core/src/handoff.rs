//! One-shot handoff of extraction results between views.
//!
//! Values are stored as JSON under fixed keys and removed on first read.
//! This is not a durable store.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CoreError;

/// Extracted rules from the last extraction run.
pub const EXTRACTED_RULES: &str = "extractedRules";
/// Full response of the last extraction run.
pub const EXTRACTION_RESPONSE: &str = "extractionResponse";

#[derive(Debug, Default)]
pub struct HandoffStore {
    entries: HashMap<String, String>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing anything already there.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.entries.insert(key.to_string(), json);
        Ok(())
    }

    /// Read and remove the value under `key`.
    ///
    /// The entry is removed even if it fails to decode.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, CoreError> {
        match self.entries.remove(key) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComplianceRule, ProcessResponse};

    #[test]
    fn take_reads_once() {
        let mut store = HandoffStore::new();
        let rules = vec![ComplianceRule {
            rule_id: "rule_1".into(),
            confidence_score: 0.9,
            ..Default::default()
        }];
        store.put(EXTRACTED_RULES, &rules).unwrap();
        assert!(store.contains(EXTRACTED_RULES));

        let first: Option<Vec<ComplianceRule>> = store.take(EXTRACTED_RULES).unwrap();
        assert_eq!(first.unwrap()[0].rule_id, "rule_1");

        let second: Option<Vec<ComplianceRule>> = store.take(EXTRACTED_RULES).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn put_replaces_previous_value() {
        let mut store = HandoffStore::new();
        let mut resp = ProcessResponse {
            document_id: "doc_1".into(),
            ..Default::default()
        };
        store.put(EXTRACTION_RESPONSE, &resp).unwrap();
        resp.document_id = "doc_2".into();
        store.put(EXTRACTION_RESPONSE, &resp).unwrap();

        let got: ProcessResponse = store.take(EXTRACTION_RESPONSE).unwrap().unwrap();
        assert_eq!(got.document_id, "doc_2");
    }

    #[test]
    fn undecodable_entry_is_still_consumed() {
        let mut store = HandoffStore::new();
        store.put(EXTRACTED_RULES, &"not a list").unwrap();
        let res: Result<Option<Vec<ComplianceRule>>, _> = store.take(EXTRACTED_RULES);
        assert!(matches!(res, Err(CoreError::Json(_))));
        assert!(!store.contains(EXTRACTED_RULES));
    }
}
