//! Diagnostic records of resolutions
//!
//! A [`DumpStore`] is created by the caller and handed to the components
//! that emit records. Records are keyed by log id; emitting again under the
//! same id replaces the record in place.

use crate::dom::Element;
use crate::error::Result;
use crate::quick_answer::QuickAnswer;
use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Callback notified of every emitted record
pub type DumpSubscriber = Box<dyn Fn(&InsightDump) + Send + Sync>;

/// The query a record is about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserQuery {
    /// Target description of a locate call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,

    #[serde(default)]
    pub multi: bool,

    /// Data demand of an extract call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_demand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
}

/// Payload of a record, as filled in by the emitting component
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DumpData {
    pub user_query: UserQuery,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_answer: Option<QuickAnswer>,

    #[serde(default)]
    pub matched_element: Vec<Element>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,

    /// Data returned by an extract call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion_pass: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion_thought: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A stored record: payload plus meta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightDump {
    pub log_id: String,
    pub sdk_version: String,
    /// Milliseconds since the Unix epoch
    pub log_time: i64,
    #[serde(default)]
    pub model_name: String,
    #[serde(flatten)]
    pub data: DumpData,
}

/// Process-scoped store of serialized records
#[derive(Default)]
pub struct DumpStore {
    records: IndexMap<String, String>,
    subscriber: Option<DumpSubscriber>,
    model_name: String,
}

impl fmt::Debug for DumpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DumpStore")
            .field("records", &self.records.len())
            .field("subscriber", &self.subscriber.is_some())
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl DumpStore {
    /// Create a new empty DumpStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set subscriber
    pub fn with_subscriber<F>(mut self, subscriber: F) -> Self
    where
        F: Fn(&InsightDump) + Send + Sync + 'static,
    {
        self.subscriber = Some(Box::new(subscriber));
        self
    }

    /// Builder method: set model name recorded in meta
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Store a record and return its log id
    ///
    /// A fresh uuid is used when `log_id` is `None`.
    pub fn emit(&mut self, data: DumpData, log_id: Option<&str>) -> Result<String> {
        let id = match log_id {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let dump = InsightDump {
            log_id: id.clone(),
            sdk_version: env!("CARGO_PKG_VERSION").to_string(),
            log_time: Utc::now().timestamp_millis(),
            model_name: self.model_name.clone(),
            data,
        };

        if let Some(subscriber) = &self.subscriber {
            subscriber(&dump);
        }

        let serialized = serde_json::to_string_pretty(&dump)?;
        if self.records.insert(id.clone(), serialized).is_some() {
            log::debug!("Replaced dump {}", id);
        } else {
            log::debug!("Stored dump {}", id);
        }

        Ok(id)
    }

    /// Serialized record for `log_id`
    pub fn get(&self, log_id: &str) -> Option<&str> {
        self.records.get(log_id).map(String::as_str)
    }

    /// Serialized records in first-emission order
    pub fn records(&self) -> impl Iterator<Item = &str> {
        self.records.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records as one JSON array
    pub fn to_json(&self) -> String {
        format!("[{}]", self.records().collect::<Vec<_>>().join(",\n"))
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
