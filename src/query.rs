//! Data extraction and assertions over a snapshot
//!
//! Both calls go through the same [`AiCaller`] boundary as element
//! resolution. Neither mutates the snapshot.

use crate::ai::{
    AiActionType, AiCaller, AssertionResponse, ExtractResponse, build_assert_messages, build_extract_messages,
};
use crate::config::LocatorConfig;
use crate::context::UiContext;
use crate::describe::describe_page;
use crate::dom::ElementIndex;
use crate::error::{LocatorError, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What to extract from the page
#[derive(Debug, Clone, PartialEq)]
pub enum DataQuery {
    /// Free-form demand, answered in whatever shape it asks for
    Text(String),
    /// Named fields, each with a description; answered as a key-value object
    Fields(IndexMap<String, String>),
}

impl DataQuery {
    /// Build a field query, keeping the given key order
    pub fn fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        DataQuery::Fields(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DataQuery::Text(text) => text.trim().is_empty(),
            DataQuery::Fields(fields) => fields.is_empty(),
        }
    }

    /// Short form used in logs, errors and dumps
    pub fn summary(&self) -> String {
        match self {
            DataQuery::Text(text) => text.clone(),
            DataQuery::Fields(fields) => fields.keys().cloned().collect::<Vec<_>>().join(","),
        }
    }

    /// The key hint and the demand text of the extraction prompt
    fn prompt_parts(&self) -> (String, String) {
        match self {
            DataQuery::Text(text) => (String::new(), text.clone()),
            DataQuery::Fields(fields) => {
                let body = fields
                    .iter()
                    .map(|(key, description)| {
                        format!("  {}: {}", Value::from(key.as_str()), Value::from(description.as_str()))
                    })
                    .collect::<Vec<_>>()
                    .join(",\n");
                (
                    format!("return in key-value style object, keys are {}", self.summary()),
                    format!("{{\n{}\n}}", body),
                )
            }
        }
    }
}

impl From<&str> for DataQuery {
    fn from(text: &str) -> Self {
        DataQuery::Text(text.to_string())
    }
}

impl From<String> for DataQuery {
    fn from(text: String) -> Self {
        DataQuery::Text(text)
    }
}

/// Result of [`extract_element_info`]
#[derive(Debug, Clone)]
pub struct ExtractOutput {
    pub parse_result: ExtractResponse,
    pub raw_response: Value,

    /// Index of the snapshot, for resolving ids the data may mention
    pub element_index: ElementIndex,

    pub usage: Option<Value>,
}

/// Result of [`ai_assert`]
#[derive(Debug, Clone)]
pub struct AssertOutput {
    pub content: AssertionResponse,
    pub raw_response: Value,
    pub usage: Option<Value>,
}

/// Ask the AI to extract `query` from the page
///
/// The page is described with the compact [`LocatorConfig::lite`] settings.
pub async fn extract_element_info<C>(context: &UiContext, query: &DataQuery, caller: &C) -> Result<ExtractOutput>
where
    C: AiCaller + ?Sized,
{
    if query.is_empty() {
        return Err(LocatorError::InvalidInput("the data demand is empty".to_string()));
    }

    let page = describe_page(context, &LocatorConfig::lite())?;
    let (data_keys, data_query) = query.prompt_parts();
    let messages = build_extract_messages(&page.description, &data_keys, &data_query, &context.screenshot_base64);

    let summary = query.summary();
    log::info!("Asking AI to extract \"{}\"", summary);
    let response = caller
        .call(messages, AiActionType::ExtractData)
        .await
        .map_err(|e| LocatorError::AiCallFailed(format!("while extracting \"{}\": {}", summary, e)))?;

    let parse_result: ExtractResponse = parse_answer(&response.content, &summary)?;
    if !parse_result.errors.is_empty() {
        log::warn!("Extraction of \"{}\" reported errors: {:?}", summary, parse_result.errors);
    }

    Ok(ExtractOutput {
        parse_result,
        raw_response: response.content,
        element_index: page.index,
        usage: response.usage,
    })
}

/// Ask the AI whether `assertion` holds on the page
pub async fn ai_assert<C>(context: &UiContext, assertion: &str, caller: &C) -> Result<AssertOutput>
where
    C: AiCaller + ?Sized,
{
    if assertion.trim().is_empty() {
        return Err(LocatorError::InvalidInput("the assertion is empty".to_string()));
    }

    let messages = build_assert_messages(assertion, &context.screenshot_base64);

    log::info!("Asking AI to assert \"{}\"", assertion);
    let response = caller
        .call(messages, AiActionType::Assert)
        .await
        .map_err(|e| LocatorError::AiCallFailed(format!("while asserting \"{}\": {}", assertion, e)))?;

    let content: AssertionResponse = parse_answer(&response.content, assertion)?;
    log::debug!("Assertion \"{}\" pass={}", assertion, content.pass);

    Ok(AssertOutput {
        content,
        raw_response: response.content,
        usage: response.usage,
    })
}

fn parse_answer<T: DeserializeOwned>(content: &Value, description: &str) -> Result<T> {
    serde_json::from_value(content.clone()).map_err(|e| LocatorError::MalformedResponse {
        description: description.to_string(),
        reason: e.to_string(),
        raw: content.to_string(),
    })
}
