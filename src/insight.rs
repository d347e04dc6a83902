//! Locate, extract and assert, each call leaving a dump record

use crate::ai::AiCaller;
use crate::config::LocatorConfig;
use crate::context::UiContext;
use crate::dom::Element;
use crate::dump::{DumpData, DumpStore, UserQuery};
use crate::error::{LocatorError, Result};
use crate::inspect::{InspectOutput, InspectRequest, inspect_element};
use crate::query::{AssertOutput, DataQuery, ExtractOutput, ai_assert, extract_element_info};

/// Outcome of [`Insight::locate`]
#[derive(Debug, Clone)]
pub struct LocateOutcome {
    pub output: InspectOutput,

    /// Elements the result designates that exist in the snapshot
    pub elements: Vec<Element>,

    /// Id of the dump record written for this call
    pub log_id: String,
}

/// Resolution entry point that records a dump for every call
pub struct Insight<C> {
    caller: C,
    config: LocatorConfig,
    dump_store: DumpStore,
}

impl<C: AiCaller> Insight<C> {
    pub fn new(caller: C, config: LocatorConfig, mut dump_store: DumpStore) -> Self {
        if let Some(name) = &config.model_name {
            dump_store = dump_store.with_model_name(name.clone());
        }
        Self {
            caller,
            config,
            dump_store,
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn dump_store(&self) -> &DumpStore {
        &self.dump_store
    }

    /// Hand the dump store back for flushing at teardown
    pub fn into_dump_store(self) -> DumpStore {
        self.dump_store
    }

    /// Resolve `request` against `context`, recording the outcome
    pub async fn locate(&mut self, context: &mut UiContext, request: &InspectRequest) -> Result<LocateOutcome> {
        let outcome = inspect_element(context, request, &self.config, &self.caller).await;

        let mut data = DumpData {
            user_query: UserQuery {
                element: Some(request.target_description.clone()),
                multi: request.multi,
                ..Default::default()
            },
            quick_answer: request.quick_answer.clone(),
            ..Default::default()
        };

        match outcome {
            Ok(output) => {
                let elements: Vec<Element> = output
                    .parse_result
                    .matched_elements(&output.element_index)
                    .into_iter()
                    .cloned()
                    .collect();

                data.matched_element = elements.clone();
                data.raw_response = Some(output.raw_response.clone());
                data.usage = output.usage.clone();
                let log_id = self.dump_store.emit(data, None)?;

                log::info!(
                    "Located {} element(s) for \"{}\" (dump {})",
                    elements.len(),
                    request.target_description,
                    log_id
                );
                Ok(LocateOutcome {
                    output,
                    elements,
                    log_id,
                })
            }
            Err(err) => Err(self.record_failure(data, err, &request.target_description)),
        }
    }

    /// Extract `query` from `context`, recording the outcome
    pub async fn extract(&mut self, context: &UiContext, query: &DataQuery) -> Result<ExtractOutput> {
        let summary = query.summary();
        let mut data = DumpData {
            user_query: UserQuery {
                data_demand: Some(summary.clone()),
                ..Default::default()
            },
            ..Default::default()
        };

        match extract_element_info(context, query, &self.caller).await {
            Ok(output) => {
                data.data = Some(output.parse_result.data.clone());
                data.raw_response = Some(output.raw_response.clone());
                data.usage = output.usage.clone();
                if !output.parse_result.errors.is_empty() {
                    data.error = Some(output.parse_result.errors.join("\n"));
                }
                self.dump_store.emit(data, None)?;
                Ok(output)
            }
            Err(err) => Err(self.record_failure(data, err, &summary)),
        }
    }

    /// Check `assertion` against `context`, recording the verdict
    ///
    /// A failed assertion is a successful call; only the AI exchange itself
    /// can fail.
    pub async fn assert(&mut self, context: &UiContext, assertion: &str) -> Result<AssertOutput> {
        let mut data = DumpData {
            user_query: UserQuery {
                assertion: Some(assertion.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        match ai_assert(context, assertion, &self.caller).await {
            Ok(output) => {
                data.assertion_pass = Some(output.content.pass);
                data.assertion_thought = Some(output.content.thought.clone());
                data.raw_response = Some(output.raw_response.clone());
                data.usage = output.usage.clone();
                self.dump_store.emit(data, None)?;

                log::info!("Assertion \"{}\" pass={}", assertion, output.content.pass);
                Ok(output)
            }
            Err(err) => Err(self.record_failure(data, err, assertion)),
        }
    }

    fn record_failure(&mut self, mut data: DumpData, err: LocatorError, subject: &str) -> LocatorError {
        if let LocatorError::MalformedResponse { raw, .. } = &err {
            data.raw_response = serde_json::from_str(raw).ok();
        }
        data.error = Some(err.to_string());

        if let Err(dump_err) = self.dump_store.emit(data, None) {
            log::warn!("Failed to record dump for \"{}\": {}", subject, dump_err);
        }
        err
    }
}
