use crate::ai::types::{ChatMessage, ContentPart};

/// System instruction for the locate call
pub fn system_prompt_to_locate_element() -> String {
    r#"You are an expert in UI automation. Given a screenshot of a page, a description of its elements and a description of a target, find the element(s) matching the target.

Answer with JSON only, in one of these forms:
- {"elements": [{"id": "<element id>"}], "errors": []} when the target is among the described elements;
- {"elements": [{"position": {"x": <x>, "y": <y>}}], "errors": []} when it is visible but not described;
- {"elements": [], "errors": ["<why nothing matched>"]} when nothing matches;
- [x, y] with x and y on a 0-1000 scale of the screenshot width and height, when asked to answer by position."#
        .to_string()
}

/// User instruction embedding the page description and the target
pub fn find_element_prompt(page_description: &str, target_description: &str, multi: bool) -> String {
    let quantity = if multi {
        "Return every element that matches."
    } else {
        "Return at most one element, the best match."
    };

    format!(
        "Here is the page:\n=====================================\n{}\n=====================================\n\nTarget: {}\n{}",
        page_description, target_description, quantity
    )
}

/// The two-message exchange sent to the AI: system instruction, then one
/// user turn with the screenshot reference followed by the text
pub fn build_locate_messages(
    page_description: &str,
    target_description: &str,
    multi: bool,
    screenshot_url: &str,
) -> Vec<ChatMessage> {
    exchange(
        system_prompt_to_locate_element(),
        screenshot_url,
        find_element_prompt(page_description, target_description, multi),
    )
}

/// System instruction for the data extraction call
pub fn system_prompt_to_extract() -> String {
    r#"You are an expert in UI testing. The user gives you a screenshot of a page, a description of its elements and a data demand. Consider the whole UI and extract the data the demand asks for.

Answer with JSON only, in this form:
{"language": "en", "data": <the extracted data, shaped as the demand asks>, "errors": []}
where `language` is the language of the page ("en" or "zh") and `errors` lists any problem met while extracting."#
        .to_string()
}

/// User instruction for extraction; `data_keys` may be empty
pub fn extract_data_prompt(page_description: &str, data_keys: &str, data_query: &str) -> String {
    format!(
        "pageDescription: {}\n\nFind the following data and put it in the `data` field.\nDATA_DEMAND start:\n=====================================\n{}\n\n{}\n=====================================\nDATA_DEMAND ends.",
        page_description, data_keys, data_query
    )
}

/// System instruction for the assertion call
pub fn system_prompt_to_assert() -> String {
    r#"You are an expert in UI testing. The user gives you a screenshot of a page and an assertion about it. Tell whether the assertion holds.

Answer with JSON only, in this form:
{"thought": "<your reasoning, in the language of the assertion>", "pass": true}"#
        .to_string()
}

/// User instruction carrying the assertion
pub fn assertion_prompt(assertion: &str) -> String {
    format!(
        "Here is the assertion. Just go ahead:\n=====================================\n{}\n=====================================",
        assertion
    )
}

/// Extraction exchange: system instruction, then the screenshot and the demand
pub fn build_extract_messages(
    page_description: &str,
    data_keys: &str,
    data_query: &str,
    screenshot_url: &str,
) -> Vec<ChatMessage> {
    exchange(
        system_prompt_to_extract(),
        screenshot_url,
        extract_data_prompt(page_description, data_keys, data_query),
    )
}

/// Assertion exchange: system instruction, then the screenshot and the assertion
pub fn build_assert_messages(assertion: &str, screenshot_url: &str) -> Vec<ChatMessage> {
    exchange(system_prompt_to_assert(), screenshot_url, assertion_prompt(assertion))
}

fn exchange(system: String, screenshot_url: &str, text: String) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system),
        ChatMessage::user(vec![ContentPart::image(screenshot_url), ContentPart::text(text)]),
    ]
}
