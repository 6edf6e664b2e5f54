//! Character counting tool

use crate::error::Result;
use crate::tools::envelope::{ParamSpec, Tool, ToolResult, ToolSpec, ToolUse};
use async_trait::async_trait;

/// Count characters in a string
pub struct CountChars {
    spec: ToolSpec,
}

impl CountChars {
    pub const NAME: &'static str = "count_chars";

    pub fn new() -> Self {
        let mut input_schema = std::collections::BTreeMap::new();
        input_schema.insert(
            "text".to_string(),
            ParamSpec {
                param_type: "string".to_string(),
                description: "Input text to count characters".to_string(),
                required: true,
            },
        );

        Self {
            spec: ToolSpec {
                name: Self::NAME.to_string(),
                description: "Counts characters in a string".to_string(),
                input_schema,
            },
        }
    }
}

impl Default for CountChars {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CountChars {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, req: &ToolUse) -> Result<ToolResult> {
        let params = req.params();

        // `text` parameter if structured, else the raw free-text value
        let text = match params.get("text").and_then(|v| v.as_str()) {
            Some(t) => t.to_string(),
            None => match req.text() {
                Some(t) => t.to_string(),
                None => {
                    return Ok(ToolResult::error(
                        req.tool_use_id.clone(),
                        "Missing required parameter: text".to_string(),
                    ))
                }
            },
        };

        let char_count = text.chars().count();
        Ok(ToolResult::success(
            req.tool_use_id.clone(),
            format!("Character count: {}", char_count),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::envelope::ToolStatus;
    use serde_json::json;

    #[tokio::test]
    async fn counts_structured_text() {
        let tool = CountChars::new();
        let req = ToolUse::new(json!({ "json": { "text": "hello" } }));
        let result = tool.invoke(&req).await.unwrap();
        assert_eq!(result.status, ToolStatus::Success);
        assert_eq!(result.text(), "Character count: 5");
    }

    #[tokio::test]
    async fn falls_back_to_free_text_path() {
        let tool = CountChars::new();
        let req = ToolUse::from_text("tu-1", "abc");
        let result = tool.invoke(&req).await.unwrap();
        assert_eq!(result.text(), "Character count: 3");
    }

    #[tokio::test]
    async fn invoking_twice_is_idempotent() {
        let tool = CountChars::new();
        let req = ToolUse::from_text("tu-1", "same input");
        let first = tool.invoke(&req).await.unwrap();
        let second = tool.invoke(&req).await.unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.text(), second.text());
    }
}
