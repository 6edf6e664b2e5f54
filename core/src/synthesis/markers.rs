//! Structured-signal recovery from model response text
//!
//! The completion marker is the contract; the fenced code block scan is the
//! resilience fallback for agents that claim success without writing.

use regex::Regex;
use std::sync::OnceLock;

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"TOOL_CREATED:\s*(\S+\.json)").unwrap())
}

fn code_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap())
}

/// Extract the path from a `TOOL_CREATED: <path>.json` completion marker
pub fn extract_tool_created(text: &str) -> Option<&str> {
    marker_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Extract the first fenced code block (` ```json ` or bare ` ``` `)
pub fn extract_code_block(text: &str) -> Option<&str> {
    code_block_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marker_in_prose() {
        let text = "I wrote the file.\nTOOL_CREATED: generated_tools/shout.json\nDone.";
        assert_eq!(
            extract_tool_created(text),
            Some("generated_tools/shout.json")
        );
    }

    #[test]
    fn ignores_marker_with_wrong_extension() {
        assert_eq!(
            extract_tool_created("TOOL_CREATED: generated_tools/shout.py"),
            None
        );
        assert_eq!(extract_tool_created("no marker here"), None);
    }

    #[test]
    fn extracts_tagged_code_block() {
        let text = "Here you go:\n```json\n{\"name\": \"shout\"}\n```\nEnjoy.";
        assert_eq!(extract_code_block(text), Some("{\"name\": \"shout\"}"));
    }

    #[test]
    fn extracts_untagged_code_block() {
        let text = "```\n{\"name\": \"shout\"}\n```";
        assert_eq!(extract_code_block(text), Some("{\"name\": \"shout\"}"));
    }

    #[test]
    fn no_block_means_none() {
        assert_eq!(extract_code_block("plain text only"), None);
    }
}
