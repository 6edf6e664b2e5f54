//! Directory listing tool with human-readable sizes

use crate::error::Result;
use crate::tools::envelope::{ParamSpec, Tool, ToolResult, ToolSpec, ToolUse};
use async_trait::async_trait;
use std::path::Path;

/// List files in a directory with human-readable sizes (B, KB, MB, GB)
pub struct ListFilesWithSizes {
    spec: ToolSpec,
}

impl ListFilesWithSizes {
    pub const NAME: &'static str = "list_files_with_sizes";

    pub fn new() -> Self {
        let mut input_schema = std::collections::BTreeMap::new();
        input_schema.insert(
            "path".to_string(),
            ParamSpec {
                param_type: "string".to_string(),
                description: "Directory to list. Defaults to current directory.".to_string(),
                required: false,
            },
        );
        input_schema.insert(
            "include_dirs".to_string(),
            ParamSpec {
                param_type: "boolean".to_string(),
                description: "Include directories too (default false).".to_string(),
                required: false,
            },
        );

        Self {
            spec: ToolSpec {
                name: Self::NAME.to_string(),
                description:
                    "List files in a directory with human-readable sizes (B, KB, MB, GB)."
                        .to_string(),
                input_schema,
            },
        }
    }
}

impl Default for ListFilesWithSizes {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a byte count the way the workshop tool does: whole bytes, two
/// decimals for everything above
pub fn human_size(num_bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = num_bytes as f64;
    for (i, unit) in UNITS.iter().enumerate() {
        if size < 1024.0 || i == UNITS.len() - 1 {
            if *unit == "B" {
                return format!("{} {}", size as u64, unit);
            }
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{} B", num_bytes)
}

#[async_trait]
impl Tool for ListFilesWithSizes {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, req: &ToolUse) -> Result<ToolResult> {
        let params = req.params();
        let path_str = params
            .get("path")
            .and_then(|v| v.as_str())
            .unwrap_or(".")
            .to_string();
        let include_dirs = params
            .get("include_dirs")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let base = Path::new(&path_str);
        if !base.exists() {
            return Ok(ToolResult::error(
                req.tool_use_id.clone(),
                format!("Path does not exist: {}", path_str),
            ));
        }
        if !base.is_dir() {
            return Ok(ToolResult::error(
                req.tool_use_id.clone(),
                format!("Path is not a directory: {}", path_str),
            ));
        }

        let mut entries: Vec<(bool, String, Option<u64>)> = Vec::new();
        for entry in std::fs::read_dir(base)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let is_dir = file_type.is_dir();
            if is_dir && !include_dirs {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let size = entry.metadata().ok().map(|m| m.len());
            entries.push((is_dir, name, size));
        }

        // Files first, then directories, each sorted case-insensitively
        entries.sort_by(|a, b| {
            (a.0, a.1.to_lowercase()).cmp(&(b.0, b.1.to_lowercase()))
        });

        let lines: Vec<String> = entries
            .into_iter()
            .map(|(is_dir, name, size)| {
                let display_name = if is_dir { format!("{}/", name) } else { name };
                let display_size = match size {
                    Some(bytes) if !is_dir => human_size(bytes),
                    Some(_) => human_size(0),
                    None => "N/A".to_string(),
                };
                format!("{}\t{}", display_name, display_size)
            })
            .collect();

        let text = if lines.is_empty() {
            "No matching entries.".to_string()
        } else {
            format!("Files:\n{}", lines.join("\n"))
        };

        Ok(ToolResult::success(req.tool_use_id.clone(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::envelope::ToolStatus;
    use serde_json::json;

    #[test]
    fn human_size_boundaries() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(10), "10 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1.00 KB");
        assert_eq!(human_size(2048), "2.00 KB");
        assert_eq!(human_size(1024 * 1024), "1.00 MB");
    }

    #[tokio::test]
    async fn lists_files_sorted_excluding_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), vec![0u8; 2048]).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"0123456789").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let tool = ListFilesWithSizes::new();
        let req = ToolUse::new(json!({
            "path": dir.path().to_string_lossy(),
            "include_dirs": false
        }));
        let result = tool.invoke(&req).await.unwrap();

        assert_eq!(result.status, ToolStatus::Success);
        assert_eq!(
            result.text(),
            "Files:\na.txt\t10 B\nb.txt\t2.00 KB"
        );
    }

    #[tokio::test]
    async fn includes_dirs_after_files_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("aaa")).unwrap();

        let tool = ListFilesWithSizes::new();
        let req = ToolUse::new(json!({
            "path": dir.path().to_string_lossy(),
            "include_dirs": true
        }));
        let result = tool.invoke(&req).await.unwrap();
        let text = result.text();

        // Directories sort after files regardless of name
        let z = text.find("z.txt").unwrap();
        let a = text.find("aaa/").unwrap();
        assert!(z < a, "expected files before directories: {}", text);
    }

    #[tokio::test]
    async fn missing_path_is_an_error_envelope() {
        let tool = ListFilesWithSizes::new();
        let req = ToolUse::new(json!({ "path": "/definitely/not/here" }));
        let result = tool.invoke(&req).await.unwrap();
        assert_eq!(result.status, ToolStatus::Error);
        assert!(result.text().contains("does not exist"));
    }
}
