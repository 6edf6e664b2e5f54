//! Tool registry: fixed directory resolution plus static builtin handlers
//!
//! Resolution always lands inside the registry directory; traversal input is
//! neutralized by reducing to the final path component, and the result is
//! verified to be directly contained in the directory.

use crate::error::{Result, ToolError};
use crate::tools::builtin::{CountChars, ListFilesWithSizes};
use crate::tools::envelope::Tool;
use crate::tools::loader::{HandlerDescriptor, LoadedTool, ToolManifest};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Fixed extension for generated tool manifests
pub const TOOL_EXT: &str = "json";

/// Known-good manifest installed by `bootstrap`
pub const KNOWN_GOOD_TOOL_NAME: &str = "list_files_with_sizes";

const KNOWN_GOOD_TOOL_MANIFEST: &str = r#"{
  "name": "list_files_with_sizes",
  "description": "List files in a directory with human-readable sizes (B, KB, MB, GB).",
  "input_schema": {
    "path": {
      "type": "string",
      "description": "Directory to list. Defaults to current directory.",
      "required": false
    },
    "include_dirs": {
      "type": "boolean",
      "description": "Include directories too (default false).",
      "required": false
    }
  },
  "handler": { "kind": "builtin", "builtin": "list_files_with_sizes" }
}
"#;

/// Registry for generated tool manifests and builtin handlers
pub struct ToolRegistry {
    dir: PathBuf,
    builtins: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry rooted at `dir`, creating the directory if needed
    /// and registering the builtin handlers
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let dir = dir.canonicalize()?;

        let mut builtins: HashMap<String, Arc<dyn Tool>> = HashMap::new();
        for tool in [
            Arc::new(ListFilesWithSizes::new()) as Arc<dyn Tool>,
            Arc::new(CountChars::new()) as Arc<dyn Tool>,
        ] {
            builtins.insert(tool.name().to_string(), tool);
        }

        debug!(dir = %dir.display(), "tool registry ready");
        Ok(Self { dir, builtins })
    }

    /// The registry directory (canonical)
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the statically registered builtin handlers
    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a tool name or path to the manifest path inside the registry
    /// directory.
    ///
    /// If the input already contains the registry directory segment, only
    /// the file's base name is kept; otherwise the fixed extension is
    /// appended when missing. `..` and friends never escape: only the final
    /// component survives, and containment is checked on the result.
    pub fn resolve(&self, name_or_path: &str) -> Result<PathBuf> {
        let input = Path::new(name_or_path.trim());
        let dir_segment = self.dir.file_name();

        let contains_dir_segment = input
            .components()
            .any(|c| matches!(c, Component::Normal(seg) if Some(seg) == dir_segment));

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty() && n != "." && n != "..")
            .ok_or_else(|| ToolError::ContractViolation {
                message: format!("invalid tool name: {:?}", name_or_path),
            })?;

        let file_name = if contains_dir_segment {
            file_name
        } else if Path::new(&file_name)
            .extension()
            .is_some_and(|e| e == TOOL_EXT)
        {
            file_name
        } else {
            format!("{}.{}", file_name, TOOL_EXT)
        };

        let candidate = self.dir.join(&file_name);
        if candidate.parent() != Some(self.dir.as_path()) {
            return Err(ToolError::ContractViolation {
                message: format!("resolved path escapes registry directory: {}", file_name),
            }
            .into());
        }

        Ok(candidate)
    }

    /// Load a tool manifest.
    ///
    /// Re-reads the file on every call; there is no cache to invalidate.
    /// Fails with `NotFound` if the file is absent, `LoadFailed` if the
    /// manifest does not parse, and `ContractViolation` if the manifest name
    /// differs from the file stem or references an unknown builtin handler.
    pub fn load(&self, path: &Path) -> Result<LoadedTool> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ToolError::LoadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let manifest: ToolManifest =
            serde_json::from_str(&raw).map_err(|e| ToolError::LoadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if manifest.spec.name != stem {
            return Err(ToolError::ContractViolation {
                message: format!(
                    "manifest name '{}' does not match file name '{}'",
                    manifest.spec.name, stem
                ),
            }
            .into());
        }

        let tool = match manifest.handler {
            HandlerDescriptor::Builtin { builtin } => {
                let handler =
                    self.builtins
                        .get(&builtin)
                        .cloned()
                        .ok_or_else(|| ToolError::ContractViolation {
                            message: format!("unknown builtin handler: {}", builtin),
                        })?;
                LoadedTool::builtin(manifest.spec, handler)
            }
            HandlerDescriptor::Command {
                program,
                args,
                timeout_secs,
            } => LoadedTool::command(manifest.spec, program, args, timeout_secs),
        };

        debug!(path = %path.display(), "loaded tool manifest");
        Ok(tool)
    }

    /// Resolve and load in one step
    pub fn load_by_name(&self, name_or_path: &str) -> Result<LoadedTool> {
        self.load(&self.resolve(name_or_path)?)
    }

    /// Manifest files currently in the registry directory, sorted by name
    pub fn manifest_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|e| e == TOOL_EXT))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Install the known-good `list_files_with_sizes` manifest if absent.
    /// Returns the path and whether it was freshly written.
    pub fn bootstrap(&self) -> Result<(PathBuf, bool)> {
        let path = self.resolve(KNOWN_GOOD_TOOL_NAME)?;
        if path.exists() {
            return Ok((path, false));
        }
        std::fs::write(&path, KNOWN_GOOD_TOOL_MANIFEST)?;
        info!(path = %path.display(), "bootstrapped known-good tool");
        Ok((path, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::envelope::{invoke_checked, ToolStatus, ToolUse};
    use serde_json::json;

    fn registry() -> (tempfile::TempDir, ToolRegistry) {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ToolRegistry::new(tmp.path().join("generated_tools")).unwrap();
        (tmp, registry)
    }

    #[test]
    fn resolve_appends_extension() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("count_chars").unwrap();
        assert_eq!(path, registry.dir().join("count_chars.json"));
    }

    #[test]
    fn resolve_keeps_existing_extension() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("count_chars.json").unwrap();
        assert_eq!(path, registry.dir().join("count_chars.json"));
    }

    #[test]
    fn resolve_strips_registry_prefix() {
        let (_tmp, registry) = registry();
        let path = registry
            .resolve("generated_tools/count_chars.json")
            .unwrap();
        assert_eq!(path, registry.dir().join("count_chars.json"));
    }

    #[test]
    fn resolve_neutralizes_traversal() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("../../etc/passwd").unwrap();
        assert_eq!(path, registry.dir().join("passwd.json"));

        assert!(registry.resolve("..").is_err());
        assert!(registry.resolve("").is_err());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let (_tmp, registry) = registry();
        let err = registry.load_by_name("nope").unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::NotFound { .. })
        ));
    }

    #[test]
    fn load_rejects_unparseable_manifest() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("broken").unwrap();
        std::fs::write(&path, "not json at all").unwrap();
        let err = registry.load(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::LoadFailed { .. })
        ));
    }

    #[test]
    fn load_rejects_name_mismatch() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("misnamed").unwrap();
        std::fs::write(
            &path,
            r#"{"name": "other", "description": "d",
               "handler": {"kind": "builtin", "builtin": "count_chars"}}"#,
        )
        .unwrap();
        let err = registry.load(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::ContractViolation { .. })
        ));
    }

    #[test]
    fn load_rejects_unknown_builtin() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("ghost").unwrap();
        std::fs::write(
            &path,
            r#"{"name": "ghost", "description": "d",
               "handler": {"kind": "builtin", "builtin": "no_such_handler"}}"#,
        )
        .unwrap();
        let err = registry.load(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::ContractViolation { .. })
        ));
    }

    #[tokio::test]
    async fn bootstrap_then_load_then_invoke() {
        let (_tmp, registry) = registry();
        let (path, created) = registry.bootstrap().unwrap();
        assert!(created);
        let (_, created_again) = registry.bootstrap().unwrap();
        assert!(!created_again);

        let tool = registry.load(&path).unwrap();
        assert_eq!(tool.name(), KNOWN_GOOD_TOOL_NAME);

        let listing_dir = tempfile::tempdir().unwrap();
        std::fs::write(listing_dir.path().join("a.txt"), b"0123456789").unwrap();

        let req = ToolUse::new(json!({ "path": listing_dir.path().to_string_lossy() }));
        let result = invoke_checked(&tool, &req).await;
        assert_eq!(result.status, ToolStatus::Success);
        assert!(result.text().contains("a.txt\t10 B"));
    }

    #[tokio::test]
    async fn checked_invoke_converts_faults_to_error_envelope() {
        let (_tmp, registry) = registry();
        let path = registry.resolve("runs_nothing").unwrap();
        std::fs::write(
            &path,
            r#"{"name": "runs_nothing", "description": "d",
               "handler": {"kind": "command", "program": "definitely-not-a-real-program-xyz"}}"#,
        )
        .unwrap();
        let tool = registry.load(&path).unwrap();
        let req = ToolUse::from_text("tu-1", "ignored");
        let result = invoke_checked(&tool, &req).await;
        assert_eq!(result.status, ToolStatus::Error);
        assert!(result.text().contains("not found"));
    }
}
