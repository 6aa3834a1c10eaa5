//! File creation inside a workspace directory.

use runtime::{Schema, Tool, ToolDeclaration, ToolError};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileArgs {
    pub file_path: String,
    pub content: String,
}

/// `createFile`: creates or replaces a file under the workspace.
///
/// Paths are relative to the workspace; absolute paths and `..` are
/// rejected. Missing parent directories are created.
#[derive(Debug, Clone)]
pub struct CreateFile {
    workspace: PathBuf,
}

impl CreateFile {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    fn resolve(&self, file_path: &str) -> Result<PathBuf, ToolError> {
        let relative = Path::new(file_path);
        if file_path.trim().is_empty() {
            return Err(ToolError::InvalidInput("empty filePath".into()));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ToolError::InvalidInput(format!(
                        "path escapes workspace: {file_path}"
                    )));
                }
            }
        }
        Ok(self.workspace.join(relative))
    }
}

/// Unfold the escape sequences models leave in generated source.
fn unescape(content: &str) -> String {
    content.replace("\\n", "\n").replace("\\'", "'")
}

impl Tool for CreateFile {
    type Args = CreateFileArgs;
    type Output = bool;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "createFile",
            "Creates or replaces a file with the given filePath and content",
        )
        .with_parameters(
            Schema::object()
                .property("filePath", Schema::string())
                .property("content", Schema::string())
                .require(["filePath", "content"]),
        )
    }

    async fn call(&self, args: CreateFileArgs) -> Result<bool, ToolError> {
        let target = self.resolve(&args.file_path)?;
        if let Some(dir) = target.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(ToolError::execution)?;
        }

        let content = unescape(&args.content);
        tokio::fs::write(&target, &content)
            .await
            .map_err(ToolError::execution)?;

        info!(path = %target.display(), bytes = content.len(), "created file");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: &str, content: &str) -> CreateFileArgs {
        CreateFileArgs {
            file_path: path.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn writes_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateFile::new(dir.path());

        let ok = tool
            .call(args("src/routes/login.js", "const x = 1;"))
            .await
            .unwrap();

        assert!(ok);
        let written = std::fs::read_to_string(dir.path().join("src/routes/login.js")).unwrap();
        assert_eq!(written, "const x = 1;");
    }

    #[tokio::test]
    async fn unfolds_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateFile::new(dir.path());

        tool.call(args("app.js", r"const a = \'x\';\nconst b = 2;"))
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("app.js")).unwrap();
        assert_eq!(written, "const a = 'x';\nconst b = 2;");
    }

    #[tokio::test]
    async fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateFile::new(dir.path());

        tool.call(args("a.txt", "first")).await.unwrap();
        tool.call(args("a.txt", "second")).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "second"
        );
    }

    #[tokio::test]
    async fn refuses_to_leave_the_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateFile::new(dir.path().join("ws"));

        for path in ["../escape.txt", "/etc/passwd", "a/../../b", ""] {
            let err = tool.call(args(path, "x")).await.unwrap_err();
            assert!(matches!(err, ToolError::InvalidInput(_)), "{path}");
        }
        assert!(!dir.path().join("escape.txt").exists());
    }
}
