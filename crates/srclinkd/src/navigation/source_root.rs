//! Navigator that resolves types against source roots on disk.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use srclink_config::Config;

use super::{NAVIGATION_TARGET, NavigationError, NavigationTarget, Navigator};

/// Extensions tried, in order, when resolving a type to a file.
const SOURCE_EXTENSIONS: [&str; 2] = ["java", "scala"];

const FILE_PLACEHOLDER: &str = "{file}";
const LINE_PLACEHOLDER: &str = "{line}";

/// Editor invocation built from a whitespace-separated template.
///
/// `{file}` and `{line}` are replaced in every argument, so templates such as
/// `code --goto {file}:{line}` or `idea --line {line} {file}` both work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Splits `template` on whitespace into a program and its arguments.
    pub fn parse(template: &str) -> Result<Self, NavigationError> {
        let mut parts = template.split_whitespace().map(str::to_owned);
        let program = parts.next().ok_or(NavigationError::EmptyEditorCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Program that is executed.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders substituted for `file` and `line`.
    #[must_use]
    pub fn render_args(&self, file: &Utf8Path, line: u32) -> Vec<String> {
        let line = line.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(FILE_PLACEHOLDER, file.as_str())
                    .replace(LINE_PLACEHOLDER, &line)
            })
            .collect()
    }

    fn run(&self, file: &Utf8Path, line: u32) -> Result<(), NavigationError> {
        let status = Command::new(&self.program)
            .args(self.render_args(file, line))
            .status()
            .map_err(|source| NavigationError::EditorSpawn {
                program: self.program.clone(),
                file: file.to_path_buf(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(NavigationError::EditorExit {
                program: self.program.clone(),
                file: file.to_path_buf(),
                status,
            })
        }
    }
}

/// Finds `package/Type.java` (or `.scala`) under a list of source roots and
/// opens it with the configured editor.
///
/// Without an editor command the resolved location is only logged, which is
/// useful for checking the browser side of the setup.
#[derive(Debug, Clone, Default)]
pub struct SourceRootNavigator {
    roots: Vec<Utf8PathBuf>,
    editor: Option<EditorCommand>,
}

impl SourceRootNavigator {
    /// Builds a navigator over `roots`, searched in order.
    #[must_use]
    pub fn new(roots: Vec<Utf8PathBuf>, editor: Option<EditorCommand>) -> Self {
        Self { roots, editor }
    }

    /// Builds a navigator from the resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self, NavigationError> {
        let editor = config.editor_command().map(EditorCommand::parse).transpose()?;
        Ok(Self::new(config.source_roots().to_vec(), editor))
    }

    /// Resolves a dotted type name to an existing source file.
    pub fn resolve(&self, fully_qualified_name: &str) -> Result<Utf8PathBuf, NavigationError> {
        let resource_path = fully_qualified_name.replace('.', "/");
        let resource = resource_path.as_str();
        self.roots
            .iter()
            .flat_map(|root| {
                SOURCE_EXTENSIONS
                    .iter()
                    .map(move |extension| root.join(format!("{resource}.{extension}")))
            })
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| NavigationError::NotFound {
                name: fully_qualified_name.to_owned(),
                roots: self.roots.len(),
            })
    }
}

impl Navigator for SourceRootNavigator {
    fn navigate(&self, target: &NavigationTarget) -> Result<(), NavigationError> {
        let file = self.resolve(&target.fully_qualified_name)?;
        match &self.editor {
            Some(editor) => editor.run(&file, target.line_number),
            None => {
                info!(
                    target: NAVIGATION_TARGET,
                    file = %file,
                    line = target.line_number,
                    "resolved source location"
                );
                Ok(())
            }
        }
    }
}
