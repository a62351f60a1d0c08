//! PDF rendering through the typst command-line compiler
//!
//! The combined report is handed to the template as one string-valued
//! `--input`, which the template decodes as JSON. Unless a template file is
//! given, the bundled template is written to a temporary file for each render.

use crate::error::{ReportError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

pub const DEFAULT_EXECUTABLE: &str = "typst";

/// Template compiled into the binary
pub const BUNDLED_TEMPLATE: &str = include_str!("../resources/full_report_template.typ");

/// Name under which the template reads the report (`sys.inputs.full_results`).
pub const REPORT_INPUT_KEY: &str = "full_results";

/// Renders the combined report to PDF with an external typst executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypstRenderer {
    pub executable: PathBuf,
    /// Template file; `None` renders with [`BUNDLED_TEMPLATE`]
    pub template: Option<PathBuf>,
}

impl Default for TypstRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

impl TypstRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            template: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Build the compile command for `report_json`, without running it.
    pub fn command(&self, template: &Path, report_json: &str, output: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("compile")
            .arg(template)
            .arg(output)
            .arg("--input")
            .arg(format!("{REPORT_INPUT_KEY}={report_json}"));
        command
    }

    /// Compile the template into `output`, failing if the renderer does.
    pub fn render(&self, report_json: &str, output: &Path) -> Result<()> {
        // holds the bundled template on disk until the renderer exits
        let bundled;
        let template = match &self.template {
            Some(path) => path.as_path(),
            None => {
                bundled = write_bundled_template()?;
                bundled.path()
            }
        };

        log::info!(
            "rendering {} with {}",
            template.display(),
            self.executable.display()
        );

        let result = self
            .command(template, report_json, output)
            .output()
            .map_err(|source| ReportError::RenderSpawn {
                program: self.executable.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ReportError::RenderFailed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

fn write_bundled_template() -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("atol_report_")
        .suffix(".typ")
        .tempfile()
        .map_err(|source| ReportError::Write {
            path: std::env::temp_dir(),
            source,
        })?;
    file.write_all(BUNDLED_TEMPLATE.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| ReportError::Write {
            path: file.path().to_path_buf(),
            source,
        })?;

    log::debug!("bundled template written to {}", file.path().display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_default_renderer() {
        let renderer = TypstRenderer::default();
        assert_eq!(renderer.executable, PathBuf::from("typst"));
        assert_eq!(renderer.template, None);
    }

    #[test]
    fn test_bundled_template_reads_report_input() {
        assert!(BUNDLED_TEMPLATE.contains(REPORT_INPUT_KEY));
        let file = write_bundled_template().unwrap();
        assert!(file.path().is_absolute());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), BUNDLED_TEMPLATE);
    }

    #[test]
    fn test_command_arguments() {
        let renderer = TypstRenderer::new("/opt/typst/bin/typst").with_template("report.typ");
        let template = renderer.template.clone().unwrap();
        let command = renderer.command(&template, r#"{"agat":{}}"#, Path::new("out.pdf"));

        assert_eq!(command.get_program(), OsStr::new("/opt/typst/bin/typst"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            vec![
                OsStr::new("compile"),
                OsStr::new("report.typ"),
                OsStr::new("out.pdf"),
                OsStr::new("--input"),
                OsStr::new(r#"full_results={"agat":{}}"#),
            ]
        );
    }

    #[test]
    fn test_missing_executable() {
        let renderer = TypstRenderer::new("/nonexistent/typst");
        let err = renderer.render("{}", Path::new("out.pdf")).unwrap_err();
        assert!(matches!(err, ReportError::RenderSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_renderer_failure() {
        let renderer = TypstRenderer::new("false").with_template("report.typ");
        let err = renderer.render("{}", Path::new("out.pdf")).unwrap_err();
        assert!(matches!(err, ReportError::RenderFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_renderer_success() {
        let renderer = TypstRenderer::new("true");
        assert!(renderer.render("{}", Path::new("out.pdf")).is_ok());
    }
}
