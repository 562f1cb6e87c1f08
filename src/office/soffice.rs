//! LibreOffice-backed document engine
//!
//! Each conversion launches a fresh `soffice` headless process with its own
//! isolated user profile, performs one `--convert-to` export, then tears the
//! profile down. The binary path comes from `PDF_CONVERT_SOFFICE` when set,
//! falling back to `soffice` on PATH.

use crate::error::{Error, Result};
use crate::office::engine::{DocumentEngine, EngineFamily, ExportFormat};
use crate::workspace::TempWorkspace;
use std::path::{Path, PathBuf};
use std::process::Command;

const SOFFICE_ENV: &str = "PDF_CONVERT_SOFFICE";

/// Trim captured stderr to something fit for an error message.
fn stderr_snippet(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    match trimmed.char_indices().nth(300) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

/// One headless LibreOffice instance, scoped to a single conversion.
pub struct SofficeEngine {
    family: EngineFamily,
    binary: PathBuf,
    profile: Option<TempWorkspace>,
    document: Option<PathBuf>,
}

impl SofficeEngine {
    pub fn new(family: EngineFamily) -> Self {
        let binary = std::env::var_os(SOFFICE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("soffice"));
        Self {
            family,
            binary,
            profile: None,
            document: None,
        }
    }

    fn profile(&self) -> Result<&TempWorkspace> {
        self.profile.as_ref().ok_or_else(|| Error::EngineOperation {
            reason: "engine was not launched".to_string(),
        })
    }
}

impl DocumentEngine for SofficeEngine {
    fn launch(&mut self) -> Result<()> {
        // A fresh profile both isolates this instance from any other running
        // soffice and guarantees headless start without a first-run dialog.
        let probe = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| Error::EngineUnavailable {
                reason: format!("{}: {}", self.binary.display(), e),
            })?;
        if !probe.status.success() {
            return Err(Error::EngineUnavailable {
                reason: format!(
                    "{} exited with {}: {}",
                    self.binary.display(),
                    probe.status,
                    stderr_snippet(&probe.stderr)
                ),
            });
        }

        self.profile = Some(TempWorkspace::new(&format!(
            "soffice-{}",
            self.family.as_str()
        ))?);

        tracing::debug!(family = self.family.as_str(), "launched soffice engine");
        Ok(())
    }

    fn open(&mut self, input: &Path) -> Result<()> {
        if !input.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input not found: {}", input.display()),
            )));
        }
        self.document = Some(input.to_path_buf());
        Ok(())
    }

    fn export(&mut self, output: &Path, format: ExportFormat) -> Result<()> {
        let profile = self.profile()?;
        let input = self.document.clone().ok_or_else(|| Error::EngineOperation {
            reason: "no document open".to_string(),
        })?;

        let profile_url = format!("file://{}", profile.path().display());
        let out_dir = profile.file("out");
        std::fs::create_dir_all(&out_dir)?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--norestore")
            .arg("--nolockcheck")
            .arg("--nodefault")
            .arg("--nologo")
            .arg(format!("-env:UserInstallation={}", profile_url));

        // Importing a PDF for docx export needs the Draw/Writer PDF import filter
        if format == ExportFormat::Docx {
            command.arg("--infilter=writer_pdf_import");
        }

        command
            .arg("--convert-to")
            .arg(format.extension())
            .arg("--outdir")
            .arg(&out_dir)
            .arg(&input);

        let run = command.output().map_err(|e| Error::EngineOperation {
            reason: format!("failed to run {}: {}", self.binary.display(), e),
        })?;
        if !run.status.success() {
            return Err(Error::EngineOperation {
                reason: format!(
                    "convert-to {} failed ({}): {}",
                    format.extension(),
                    run.status,
                    stderr_snippet(&run.stderr)
                ),
            });
        }

        // soffice names the result after the input stem; move it where asked
        let stem = input
            .file_stem()
            .ok_or_else(|| Error::EngineOperation {
                reason: format!("input has no file stem: {}", input.display()),
            })?
            .to_string_lossy()
            .to_string();
        let produced = out_dir.join(format!("{}.{}", stem, format.extension()));
        if !produced.is_file() {
            return Err(Error::EngineOperation {
                reason: format!(
                    "engine reported success but produced no {} output: {}",
                    format.extension(),
                    stderr_snippet(&run.stderr)
                ),
            });
        }

        // rename fails across filesystems; fall back to copy
        if std::fs::rename(&produced, output).is_err() {
            std::fs::copy(&produced, output)?;
        }

        tracing::info!(
            family = self.family.as_str(),
            input = %input.display(),
            output = %output.display(),
            "soffice export completed"
        );
        Ok(())
    }

    fn close(&mut self) {
        self.document = None;
    }

    fn quit(&mut self) {
        // Profile removal is best-effort; TempWorkspace logs on failure
        self.profile = None;
        tracing::debug!(family = self.family.as_str(), "soffice engine quit");
    }
}

/// Default production factory: soffice-backed engines for document exports,
/// in-process OOXML composers for the workbook and slide facades.
#[derive(Default)]
pub struct SofficeFactory;

impl crate::office::engine::EngineFactory for SofficeFactory {
    fn document_engine(
        &self,
        family: EngineFamily,
    ) -> Box<dyn crate::office::engine::DocumentEngine> {
        Box::new(SofficeEngine::new(family))
    }

    fn slide_deck(&self) -> Box<dyn crate::office::engine::SlideDeck> {
        Box::new(crate::office::ooxml::PptxDeck::new())
    }

    fn workbook(&self) -> Box<dyn crate::office::engine::Workbook> {
        Box::new(crate::office::ooxml::XlsxWorkbook::new())
    }
}
