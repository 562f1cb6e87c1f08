//! Conversion dispatcher
//!
//! Routes a [`ConversionJob`] to its handler on a blocking worker and folds
//! every failure into a [`ConversionResult`]; nothing escapes as an unhandled
//! fault. The dispatcher itself touches no format-specific logic; input arity
//! is validated by each handler.

use crate::error::{Error, Result};
use crate::job::{ConversionJob, ConversionResult, Operation};
use crate::office::engine::{EngineFactory, EngineFamily, ExportFormat};
use crate::office::soffice::SofficeFactory;
use crate::office::{ooxml, AutomationBridge};
use crate::pdf;
use crate::workspace::TempWorkspace;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Substituted when the word-export fallback finds no extractable text.
pub const EMPTY_FALLBACK_TEXT: &str = "[no extractable text]";

/// Entry point for the conversion engine. One job runs per dispatch call;
/// there is no internal queue and no cancellation.
#[derive(Clone)]
pub struct Dispatcher {
    bridge: AutomationBridge,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher backed by the default soffice engine factory.
    pub fn new() -> Self {
        Self::with_factory(Arc::new(SofficeFactory))
    }

    /// Dispatcher with a custom engine factory (used by tests and embedders).
    pub fn with_factory(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            bridge: AutomationBridge::new(factory),
        }
    }

    /// Run one conversion job to completion off the caller's execution
    /// context and report the outcome. Never returns an error: handler
    /// failures become `{ok: false}` results.
    pub async fn dispatch(&self, job: ConversionJob) -> ConversionResult {
        let operation = job.operation;
        tracing::info!(operation = %operation, inputs = job.inputs.len(), "dispatching job");

        let bridge = self.bridge.clone();
        let outcome = tokio::task::spawn_blocking(move || run_job(&bridge, &job)).await;

        match outcome {
            Ok(Ok(())) => {
                tracing::info!(operation = %operation, "job completed");
                ConversionResult::success(format!("{} completed", operation))
            }
            Ok(Err(e)) => {
                tracing::warn!(operation = %operation, error = %e, "job failed");
                ConversionResult::failure(format!("{} failed: {}", operation, e))
            }
            Err(e) => {
                tracing::error!(operation = %operation, error = %e, "job task aborted");
                ConversionResult::failure(format!("{} failed: {}", operation, e))
            }
        }
    }
}

fn single_input(job: &ConversionJob) -> Result<&Path> {
    match job.inputs.as_slice() {
        [input] => Ok(input),
        _ => Err(Error::InvalidJob {
            reason: format!(
                "{} requires exactly one input, got {}",
                job.operation,
                job.inputs.len()
            ),
        }),
    }
}

fn inputs_at_least<'a>(job: &'a ConversionJob, min: usize) -> Result<&'a [PathBuf]> {
    if job.inputs.len() < min {
        return Err(Error::InvalidJob {
            reason: format!(
                "{} requires at least {} inputs, got {}",
                job.operation,
                min,
                job.inputs.len()
            ),
        });
    }
    Ok(&job.inputs)
}

fn run_job(bridge: &AutomationBridge, job: &ConversionJob) -> Result<()> {
    match job.operation {
        Operation::Merge => {
            let inputs = inputs_at_least(job, 2)?;
            pdf::merge(inputs, &job.output)
        }
        Operation::Compress => pdf::compress(single_input(job)?, &job.output),
        Operation::ExtractText => {
            let text = pdf::extract_text(single_input(job)?)?;
            std::fs::write(&job.output, text)?;
            Ok(())
        }
        Operation::ImagesToPdf => {
            let inputs = inputs_at_least(job, 1)?;
            pdf::images_to_pdf(inputs, &job.output)
        }
        Operation::PdfToImages => {
            // Output path names the target folder here
            pdf::pdf_to_images(single_input(job)?, &job.output, job.dpi())?;
            Ok(())
        }
        Operation::WordToPdf => {
            let input = single_input(job)?;
            if has_extension(input, "txt") {
                let text = std::fs::read_to_string(input)?;
                return pdf::text_to_pdf(&text, &job.output);
            }
            bridge.export(EngineFamily::Word, input, &job.output, ExportFormat::Pdf)
        }
        Operation::PdfToWord => pdf_to_word(bridge, single_input(job)?, &job.output),
        Operation::ExcelToPdf => bridge.export(
            EngineFamily::Calc,
            single_input(job)?,
            &job.output,
            ExportFormat::Pdf,
        ),
        Operation::PdfToExcel => {
            let text = pdf::extract_text(single_input(job)?)?;
            let lines: Vec<String> = text.lines().map(str::to_string).collect();
            bridge.compose_workbook(lines, &job.output)
        }
        Operation::PowerPointToPdf => bridge.export(
            EngineFamily::Impress,
            single_input(job)?,
            &job.output,
            ExportFormat::Pdf,
        ),
        Operation::PdfToPowerPoint => pdf_to_powerpoint(bridge, single_input(job)?, job),
    }
}

/// Primary path: engine export to docx. Any bridge failure falls back to
/// text extraction plus a minimal synthesized document, trading layout
/// fidelity for guaranteed output whenever the source is a parseable PDF.
fn pdf_to_word(bridge: &AutomationBridge, input: &Path, output: &Path) -> Result<()> {
    match bridge.export(EngineFamily::Word, input, output, ExportFormat::Docx) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(error = %e, "engine export failed, falling back to text extraction");
            let mut text = pdf::extract_text(input)?;
            if text.trim().is_empty() {
                text = EMPTY_FALLBACK_TEXT.to_string();
            }
            ooxml::write_docx_from_text(output, &text)
        }
    }
}

/// Two-phase pipeline: rasterize every page into a private workspace, then
/// compose one slide per image. The workspace is deleted best-effort when
/// this function returns, success or failure.
fn pdf_to_powerpoint(bridge: &AutomationBridge, input: &Path, job: &ConversionJob) -> Result<()> {
    let workspace = TempWorkspace::new("slides")?;
    let images = pdf::render_to_workspace(input, &workspace, job.dpi())?;
    bridge.compose_slides(images, job.dpi(), &job.output)
    // workspace dropped here; removal failure is swallowed
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
