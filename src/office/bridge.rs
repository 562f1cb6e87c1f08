//! Automation bridge: the five-step engine protocol
//!
//! Every conversion that needs an office engine goes through here. Per call:
//! launch a fresh engine, open one document, perform one export, close the
//! document, quit the engine. Close and quit run unconditionally, innermost
//! first, whatever happened in between.
//!
//! Access is serialized per engine family: the underlying automation state is
//! global per application family and is not safe to drive from two sequences
//! at once.

use crate::error::Result;
use crate::office::engine::{
    DocumentEngine, EngineFactory, EngineFamily, ExportFormat, SlideDeck, Workbook,
};
use crate::office::worker::run_on_dedicated_worker;
use crate::pdf::pixels_to_points;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static FAMILY_LOCKS: [Mutex<()>; 3] = [Mutex::new(()), Mutex::new(()), Mutex::new(())];

/// Drives external office engines through the rigid open/operate/close protocol.
#[derive(Clone)]
pub struct AutomationBridge {
    factory: Arc<dyn EngineFactory>,
}

impl AutomationBridge {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self { factory }
    }

    /// Convert one document through an engine of the given family.
    ///
    /// The whole sequence runs on a dedicated worker thread; the caller blocks
    /// until it completes or fails. Launch failure, open failure, and export
    /// failure all re-raise here; close and quit still run in every case.
    pub fn export(
        &self,
        family: EngineFamily,
        input: &Path,
        output: &Path,
        format: ExportFormat,
    ) -> Result<()> {
        let factory = Arc::clone(&self.factory);
        let input = input.to_path_buf();
        let output = output.to_path_buf();

        run_on_dedicated_worker(family.as_str(), move || {
            let _family_guard = FAMILY_LOCKS[family.index()].lock();

            let mut engine = factory.document_engine(family);
            let outcome = engine
                .launch()
                .and_then(|_| run_open_export(engine.as_mut(), &input, &output, format));
            engine.close();
            engine.quit();
            outcome
        })
    }

    /// Build a presentation with one slide per rendered page image, each
    /// picture centered on the slide canvas via the pixel/point conversion.
    pub fn compose_slides(&self, images: Vec<PathBuf>, dpi: u32, output: &Path) -> Result<()> {
        let factory = Arc::clone(&self.factory);
        let output = output.to_path_buf();

        run_on_dedicated_worker(EngineFamily::Impress.as_str(), move || {
            let _family_guard = FAMILY_LOCKS[EngineFamily::Impress.index()].lock();

            let mut deck = factory.slide_deck();
            let (slide_width, slide_height) = deck.slide_size();

            for image in &images {
                let (px_width, px_height) = image::image_dimensions(image)?;
                let width = pixels_to_points(px_width, dpi);
                let height = pixels_to_points(px_height, dpi);
                let left = (slide_width - width) / 2.0;
                let top = (slide_height - height) / 2.0;
                deck.add_slide_with_picture(image, left, top, width, height)?;
            }

            deck.save(&output)
        })
    }

    /// Build a workbook with one text line per row in the first column.
    pub fn compose_workbook(&self, lines: Vec<String>, output: &Path) -> Result<()> {
        let factory = Arc::clone(&self.factory);
        let output = output.to_path_buf();

        run_on_dedicated_worker(EngineFamily::Calc.as_str(), move || {
            let _family_guard = FAMILY_LOCKS[EngineFamily::Calc.index()].lock();

            let mut workbook = factory.workbook();
            for (row, line) in lines.iter().enumerate() {
                workbook.set_cell(row as u32, 0, line);
            }
            workbook.save(&output)
        })
    }
}

fn run_open_export(
    engine: &mut dyn DocumentEngine,
    input: &Path,
    output: &Path,
    format: ExportFormat,
) -> Result<()> {
    engine.open(input)?;
    engine.export(output, format)
}
