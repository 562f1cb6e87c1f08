//! Minimal OOXML composers
//!
//! Hand-rolled docx/xlsx/pptx writers over the `zip` crate, exposing only
//! what the conversion handlers need: paragraphs-from-text for the Word
//! fallback, cell writes for the workbook facade, and picture slides for the
//! presentation facade. The parts written here are the smallest set that
//! mainstream office applications open without repair.

use crate::error::{Error, Result};
use crate::office::engine::{SlideDeck, Workbook};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// PowerPoint 4:3 canvas, in points.
const SLIDE_WIDTH_PT: f64 = 720.0;
const SLIDE_HEIGHT_PT: f64 = 540.0;

/// English Metric Units per point.
const EMU_PER_POINT: f64 = 12700.0;

const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const OFFICE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn points_to_emu(points: f64) -> i64 {
    (points * EMU_PER_POINT).round() as i64
}

struct Archive {
    zip: ZipWriter<std::fs::File>,
    options: SimpleFileOptions,
}

impl Archive {
    fn create(output: &Path) -> Result<Self> {
        let file = std::fs::File::create(output)?;
        Ok(Self {
            zip: ZipWriter::new(file),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
        })
    }

    fn add(&mut self, name: &str, content: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(content)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.zip.finish()?;
        Ok(())
    }
}

// ============================================================================
// docx (fallback writer)
// ============================================================================

/// Write a minimal Word document containing one paragraph per text line.
pub fn write_docx_from_text(output: &Path, text: &str) -> Result<()> {
    let mut archive = Archive::create(output)?;

    archive.add(
        "[Content_Types].xml",
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Types xmlns="{ct}">"#,
                r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                r#"<Default Extension="xml" ContentType="application/xml"/>"#,
                r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
                r#"</Types>"#
            ),
            ct = CT_NS
        )
        .as_bytes(),
    )?;

    archive.add(
        "_rels/.rels",
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Relationships xmlns="{rels}">"#,
                r#"<Relationship Id="rId1" Type="{office}/officeDocument" Target="word/document.xml"/>"#,
                r#"</Relationships>"#
            ),
            rels = RELS_NS,
            office = OFFICE_REL
        )
        .as_bytes(),
    )?;

    let mut body = String::new();
    for line in text.lines() {
        body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            xml_escape(line)
        ));
    }

    archive.add(
        "word/document.xml",
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                r#"<w:body>{body}<w:sectPr/></w:body>"#,
                r#"</w:document>"#
            ),
            body = body
        )
        .as_bytes(),
    )?;

    archive.finish()
}

// ============================================================================
// xlsx (workbook facade)
// ============================================================================

/// Spreadsheet-class composer: a single fresh sheet of inline-string cells.
#[derive(Default)]
pub struct XlsxWorkbook {
    /// (row, col) -> value, both zero-based
    cells: BTreeMap<(u32, u32), String>,
}

impl XlsxWorkbook {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Spreadsheet column name for a zero-based index (0 -> A, 25 -> Z, 26 -> AA).
fn column_name(mut col: u32) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).expect("ASCII column name")
}

impl Workbook for XlsxWorkbook {
    fn set_cell(&mut self, row: u32, col: u32, value: &str) {
        self.cells.insert((row, col), value.to_string());
    }

    fn save(&mut self, output: &Path) -> Result<()> {
        let mut archive = Archive::create(output)?;

        archive.add(
            "[Content_Types].xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Types xmlns="{ct}">"#,
                    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
                    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
                    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                    r#"</Types>"#
                ),
                ct = CT_NS
            )
            .as_bytes(),
        )?;

        archive.add(
            "_rels/.rels",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="{rels}">"#,
                    r#"<Relationship Id="rId1" Type="{office}/officeDocument" Target="xl/workbook.xml"/>"#,
                    r#"</Relationships>"#
                ),
                rels = RELS_NS,
                office = OFFICE_REL
            )
            .as_bytes(),
        )?;

        archive.add(
            "xl/workbook.xml",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<sheets><sheet name="Extracted Text" sheetId="1" r:id="rId1"/></sheets>"#,
                r#"</workbook>"#
            )
            .as_bytes(),
        )?;

        archive.add(
            "xl/_rels/workbook.xml.rels",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="{rels}">"#,
                    r#"<Relationship Id="rId1" Type="{office}/worksheet" Target="worksheets/sheet1.xml"/>"#,
                    r#"</Relationships>"#
                ),
                rels = RELS_NS,
                office = OFFICE_REL
            )
            .as_bytes(),
        )?;

        // Group cells by row; BTreeMap order gives ascending rows and columns
        let mut rows: BTreeMap<u32, Vec<(u32, &String)>> = BTreeMap::new();
        for (&(row, col), value) in &self.cells {
            rows.entry(row).or_default().push((col, value));
        }

        let mut sheet_data = String::new();
        for (row, cells) in &rows {
            sheet_data.push_str(&format!(r#"<row r="{}">"#, row + 1));
            for (col, value) in cells {
                sheet_data.push_str(&format!(
                    r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    column_name(*col),
                    row + 1,
                    xml_escape(value)
                ));
            }
            sheet_data.push_str("</row>");
        }

        archive.add(
            "xl/worksheets/sheet1.xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
                    r#"<sheetData>{rows}</sheetData>"#,
                    r#"</worksheet>"#
                ),
                rows = sheet_data
            )
            .as_bytes(),
        )?;

        archive.finish()
    }
}

// ============================================================================
// pptx (slide deck facade)
// ============================================================================

struct PictureSlide {
    image_data: Vec<u8>,
    image_ext: String,
    /// Picture rectangle in EMU: (x, y, cx, cy)
    rect: (i64, i64, i64, i64),
}

/// Presentation-class composer: blank slides, one centered picture per slide.
#[derive(Default)]
pub struct PptxDeck {
    slides: Vec<PictureSlide>,
}

impl PptxDeck {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Empty shape-tree scaffolding shared by slides, layout, and master.
const EMPTY_SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

const PML_NS_DECLS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

fn slide_xml(index: usize, rect: (i64, i64, i64, i64)) -> String {
    let (x, y, cx, cy) = rect;
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<p:sld {ns}><p:cSld><p:spTree>{tree}"#,
            r#"<p:pic><p:nvPicPr><p:cNvPr id="2" name="Page {n}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
        ),
        ns = PML_NS_DECLS,
        tree = EMPTY_SP_TREE_HEADER,
        n = index + 1,
        x = x,
        y = y,
        cx = cx,
        cy = cy
    )
}

fn theme_xml() -> String {
    // Smallest theme PowerPoint accepts: full color scheme, font scheme, and
    // single-entry format scheme lists.
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office">"#,
            r#"<a:themeElements>"#,
            r#"<a:clrScheme name="Office">"#,
            r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
            r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2>"#,
            r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="4472C4"/></a:accent1>"#,
            r#"<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>"#,
            r#"<a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#,
            r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#,
            r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
            r#"</a:clrScheme>"#,
            r#"<a:fontScheme name="Office">"#,
            r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            r#"</a:fontScheme>"#,
            r#"<a:fmtScheme name="Office">"#,
            r#"<a:fillStyleLst>{s}{s}{s}</a:fillStyleLst>"#,
            r#"<a:lnStyleLst><a:ln>{s}</a:ln><a:ln>{s}</a:ln><a:ln>{s}</a:ln></a:lnStyleLst>"#,
            r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle>"#,
            r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
            r#"<a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
            r#"<a:bgFillStyleLst>{s}{s}{s}</a:bgFillStyleLst>"#,
            r#"</a:fmtScheme>"#,
            r#"</a:themeElements>"#,
            r#"</a:theme>"#
        ),
        s = solid
    )
}

impl SlideDeck for PptxDeck {
    fn slide_size(&self) -> (f64, f64) {
        (SLIDE_WIDTH_PT, SLIDE_HEIGHT_PT)
    }

    fn add_slide_with_picture(
        &mut self,
        image: &Path,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let image_data = std::fs::read(image)?;
        let image_ext = image
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "png".to_string());

        self.slides.push(PictureSlide {
            image_data,
            image_ext,
            rect: (
                points_to_emu(left),
                points_to_emu(top),
                points_to_emu(width),
                points_to_emu(height),
            ),
        });
        Ok(())
    }

    fn save(&mut self, output: &Path) -> Result<()> {
        if self.slides.is_empty() {
            return Err(Error::InvalidJob {
                reason: "presentation has no slides".to_string(),
            });
        }

        let mut archive = Archive::create(output)?;

        let slide_overrides: String = (1..=self.slides.len())
            .map(|n| {
                format!(
                    r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                    n
                )
            })
            .collect();

        archive.add(
            "[Content_Types].xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Types xmlns="{ct}">"#,
                    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
                    r#"<Default Extension="png" ContentType="image/png"/>"#,
                    r#"<Default Extension="jpg" ContentType="image/jpeg"/>"#,
                    r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#,
                    r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
                    r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#,
                    r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
                    r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
                    r#"{slides}"#,
                    r#"</Types>"#
                ),
                ct = CT_NS,
                slides = slide_overrides
            )
            .as_bytes(),
        )?;

        archive.add(
            "_rels/.rels",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="{rels}">"#,
                    r#"<Relationship Id="rId1" Type="{office}/officeDocument" Target="ppt/presentation.xml"/>"#,
                    r#"</Relationships>"#
                ),
                rels = RELS_NS,
                office = OFFICE_REL
            )
            .as_bytes(),
        )?;

        // Presentation part: master is rId1, slides are rId2..
        let slide_ids: String = (0..self.slides.len())
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2))
            .collect();

        archive.add(
            "ppt/presentation.xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<p:presentation {ns}>"#,
                    r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
                    r#"<p:sldIdLst>{ids}</p:sldIdLst>"#,
                    r#"<p:sldSz cx="{cx}" cy="{cy}"/>"#,
                    r#"<p:notesSz cx="{cy}" cy="{cx}"/>"#,
                    r#"</p:presentation>"#
                ),
                ns = PML_NS_DECLS,
                ids = slide_ids,
                cx = points_to_emu(SLIDE_WIDTH_PT),
                cy = points_to_emu(SLIDE_HEIGHT_PT)
            )
            .as_bytes(),
        )?;

        let slide_rels: String = (1..=self.slides.len())
            .map(|n| {
                format!(
                    r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
                    n + 1,
                    OFFICE_REL,
                    n
                )
            })
            .collect();

        archive.add(
            "ppt/_rels/presentation.xml.rels",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="{rels}">"#,
                    r#"<Relationship Id="rId1" Type="{office}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
                    r#"{slides}"#,
                    r#"</Relationships>"#
                ),
                rels = RELS_NS,
                office = OFFICE_REL,
                slides = slide_rels
            )
            .as_bytes(),
        )?;

        archive.add(
            "ppt/slideMasters/slideMaster1.xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<p:sldMaster {ns}>"#,
                    r#"<p:cSld><p:spTree>{tree}</p:spTree></p:cSld>"#,
                    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
                    r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
                    r#"</p:sldMaster>"#
                ),
                ns = PML_NS_DECLS,
                tree = EMPTY_SP_TREE_HEADER
            )
            .as_bytes(),
        )?;

        archive.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="{rels}">"#,
                    r#"<Relationship Id="rId1" Type="{office}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
                    r#"<Relationship Id="rId2" Type="{office}/theme" Target="../theme/theme1.xml"/>"#,
                    r#"</Relationships>"#
                ),
                rels = RELS_NS,
                office = OFFICE_REL
            )
            .as_bytes(),
        )?;

        archive.add(
            "ppt/slideLayouts/slideLayout1.xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<p:sldLayout {ns} type="blank">"#,
                    r#"<p:cSld><p:spTree>{tree}</p:spTree></p:cSld>"#,
                    r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#,
                    r#"</p:sldLayout>"#
                ),
                ns = PML_NS_DECLS,
                tree = EMPTY_SP_TREE_HEADER
            )
            .as_bytes(),
        )?;

        archive.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="{rels}">"#,
                    r#"<Relationship Id="rId1" Type="{office}/slideMaster" Target="../slideMasters/slideMaster1.xml"/>"#,
                    r#"</Relationships>"#
                ),
                rels = RELS_NS,
                office = OFFICE_REL
            )
            .as_bytes(),
        )?;

        archive.add("ppt/theme/theme1.xml", theme_xml().as_bytes())?;

        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            archive.add(
                &format!("ppt/slides/slide{}.xml", n),
                slide_xml(i, slide.rect).as_bytes(),
            )?;
            archive.add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                format!(
                    concat!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                        r#"<Relationships xmlns="{rels}">"#,
                        r#"<Relationship Id="rId1" Type="{office}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
                        r#"<Relationship Id="rId2" Type="{office}/image" Target="../media/image{n}.{ext}"/>"#,
                        r#"</Relationships>"#
                    ),
                    rels = RELS_NS,
                    office = OFFICE_REL,
                    n = n,
                    ext = slide.image_ext
                )
                .as_bytes(),
            )?;
            archive.add(
                &format!("ppt/media/image{}.{}", n, slide.image_ext),
                &slide.image_data,
            )?;
        }

        archive.finish()
    }
}
