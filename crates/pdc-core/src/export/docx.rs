//! WordprocessingML serialization of a [`Document`].
//!
//! The archive holds the minimum set of parts Word needs: content types,
//! package relationships, the main document, its relationships and the
//! styles part. Every section is a landscape page with 2.5 cm top/bottom
//! and 3 cm left/right margins.

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::error::ExportError;
use super::layout::{Alignment, Block, Cell, Document, Paragraph, Run, Section, Table};

/// A4 landscape, in twips.
const PAGE_WIDTH: u32 = 16838;
const PAGE_HEIGHT: u32 = 11906;
const MARGIN_TOP_BOTTOM: u32 = 1411;
const MARGIN_LEFT_RIGHT: u32 = 1699;
const TEXT_WIDTH: u32 = PAGE_WIDTH - 2 * MARGIN_LEFT_RIGHT;

/// 0.5 pt single black border.
const BORDER: [(&str, &str); 4] = [
    ("w:val", "single"),
    ("w:sz", "4"),
    ("w:space", "0"),
    ("w:color", "000000"),
];

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

type XmlWriter = Writer<Vec<u8>>;
type XmlResult = quick_xml::Result<()>;

/// Serialize `document` as the bytes of a `.docx` archive.
pub fn write_docx(document: &Document) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", content_types_xml()?),
        (
            "_rels/.rels",
            relationships_xml(OFFICE_DOCUMENT_REL, "word/document.xml")?,
        ),
        (
            "word/_rels/document.xml.rels",
            relationships_xml(STYLES_REL, "styles.xml")?,
        ),
        ("word/styles.xml", styles_xml()?),
        ("word/document.xml", document_xml(document)?),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&body)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Writer helpers
// ---------------------------------------------------------------------------

/// Write the XML declaration, then `body` wrapped in `root`.
fn part<F>(root: BytesStart<'_>, body: F) -> quick_xml::Result<Vec<u8>>
where
    F: FnOnce(&mut XmlWriter) -> XmlResult,
{
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let end = root.to_end().into_owned();
    w.write_event(Event::Start(root))?;
    body(&mut w)?;
    w.write_event(Event::End(end))?;
    Ok(w.into_inner())
}

fn start(w: &mut XmlWriter, name: &str) -> XmlResult {
    w.write_event(Event::Start(BytesStart::new(name)))
}

fn end(w: &mut XmlWriter, name: &str) -> XmlResult {
    w.write_event(Event::End(BytesEnd::new(name)))
}

fn empty<'a, I>(w: &mut XmlWriter, name: &str, attrs: I) -> XmlResult
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    w.write_event(Event::Empty(BytesStart::new(name).with_attributes(attrs)))
}

/// `<name w:val="value"/>`
fn val(w: &mut XmlWriter, name: &str, value: &str) -> XmlResult {
    empty(w, name, [("w:val", value)])
}

// ---------------------------------------------------------------------------
// Package parts
// ---------------------------------------------------------------------------

fn content_types_xml() -> quick_xml::Result<Vec<u8>> {
    let root = BytesStart::new("Types").with_attributes([("xmlns", CONTENT_TYPES_NS)]);
    part(root, |w| {
        empty(
            w,
            "Default",
            [
                ("Extension", "rels"),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-package.relationships+xml",
                ),
            ],
        )?;
        empty(
            w,
            "Default",
            [("Extension", "xml"), ("ContentType", "application/xml")],
        )?;
        empty(
            w,
            "Override",
            [
                ("PartName", "/word/document.xml"),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                ),
            ],
        )?;
        empty(
            w,
            "Override",
            [
                ("PartName", "/word/styles.xml"),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
                ),
            ],
        )
    })
}

/// A relationships part with a single `rId1` entry.
fn relationships_xml(kind: &str, target: &str) -> quick_xml::Result<Vec<u8>> {
    let root = BytesStart::new("Relationships").with_attributes([("xmlns", RELATIONSHIPS_NS)]);
    part(root, |w| {
        empty(
            w,
            "Relationship",
            [("Id", "rId1"), ("Type", kind), ("Target", target)],
        )
    })
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

struct StyleDef {
    id: &'static str,
    name: &'static str,
    size: u32,
    bold: bool,
    space_before: u32,
    justify: Option<&'static str>,
}

/// Normal Arial 10 pt at 1.15 line spacing; Heading1 14 pt centred;
/// Heading2 12 pt; Heading3 11 pt with a small space before.
const STYLES: [StyleDef; 4] = [
    StyleDef {
        id: "Normal",
        name: "Normal",
        size: 20,
        bold: false,
        space_before: 0,
        justify: None,
    },
    StyleDef {
        id: "Heading1",
        name: "heading 1",
        size: 28,
        bold: true,
        space_before: 0,
        justify: Some("center"),
    },
    StyleDef {
        id: "Heading2",
        name: "heading 2",
        size: 24,
        bold: true,
        space_before: 0,
        justify: Some("left"),
    },
    StyleDef {
        id: "Heading3",
        name: "heading 3",
        size: 22,
        bold: true,
        space_before: 100,
        justify: Some("left"),
    },
];

pub fn styles_xml() -> quick_xml::Result<Vec<u8>> {
    let root = BytesStart::new("w:styles").with_attributes([("xmlns:w", W_NS)]);
    part(root, |w| STYLES.iter().try_for_each(|style| write_style(w, style)))
}

fn write_style(w: &mut XmlWriter, style: &StyleDef) -> XmlResult {
    let is_default = style.id == "Normal";
    let mut tag = BytesStart::new("w:style");
    tag.push_attribute(("w:type", "paragraph"));
    if is_default {
        tag.push_attribute(("w:default", "1"));
    }
    tag.push_attribute(("w:styleId", style.id));
    w.write_event(Event::Start(tag))?;

    val(w, "w:name", style.name)?;
    if !is_default {
        val(w, "w:basedOn", "Normal")?;
        val(w, "w:next", "Normal")?;
    }
    empty(w, "w:qFormat", [])?;

    start(w, "w:pPr")?;
    let before = style.space_before.to_string();
    empty(
        w,
        "w:spacing",
        [
            ("w:before", before.as_str()),
            ("w:after", "0"),
            ("w:line", "276"),
            ("w:lineRule", "auto"),
        ],
    )?;
    if let Some(jc) = style.justify {
        val(w, "w:jc", jc)?;
    }
    end(w, "w:pPr")?;

    start(w, "w:rPr")?;
    empty(
        w,
        "w:rFonts",
        [("w:ascii", "Arial"), ("w:hAnsi", "Arial"), ("w:cs", "Arial")],
    )?;
    if style.bold {
        empty(w, "w:b", [])?;
    }
    let size = style.size.to_string();
    val(w, "w:sz", &size)?;
    val(w, "w:szCs", &size)?;
    end(w, "w:rPr")?;

    end(w, "w:style")
}

// ---------------------------------------------------------------------------
// Document body
// ---------------------------------------------------------------------------

pub fn document_xml(document: &Document) -> quick_xml::Result<Vec<u8>> {
    let root = BytesStart::new("w:document").with_attributes([("xmlns:w", W_NS)]);
    part(root, |w| {
        start(w, "w:body")?;
        let last = document.sections.len().saturating_sub(1);
        for (i, section) in document.sections.iter().enumerate() {
            write_section(w, section)?;
            if i < last {
                // Non-final section properties ride on an empty paragraph.
                start(w, "w:p")?;
                start(w, "w:pPr")?;
                write_section_properties(w)?;
                end(w, "w:pPr")?;
                end(w, "w:p")?;
            }
        }
        write_section_properties(w)?;
        end(w, "w:body")
    })
}

fn write_section_properties(w: &mut XmlWriter) -> XmlResult {
    let (width, height) = (PAGE_WIDTH.to_string(), PAGE_HEIGHT.to_string());
    let (top_bottom, left_right) = (MARGIN_TOP_BOTTOM.to_string(), MARGIN_LEFT_RIGHT.to_string());
    start(w, "w:sectPr")?;
    empty(
        w,
        "w:pgSz",
        [
            ("w:w", width.as_str()),
            ("w:h", height.as_str()),
            ("w:orient", "landscape"),
        ],
    )?;
    empty(
        w,
        "w:pgMar",
        [
            ("w:top", top_bottom.as_str()),
            ("w:right", left_right.as_str()),
            ("w:bottom", top_bottom.as_str()),
            ("w:left", left_right.as_str()),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    end(w, "w:sectPr")
}

fn write_section(w: &mut XmlWriter, section: &Section) -> XmlResult {
    for block in &section.blocks {
        match block {
            Block::Paragraph(p) => write_paragraph(w, p)?,
            Block::Table(t) => write_table(w, t)?,
        }
    }
    Ok(())
}

fn write_paragraph(w: &mut XmlWriter, p: &Paragraph) -> XmlResult {
    start(w, "w:p")?;
    start(w, "w:pPr")?;
    val(w, "w:pStyle", p.style.style_id())?;
    if p.space_before.is_some() || p.space_after.is_some() {
        let mut spacing = BytesStart::new("w:spacing");
        if let Some(before) = p.space_before {
            spacing.push_attribute(("w:before", before.to_string().as_str()));
        }
        if let Some(after) = p.space_after {
            spacing.push_attribute(("w:after", after.to_string().as_str()));
        }
        w.write_event(Event::Empty(spacing))?;
    }
    if let Some(alignment) = p.alignment {
        let jc = match alignment {
            Alignment::Center => "center",
            Alignment::Justify => "both",
        };
        val(w, "w:jc", jc)?;
    }
    end(w, "w:pPr")?;
    for run in &p.runs {
        write_run(w, run)?;
    }
    end(w, "w:p")
}

fn write_run(w: &mut XmlWriter, run: &Run) -> XmlResult {
    start(w, "w:r")?;
    if run.bold || run.size.is_some() {
        start(w, "w:rPr")?;
        if run.bold {
            empty(w, "w:b", [])?;
            empty(w, "w:bCs", [])?;
        }
        if let Some(size) = run.size {
            let size = size.to_string();
            val(w, "w:sz", &size)?;
            val(w, "w:szCs", &size)?;
        }
        end(w, "w:rPr")?;
    }
    w.create_element("w:t")
        .with_attribute(("xml:space", "preserve"))
        .write_text_content(BytesText::new(&run.text))?;
    end(w, "w:r")
}

fn write_borders(w: &mut XmlWriter, container: &str, edges: &[&str]) -> XmlResult {
    start(w, container)?;
    for edge in edges {
        empty(w, edge, BORDER)?;
    }
    end(w, container)
}

fn write_table(w: &mut XmlWriter, table: &Table) -> XmlResult {
    start(w, "w:tbl")?;
    start(w, "w:tblPr")?;
    empty(w, "w:tblW", [("w:w", "5000"), ("w:type", "pct")])?;
    write_borders(
        w,
        "w:tblBorders",
        &["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"],
    )?;
    empty(w, "w:tblLayout", [("w:type", "fixed")])?;
    end(w, "w:tblPr")?;

    start(w, "w:tblGrid")?;
    for pct in &table.column_widths {
        let width = (TEXT_WIDTH * pct / 100).to_string();
        empty(w, "w:gridCol", [("w:w", width.as_str())])?;
    }
    end(w, "w:tblGrid")?;

    for row in &table.rows {
        start(w, "w:tr")?;
        for (i, cell) in row.iter().enumerate() {
            let pct = table.column_widths.get(i).copied().unwrap_or(0);
            write_cell(w, cell, pct)?;
        }
        end(w, "w:tr")?;
    }
    end(w, "w:tbl")
}

fn write_cell(w: &mut XmlWriter, cell: &Cell, pct: u32) -> XmlResult {
    start(w, "w:tc")?;
    start(w, "w:tcPr")?;
    // Table percentages are expressed in fiftieths of a percent.
    let width = (pct * 50).to_string();
    empty(w, "w:tcW", [("w:w", width.as_str()), ("w:type", "pct")])?;
    write_borders(
        w,
        "w:tcBorders",
        &["w:top", "w:left", "w:bottom", "w:right"],
    )?;
    if let Some(fill) = cell.shading {
        empty(
            w,
            "w:shd",
            [("w:val", "solid"), ("w:color", "auto"), ("w:fill", fill)],
        )?;
    }
    val(w, "w:vAlign", "top")?;
    end(w, "w:tcPr")?;
    if cell.paragraphs.is_empty() {
        // A cell must hold at least one paragraph.
        empty(w, "w:p", [])?;
    }
    for p in &cell.paragraphs {
        write_paragraph(w, p)?;
    }
    end(w, "w:tc")
}

#[cfg(test)]
mod tests {
    use quick_xml::Reader;

    use super::*;
    use crate::export::layout::build_document;
    use crate::model::PdcFormData;

    fn render(form: &PdcFormData) -> String {
        String::from_utf8(document_xml(&build_document(form)).unwrap()).unwrap()
    }

    /// Concatenated text of every `w:t` element, read back with a parser.
    fn text_runs(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut runs = Vec::new();
        let mut in_text = false;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
                Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
                Event::Text(t) if in_text => runs.push(t.unescape().unwrap().into_owned()),
                Event::Eof => break,
                _ => {}
            }
        }
        runs
    }

    #[test]
    fn text_is_escaped() {
        let mut form = PdcFormData::default();
        form.holistic_objective = "Ciencia & <tecnología> \"hoy\"".into();
        let xml = render(&form);
        assert!(xml.contains("Ciencia &amp; &lt;tecnología&gt;"));
        assert!(!xml.contains("<tecnología>"));
    }

    #[test]
    fn markup_in_runs_reads_back_verbatim() {
        let mut form = PdcFormData::starter();
        form.holistic_objective = "a < b && c > d </w:t><w:p>".into();
        form.adaptations[0].descriptor = "Baja visión 'leve' & \"parcial\"".into();

        let runs = text_runs(&render(&form));
        assert!(runs.iter().any(|r| r == "a < b && c > d </w:t><w:p>"));
        assert!(runs.iter().any(|r| r == "Baja visión 'leve' & \"parcial\""));
    }

    #[test]
    fn every_section_is_landscape() {
        let doc = build_document(&PdcFormData::starter());
        let xml = String::from_utf8(document_xml(&doc).unwrap()).unwrap();
        assert_eq!(xml.matches("<w:sectPr>").count(), doc.sections.len());
        assert_eq!(
            xml.matches(r#"w:orient="landscape""#).count(),
            doc.sections.len()
        );
        assert!(xml.contains(r#"w:top="1411""#));
        assert!(xml.contains(r#"w:left="1699""#));
    }

    #[test]
    fn objective_box_is_shaded() {
        let xml = render(&PdcFormData::default());
        assert!(xml.contains(r#"w:fill="F2F2F2""#));
    }

    #[test]
    fn styles_declare_headings() {
        let styles = String::from_utf8(styles_xml().unwrap()).unwrap();
        for id in ["Normal", "Heading1", "Heading2", "Heading3"] {
            assert!(styles.contains(&format!(r#"w:styleId="{id}""#)), "{id}");
        }
        assert!(styles.contains(r#"w:default="1""#));
        assert!(styles.contains(r#"w:line="276""#));
        assert!(styles.contains(r#"w:before="100""#));
    }

    #[test]
    fn package_parts_declare_namespaces() {
        let types = String::from_utf8(content_types_xml().unwrap()).unwrap();
        assert!(types.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(types.contains(r#"PartName="/word/styles.xml""#));

        let rels = String::from_utf8(relationships_xml(STYLES_REL, "styles.xml").unwrap()).unwrap();
        assert!(rels.contains(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#));
        assert!(rels.contains(r#"Target="styles.xml""#));
    }
}
