//! Reads exported `.docx` archives back and checks their structure.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use pdc_core::catalog::Level;
use pdc_core::export::{self, ARTIFACT_FILE_NAME};
use pdc_core::model::PdcFormData;
use pdc_test_utils::{primaria_form, ready_block, ready_student};

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

/// Row counts of every top-level table, in document order.
fn table_row_counts(xml: &str) -> Vec<usize> {
    let mut reader = Reader::from_str(xml);
    let mut counts = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:tbl" => {
                depth += 1;
                if depth == 1 {
                    counts.push(0);
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:tbl" => depth -= 1,
            Event::Start(e) if e.name().as_ref() == b"w:tr" && depth == 1 => {
                if let Some(last) = counts.last_mut() {
                    *last += 1;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    counts
}

/// Text of every paragraph in the document part.
fn paragraph_texts(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:p" => current.clear(),
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(t) if in_text => current.push_str(&t.unescape().unwrap()),
            Event::End(e) if e.name().as_ref() == b"w:p" => texts.push(current.clone()),
            Event::Eof => break,
            _ => {}
        }
    }
    texts
}

fn populated_form() -> PdcFormData {
    let mut blocks = vec![
        ready_block("Matemática"),
        ready_block("Ciencias Naturales"),
        ready_block("Educación Física y Deportes"),
    ];
    for block in &mut blocks {
        block.learning_objective = format!("Objetivo de {}", block.area_name);
        block.formative_moments = "Práctica, teoría, valoración y producción".into();
        block.resources = "Cuadernos".into();
        block.periods = "4 semanas".into();
        block.criteria.ser = "Respeta".into();
        block.criteria.saber = "Conoce".into();
        block.criteria.hacer = "Aplica".into();
    }
    let mut students = vec![
        ready_student(1, "Baja visión"),
        ready_student(2, "TDAH"),
        ready_student(3, "Altas capacidades"),
        ready_student(4, "TEA"),
    ];
    for row in &mut students {
        row.adaptation = "Material ampliado".into();
        row.criterion = "Participa".into();
    }
    let mut form = primaria_form(blocks, students);
    form.referential.district = "El Alto 1".into();
    form.referential.institution = "U.E. Bolivia & Mar".into();
    form
}

#[test]
fn archive_contains_required_parts() {
    let artifact = export::export_document(&PdcFormData::starter()).unwrap();
    assert_eq!(artifact.file_name, ARTIFACT_FILE_NAME);

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes.as_slice())).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
        ]
    );
    // Every part must be well-formed XML.
    for name in names {
        let mut xml = String::new();
        archive.by_name(&name).unwrap().read_to_string(&mut xml).unwrap();
        let mut reader = Reader::from_str(&xml);
        while !matches!(reader.read_event().unwrap(), Event::Eof) {}
    }
}

#[test]
fn section_and_row_counts_follow_the_form() {
    let form = populated_form();
    let artifact = export::export_document(&form).unwrap();
    let xml = read_part(&artifact.bytes, "word/document.xml");

    let texts = paragraph_texts(&xml);
    let area_headings = texts
        .iter()
        .filter(|t| t.starts_with("ÁREA DE SABERES Y CONOCIMIENTOS: "))
        .count();
    assert_eq!(area_headings, form.knowledge_areas.len());

    // Objective box, one table per block, then the adaptations table.
    let rows = table_row_counts(&xml);
    assert_eq!(rows.len(), 1 + form.knowledge_areas.len() + 1);
    assert_eq!(rows[0], 1);
    assert!(rows[1..=form.knowledge_areas.len()].iter().all(|&n| n == 2));
    assert_eq!(*rows.last().unwrap(), form.adaptations.len() + 1);
}

#[test]
fn document_text_matches_layout() {
    let form = populated_form();
    let artifact = export::export_document(&form).unwrap();
    let texts = paragraph_texts(&read_part(&artifact.bytes, "word/document.xml"));

    for expected in [
        "EDUCACIÓN PRIMARIA COMUNITARIA VOCACIONAL",
        "PLAN DE DESARROLLO CURRICULAR Nº 1",
        "1. DATOS REFERENCIALES",
        "Distrito educativo: El Alto 1",
        "Unidad educativa: U.E. Bolivia & Mar",
        "Nivel: Primaria",
        "Año de escolaridad: —",
        "2. DESARROLLO",
        "OBJETIVO HOLÍSTICO DEL NIVEL DE EDUCACIÓN PRIMARIA COMUNITARIA VOCACIONAL",
        "ÁREA DE SABERES Y CONOCIMIENTOS: Matemática",
        "• Semana 1: contenido de Matemática",
        "• Semana 2: —",
        "SABER: Conoce",
        "ADAPTACIONES CURRICULARES SIGNIFICATIVAS",
        "Estudiante 4",
    ] {
        assert!(texts.iter().any(|t| t == expected), "missing {expected:?}");
    }
}

#[test]
fn empty_plan_still_exports() {
    let mut form = PdcFormData::default();
    form.referential.level = Some(Level::Inicial);
    let artifact = export::export_document(&form).unwrap();
    let xml = read_part(&artifact.bytes, "word/document.xml");

    let rows = table_row_counts(&xml);
    // Objective box and a header-only adaptations table.
    assert_eq!(rows, vec![1, 1]);
}
