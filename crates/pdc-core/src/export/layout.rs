//! Document model and the plan layout. Pure logic, no I/O.

use chrono::NaiveDate;

use crate::catalog::{self, DOCUMENT_SUBTITLE};
use crate::model::{KnowledgeAreaBlock, PdcFormData, ReferentialData, SignificantAdaptation};

/// Rendered in place of any blank value.
pub const PLACEHOLDER: &str = "—";

/// Fill colour of the holistic objective box.
pub const OBJECTIVE_SHADING: &str = "F2F2F2";

/// Column widths (percent) of a knowledge-area table.
pub const KNOWLEDGE_AREA_COLUMNS: [u32; 6] = [25, 15, 30, 12, 6, 12];

/// Column widths (percent) of the adaptations table.
pub const ADAPTATION_COLUMNS: [u32; 4] = [25, 25, 35, 15];

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.kind == kind)
    }
}

/// One page section; every section starts on a new landscape page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Title,
    Referential,
    HolisticObjective,
    KnowledgeArea,
    Adaptations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphStyle {
    #[default]
    Normal,
    Heading1,
    Heading2,
    Heading3,
}

impl ParagraphStyle {
    /// Style id as declared in the styles part.
    pub fn style_id(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Heading1 => "Heading1",
            Self::Heading2 => "Heading2",
            Self::Heading3 => "Heading3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub alignment: Option<Alignment>,
    /// Spacing in twips.
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    fn styled(style: ParagraphStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            runs: vec![Run::bold(text)],
            ..Default::default()
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            ..Default::default()
        }
    }

    /// `label` in bold followed by `value` (or the placeholder).
    fn labelled(label: &str, value: &str) -> Self {
        Self {
            runs: vec![Run::bold(label), Run::plain(or_placeholder(value))],
            ..Default::default()
        }
    }

    fn spacer() -> Self {
        Self {
            space_after: Some(100),
            ..Default::default()
        }
    }

    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    /// Font size in half-points; `None` inherits the paragraph style.
    pub size: Option<u32>,
}

impl Run {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            size: None,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            size: None,
        }
    }
}

/// Full-width bordered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Percent of the text width per column.
    pub column_widths: Vec<u32>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
    /// Solid fill colour as RRGGBB.
    pub shading: Option<&'static str>,
}

impl Cell {
    fn text(value: &str) -> Self {
        Self {
            paragraphs: vec![Paragraph::plain(or_placeholder(value))],
            shading: None,
        }
    }

    fn header(label: &str) -> Self {
        Self {
            paragraphs: vec![Paragraph {
                runs: vec![Run::bold(label)],
                ..Default::default()
            }],
            shading: None,
        }
    }

    fn labelled(lines: &[(&str, &str)]) -> Self {
        Self {
            paragraphs: lines
                .iter()
                .map(|(label, value)| Paragraph::labelled(label, value))
                .collect(),
            shading: None,
        }
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { PLACEHOLDER } else { value }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Lay out the whole plan: title, referential data, holistic objective,
/// one section per knowledge-area block, then the adaptations table.
pub fn build_document(form: &PdcFormData) -> Document {
    let level = form.referential.level;
    let mut sections = vec![
        title_section(level),
        referential_section(&form.referential),
        holistic_section(&form.holistic_objective, level),
    ];
    sections.extend(form.knowledge_areas.iter().map(knowledge_area_section));
    sections.push(adaptations_section(&form.adaptations));
    Document { sections }
}

fn title_section(level: Option<catalog::Level>) -> Section {
    let subtitle = Paragraph {
        alignment: Some(Alignment::Center),
        space_after: Some(100),
        runs: vec![Run {
            text: DOCUMENT_SUBTITLE.to_owned(),
            bold: true,
            size: Some(28),
        }],
        ..Default::default()
    };
    Section {
        kind: SectionKind::Title,
        blocks: vec![
            Block::Paragraph(Paragraph::styled(
                ParagraphStyle::Heading1,
                catalog::level_title(level).to_uppercase(),
            )),
            Block::Paragraph(subtitle),
        ],
    }
}

fn referential_section(data: &ReferentialData) -> Section {
    let level = data.level.map(|l| l.to_string()).unwrap_or_default();
    let year = data.school_year.map(|y| y.to_string()).unwrap_or_default();
    let areas = data.areas.join(", ");
    let start = format_date(data.term_start);
    let end = format_date(data.term_end);

    let term = Paragraph {
        space_after: Some(100),
        runs: vec![
            Run::bold("Trimestre: Del "),
            Run::plain(or_placeholder(&start)),
            Run::bold(" al "),
            Run::plain(or_placeholder(&end)),
        ],
        ..Default::default()
    };

    let mut blocks = vec![Block::Paragraph(Paragraph::styled(
        ParagraphStyle::Heading2,
        "1. DATOS REFERENCIALES",
    ))];
    blocks.extend(
        [
            ("Distrito educativo: ", data.district.as_str()),
            ("Unidad educativa: ", data.institution.as_str()),
            ("Nivel: ", level.as_str()),
            ("Año de escolaridad: ", year.as_str()),
            ("Director/a: ", data.director.as_str()),
            ("Maestro/a: ", data.teacher.as_str()),
            ("Áreas: ", areas.as_str()),
        ]
        .into_iter()
        .map(|(label, value)| Block::Paragraph(Paragraph::labelled(label, value))),
    );
    blocks.push(Block::Paragraph(term));

    Section {
        kind: SectionKind::Referential,
        blocks,
    }
}

fn holistic_section(objective: &str, level: Option<catalog::Level>) -> Section {
    let body = Cell {
        paragraphs: vec![Paragraph {
            alignment: Some(Alignment::Justify),
            runs: vec![Run {
                text: or_placeholder(objective).to_owned(),
                bold: false,
                size: Some(20),
            }],
            ..Default::default()
        }],
        shading: Some(OBJECTIVE_SHADING),
    };
    Section {
        kind: SectionKind::HolisticObjective,
        blocks: vec![
            Block::Paragraph(Paragraph::styled(ParagraphStyle::Heading2, "2. DESARROLLO")),
            Block::Paragraph(Paragraph::styled(
                ParagraphStyle::Heading3,
                catalog::holistic_heading(level),
            )),
            Block::Table(Table {
                column_widths: vec![100],
                rows: vec![vec![body]],
            }),
            Block::Paragraph(Paragraph::spacer()),
        ],
    }
}

fn knowledge_area_section(block: &KnowledgeAreaBlock) -> Section {
    let header: Vec<Cell> = [
        "Objetivo de aprendizaje",
        "Contenidos",
        "Momentos del proceso formativo",
        "Recursos",
        "Periodos",
        "Criterios de evaluación (SER, SABER, HACER)",
    ]
    .into_iter()
    .map(Cell::header)
    .collect();

    let c = &block.contents;
    let contents = Cell::labelled(&[
        ("• Semana 1: ", c.week1.as_str()),
        ("• Semana 2: ", c.week2.as_str()),
        ("• Semana 3: ", c.week3.as_str()),
        ("• Semana 4: ", c.week4.as_str()),
        (
            "Adaptaciones Curriculares (generales y específicos): ",
            c.curricular_adaptations.as_str(),
        ),
    ]);
    let criteria = Cell::labelled(&[
        ("SER: ", block.criteria.ser.as_str()),
        ("SABER: ", block.criteria.saber.as_str()),
        ("HACER: ", block.criteria.hacer.as_str()),
    ]);
    let body = vec![
        Cell::text(&block.learning_objective),
        contents,
        Cell::text(&block.formative_moments),
        Cell::text(&block.resources),
        Cell::text(&block.periods),
        criteria,
    ];

    Section {
        kind: SectionKind::KnowledgeArea,
        blocks: vec![
            Block::Paragraph(Paragraph::styled(
                ParagraphStyle::Heading3,
                format!(
                    "ÁREA DE SABERES Y CONOCIMIENTOS: {}",
                    or_placeholder(&block.area_name)
                ),
            )),
            Block::Table(Table {
                column_widths: KNOWLEDGE_AREA_COLUMNS.to_vec(),
                rows: vec![header, body],
            }),
            Block::Paragraph(Paragraph::spacer()),
        ],
    }
}

fn adaptations_section(rows: &[SignificantAdaptation]) -> Section {
    let header: Vec<Cell> = [
        "Contenido",
        "Discapacidad/Talento extraordinario/TDH/TEA y otros",
        "Adaptación",
        "Criterio de evaluación",
    ]
    .into_iter()
    .map(Cell::header)
    .collect();

    let mut table_rows = vec![header];
    table_rows.extend(rows.iter().map(|row| {
        vec![
            Cell::text(&row.content),
            Cell::text(&row.descriptor),
            Cell::text(&row.adaptation),
            Cell::text(&row.criterion),
        ]
    }));

    let heading = Paragraph {
        space_before: Some(100),
        ..Paragraph::styled(
            ParagraphStyle::Heading2,
            "ADAPTACIONES CURRICULARES SIGNIFICATIVAS",
        )
    };

    Section {
        kind: SectionKind::Adaptations,
        blocks: vec![
            Block::Paragraph(heading),
            Block::Table(Table {
                column_widths: ADAPTATION_COLUMNS.to_vec(),
                rows: table_rows,
            }),
            Block::Paragraph(Paragraph::spacer()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Level;

    fn first_paragraph_text(section: &Section) -> String {
        match &section.blocks[0] {
            Block::Paragraph(p) => p.text(),
            Block::Table(_) => panic!("section starts with a table"),
        }
    }

    fn table(section: &Section) -> &Table {
        section
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                Block::Paragraph(_) => None,
            })
            .expect("section has a table")
    }

    #[test]
    fn section_order_follows_the_plan() {
        let doc = build_document(&PdcFormData::starter());
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Title,
                SectionKind::Referential,
                SectionKind::HolisticObjective,
                SectionKind::KnowledgeArea,
                SectionKind::KnowledgeArea,
                SectionKind::Adaptations,
            ]
        );
    }

    #[test]
    fn title_uses_level_heading() {
        let mut form = PdcFormData::default();
        form.referential.level = Some(Level::Secundaria);
        let doc = build_document(&form);
        assert_eq!(
            first_paragraph_text(&doc.sections[0]),
            "EDUCACIÓN SECUNDARIA COMUNITARIA PRODUCTIVA"
        );

        let doc = build_document(&PdcFormData::default());
        assert_eq!(first_paragraph_text(&doc.sections[0]), "PLANIFICACIÓN EDUCATIVA");
    }

    #[test]
    fn blank_values_render_placeholder() {
        let doc = build_document(&PdcFormData::default());
        let referential = &doc.sections[1];
        let texts: Vec<String> = referential
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.text()),
                Block::Table(_) => None,
            })
            .collect();
        assert!(texts.contains(&"Distrito educativo: —".to_owned()));
        assert!(texts.contains(&"Áreas: —".to_owned()));
        assert!(texts.contains(&"Trimestre: Del — al —".to_owned()));

        let objective = table(&doc.sections[2]);
        assert_eq!(objective.rows[0][0].paragraphs[0].text(), PLACEHOLDER);
        assert_eq!(objective.rows[0][0].shading, Some(OBJECTIVE_SHADING));
    }

    #[test]
    fn referential_lists_areas_and_dates() {
        let mut form = PdcFormData::default();
        form.referential.areas = vec!["Matemática".into(), "Lenguaje".into()];
        form.referential.term_start = NaiveDate::from_ymd_opt(2025, 2, 3);
        let doc = build_document(&form);
        let texts: Vec<String> = doc.sections[1]
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.text()),
                Block::Table(_) => None,
            })
            .collect();
        assert!(texts.contains(&"Áreas: Matemática, Lenguaje".to_owned()));
        assert!(texts.contains(&"Trimestre: Del 2025-02-03 al —".to_owned()));
    }

    #[test]
    fn knowledge_area_table_layout() {
        let mut block = KnowledgeAreaBlock::new("Matemática");
        block.contents.week2 = "Fracciones".into();
        block.criteria.saber = "Identifica fracciones".into();
        let section = knowledge_area_section(&block);

        assert_eq!(
            first_paragraph_text(&section),
            "ÁREA DE SABERES Y CONOCIMIENTOS: Matemática"
        );
        let t = table(&section);
        assert_eq!(t.column_widths, vec![25, 15, 30, 12, 6, 12]);
        assert_eq!(t.rows.len(), 2);

        let weeks: Vec<String> = t.rows[1][1].paragraphs.iter().map(Paragraph::text).collect();
        assert_eq!(weeks[0], "• Semana 1: —");
        assert_eq!(weeks[1], "• Semana 2: Fracciones");
        let criteria: Vec<String> = t.rows[1][5].paragraphs.iter().map(Paragraph::text).collect();
        assert_eq!(criteria, vec!["SER: —", "SABER: Identifica fracciones", "HACER: —"]);
    }

    #[test]
    fn adaptations_table_has_one_row_per_student() {
        let form = PdcFormData::starter();
        let doc = build_document(&form);
        let section = doc.sections_of(SectionKind::Adaptations).next().unwrap();
        let t = table(section);
        assert_eq!(t.rows.len(), form.adaptations.len() + 1);
        assert_eq!(t.column_widths, vec![25, 25, 35, 15]);
        assert_eq!(t.rows[1][0].paragraphs[0].text(), "Estudiante 1");
    }
}
