//! Static curricular catalog: education levels, school years, the areas
//! valid for each level, and the default holistic objective per level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Education level of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Inicial,
    Primaria,
    Secundaria,
}

impl Level {
    /// Every level, in the order they are offered to the teacher.
    pub const ALL: [Level; 3] = [Level::Inicial, Level::Primaria, Level::Secundaria];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inicial => "Inicial",
            Self::Primaria => "Primaria",
            Self::Secundaria => "Secundaria",
        };
        f.write_str(s)
    }
}

impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inicial" => Ok(Self::Inicial),
            "primaria" => Ok(Self::Primaria),
            "secundaria" => Ok(Self::Secundaria),
            _ => Err(LevelParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Level`] string.
#[derive(Debug, Clone)]
pub struct LevelParseError(pub String);

impl fmt::Display for LevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid level: {:?} (expected Inicial, Primaria, or Secundaria)",
            self.0
        )
    }
}

impl std::error::Error for LevelParseError {}

// ---------------------------------------------------------------------------

/// School year within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolYear {
    #[serde(rename = "1ro")]
    First,
    #[serde(rename = "2do")]
    Second,
    #[serde(rename = "3ro")]
    Third,
    #[serde(rename = "4to")]
    Fourth,
    #[serde(rename = "5to")]
    Fifth,
    #[serde(rename = "6to")]
    Sixth,
}

impl SchoolYear {
    pub const ALL: [SchoolYear; 6] = [
        SchoolYear::First,
        SchoolYear::Second,
        SchoolYear::Third,
        SchoolYear::Fourth,
        SchoolYear::Fifth,
        SchoolYear::Sixth,
    ];
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::First => "1ro",
            Self::Second => "2do",
            Self::Third => "3ro",
            Self::Fourth => "4to",
            Self::Fifth => "5to",
            Self::Sixth => "6to",
        };
        f.write_str(s)
    }
}

impl FromStr for SchoolYear {
    type Err = SchoolYearParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1ro" | "1" => Ok(Self::First),
            "2do" | "2" => Ok(Self::Second),
            "3ro" | "3" => Ok(Self::Third),
            "4to" | "4" => Ok(Self::Fourth),
            "5to" | "5" => Ok(Self::Fifth),
            "6to" | "6" => Ok(Self::Sixth),
            other => Err(SchoolYearParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`SchoolYear`] string.
#[derive(Debug, Clone)]
pub struct SchoolYearParseError(pub String);

impl fmt::Display for SchoolYearParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid school year: {:?} (expected 1ro..6to)", self.0)
    }
}

impl std::error::Error for SchoolYearParseError {}

// ---------------------------------------------------------------------------
// Level data
// ---------------------------------------------------------------------------

const INICIAL_OBJECTIVE: &str = "Fortalecemos los valores sociocomunitarios en la interrelación Intracultural, Intercultural y Plurilingüismo en armonía y complementariedad
con la Madre Tierra, desarrollando capacidades y habilidades lingüísticas, cognitivas, socioafectivas, psicomotrices, artísticas y creativas, a
través de la observación, exploración, experimentación e investigación, para asumir actitudes inclusivas, de autonomía y toma de decisiones.";

const PRIMARIA_OBJECTIVE: &str = "Fortalecemos la práctica de valores sociocomunitarios y principios ético-morales, en el desarrollo del pensamiento crítico; lectura comprensiva, escritura creativa; el pensamiento lógico matemático, resolución de problemas; a través de la convivencia comunitaria biocéntrica; la sensibilidad en las manifestaciones culturales de arte, música, danza, deporte; el uso adecuado de las Tecnologías de Información y Comunicación, la exploración, experimentación e investigación para contribuir a la educación intracultural, intercultural y plurilingüe del Estado Plurinacional, en complementariedad, diálogo de saberes, conocimientos propios y universales.";

const SECUNDARIA_OBJECTIVE: &str = "Formamos integralmente a las y los estudiantes con identidad cultural, valores sociocomunitarios, espiritualidad y consciencia crítica, articulando la educación científica, humanística, técnica, tecnológica y artística a través de procesos productivos de acuerdo a las vocaciones y potencialidades de las regiones en el marco de la descolonización, interculturalidad, y plurilingüismo, para que contribuyan a la conservación, protección de la Madre Tierra y salud comunitaria, la construcción de una sociedad democrática, inclusiva y libre de violencia.";

const INICIAL_AREAS: &[&str] = &[
    "Cosmos y Pensamiento",
    "Comunidad y Sociedad",
    "Vida Tierra Territorio",
    "Ciencia Tecnología y Producción",
];

const PRIMARIA_AREAS: &[&str] = &[
    "Valores Espiritualidades y Religiones",
    "Comunicación y Lenguajes",
    "Artes Plásticas y Visuales",
    "Educación Musical",
    "Educación Física y Deportes",
    "Ciencias Sociales",
    "Ciencias Naturales",
    "Matemática",
    "Técnica Tecnológica",
];

const SECUNDARIA_AREAS: &[&str] = &[
    "CIENCIAS NATURALES: BIOLOGÍA – GEOGRAFÍA",
    "CIENCIAS NATURALES: FÍSICA",
    "CIENCIAS NATURALES: QUÍMICA",
    "MATEMÁTICA",
    "TÉCNICA TECNOLÓGICA GENERAL",
    "COMUNICACIÓN Y LENGUAJES: LENGUA CASTELLANA",
    "COMUNICACIÓN Y LENGUAJES: LENGUA ORIGINARIA",
    "LENGUA EXTRANJERA",
    "CIENCIAS SOCIALES",
    "ARTES PLÁSTICAS Y VISUALES",
    "EDUCACIÓN MUSICAL",
    "EDUCACIÓN FÍSICA Y DEPORTES",
    "COSMOVISIONES FILOSOFÍA Y SICOLOGÍA",
    "VALORES ESPIRITUALIDAD Y RELIGIONES",
];

/// Sub-title printed under the level heading of every plan.
pub const DOCUMENT_SUBTITLE: &str = "PLAN DE DESARROLLO CURRICULAR Nº 1";

/// System instruction sent with every text-generation request.
pub const SYSTEM_INSTRUCTION: &str = "Eres un experto en programación y un especialista en planificación educativa bajo la legislación boliviana y documentos curriculares de educación boliviana (Planes y programas de nivel inicial, primaria y secundaria). Tu tarea es generar contenido curricular coherente y relevante basado en los datos proporcionados por el usuario, adhiriéndote estrictamente a la normativa educativa de Bolivia.";

/// Default holistic objective for a level, if one is defined.
pub fn default_objective(level: Option<Level>) -> Option<&'static str> {
    match level? {
        Level::Inicial => Some(INICIAL_OBJECTIVE),
        Level::Primaria => Some(PRIMARIA_OBJECTIVE),
        Level::Secundaria => Some(SECUNDARIA_OBJECTIVE),
    }
}

/// Knowledge areas valid for a level, in display order. Empty when unset.
pub fn areas_for_level(level: Option<Level>) -> &'static [&'static str] {
    match level {
        Some(Level::Inicial) => INICIAL_AREAS,
        Some(Level::Primaria) => PRIMARIA_AREAS,
        Some(Level::Secundaria) => SECUNDARIA_AREAS,
        None => &[],
    }
}

/// Title block heading for a level.
pub fn level_title(level: Option<Level>) -> &'static str {
    match level {
        Some(Level::Inicial) => "EDUCACIÓN INICIAL EN FAMILIA COMUNITARIA",
        Some(Level::Primaria) => "EDUCACIÓN PRIMARIA COMUNITARIA VOCACIONAL",
        Some(Level::Secundaria) => "EDUCACIÓN SECUNDARIA COMUNITARIA PRODUCTIVA",
        None => "PLANIFICACIÓN EDUCATIVA",
    }
}

/// Heading of the holistic objective box for a level.
pub fn holistic_heading(level: Option<Level>) -> &'static str {
    match level {
        Some(Level::Inicial) => {
            "OBJETIVO HOLÍSTICO DEL NIVEL DE EDUCACIÓN INICIAL EN FAMILIA COMUNITARIA"
        }
        Some(Level::Primaria) => {
            "OBJETIVO HOLÍSTICO DEL NIVEL DE EDUCACIÓN PRIMARIA COMUNITARIA VOCACIONAL"
        }
        Some(Level::Secundaria) => {
            "OBJETIVO HOLÍSTICO DEL NIVEL DE EDUCACIÓN SECUNDARIA COMUNITARIA PRODUCTIVA"
        }
        None => "OBJETIVO HOLÍSTICO DE NIVEL",
    }
}
