//! Prompt construction and response schemas. Pure logic, no I/O.

use serde_json::{Value, json};

use super::types::{AdaptationRequest, KnowledgeAreaRequest};

/// Build the user prompt for a knowledge-area block.
pub fn knowledge_area_prompt(request: &KnowledgeAreaRequest) -> String {
    let ctx = &request.context;
    let level = ctx.level.map(|l| l.to_string()).unwrap_or_default();
    let year = ctx.school_year.map(|y| y.to_string()).unwrap_or_default();
    let c = &request.contents;

    let mut prompt = String::with_capacity(2048);
    prompt.push_str(
        "Eres un experto en planificación educativa de Bolivia. Genera el 'Objetivo de aprendizaje', \
         'Momentos del proceso formativo', 'Recursos', 'Periodos', y los 'Criterios de evaluación' \
         (SER, SABER, HACER) para el siguiente bloque de contenido curricular, en formato JSON.\n",
    );
    prompt.push_str(&format!(
        "Considera el Nivel educativo: \"{level}\" y el Año de escolaridad: \"{year}\".\n"
    ));
    prompt.push_str(&format!(
        "El área de saberes y conocimientos es: \"{}\".\n",
        request.area_name
    ));
    prompt.push_str(&format!(
        "El objetivo de aprendizaje propuesto (si aplica o se deja en blanco, completa o refina): \"{}\".\n",
        request.learning_objective
    ));
    prompt.push_str("Los contenidos son:\n");
    prompt.push_str(&format!("- Semana 1: {}\n", c.week1));
    prompt.push_str(&format!("- Semana 2: {}\n", c.week2));
    prompt.push_str(&format!("- Semana 3: {}\n", c.week3));
    prompt.push_str(&format!("- Semana 4: {}\n", c.week4));
    prompt.push_str(&format!(
        "- Adaptaciones Curriculares (generales y específicos): {}\n\n",
        c.curricular_adaptations
    ));
    prompt.push_str(&format!(
        "El objetivo holístico general del nivel es: \"{}\".\n",
        ctx.holistic_objective
    ));
    prompt.push_str(
        "Por favor, asegúrate de que el 'Objetivo de aprendizaje' sea conciso y el 'Momentos del \
         proceso formativo' sea una descripción detallada de actividades. Los 'Recursos' deben ser \
         una lista de materiales. Los 'Periodos' deben indicar la duración en semanas o días. Los \
         'Criterios de evaluación' (SER, SABER, HACER) deben estar alineados con los contenidos y \
         el objetivo.",
    );
    prompt
}

/// Build the user prompt for a significant adaptation.
pub fn adaptation_prompt(request: &AdaptationRequest) -> String {
    format!(
        "Considerando el objetivo holístico general del nivel: \"{}\", y el siguiente estudiante, \
         genera una 'Adaptación' y 'Criterio de evaluación' específicos en formato JSON.\n\
         Contenido relacionado: \"{}\"\n\
         Discapacidad/Talento extraordinario/TDH/TEA y otros: \"{}\"",
        request.holistic_objective, request.content, request.descriptor
    )
}

fn string_field(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

/// Response schema for a knowledge-area block.
pub fn knowledge_area_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "objectiveAprendizaje": string_field("El objetivo de aprendizaje para el bloque."),
            "momentosProcesoFormativo": string_field(
                "Los momentos del proceso formativo (actividades) en un párrafo detallado."
            ),
            "recursos": string_field("Lista de recursos necesarios, separados por comas."),
            "periodos": string_field("Duración estimada en semanas o días."),
            "criteriosEvaluacion": {
                "type": "OBJECT",
                "properties": {
                    "ser": string_field("Criterios de evaluación para el SER."),
                    "saber": string_field("Criterios de evaluación para el SABER."),
                    "hacer": string_field("Criterios de evaluación para el HACER."),
                },
                "required": ["ser", "saber", "hacer"],
            },
        },
        "required": [
            "objectiveAprendizaje",
            "momentosProcesoFormativo",
            "recursos",
            "periodos",
            "criteriosEvaluacion",
        ],
    })
}

/// Response schema for a significant adaptation.
pub fn adaptation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "adaptacion": string_field("La adaptación curricular propuesta para el estudiante."),
            "criterioEvaluacion": string_field("El criterio de evaluación para la adaptación."),
        },
        "required": ["adaptacion", "criterioEvaluacion"],
    })
}
