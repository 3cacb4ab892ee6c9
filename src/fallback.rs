//! Canned replies served when the generation service is out of quota.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCategory {
    Greeting,
    ProgrammingHelp,
    InfoRequest,
    Generic,
}

pub struct FallbackRule {
    pub category: FallbackCategory,
    matches: fn(&str) -> bool,
    pub response: &'static str,
}

const GREETING_WORDS: &[&str] = &["hola", "hi", "hello", "hey", "saludos", "buenas"];
const GREETING_PHRASES: &[&str] = &["buenos días", "buenos dias", "buenas tardes", "buenas noches"];

const PROGRAMMING_WORDS: &[&str] = &[
    "python", "javascript", "java", "rust", "código", "codigo", "programar", "programación",
    "programacion", "html", "css", "sql", "función", "funcion", "bug", "error", "api",
];

const INFO_WORDS: &[&str] = &[
    "qué", "que", "cómo", "como", "cuál", "cual", "explica", "explícame", "información",
    "informacion", "what", "how", "why", "define",
];

fn has_word(message: &str, words: &[&str]) -> bool {
    message
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| words.contains(&token))
}

fn is_greeting(message: &str) -> bool {
    has_word(message, GREETING_WORDS) || GREETING_PHRASES.iter().any(|p| message.contains(p))
}

fn is_programming(message: &str) -> bool {
    has_word(message, PROGRAMMING_WORDS)
}

fn is_info_request(message: &str) -> bool {
    has_word(message, INFO_WORDS)
}

fn always(_: &str) -> bool {
    true
}

/// Evaluated top to bottom; the first matching rule wins. The last rule always matches.
pub static RULES: &[FallbackRule] = &[
    FallbackRule {
        category: FallbackCategory::Greeting,
        matches: is_greeting,
        response: "¡Hola! Soy Angel, tu asistente de IA. En este momento estoy recibiendo \
                   muchas consultas y no puedo generar una respuesta completa, pero en unos \
                   minutos estaré disponible de nuevo. ¿En qué te puedo ayudar?",
    },
    FallbackRule {
        category: FallbackCategory::ProgrammingHelp,
        matches: is_programming,
        response: "Me encantaría ayudarte con tu pregunta de programación, pero ahora mismo \
                   he alcanzado mi límite de consultas. Mientras tanto:\n\n\
                   - Revisa la documentación oficial del lenguaje o la librería.\n\
                   - Lee con atención el mensaje de error completo.\n\
                   - Reduce el problema a un ejemplo mínimo.\n\n\
                   Vuelve a intentarlo en unos minutos y lo vemos juntos.",
    },
    FallbackRule {
        category: FallbackCategory::InfoRequest,
        matches: is_info_request,
        response: "Buena pregunta. Ahora mismo he alcanzado mi límite de consultas y no puedo \
                   darte una respuesta detallada. Por favor, inténtalo de nuevo en unos minutos.",
    },
    FallbackRule {
        category: FallbackCategory::Generic,
        matches: always,
        response: "Lo siento, en este momento el servicio está muy solicitado y no puedo \
                   responder. Por favor, inténtalo de nuevo en unos minutos.",
    },
];

pub fn select(message: &str) -> &'static FallbackRule {
    let message = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&message))
        .unwrap_or(&RULES[RULES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_detected() {
        assert_eq!(select("Hola Angel").category, FallbackCategory::Greeting);
        assert_eq!(select("BUENOS DÍAS").category, FallbackCategory::Greeting);
    }

    #[test]
    fn programming_is_detected() {
        assert_eq!(
            select("Necesito ayuda con Python").category,
            FallbackCategory::ProgrammingHelp
        );
    }

    #[test]
    fn info_request_is_detected() {
        assert_eq!(
            select("¿Qué es la fotosíntesis?").category,
            FallbackCategory::InfoRequest
        );
    }

    #[test]
    fn short_keywords_match_whole_words_only() {
        // "this" contains "hi" but is not a greeting
        assert_eq!(select("this one").category, FallbackCategory::Generic);
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(
            select("hola, ¿cómo uso python?").category,
            FallbackCategory::Greeting
        );
        assert_eq!(
            select("cómo arreglo este bug").category,
            FallbackCategory::ProgrammingHelp
        );
    }

    #[test]
    fn anything_else_is_generic() {
        let rule = select("cuéntame un chiste");
        assert_eq!(rule.category, FallbackCategory::Generic);
        assert_eq!(rule.response, RULES[3].response);
    }
}
