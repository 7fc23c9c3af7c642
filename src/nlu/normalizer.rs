//! # Normalizador de Texto
//!
//! Primeira etapa da pipeline: toda mensagem do usuário passa por aqui
//! antes de qualquer comparação com keywords ou frases especiais.
//!
//! ```text
//! "¿Cuál es su HORARIO?"
//!   ├── 1. lowercase            → "¿cuál es su horario?"
//!   ├── 2. NFD (decomposição)   → "¿cua\u{301}l es su horario?"
//!   ├── 3. remove marcas        → "¿cual es su horario?"
//!   └── 4. split em whitespace  → ["¿cual", "es", "su", "horario?"]
//! ```
//!
//! A pontuação **não** é removida: os tokens "horario?" e "horario" ainda
//! casam pela regra de substring do [`similarity`](super::similarity).

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Texto normalizado e seus tokens.
///
/// O texto completo é mantido porque o classificador concede um ponto
/// extra quando a keyword aparece como substring da frase inteira
/// (útil para keywords compostas como "hasta luego").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Texto em minúsculas, sem diacríticos.
    pub text: String,
    /// Tokens separados por sequências de whitespace (nunca vazios).
    pub tokens: Vec<String>,
}

impl Normalized {
    /// `true` se a entrada não produziu nenhum token.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Remove diacríticos e converte para minúsculas.
///
/// Aplica decomposição canônica (NFD) e descarta os caracteres de marca
/// combinante, então "envío" vira "envio" e "sí" vira "si".
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normaliza e tokeniza um texto livre.
///
/// Entrada vazia (ou só com espaços) produz zero tokens.
pub fn normalize(text: &str) -> Normalized {
    let folded = fold(text);
    let tokens = folded.split_whitespace().map(str::to_string).collect();
    Normalized {
        text: folded,
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        let n = normalize("¿Cuál es el ENVÍO?");
        assert_eq!(n.text, "¿cual es el envio?");
        assert_eq!(n.tokens, vec!["¿cual", "es", "el", "envio?"]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n ").is_empty());
    }

    #[test]
    fn collapses_whitespace_runs() {
        let n = normalize("  hola   que\ttal ");
        assert_eq!(n.tokens, vec!["hola", "que", "tal"]);
    }

    #[test]
    fn fold_keeps_enye_base_letter() {
        // ñ decompõe em n + til combinante
        assert_eq!(fold("Año"), "ano");
    }
}
