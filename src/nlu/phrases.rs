//! # Detectores de Frases Especiais
//!
//! Predicados booleanos independentes sobre o texto normalizado. Eles têm
//! precedência sobre a classificação de tópicos na máquina de estados.
//!
//! | Detector | Estratégia | Exemplo |
//! |----------|------------|---------|
//! | saudação | substring | "hola", "buenas tardes" |
//! | despedida | substring | "adios", "hasta luego" |
//! | agradecimento | substring | "gracias", "thx" |
//! | frustração | substring | "no entiendes", "otra vez" |
//! | afirmativo | token similar (limiar 1) | "si", "dale", "okey" |
//! | negativo | token similar (limiar 1) | "no", "nel", "nop" |

use std::sync::Arc;

use serde::Serialize;

use super::normalizer::Normalized;
use super::similarity::is_similar;
use crate::core::KnowledgeBase;

/// Resultado de todos os detectores para uma mensagem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PhraseSignals {
    pub greeting: bool,
    pub farewell: bool,
    pub thanks: bool,
    pub frustration: bool,
    pub affirmative: bool,
    pub negative: bool,
}

/// Detector de frases especiais a partir das listas do catálogo.
pub struct PhraseDetector {
    kb: Arc<KnowledgeBase>,
    /// Limiar de distância para afirmativo/negativo.
    threshold: usize,
}

impl PhraseDetector {
    pub fn new(kb: Arc<KnowledgeBase>, threshold: usize) -> Self {
        Self { kb, threshold }
    }

    /// Roda todos os detectores.
    pub fn detect(&self, input: &Normalized) -> PhraseSignals {
        PhraseSignals {
            greeting: self.is_greeting(input),
            farewell: self.is_farewell(input),
            thanks: self.is_thanks(input),
            frustration: self.is_frustrated(input),
            affirmative: self.is_affirmative(input),
            negative: self.is_negative(input),
        }
    }

    pub fn is_greeting(&self, input: &Normalized) -> bool {
        contains_any(&input.text, &self.kb.phrases.greeting)
    }

    pub fn is_farewell(&self, input: &Normalized) -> bool {
        contains_any(&input.text, &self.kb.phrases.farewell)
    }

    pub fn is_thanks(&self, input: &Normalized) -> bool {
        contains_any(&input.text, &self.kb.phrases.thanks)
    }

    pub fn is_frustrated(&self, input: &Normalized) -> bool {
        contains_any(&input.text, &self.kb.phrases.frustration)
    }

    pub fn is_affirmative(&self, input: &Normalized) -> bool {
        self.any_token_similar(input, &self.kb.phrases.affirmative)
    }

    pub fn is_negative(&self, input: &Normalized) -> bool {
        self.any_token_similar(input, &self.kb.phrases.negative)
    }

    fn any_token_similar(&self, input: &Normalized, words: &[String]) -> bool {
        words.iter().any(|word| {
            input
                .tokens
                .iter()
                .any(|token| is_similar(token, word, self.threshold))
        })
    }
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase.as_str()))
}
