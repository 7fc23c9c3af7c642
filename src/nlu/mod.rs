//! # Pipeline NLU: Entendimento da Mensagem
//!
//! Este módulo transforma texto livre em sinais que a máquina de estados
//! consome. Não há modelo de linguagem: tudo é normalização, keywords e
//! distância de edição.
//!
//! ## Fluxo de Processamento
//!
//! ```text
//! Mensagem do usuário
//!   ├── 1. Normalizar (lowercase, sem acentos, tokens)
//!   ├── 2. Detectores de frases (saudação, despedida, obrigado,
//!   │      frustração, sim, não)
//!   ├── 3. Classificar tópico (keywords + similaridade)
//!   └── 4. Se não classificou: sugerir tópico por erro de digitação
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`normalizer`] | Minúsculas, remoção de diacríticos, tokenização |
//! | [`similarity`] | Distância de edição e igualdade difusa |
//! | [`intent`] | Pontuação de tópicos e detecção de typos |
//! | [`phrases`] | Detectores de frases especiais |

/// Sub-módulo de normalização de texto.
pub mod normalizer;

/// Sub-módulo de distância de edição e similaridade.
pub mod similarity;

/// Sub-módulo do classificador de tópicos.
pub mod intent;

/// Sub-módulo dos detectores de frases especiais.
pub mod phrases;

use std::sync::Arc;

use serde::Serialize;

use crate::core::KnowledgeBase;
use intent::{IntentClassifier, MatchingConfig, TopicMatch};
use normalizer::{normalize, Normalized};
use phrases::{PhraseDetector, PhraseSignals};

/// Resultado completo do NLU para uma mensagem.
#[derive(Clone, Debug, Serialize)]
pub struct NluResult {
    /// Texto normalizado e tokens.
    #[serde(skip)]
    pub normalized: Normalized,
    /// Saída dos detectores de frases especiais.
    pub signals: PhraseSignals,
    /// Tópico classificado, se algum pontuou.
    pub topic: Option<TopicMatch>,
    /// Tópico sugerido por erro de digitação (só calculado se `topic` é `None`).
    pub typo: Option<String>,
}

/// Pipeline NLU: detectores de frases + classificador de tópicos.
///
/// Imutável após a criação; pode ser compartilhada entre sessões.
pub struct NluPipeline {
    classifier: IntentClassifier,
    detector: PhraseDetector,
}

impl NluPipeline {
    pub fn new(kb: Arc<KnowledgeBase>, config: MatchingConfig) -> Self {
        Self {
            classifier: IntentClassifier::new(kb.clone(), config),
            detector: PhraseDetector::new(kb, config.phrase_threshold),
        }
    }

    /// Processa uma mensagem. Nunca falha: entrada vazia só não casa com nada.
    pub fn process(&self, text: &str) -> NluResult {
        let normalized = normalize(text);
        let signals = self.detector.detect(&normalized);
        let topic = self.classifier.classify(&normalized);
        let typo = match topic {
            Some(_) => None,
            None => self.classifier.suggest_typo(&normalized),
        };

        NluResult {
            normalized,
            signals,
            topic,
            typo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::default_knowledge_base;

    fn pipeline() -> NluPipeline {
        NluPipeline::new(
            Arc::new(default_knowledge_base().unwrap()),
            MatchingConfig::default(),
        )
    }

    #[test]
    fn classified_message_skips_typo_detection() {
        let result = pipeline().process("Aceptan tarjeta de credito?");
        assert_eq!(result.topic.unwrap().topic_id, "pagos");
        assert_eq!(result.typo, None);
    }

    #[test]
    fn farewell_signal() {
        let result = pipeline().process("Adiós!");
        assert!(result.signals.farewell);
        assert!(!result.signals.greeting);
    }

    #[test]
    fn empty_message() {
        let result = pipeline().process("   ");
        assert!(result.normalized.is_empty());
        assert_eq!(result.topic, None);
        assert_eq!(result.typo, None);
    }
}
