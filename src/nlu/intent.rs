//! # Classificador de Intenção (Tópico) do Usuário
//!
//! O [`IntentClassifier`] decide **sobre qual tópico** do catálogo o
//! usuário está perguntando. Não há embeddings: a pontuação é feita por
//! keywords com igualdade difusa.
//!
//! ## Pontuação
//!
//! ```text
//! para cada tópico não interno:
//!   para cada keyword:
//!     +2 por token similar à keyword (substring ou distância ≤ 2)
//!     +1 se o texto normalizado inteiro contém a keyword
//! vence a maior pontuação (estritamente); empate fica com o primeiro
//! tópico do catálogo; pontuação 0 → nenhum tópico
//! ```
//!
//! ## Detector de Erros de Digitação
//!
//! Quando a classificação falha, [`suggest_typo()`](IntentClassifier::suggest_typo)
//! procura a keyword mais próxima de algum token, aceitando só distâncias
//! 1 ou 2. É mais estrito que o classificador: serve para "promsion" →
//! `promociones`, não para associações soltas. Tokens que são exatamente
//! "si"/"no" (e variantes) são ignorados para não disparar sugestões.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::normalizer::Normalized;
use super::similarity::{edit_distance, is_similar, DEFAULT_THRESHOLD};
use crate::core::KnowledgeBase;

/// Limiares de casamento.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Limiar de [`is_similar`] entre token e keyword.
    pub keyword_threshold: usize,
    /// Limiar de [`is_similar`] para frases afirmativas/negativas.
    pub phrase_threshold: usize,
    /// Maior distância aceita pelo detector de typos (mínimo é 1).
    pub typo_max_distance: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            keyword_threshold: DEFAULT_THRESHOLD,
            phrase_threshold: 1,
            typo_max_distance: 2,
        }
    }
}

/// Tópico vencedor e sua pontuação.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicMatch {
    pub topic_id: String,
    pub score: u32,
}

/// Classificador de tópico por keywords.
pub struct IntentClassifier {
    kb: Arc<KnowledgeBase>,
    config: MatchingConfig,
}

impl IntentClassifier {
    pub fn new(kb: Arc<KnowledgeBase>, config: MatchingConfig) -> Self {
        Self { kb, config }
    }

    /// Pontua um tópico contra a entrada.
    pub fn score(&self, keywords: &[String], input: &Normalized) -> u32 {
        let mut score = 0;
        for keyword in keywords {
            for token in &input.tokens {
                if is_similar(token, keyword, self.config.keyword_threshold) {
                    score += 2;
                }
            }
            if input.text.contains(keyword.as_str()) {
                score += 1;
            }
        }
        score
    }

    /// Classifica a entrada em um tópico do catálogo.
    ///
    /// # Retorno
    ///
    /// `None` se nenhum tópico pontuou, inclusive para entrada vazia.
    pub fn classify(&self, input: &Normalized) -> Option<TopicMatch> {
        let mut best: Option<TopicMatch> = None;

        for topic in self.kb.classifiable_topics() {
            let score = self.score(&topic.keywords, input);
            // estritamente maior: empates mantêm o primeiro do catálogo
            if score > best.as_ref().map_or(0, |m| m.score) {
                best = Some(TopicMatch {
                    topic_id: topic.id.clone(),
                    score,
                });
            }
        }

        tracing::debug!(input = %input.text, result = ?best, "classificação de tópico");
        best
    }

    /// Sugere um tópico para uma provável palavra mal escrita.
    ///
    /// Aceita apenas a menor distância entre `1` e `typo_max_distance`;
    /// distância 0 (keyword exata) não é um erro de digitação.
    pub fn suggest_typo(&self, input: &Normalized) -> Option<String> {
        let words: Vec<&str> = input
            .tokens
            .iter()
            .map(String::as_str)
            .filter(|token| !self.kb.phrases.is_yes_no_word(token))
            .collect();

        if words.is_empty() {
            return None;
        }

        let mut best: Option<&str> = None;
        let mut min_distance = self.config.typo_max_distance.saturating_add(1);

        for topic in self.kb.topics() {
            for keyword in &topic.keywords {
                for word in &words {
                    let distance = edit_distance(word, keyword);
                    if distance > 0 && distance < min_distance {
                        min_distance = distance;
                        best = Some(topic.id.as_str());
                    }
                }
            }
        }

        tracing::debug!(input = %input.text, suggestion = ?best, distance = min_distance, "detecção de typo");
        best.map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::normalizer::normalize;
    use crate::persistence::default_knowledge_base;

    fn classifier(config: MatchingConfig) -> IntentClassifier {
        IntentClassifier::new(Arc::new(default_knowledge_base().unwrap()), config)
    }

    #[test]
    fn exact_keyword_selects_topic() {
        let c = classifier(MatchingConfig::default());
        let m = c.classify(&normalize("cual es su horario")).unwrap();
        assert_eq!(m.topic_id, "horarios");
        assert!(m.score >= 1);
    }

    #[test]
    fn accents_do_not_matter() {
        let c = classifier(MatchingConfig::default());
        let m = c.classify(&normalize("¿Cuánto tarda el ENVÍO?")).unwrap();
        assert_eq!(m.topic_id, "envios");
    }

    #[test]
    fn empty_input_is_a_miss() {
        let c = classifier(MatchingConfig::default());
        assert_eq!(c.classify(&normalize("")), None);
        assert_eq!(c.suggest_typo(&normalize("")), None);
    }

    #[test]
    fn sub_menu_topics_are_never_classified() {
        let c = classifier(MatchingConfig::default());
        let m = c.classify(&normalize("promocion")).unwrap();
        assert_eq!(m.topic_id, "promociones");
    }

    #[test]
    fn typo_suggests_promotions() {
        let c = classifier(MatchingConfig::default());
        assert_eq!(
            c.suggest_typo(&normalize("promsion")).as_deref(),
            Some("promociones")
        );
    }

    #[test]
    fn typo_ignores_bare_yes_no() {
        let c = classifier(MatchingConfig::default());
        assert_eq!(c.suggest_typo(&normalize("si")), None);
        assert_eq!(c.suggest_typo(&normalize("no")), None);
    }

    #[test]
    fn typo_rejects_far_words() {
        let c = classifier(MatchingConfig::default());
        assert_eq!(c.suggest_typo(&normalize("zzzzzzzzzz")), None);
    }

    /// Distância 2 ainda é typo; distância 3 já não é.
    #[test]
    fn typo_distance_boundary() {
        let c = classifier(MatchingConfig {
            keyword_threshold: 1,
            ..MatchingConfig::default()
        });
        assert_eq!(c.classify(&normalize("pagxx")), None);
        assert_eq!(c.suggest_typo(&normalize("pagxx")).as_deref(), Some("pagos"));
        assert_eq!(c.suggest_typo(&normalize("hxrxxio")), None);
    }

    #[test]
    fn huge_typo_limit_does_not_overflow() {
        let c = classifier(MatchingConfig {
            typo_max_distance: usize::MAX,
            ..MatchingConfig::default()
        });
        assert!(c.suggest_typo(&normalize("zzzzzzzzzz")).is_some());
    }

    #[test]
    fn tighter_keyword_threshold_misses_near_miss() {
        let c = classifier(MatchingConfig {
            keyword_threshold: 1,
            ..MatchingConfig::default()
        });
        assert_eq!(c.classify(&normalize("promsion")), None);
        assert_eq!(
            c.suggest_typo(&normalize("promsion")).as_deref(),
            Some("promociones")
        );
    }
}
