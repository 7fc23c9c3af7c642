//! # KnowledgeBase: Catálogo Estático de Tópicos
//!
//! A [`KnowledgeBase`] reúne tudo o que o bot "sabe": os tópicos em ordem
//! de catálogo, o menu principal, as listas de frases especiais e as
//! respostas prontas. É carregada **uma vez** na inicialização e fica
//! somente-leitura depois disso (compartilhada via `Arc`).
//!
//! ## Armazenamento
//!
//! - **Tópicos**: `Vec<Topic>`: a ordem importa, empates na classificação
//!   ficam com o primeiro tópico do catálogo
//! - **Índice**: `HashMap<String, usize>`: busca O(1) por id
//!
//! O índice **não é serializado** (`#[serde(skip)]`) e é reconstruído
//! por [`rebuild_index()`](KnowledgeBase::rebuild_index) após a leitura do JSON,
//! junto com a normalização de keywords e frases.
//!
//! ## Validação
//!
//! [`KnowledgeBase::from_json`] só devolve catálogos consistentes: todo
//! botão aponta para um tópico existente (ou para [`MAIN_MENU`]) e toda
//! lista de variantes tem ao menos um elemento.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::topic::{QuickReply, Topic, MAIN_MENU};
use crate::dialogue::clock::DayPeriod;
use crate::error::KnowledgeBaseError;
use crate::nlu::normalizer::fold;

/// Listas de frases especiais, comparadas contra o texto normalizado.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PhraseLists {
    pub greeting: Vec<String>,
    pub farewell: Vec<String>,
    pub thanks: Vec<String>,
    pub frustration: Vec<String>,
    pub affirmative: Vec<String>,
    pub negative: Vec<String>,
}

impl PhraseLists {
    /// `true` se `token` é exatamente uma frase afirmativa ou negativa.
    ///
    /// Usado pelo detector de erros de digitação para ignorar "si"/"no".
    pub fn is_yes_no_word(&self, token: &str) -> bool {
        self.affirmative
            .iter()
            .chain(self.negative.iter())
            .any(|word| word == token)
    }
}

/// Saudações por período do dia (`{salutation}` nas respostas).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Salutations {
    pub morning: String,
    pub afternoon: String,
    pub night: String,
}

/// Respostas prontas, cada uma com variantes sorteadas.
///
/// Placeholders aceitos: `{salutation}`, `{bot}`, `{topic}`, `{input}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CannedReplies {
    /// Primeira mensagem da sessão.
    pub welcome: Vec<String>,
    pub greeting: Vec<String>,
    pub farewell: Vec<String>,
    pub thanks: Vec<String>,
    /// Encaminhamento para atendimento humano.
    pub escalation: Vec<String>,
    /// Usuário recusou o "¿quisiste decir …?".
    pub clarification_declined: Vec<String>,
    pub more_help_accepted: Vec<String>,
    pub more_help_declined: Vec<String>,
    /// "Sim" depois de ver os dados de contato.
    pub contact_follow_up: Vec<String>,
    /// Nem sim, nem não, nem tópico reconhecido após "¿algo más?".
    pub more_help_unclear: Vec<String>,
    pub not_understood: Vec<String>,
    pub did_you_mean: Vec<String>,
    /// Pergunta sem resposta dentro de um tópico aberto.
    pub open_ended_follow_up: Vec<String>,
    /// Resposta fixa do botão "⬅️ Volver".
    pub back_to_menu: Vec<String>,
    pub feedback_like: Vec<String>,
    pub feedback_dislike: Vec<String>,
}

impl CannedReplies {
    fn lists(&self) -> [(&'static str, &Vec<String>); 16] {
        [
            ("welcome", &self.welcome),
            ("greeting", &self.greeting),
            ("farewell", &self.farewell),
            ("thanks", &self.thanks),
            ("escalation", &self.escalation),
            ("clarification_declined", &self.clarification_declined),
            ("more_help_accepted", &self.more_help_accepted),
            ("more_help_declined", &self.more_help_declined),
            ("contact_follow_up", &self.contact_follow_up),
            ("more_help_unclear", &self.more_help_unclear),
            ("not_understood", &self.not_understood),
            ("did_you_mean", &self.did_you_mean),
            ("open_ended_follow_up", &self.open_ended_follow_up),
            ("back_to_menu", &self.back_to_menu),
            ("feedback_like", &self.feedback_like),
            ("feedback_dislike", &self.feedback_dislike),
        ]
    }
}

/// Catálogo de conhecimento imutável.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Nome do bot (`{bot}` nas respostas).
    pub bot_name: String,

    /// Tópicos em ordem de catálogo.
    topics: Vec<Topic>,

    /// Menu principal de respostas rápidas.
    pub main_menu: Vec<QuickReply>,

    pub phrases: PhraseLists,

    pub replies: CannedReplies,

    pub salutations: Salutations,

    /// Tópico de contato humano (destino da escalação).
    pub contact_topic: String,

    /// Tópico de promoções: ao ser respondido marca o sub-tópico de detalhe.
    pub promotions_topic: String,

    /// Tópicos após os quais perguntas não reconhecidas são tratadas como
    /// continuação do assunto.
    #[serde(default)]
    pub open_ended_topics: Vec<String>,

    /// Índice id → posição em `topics`.
    ///
    /// **Não serializado**: reconstruído por `rebuild_index()`.
    #[serde(skip, default)]
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Lê, normaliza e valida um catálogo em JSON.
    ///
    /// # Erros
    ///
    /// - [`KnowledgeBaseError::Parse`] se o JSON não casar com o formato
    /// - qualquer violação de invariante detectada por [`validate()`](Self::validate)
    pub fn from_json(json: &str) -> Result<Self, KnowledgeBaseError> {
        let mut kb: KnowledgeBase = serde_json::from_str(json)?;
        kb.rebuild_index()?;
        kb.validate()?;
        Ok(kb)
    }

    /// Reconstrói o índice e normaliza keywords e frases.
    ///
    /// Deve ser chamado após desserialização. Falha se dois tópicos
    /// compartilham o mesmo id.
    pub fn rebuild_index(&mut self) -> Result<(), KnowledgeBaseError> {
        self.index.clear();
        for (pos, topic) in self.topics.iter_mut().enumerate() {
            if self.index.insert(topic.id.clone(), pos).is_some() {
                return Err(KnowledgeBaseError::DuplicateTopic(topic.id.clone()));
            }
            for keyword in topic.keywords.iter_mut() {
                *keyword = fold(keyword.trim());
            }
            // keyword vazia casaria com qualquer token
            topic.keywords.retain(|keyword| !keyword.is_empty());
        }

        let phrases = &mut self.phrases;
        for list in [
            &mut phrases.greeting,
            &mut phrases.farewell,
            &mut phrases.thanks,
            &mut phrases.frustration,
            &mut phrases.affirmative,
            &mut phrases.negative,
        ] {
            for phrase in list.iter_mut() {
                *phrase = fold(phrase.trim());
            }
            list.retain(|phrase| !phrase.is_empty());
        }
        Ok(())
    }

    /// Verifica as invariantes do catálogo.
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        for topic in &self.topics {
            let template = &topic.template;
            for (field, list) in [
                ("intro", &template.intro),
                ("emoji", &template.emoji),
                ("closing", &template.closing),
            ] {
                if list.is_empty() {
                    return Err(KnowledgeBaseError::EmptyVariants {
                        origin: topic.id.clone(),
                        field,
                    });
                }
            }

            if topic.internal {
                let parent = topic
                    .parent
                    .as_deref()
                    .ok_or_else(|| KnowledgeBaseError::MissingParent(topic.id.clone()))?;
                self.require_topic(&topic.id, parent)?;
            } else if topic.clarification.is_empty() {
                return Err(KnowledgeBaseError::EmptyVariants {
                    origin: topic.id.clone(),
                    field: "clarification",
                });
            }

            for reply in &topic.follow_ups {
                self.require_button(&topic.id, reply)?;
            }
        }

        for reply in &self.main_menu {
            self.require_button("main_menu", reply)?;
        }
        self.require_topic("contact_topic", &self.contact_topic)?;
        self.require_topic("promotions_topic", &self.promotions_topic)?;
        for id in &self.open_ended_topics {
            self.require_topic("open_ended_topics", id)?;
        }

        for (field, list) in self.replies.lists() {
            if list.is_empty() {
                return Err(KnowledgeBaseError::EmptyVariants {
                    origin: "replies".to_string(),
                    field,
                });
            }
        }
        Ok(())
    }

    fn require_topic(&self, origin: &str, target: &str) -> Result<(), KnowledgeBaseError> {
        if self.index.contains_key(target) {
            Ok(())
        } else {
            Err(KnowledgeBaseError::DanglingReference {
                origin: origin.to_string(),
                target: target.to_string(),
            })
        }
    }

    fn require_button(&self, origin: &str, reply: &QuickReply) -> Result<(), KnowledgeBaseError> {
        if reply.is_main_menu() {
            return Ok(());
        }
        self.require_topic(origin, &reply.topic_id)
    }

    /// Busca um tópico pelo id.
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.index.get(id).map(|&pos| &self.topics[pos])
    }

    /// Todos os tópicos, em ordem de catálogo.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Tópicos elegíveis para classificação de texto livre (não internos).
    pub fn classifiable_topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter().filter(|topic| !topic.internal)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn is_internal(&self, id: &str) -> bool {
        self.topic(id).is_some_and(|topic| topic.internal)
    }

    pub fn is_open_ended(&self, id: &str) -> bool {
        self.open_ended_topics.iter().any(|open| open == id)
    }

    /// Texto de saudação para o período do dia.
    pub fn salutation(&self, period: DayPeriod) -> &str {
        match period {
            DayPeriod::Morning => &self.salutations.morning,
            DayPeriod::Afternoon => &self.salutations.afternoon,
            DayPeriod::Night => &self.salutations.night,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::DEFAULT_KNOWLEDGE_BASE;

    fn default_value() -> serde_json::Value {
        serde_json::from_str(DEFAULT_KNOWLEDGE_BASE).unwrap()
    }

    #[test]
    fn embedded_catalog_is_valid() {
        let kb = KnowledgeBase::from_json(DEFAULT_KNOWLEDGE_BASE).unwrap();
        assert!(kb.topic("horarios").is_some());
        assert!(kb.topic("promo_detalle_20").unwrap().internal);
        assert!(kb.is_open_ended("productos"));
        assert_eq!(kb.topics()[0].id, "promociones");
    }

    #[test]
    fn classifiable_topics_skip_sub_menus() {
        let kb = KnowledgeBase::from_json(DEFAULT_KNOWLEDGE_BASE).unwrap();
        assert!(kb.classifiable_topics().all(|t| !t.id.starts_with("promo_detalle_")));
        assert!(kb.classifiable_topics().count() < kb.topic_count());
    }

    #[test]
    fn phrases_are_folded_on_load() {
        let kb = KnowledgeBase::from_json(DEFAULT_KNOWLEDGE_BASE).unwrap();
        assert!(kb.phrases.affirmative.iter().all(|p| p == &fold(p)));
        assert!(kb.phrases.is_yes_no_word("si"));
        assert!(kb.phrases.is_yes_no_word("nel"));
        assert!(!kb.phrases.is_yes_no_word("promo"));
    }

    #[test]
    fn rejects_dangling_follow_up() {
        let mut value = default_value();
        value["topics"][0]["follow_ups"][0]["topic_id"] = "no_existe".into();
        let err = KnowledgeBase::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeBaseError::DanglingReference { ref target, .. } if target == "no_existe"
        ));
    }

    #[test]
    fn rejects_dangling_main_menu_entry() {
        let mut value = default_value();
        value["main_menu"][0]["topic_id"] = "fantasma".into();
        assert!(matches!(
            KnowledgeBase::from_json(&value.to_string()),
            Err(KnowledgeBaseError::DanglingReference { .. })
        ));
    }

    #[test]
    fn rejects_empty_variant_list() {
        let mut value = default_value();
        value["topics"][0]["template"]["emoji"] = serde_json::json!([]);
        assert!(matches!(
            KnowledgeBase::from_json(&value.to_string()),
            Err(KnowledgeBaseError::EmptyVariants { field: "emoji", .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut value = default_value();
        let first = value["topics"][0].clone();
        value["topics"].as_array_mut().unwrap().push(first);
        assert!(matches!(
            KnowledgeBase::from_json(&value.to_string()),
            Err(KnowledgeBaseError::DuplicateTopic(_))
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            KnowledgeBase::from_json("{ not json"),
            Err(KnowledgeBaseError::Parse(_))
        ));
    }
}
