//! # Tópicos: Os Assuntos que o Bot Sabe Responder
//!
//! Um [`Topic`] é uma entrada imutável do catálogo: keywords que o
//! disparam, o template da resposta, as frases de clarificação usadas
//! como prefixo e os botões de resposta rápida oferecidos em seguida.
//!
//! ## Anatomia de uma Resposta
//!
//! ```text
//! {start}, {middle} {end}...            ← ClarificationPhrasing
//!
//! {intro} {emoji}                       ┐
//!                                       │
//! {content}                             ├ ResponseTemplate
//!                                       │
//! {closing}                             ┘
//! ```

use serde::{Deserialize, Serialize};

/// Id reservado do botão "⬅️ Volver": não é um tópico, significa
/// "voltar ao menu principal".
pub const MAIN_MENU: &str = "main_menu";

/// Botão de resposta rápida: um par (rótulo, tópico alvo).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    /// Texto exibido no botão.
    pub label: String,
    /// Tópico selecionado ao clicar (ou [`MAIN_MENU`]).
    pub topic_id: String,
}

impl QuickReply {
    /// `true` se o botão é o sentinela de volta ao menu.
    pub fn is_main_menu(&self) -> bool {
        self.topic_id == MAIN_MENU
    }
}

/// Template de resposta com variantes sorteadas a cada uso.
///
/// `content` é fixo; `intro`, `emoji` e `closing` têm uma variante
/// escolhida de forma independente e uniforme.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseTemplate {
    pub intro: Vec<String>,
    pub emoji: Vec<String>,
    pub content: String,
    pub closing: Vec<String>,
}

/// Frases de clarificação: `"{start}, {middle} {end}..."`.
///
/// Sub-tópicos internos não usam clarificação e podem omitir o bloco.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClarificationPhrasing {
    #[serde(default)]
    pub start: Vec<String>,
    #[serde(default)]
    pub middle: Vec<String>,
    #[serde(default)]
    pub end: Vec<String>,
}

impl ClarificationPhrasing {
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() || self.middle.is_empty() || self.end.is_empty()
    }
}

/// Entrada do catálogo de conhecimento.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Topic {
    /// Chave única (ex: `"horarios"`).
    pub id: String,

    /// Palavras/frases gatilho. Normalizadas (minúsculas, sem acentos)
    /// na carga do catálogo.
    #[serde(default)]
    pub keywords: Vec<String>,

    pub template: ResponseTemplate,

    #[serde(default)]
    pub clarification: ClarificationPhrasing,

    /// Botões oferecidos após a resposta. Vazio significa que o bot
    /// pergunta "¿algo más?" e espera um sim/não.
    #[serde(default)]
    pub follow_ups: Vec<QuickReply>,

    /// Sub-tópico de navegação, alcançável só por botão.
    ///
    /// Fica fora da classificação de texto livre e responde sem
    /// prefixo de clarificação.
    #[serde(default)]
    pub internal: bool,

    /// Tópico que vira `last_topic` quando este sub-tópico é escolhido.
    #[serde(default)]
    pub parent: Option<String>,
}

impl Topic {
    /// Rótulo legível usado no "¿quisiste decir …?" (`_` vira espaço).
    pub fn display_label(&self) -> String {
        self.id.replace('_', " ")
    }

    /// Primeiro sub-tópico interno oferecido nos botões, se houver.
    ///
    /// Para `promociones` é `promo_detalle_20`; usado apenas como
    /// marcação informativa do estado de detalhe.
    pub fn first_sub_topic<'a>(&'a self, is_internal: impl Fn(&str) -> bool) -> Option<&'a str> {
        self.follow_ups
            .iter()
            .map(|reply| reply.topic_id.as_str())
            .find(|id| is_internal(id))
    }
}
