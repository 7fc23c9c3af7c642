//! # Motor de Diálogo: A Máquina de Estados da Conversa
//!
//! O [`DialogueEngine`] é o **coração do sistema**: recebe a mensagem do
//! usuário e o contexto da sessão e devolve a resposta, os botões e o
//! próximo contexto. É uma função pura de `(entrada, contexto)`; não
//! guarda estado mutável entre chamadas.
//!
//! ## Precedência das Regras (a primeira que casar vence)
//!
//! ```text
//! 1. Despedida             → despede, limpa last_topic, Idle
//! 2. Agradecimento         → "de nada", estado inalterado
//! 3. Saudação (só em Idle) → saúda + menu principal
//! 4. frustração >= 2       → escala para atendimento humano, zera contador
//! 5. AwaitingClarification → "sim" confirma o candidato; resto recusa
//! 6. AwaitingMoreHelp      → sim / não / nova consulta
//! 7. Idle                  → tópico | typo | continuação de tópico aberto
//!                            | "não entendi" (+1 frustração)
//! ```
//!
//! ## Pedido de Feedback
//!
//! Uma resposta que pede feedback e **não** tem botões coloca a sessão em
//! `AwaitingMoreHelp` (o "¿algo más?" vira uma pergunta sim/não). Com
//! botões, a sessão volta para `Idle`: nunca duas perguntas sim/não seguidas.
//!
//! ## Transação por Turno
//!
//! Cada regra produz um [`Outcome`] com tudo o que muda. Só no final o
//! `Outcome` vira o novo [`SessionContext`], de uma vez, dentro do
//! [`TurnResult`]. O contexto de entrada nunca é alterado.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::composer::{ResponseComposer, VariantSource};
use crate::core::{ConversationState, KnowledgeBase, QuickReply, SessionContext, Topic, MAIN_MENU};
use crate::error::EngineError;
use crate::nlu::intent::MatchingConfig;
use crate::nlu::{NluPipeline, NluResult};

/// Frustração acumulada a partir da qual o bot escala para um humano.
pub const ESCALATION_THRESHOLD: u32 = 2;

/// Saída de um turno.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Texto da resposta, pronto para exibição.
    pub response_text: String,
    /// A apresentação deve oferecer 👍 / 👎.
    pub request_feedback: bool,
    /// Botões de resposta rápida, em ordem (pode ser vazio).
    pub quick_replies: Vec<QuickReply>,
    /// Contexto a ser gravado para o próximo turno.
    pub next_context: SessionContext,
}

/// Avaliação do usuário sobre a última resposta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Like,
    Dislike,
}

/// Tudo o que um turno decidiu, antes de virar contexto.
struct Outcome {
    /// Regra que produziu a resposta (para logs).
    rule: &'static str,
    text: String,
    request_feedback: bool,
    quick_replies: Vec<QuickReply>,
    last_topic: Option<String>,
    detail: Option<String>,
    /// Estado forçado; `None` aplica a regra do pedido de feedback.
    state: Option<ConversationState>,
    clarification_candidate: Option<String>,
}

impl Outcome {
    /// Resposta sem tópico: limpa `last_topic` e o detalhe.
    fn plain(rule: &'static str, text: String, quick_replies: Vec<QuickReply>) -> Self {
        Self {
            rule,
            text,
            request_feedback: false,
            quick_replies,
            last_topic: None,
            detail: None,
            state: None,
            clarification_candidate: None,
        }
    }

    /// Resposta que preserva o contexto inteiro (exceto o contador).
    fn unchanged(rule: &'static str, text: String, ctx: &SessionContext) -> Self {
        Self {
            rule,
            text,
            request_feedback: false,
            quick_replies: Vec::new(),
            last_topic: ctx.last_topic.clone(),
            detail: ctx.detail.clone(),
            state: Some(ctx.state),
            clarification_candidate: ctx.clarification_candidate.clone(),
        }
    }

    fn commit(self, frustration_count: u32) -> TurnResult {
        let state = self.state.unwrap_or(if self.request_feedback && self.quick_replies.is_empty() {
            ConversationState::AwaitingMoreHelp
        } else {
            ConversationState::Idle
        });
        // o candidato só sobrevive enquanto a sessão espera a confirmação
        let clarification_candidate = match state {
            ConversationState::AwaitingClarification => self.clarification_candidate,
            _ => None,
        };

        tracing::debug!(
            rule = self.rule,
            state = ?state,
            last_topic = ?self.last_topic,
            frustration_count,
            "turno concluído"
        );

        TurnResult {
            response_text: self.text,
            request_feedback: self.request_feedback,
            quick_replies: self.quick_replies,
            next_context: SessionContext {
                state,
                last_topic: self.last_topic,
                frustration_count,
                clarification_candidate,
                detail: self.detail,
            },
        }
    }
}

/// Motor de diálogo: NLU + regras de estado + compositor.
///
/// Imutável e compartilhável entre sessões; o estado de cada conversa
/// vive no [`SessionContext`] do chamador.
pub struct DialogueEngine {
    kb: Arc<KnowledgeBase>,
    nlu: NluPipeline,
    composer: ResponseComposer,
    clock: Arc<dyn Clock>,
}

impl DialogueEngine {
    pub fn new(kb: Arc<KnowledgeBase>, config: MatchingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            nlu: NluPipeline::new(kb.clone(), config),
            kb,
            composer: ResponseComposer::new(),
            clock,
        }
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    /// Mensagem de boas-vindas e contexto inicial de uma sessão nova.
    pub fn start_session(&self, source: &mut dyn VariantSource) -> TurnResult {
        let salutation = self.kb.salutation(self.clock.day_period());
        let text = self.composer.reply(
            &self.kb.replies.welcome,
            &[("salutation", salutation), ("bot", self.kb.bot_name.as_str())],
            source,
        );
        Outcome::plain("welcome", text, self.main_menu()).commit(0)
    }

    /// Turno de texto livre (regras 1–7).
    pub fn process_text_turn(
        &self,
        input: &str,
        ctx: &SessionContext,
        source: &mut dyn VariantSource,
    ) -> TurnResult {
        let nlu = self.nlu.process(input);
        let signals = nlu.signals;

        let mut frustration = ctx.frustration_count;
        if signals.frustration {
            frustration = frustration.saturating_add(1);
        }

        let outcome = if signals.farewell {
            let text = self.composer.reply(&self.kb.replies.farewell, &[], source);
            Outcome::plain("farewell", text, Vec::new())
        } else if signals.thanks {
            let text = self.composer.reply(&self.kb.replies.thanks, &[], source);
            Outcome::unchanged("thanks", text, ctx)
        } else if signals.greeting && ctx.state == ConversationState::Idle {
            let salutation = self.kb.salutation(self.clock.day_period());
            let text = self.composer.reply(
                &self.kb.replies.greeting,
                &[("salutation", salutation), ("bot", self.kb.bot_name.as_str())],
                source,
            );
            Outcome::plain("greeting", text, self.main_menu())
        } else if frustration >= ESCALATION_THRESHOLD {
            tracing::info!(frustration, "escalando para atendimento humano");
            frustration = 0;
            let text = self.composer.reply(&self.kb.replies.escalation, &[], source);
            Outcome {
                last_topic: Some(self.kb.contact_topic.clone()),
                ..Outcome::plain("escalation", text, Vec::new())
            }
        } else {
            match ctx.state {
                ConversationState::AwaitingClarification => {
                    self.resolve_clarification(&nlu, ctx, source)
                }
                ConversationState::AwaitingMoreHelp => self.resolve_more_help(&nlu, ctx, source),
                ConversationState::Idle => {
                    self.resolve_query(&nlu, input, ctx, &mut frustration, source)
                }
            }
        };

        outcome.commit(frustration)
    }

    /// Turno de botão de resposta rápida.
    ///
    /// # Erros
    ///
    /// [`EngineError::UnknownTopic`] se `topic_id` não é [`MAIN_MENU`] nem
    /// um tópico do catálogo.
    pub fn process_menu_selection(
        &self,
        topic_id: &str,
        ctx: &SessionContext,
        source: &mut dyn VariantSource,
    ) -> Result<TurnResult, EngineError> {
        if topic_id == MAIN_MENU {
            let text = self.composer.reply(&self.kb.replies.back_to_menu, &[], source);
            return Ok(Outcome::plain("back_to_menu", text, self.main_menu())
                .commit(ctx.frustration_count));
        }

        let topic = self.kb.topic(topic_id).ok_or_else(|| {
            tracing::error!(topic_id, "botão referencia tópico fora do catálogo");
            EngineError::UnknownTopic(topic_id.to_string())
        })?;

        Ok(self.answer_topic("menu_selection", topic, source).commit(ctx.frustration_count))
    }

    /// Resposta aos botões 👍 / 👎: agradece e volta ao menu principal.
    pub fn process_feedback(
        &self,
        feedback: Feedback,
        ctx: &SessionContext,
        source: &mut dyn VariantSource,
    ) -> TurnResult {
        let variants = match feedback {
            Feedback::Like => &self.kb.replies.feedback_like,
            Feedback::Dislike => &self.kb.replies.feedback_dislike,
        };
        let text = self.composer.reply(variants, &[], source);
        Outcome::plain("feedback", text, self.main_menu()).commit(ctx.frustration_count)
    }

    // ─── Regras 5–7 ──────────────────────────────────────────────

    /// Regra 5: resposta ao "¿quisiste decir …?".
    fn resolve_clarification(
        &self,
        nlu: &NluResult,
        ctx: &SessionContext,
        source: &mut dyn VariantSource,
    ) -> Outcome {
        let candidate = ctx
            .clarification_candidate
            .as_deref()
            .and_then(|id| self.kb.topic(id));

        match candidate {
            Some(topic) if nlu.signals.affirmative => {
                self.answer_topic("clarification_confirmed", topic, source)
            }
            _ => {
                let text = self
                    .composer
                    .reply(&self.kb.replies.clarification_declined, &[], source);
                Outcome::plain("clarification_declined", text, self.main_menu())
            }
        }
    }

    /// Regra 6: resposta ao "¿algo más?".
    fn resolve_more_help(
        &self,
        nlu: &NluResult,
        ctx: &SessionContext,
        source: &mut dyn VariantSource,
    ) -> Outcome {
        let replies = &self.kb.replies;

        if nlu.signals.affirmative {
            if ctx.last_topic.as_deref() == Some(self.kb.contact_topic.as_str()) {
                let text = self.composer.reply(&replies.contact_follow_up, &[], source);
                return Outcome {
                    request_feedback: true,
                    last_topic: Some(self.kb.contact_topic.clone()),
                    detail: ctx.detail.clone(),
                    ..Outcome::plain("contact_follow_up", text, Vec::new())
                };
            }
            let text = self.composer.reply(&replies.more_help_accepted, &[], source);
            return Outcome::plain("more_help_accepted", text, self.main_menu());
        }

        if nlu.signals.negative {
            let text = self.composer.reply(&replies.more_help_declined, &[], source);
            return Outcome::plain("more_help_declined", text, self.main_menu());
        }

        match self.matched_topic(nlu) {
            Some(topic) => self.answer_topic("more_help_new_query", topic, source),
            None => {
                let text = self.composer.reply(&replies.more_help_unclear, &[], source);
                Outcome::plain("more_help_unclear", text, self.main_menu())
            }
        }
    }

    /// Regra 7: consulta nova em `Idle`.
    fn resolve_query(
        &self,
        nlu: &NluResult,
        input: &str,
        ctx: &SessionContext,
        frustration: &mut u32,
        source: &mut dyn VariantSource,
    ) -> Outcome {
        let replies = &self.kb.replies;

        if let Some(topic) = self.matched_topic(nlu) {
            return self.answer_topic("topic", topic, source);
        }

        if let Some(topic) = nlu.typo.as_deref().and_then(|id| self.kb.topic(id)) {
            let label = topic.display_label();
            let text = self
                .composer
                .reply(&replies.did_you_mean, &[("topic", label.as_str())], source);
            return Outcome {
                detail: ctx.detail.clone(),
                state: Some(ConversationState::AwaitingClarification),
                clarification_candidate: Some(topic.id.clone()),
                ..Outcome::plain("did_you_mean", text, Vec::new())
            };
        }

        let open_topic = ctx
            .last_topic
            .as_deref()
            .filter(|id| self.kb.is_open_ended(id))
            .and_then(|id| self.kb.topic(id));
        if let Some(topic) = open_topic {
            if !nlu.signals.affirmative && !nlu.signals.negative {
                let text = self.composer.reply(
                    &replies.open_ended_follow_up,
                    &[("input", input.trim())],
                    source,
                );
                return Outcome {
                    last_topic: Some(topic.id.clone()),
                    detail: ctx.detail.clone(),
                    ..Outcome::plain("open_ended_follow_up", text, topic.follow_ups.clone())
                };
            }
        }

        *frustration = frustration.saturating_add(1);
        let text = self.composer.reply(&replies.not_understood, &[], source);
        Outcome::plain("not_understood", text, self.main_menu())
    }

    // ─── Auxiliares ──────────────────────────────────────────────

    fn matched_topic(&self, nlu: &NluResult) -> Option<&Topic> {
        nlu.topic
            .as_ref()
            .and_then(|matched| self.kb.topic(&matched.topic_id))
    }

    /// Resposta completa de um tópico, com o contexto que ela implica.
    ///
    /// Sub-tópicos internos respondem sem clarificação, registram o pai como
    /// `last_topic` e a si mesmos como detalhe. O tópico de promoções marca
    /// o primeiro sub-tópico como detalhe.
    fn answer_topic(&self, rule: &'static str, topic: &Topic, source: &mut dyn VariantSource) -> Outcome {
        let text = self.composer.topic_response(topic, source);

        let (last_topic, detail) = if topic.internal {
            (
                topic.parent.clone().unwrap_or_else(|| topic.id.clone()),
                Some(topic.id.clone()),
            )
        } else if topic.id == self.kb.promotions_topic {
            let first = topic.first_sub_topic(|id| self.kb.is_internal(id));
            (topic.id.clone(), first.map(str::to_string))
        } else {
            (topic.id.clone(), None)
        };

        Outcome {
            request_feedback: true,
            last_topic: Some(last_topic),
            detail,
            ..Outcome::plain(rule, text, topic.follow_ups.clone())
        }
    }

    fn main_menu(&self) -> Vec<QuickReply> {
        self.kb.main_menu.clone()
    }
}
