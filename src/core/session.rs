//! # Contexto de Sessão
//!
//! O [`SessionContext`] é o único estado mutável da conversa. Ele é
//! criado no início da sessão, substituído inteiro a cada turno e
//! descartado quando a sessão termina. O motor nunca o altera no lugar:
//! recebe uma referência e devolve o próximo contexto dentro do
//! [`TurnResult`](crate::dialogue::TurnResult).
//!
//! ## Máquina de Estados
//!
//! ```text
//!                  typo sugerido
//!   ┌──────┐ ───────────────────────► ┌───────────────────────┐
//!   │ Idle │ ◄─────────────────────── │ AwaitingClarification │
//!   └──────┘         sim / não        └───────────────────────┘
//!     │  ▲
//!     │  │ sim / não / nova consulta
//!     ▼  │
//!   ┌──────────────────┐
//!   │ AwaitingMoreHelp │  ← resposta pediu feedback e não tem botões
//!   └──────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Estado do turno atual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Estado inicial: a próxima mensagem é uma consulta nova.
    #[default]
    Idle,
    /// O bot perguntou "¿quisiste decir …?" e espera sim/não.
    AwaitingClarification,
    /// O bot respondeu sem botões e espera "¿algo más?" sim/não.
    AwaitingMoreHelp,
}

/// Contexto de uma conversa.
///
/// Invariante: `clarification_candidate.is_some()` se e somente se
/// `state == AwaitingClarification`. Os construtores do motor preservam
/// isso; [`is_consistent()`](Self::is_consistent) permite verificar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub state: ConversationState,
    /// Último tópico com que o usuário interagiu.
    pub last_topic: Option<String>,
    /// Frases de frustração e falhas de entendimento acumuladas.
    pub frustration_count: u32,
    /// Tópico proposto após um erro de digitação.
    pub clarification_candidate: Option<String>,
    /// Sub-tópico de detalhe em exibição (só informativo).
    pub detail: Option<String>,
}

impl SessionContext {
    /// Contexto novo, em `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_consistent(&self) -> bool {
        self.clarification_candidate.is_some()
            == (self.state == ConversationState::AwaitingClarification)
    }

    /// Contexto aguardando a confirmação de `candidate`.
    pub fn awaiting_clarification(&self, candidate: &str) -> Self {
        Self {
            state: ConversationState::AwaitingClarification,
            last_topic: None,
            frustration_count: self.frustration_count,
            clarification_candidate: Some(candidate.to_string()),
            detail: None,
        }
    }
}
