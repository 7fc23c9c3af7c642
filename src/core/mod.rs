//! # Módulo Core: Tipos Fundamentais do Domínio
//!
//! Os tipos sobre os quais todo o motor de diálogo opera:
//!
//! - [`Topic`]: assunto pré-escrito (keywords, template, botões)
//! - [`QuickReply`]: botão de resposta rápida
//! - [`KnowledgeBase`]: catálogo imutável de tópicos e frases
//! - [`SessionContext`] / [`ConversationState`]: estado de uma conversa
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use support_chat::core::{KnowledgeBase, SessionContext};
//!
//! let kb = KnowledgeBase::from_json(json)?;
//! let horarios = kb.topic("horarios").expect("tópico do catálogo");
//! let ctx = SessionContext::new();
//! ```

/// Sub-módulo com [`Topic`], [`QuickReply`] e os templates de resposta.
pub mod topic;

/// Sub-módulo com a [`KnowledgeBase`]: catálogo central.
pub mod knowledge_base;

/// Sub-módulo com o [`SessionContext`] por conversa.
pub mod session;

// Re-exports para permitir usar `crate::core::Topic` diretamente.
pub use knowledge_base::{CannedReplies, KnowledgeBase, PhraseLists, Salutations};
pub use session::{ConversationState, SessionContext};
pub use topic::{ClarificationPhrasing, QuickReply, ResponseTemplate, Topic, MAIN_MENU};
