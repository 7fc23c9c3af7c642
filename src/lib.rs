//! # Support Chat: Motor de Atendimento por Roteiro
//!
//! Chatbot de atendimento ao cliente **sem modelo de linguagem**: cada
//! mensagem é normalizada, comparada por keywords e distância de edição
//! contra um catálogo fixo de tópicos, e respondida a partir de templates
//! com variantes sorteadas. Uma pequena máquina de estados por sessão
//! cuida de confirmações ("¿quisiste decir…?"), do "¿algo más?" e da
//! escalação para atendimento humano.
//!
//! ## Arquitetura
//!
//! ```text
//! texto ──► nlu::NluPipeline ──► dialogue::DialogueEngine ──► TurnResult
//!             │                     │          ▲
//!             │ normalizer          │ composer │ SessionContext
//!             │ similarity          │ clock    │ (SessionStore)
//!             │ intent / phrases    │          │
//!             └──────── core::KnowledgeBase ◄──┘ (persistence)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use support_chat::{persistence, DialogueEngine, MatchingConfig, RandomSource,
//!                    SessionContext, SystemClock};
//!
//! let kb = Arc::new(persistence::default_knowledge_base()?);
//! let engine = DialogueEngine::new(kb, MatchingConfig::default(), Arc::new(SystemClock));
//! let mut rng = RandomSource::from_entropy();
//!
//! let turn = engine.process_text_turn("¿a qué hora abren?", &SessionContext::new(), &mut rng);
//! println!("{}", turn.response_text);
//! ```

/// Módulo `core`: tópicos, catálogo e contexto de sessão.
pub mod core;

/// Módulo `nlu`: normalização, similaridade e classificação.
pub mod nlu;

/// Módulo `dialogue`: máquina de estados e composição de respostas.
pub mod dialogue;

pub mod config;
pub mod error;
pub mod persistence;
pub mod session_store;

pub use crate::config::AppConfig;
pub use crate::core::{ConversationState, KnowledgeBase, QuickReply, SessionContext, Topic};
pub use crate::dialogue::{
    DialogueEngine, Feedback, FixedClock, FixedVariant, RandomSource, SystemClock, TurnResult,
    VariantSource,
};
pub use crate::error::{EngineError, KnowledgeBaseError, SessionError};
pub use crate::nlu::intent::MatchingConfig;
pub use crate::session_store::SessionStore;
