//! # Erros do Motor de Diálogo
//!
//! Incertezas do usuário (classificação falhou, resposta ambígua) **nunca**
//! são erros: viram ramos normais da conversa. Os tipos abaixo cobrem só
//! inconsistências de configuração, que devem falhar de forma ruidosa.

use thiserror::Error;

/// Catálogo de conhecimento inválido, detectado na carga.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("JSON do catálogo inválido: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tópico duplicado: '{0}'")]
    DuplicateTopic(String),

    /// Um botão, menu ou referência aponta para um tópico inexistente.
    #[error("'{origin}' referencia tópico inexistente '{target}'")]
    DanglingReference { origin: String, target: String },

    /// Lista de variantes vazia; o compositor não teria o que sortear.
    #[error("'{origin}': lista de variantes '{field}' está vazia")]
    EmptyVariants { origin: String, field: &'static str },

    #[error("tópico interno '{0}' precisa declarar 'parent'")]
    MissingParent(String),
}

/// Erros dos pontos de entrada do motor.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Botão com `topic_id` fora do catálogo: o catálogo de botões e o de
    /// tópicos divergiram.
    #[error("tópico desconhecido selecionado: '{0}'")]
    UnknownTopic(String),
}

/// Erros do [`SessionStore`](crate::session_store::SessionStore).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("sessão desconhecida: {0}")]
    UnknownSession(uuid::Uuid),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
