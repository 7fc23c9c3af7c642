//! # Persistência: Carregamento do Catálogo
//!
//! O catálogo de tópicos vive em JSON (`data/knowledge_base.json`). Uma
//! cópia é embutida no binário via `include_str!`, de modo que o bot
//! funciona mesmo sem o arquivo em disco.
//!
//! ## Ordem de Resolução
//!
//! ```text
//! load_knowledge_base(path)
//!   ├── path existe?  → lê, normaliza e valida
//!   └── não existe    → catálogo embutido
//! ```
//!
//! Um arquivo **presente mas inválido** é erro: não há fallback silencioso
//! para um catálogo que alguém editou e quebrou.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::KnowledgeBase;
use crate::error::KnowledgeBaseError;

/// Caminho padrão do catálogo (relativo à raiz do projeto).
pub const KB_PATH: &str = "data/knowledge_base.json";

/// Catálogo embutido no binário.
pub const DEFAULT_KNOWLEDGE_BASE: &str = include_str!("../data/knowledge_base.json");

/// Catálogo embutido, já validado.
pub fn default_knowledge_base() -> Result<KnowledgeBase, KnowledgeBaseError> {
    KnowledgeBase::from_json(DEFAULT_KNOWLEDGE_BASE)
}

/// Carrega o catálogo de `path`, ou o embutido se o arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas não puder ser lido, ou se o
/// conteúdo não for um catálogo válido.
pub fn load_knowledge_base(path: impl AsRef<Path>) -> Result<KnowledgeBase> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "catálogo não encontrado, usando o embutido");
        return default_knowledge_base().context("Catálogo embutido inválido");
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let kb = KnowledgeBase::from_json(&json)
        .with_context(|| format!("Catálogo inválido em {}", path.display()))?;
    tracing::info!(path = %path.display(), topics = kb.topic_count(), "catálogo carregado");
    Ok(kb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("support-chat-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_falls_back_to_embedded() {
        let kb = load_knowledge_base(temp_path("ausente.json")).unwrap();
        assert_eq!(kb.bot_name, "ClinicaBot");
        assert!(kb.topic("contacto").is_some());
    }

    #[test]
    fn reads_catalog_from_disk() {
        let path = temp_path("kb.json");
        let json = DEFAULT_KNOWLEDGE_BASE.replace("\"ClinicaBot\",", "\"TiendaBot\",");
        std::fs::write(&path, json).unwrap();

        let kb = load_knowledge_base(&path).unwrap();
        assert_eq!(kb.bot_name, "TiendaBot");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = temp_path("quebrado.json");
        std::fs::write(&path, "{ \"topics\": ").unwrap();

        let err = load_knowledge_base(&path).unwrap_err();
        assert!(err.to_string().contains("Catálogo inválido"));

        std::fs::remove_file(&path).unwrap();
    }
}
