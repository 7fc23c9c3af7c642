//! Configuração da aplicação via variáveis de ambiente.
//!
//! | Variável | Padrão | Efeito |
//! |----------|--------|--------|
//! | `SUPPORT_CHAT_KB` | `data/knowledge_base.json` | Caminho do catálogo |
//! | `SUPPORT_CHAT_THINK_MS` | `600` | Pausa de "digitando..." no terminal |
//! | `RUST_LOG` | `info` | Nível de log (lido pelo `tracing_subscriber`) |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::nlu::intent::MatchingConfig;
use crate::persistence::KB_PATH;

pub const KB_PATH_VAR: &str = "SUPPORT_CHAT_KB";
pub const THINK_MS_VAR: &str = "SUPPORT_CHAT_THINK_MS";

const DEFAULT_THINK_MS: u64 = 600;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub kb_path: PathBuf,
    /// Pausa antes de exibir cada resposta (só apresentação).
    pub think_delay: Duration,
    pub matching: MatchingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kb_path: PathBuf::from(KB_PATH),
            think_delay: Duration::from_millis(DEFAULT_THINK_MS),
            matching: MatchingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Monta a configuração a partir de uma função de consulta, para que
    /// os testes não precisem alterar o ambiente do processo.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(KB_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.kb_path = PathBuf::from(path);
        }
        if let Some(ms) = lookup(THINK_MS_VAR) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("{THINK_MS_VAR} inválido: '{ms}'"))?;
            config.think_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }
}
