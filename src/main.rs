//! # Support Chat: Terminal
//!
//! Ponto de entrada: conversa com o bot pela entrada padrão.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (stderr)
//!   ├── Lê AppConfig do ambiente
//!   ├── Carrega o catálogo (arquivo ou embutido)
//!   ├── Cria DialogueEngine + SessionStore
//!   └── Loop: linha → turno → pausa "pensando" → resposta
//! ```
//!
//! ## Comandos
//!
//! | Entrada | Efeito |
//! |---------|--------|
//! | texto livre | turno de texto |
//! | `/N` | escolhe o botão N da última resposta |
//! | `/like`, `/dislike` | avalia a última resposta |
//! | `/salir` | encerra |
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! cargo run
//! RUST_LOG=support_chat=debug SUPPORT_CHAT_THINK_MS=0 cargo run
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use support_chat::{
    persistence, AppConfig, DialogueEngine, Feedback, QuickReply, RandomSource, SessionStore,
    SystemClock, TurnResult,
};

/// Uma linha digitada pelo usuário.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Text(&'a str),
    /// Botão, numerado a partir de 1.
    Button(usize),
    Feedback(Feedback),
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    match line {
        "/salir" | "/quit" => Command::Quit,
        "/like" => Command::Feedback(Feedback::Like),
        "/dislike" => Command::Feedback(Feedback::Dislike),
        _ => match line.strip_prefix('/').and_then(|n| n.parse().ok()) {
            Some(n) => Command::Button(n),
            None => Command::Text(line),
        },
    }
}

fn render(result: &TurnResult) {
    println!("\n🤖 {}\n", result.response_text);
    for (n, reply) in result.quick_replies.iter().enumerate() {
        println!("   [/{}] {}", n + 1, reply.label);
    }
    if result.request_feedback {
        println!("   ¿Te sirvió? 👍 /like   👎 /dislike");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs vão para stderr para não misturar com a conversa.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let kb = persistence::load_knowledge_base(&config.kb_path)?;
    tracing::info!(
        bot = %kb.bot_name,
        topics = kb.topic_count(),
        think_ms = config.think_delay.as_millis() as u64,
        "🚀 Support chat pronto"
    );

    let engine = DialogueEngine::new(Arc::new(kb), config.matching, Arc::new(SystemClock));
    let store = SessionStore::new(Arc::new(engine));
    let mut source = RandomSource::from_entropy();

    let (session, welcome) = store.create(&mut source);
    render(&welcome);
    let mut buttons: Vec<QuickReply> = welcome.quick_replies;
    let mut feedback_pending = welcome.request_feedback;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // o contexto é gravado aqui, antes da pausa de apresentação
        let result = match parse_command(line) {
            Command::Quit => break,
            Command::Text(text) => store.text_turn(session, text, &mut source)?,
            Command::Button(n) => {
                let Some(reply) = n.checked_sub(1).and_then(|i| buttons.get(i)) else {
                    println!("   (no hay opción /{n})");
                    continue;
                };
                println!("👤 {}", reply.label);
                store
                    .menu_selection(session, &reply.topic_id, &mut source)
                    .with_context(|| format!("botão '{}' inválido", reply.label))?
            }
            Command::Feedback(feedback) => {
                if !feedback_pending {
                    println!("   (no hay respuesta para calificar)");
                    continue;
                }
                store.feedback(session, feedback, &mut source)?
            }
        };

        buttons = result.quick_replies.clone();
        feedback_pending = result.request_feedback;

        tokio::time::sleep(config.think_delay).await;
        render(&result);
    }

    store.remove(session);
    Ok(())
}
