//! # SessionStore: Contextos de Conversa por Sessão
//!
//! O motor é puro; quem guarda o [`SessionContext`] entre turnos é o
//! chamador. Este módulo é esse chamador para o caso comum: várias
//! sessões, cada uma identificada por um `Uuid`.
//!
//! ## Locks
//!
//! ```text
//! sessions: Mutex<HashMap<Uuid, Arc<Mutex<SessionContext>>>>
//!              │                      │
//!              │                      └── lock da sessão: serializa os
//!              │                          turnos de UMA conversa
//!              └── lock do mapa: só para achar/criar/remover sessões,
//!                  liberado antes do turno
//! ```
//!
//! Um turno roda sob o lock da própria sessão e substitui o contexto em
//! uma única atribuição: ou o turno inteiro é gravado, ou nada é.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::SessionContext;
use crate::dialogue::{DialogueEngine, Feedback, TurnResult, VariantSource};
use crate::error::{EngineError, SessionError};

pub struct SessionStore {
    engine: Arc<DialogueEngine>,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<SessionContext>>>>,
}

impl SessionStore {
    pub fn new(engine: Arc<DialogueEngine>) -> Self {
        Self {
            engine,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Abre uma sessão e devolve seu id com a mensagem de boas-vindas.
    pub fn create(&self, source: &mut dyn VariantSource) -> (Uuid, TurnResult) {
        let id = Uuid::new_v4();
        let welcome = self.engine.start_session(source);
        self.sessions
            .lock()
            .insert(id, Arc::new(Mutex::new(welcome.next_context.clone())));
        tracing::info!(session = %id, "sessão criada");
        (id, welcome)
    }

    pub fn text_turn(
        &self,
        id: Uuid,
        input: &str,
        source: &mut dyn VariantSource,
    ) -> Result<TurnResult, SessionError> {
        self.run(id, |engine, ctx| Ok(engine.process_text_turn(input, ctx, source)))
    }

    pub fn menu_selection(
        &self,
        id: Uuid,
        topic_id: &str,
        source: &mut dyn VariantSource,
    ) -> Result<TurnResult, SessionError> {
        self.run(id, |engine, ctx| engine.process_menu_selection(topic_id, ctx, source))
    }

    pub fn feedback(
        &self,
        id: Uuid,
        feedback: Feedback,
        source: &mut dyn VariantSource,
    ) -> Result<TurnResult, SessionError> {
        self.run(id, |engine, ctx| Ok(engine.process_feedback(feedback, ctx, source)))
    }

    /// Cópia do contexto atual de uma sessão.
    pub fn context(&self, id: Uuid) -> Option<SessionContext> {
        let session = self.sessions.lock().get(&id).cloned()?;
        let ctx = session.lock().clone();
        Some(ctx)
    }

    /// Encerra uma sessão. `false` se ela não existia.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.lock().remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "sessão encerrada");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn run(
        &self,
        id: Uuid,
        turn: impl FnOnce(&DialogueEngine, &SessionContext) -> Result<TurnResult, EngineError>,
    ) -> Result<TurnResult, SessionError> {
        let session = self
            .sessions
            .lock()
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownSession(id))?;

        let mut ctx = session.lock();
        let result = turn(self.engine.as_ref(), &*ctx)?;
        *ctx = result.next_context.clone();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConversationState;
    use crate::dialogue::{FixedClock, FixedVariant, RandomSource};
    use crate::nlu::intent::MatchingConfig;
    use crate::persistence::default_knowledge_base;

    fn store() -> SessionStore {
        let engine = DialogueEngine::new(
            Arc::new(default_knowledge_base().unwrap()),
            MatchingConfig::default(),
            Arc::new(FixedClock(15)),
        );
        SessionStore::new(Arc::new(engine))
    }

    #[test]
    fn create_commits_initial_context() {
        let store = store();
        let (id, welcome) = store.create(&mut FixedVariant(0));
        assert!(welcome.response_text.starts_with("¡Buenas tardes!"));
        assert_eq!(store.context(id), Some(SessionContext::new()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn turns_update_the_stored_context() {
        let store = store();
        let (id, _) = store.create(&mut FixedVariant(0));

        let result = store.text_turn(id, "horario", &mut FixedVariant(0)).unwrap();
        let stored = store.context(id).unwrap();
        assert_eq!(stored, result.next_context);
        assert_eq!(stored.state, ConversationState::AwaitingMoreHelp);
    }

    #[test]
    fn failed_selection_leaves_context_untouched() {
        let store = store();
        let (id, _) = store.create(&mut FixedVariant(0));
        store.text_turn(id, "horario", &mut FixedVariant(0)).unwrap();
        let before = store.context(id).unwrap();

        let err = store
            .menu_selection(id, "fantasma", &mut FixedVariant(0))
            .unwrap_err();
        assert!(matches!(err, SessionError::Engine(EngineError::UnknownTopic(_))));
        assert_eq!(store.context(id).unwrap(), before);
    }

    #[test]
    fn unknown_and_removed_sessions() {
        let store = store();
        let stranger = Uuid::new_v4();
        assert!(matches!(
            store.text_turn(stranger, "hola", &mut FixedVariant(0)),
            Err(SessionError::UnknownSession(id)) if id == stranger
        ));

        let (id, _) = store.create(&mut FixedVariant(0));
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());
    }

    /// Sessões em threads diferentes não enxergam o estado umas das outras.
    #[test]
    fn sessions_are_isolated_across_threads() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..8u64)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut source = RandomSource::seeded(n);
                    let (id, _) = store.create(&mut source);
                    let input = if n % 2 == 0 { "horario" } else { "zzzzzzzzzz" };
                    for _ in 0..20 {
                        store.menu_selection(id, "main_menu", &mut source).unwrap();
                        store.text_turn(id, input, &mut source).unwrap();
                    }
                    (n, id)
                })
            })
            .collect();

        for handle in handles {
            let (n, id) = handle.join().unwrap();
            let ctx = store.context(id).unwrap();
            if n % 2 == 0 {
                assert_eq!(ctx.last_topic.as_deref(), Some("horarios"));
                assert_eq!(ctx.state, ConversationState::AwaitingMoreHelp);
            } else {
                assert!(ctx.frustration_count <= 2);
                assert!(ctx.is_consistent());
            }
        }
        assert_eq!(store.len(), 8);
    }
}
