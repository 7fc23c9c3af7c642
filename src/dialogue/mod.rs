//! # Diálogo: Regras de Conversa e Composição de Respostas
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`engine`] | Máquina de estados: decide a resposta de cada turno |
//! | [`composer`] | Sorteia variantes e monta o texto final |
//! | [`clock`] | Hora do dia para a saudação |

pub mod clock;

pub mod composer;

/// Sub-módulo com o [`DialogueEngine`].
pub mod engine;

pub use clock::{Clock, DayPeriod, FixedClock, SystemClock};
pub use composer::{FixedVariant, RandomSource, ResponseComposer, VariantSource};
pub use engine::{DialogueEngine, Feedback, TurnResult, ESCALATION_THRESHOLD};
