//! # Compositor de Respostas
//!
//! Expande o template de um tópico em texto concreto, sorteando uma
//! variante de cada lista. O sorteio passa por um [`VariantSource`]
//! injetável: em produção, um gerador semeado por entropia; nos testes,
//! uma fonte fixa para verificar o texto exato.
//!
//! ## Formatos
//!
//! ```text
//! compose:                "{intro} {emoji}\n\n{content}\n\n{closing}"
//! compose_clarification:  "{start}, {middle} {end}..."
//! topic_response:         "{clarificação}\n\n{compose}"   (tópicos normais)
//!                         "{compose}"                     (sub-tópicos internos)
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Topic;

/// Fonte de escolha de variantes.
pub trait VariantSource {
    /// Índice em `0..len`. Chamado apenas com `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Fonte aleatória uniforme sobre qualquer gerador do `rand`.
pub struct RandomSource<R = StdRng> {
    rng: R,
}

impl RandomSource<StdRng> {
    /// Gerador semeado pela entropia do sistema operacional.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Gerador reprodutível.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> VariantSource for RandomSource<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Sempre a mesma posição (módulo o tamanho da lista).
///
/// `FixedVariant(0)` escolhe sempre a primeira variante.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedVariant(pub usize);

impl VariantSource for FixedVariant {
    fn pick(&mut self, len: usize) -> usize {
        self.0 % len
    }
}

/// Compositor de textos a partir do catálogo.
///
/// Struct sem estado: toda a aleatoriedade vem do [`VariantSource`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Escolhe uma variante; lista vazia produz `""`.
    pub fn choose<'a>(&self, variants: &'a [String], source: &mut dyn VariantSource) -> &'a str {
        if variants.is_empty() {
            return "";
        }
        &variants[source.pick(variants.len())]
    }

    /// Resposta templada de um tópico.
    pub fn compose(&self, topic: &Topic, source: &mut dyn VariantSource) -> String {
        let template = &topic.template;
        let intro = self.choose(&template.intro, source);
        let emoji = self.choose(&template.emoji, source);
        let closing = self.choose(&template.closing, source);
        format!("{intro} {emoji}\n\n{}\n\n{closing}", template.content)
    }

    /// Prefixo de clarificação de um tópico.
    pub fn compose_clarification(&self, topic: &Topic, source: &mut dyn VariantSource) -> String {
        let phrasing = &topic.clarification;
        let start = self.choose(&phrasing.start, source);
        let middle = self.choose(&phrasing.middle, source);
        let end = self.choose(&phrasing.end, source);
        format!("{start}, {middle} {end}...")
    }

    /// Resposta completa de um tópico: clarificação + template.
    ///
    /// Sub-tópicos internos são navegação pura e dispensam o prefixo.
    pub fn topic_response(&self, topic: &Topic, source: &mut dyn VariantSource) -> String {
        if topic.internal {
            return self.compose(topic, source);
        }
        let clarification = self.compose_clarification(topic, source);
        let body = self.compose(topic, source);
        format!("{clarification}\n\n{body}")
    }

    /// Sorteia uma resposta pronta e preenche os placeholders `{nome}`.
    pub fn reply(
        &self,
        variants: &[String],
        vars: &[(&str, &str)],
        source: &mut dyn VariantSource,
    ) -> String {
        let mut text = self.choose(variants, source).to_string();
        for (name, value) in vars {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClarificationPhrasing, ResponseTemplate};

    fn topic(internal: bool) -> Topic {
        Topic {
            id: "horarios".into(),
            keywords: vec!["horario".into()],
            template: ResponseTemplate {
                intro: vec!["Nuestro horario".into(), "Te comparto el horario".into()],
                emoji: vec!["🕐".into(), "⏰".into()],
                content: "Lunes a Viernes".into(),
                closing: vec!["¿Algo más?".into(), "¿Te ayudo?".into()],
            },
            clarification: ClarificationPhrasing {
                start: vec!["Claro".into(), "Con gusto".into()],
                middle: vec!["te digo".into()],
                end: vec!["los horarios".into()],
            },
            follow_ups: vec![],
            internal,
            parent: internal.then(|| "horarios".to_string()),
        }
    }

    #[test]
    fn compose_layout() {
        let text = ResponseComposer::new().compose(&topic(false), &mut FixedVariant(0));
        assert_eq!(text, "Nuestro horario 🕐\n\nLunes a Viernes\n\n¿Algo más?");
    }

    #[test]
    fn fixed_source_selects_by_index() {
        let text = ResponseComposer::new().compose(&topic(false), &mut FixedVariant(1));
        assert_eq!(text, "Te comparto el horario ⏰\n\nLunes a Viernes\n\n¿Te ayudo?");
    }

    #[test]
    fn clarification_layout() {
        let text = ResponseComposer::new().compose_clarification(&topic(false), &mut FixedVariant(0));
        assert_eq!(text, "Claro, te digo los horarios...");
    }

    #[test]
    fn internal_topics_have_no_prefix() {
        let composer = ResponseComposer::new();
        let plain = composer.topic_response(&topic(true), &mut FixedVariant(0));
        assert_eq!(plain, composer.compose(&topic(true), &mut FixedVariant(0)));

        let prefixed = composer.topic_response(&topic(false), &mut FixedVariant(0));
        assert!(prefixed.starts_with("Claro, te digo los horarios...\n\n"));
    }

    #[test]
    fn reply_fills_placeholders() {
        let variants = vec!["{salutation} Soy {bot}.".to_string()];
        let text = ResponseComposer::new().reply(
            &variants,
            &[("salutation", "¡Buenos días!"), ("bot", "ClinicaBot")],
            &mut FixedVariant(0),
        );
        assert_eq!(text, "¡Buenos días! Soy ClinicaBot.");
    }

    #[test]
    fn seeded_source_stays_in_range() {
        let mut source = RandomSource::seeded(7);
        for len in 1..20 {
            assert!(source.pick(len) < len);
        }
    }

    #[test]
    fn empty_variants_yield_empty_text() {
        assert_eq!(ResponseComposer::new().choose(&[], &mut FixedVariant(3)), "");
    }
}
