//! Terminology-aware translation
//!
//! Wraps a [`MachineTranslator`] with the placeholder pipeline: known terms are
//! protected before the provider sees the text and replaced with their controlled
//! translations afterwards.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{TerminexError, TerminexResult};
use crate::mt::MachineTranslator;
use crate::pipeline::{Preprocessed, TerminologyManager, missing_placeholders};

/// Result of translating one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    /// Final translation with terminology restored
    pub text: String,
    /// Text as sent to the provider
    pub protected_text: String,
    /// Number of distinct terms protected
    pub terms: usize,
    /// Placeholders the provider failed to return
    pub missing_placeholders: Vec<String>,
}

pub struct TerminologyTranslator<T: MachineTranslator> {
    manager: Arc<TerminologyManager>,
    provider: T,
    source_locale: Option<String>,
}

impl<T: MachineTranslator> TerminologyTranslator<T> {
    pub fn new(manager: Arc<TerminologyManager>, provider: T) -> Self {
        TerminologyTranslator {
            manager,
            provider,
            source_locale: None,
        }
    }

    /// Use `locale` as the source language instead of the terminology's language
    pub fn with_source_locale(mut self, locale: &str) -> Self {
        self.source_locale = Some(locale.to_string());
        self
    }

    pub fn manager(&self) -> &TerminologyManager {
        &self.manager
    }

    pub fn provider(&self) -> &T {
        &self.provider
    }

    pub fn source_locale(&self) -> &str {
        self.source_locale
            .as_deref()
            .unwrap_or_else(|| self.manager.language())
    }

    pub async fn translate(
        &self,
        text: &str,
        target_locale: &str,
    ) -> TerminexResult<TranslationOutcome> {
        let protected = self.manager.preprocess(text);
        debug!(
            "Protected {} terms before sending to {}",
            protected.mapping.len(),
            self.provider.provider_name()
        );
        let translated = self
            .provider
            .translate(&protected.text, self.source_locale(), target_locale)
            .await?;
        Ok(self.finish(protected, &translated))
    }

    /// Translate several texts in one provider call; outcomes keep input order.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        target_locale: &str,
    ) -> TerminexResult<Vec<TranslationOutcome>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let protected: Vec<Preprocessed> =
            texts.iter().map(|t| self.manager.preprocess(t)).collect();
        let protected_texts: Vec<String> = protected.iter().map(|p| p.text.clone()).collect();

        let translated = self
            .provider
            .translate_batch(&protected_texts, self.source_locale(), target_locale)
            .await?;
        if translated.len() != protected.len() {
            return Err(TerminexError::Translation(format!(
                "{} returned {} translations for {} texts",
                self.provider.provider_name(),
                translated.len(),
                protected.len()
            )));
        }

        Ok(protected
            .into_iter()
            .zip(translated)
            .map(|(p, t)| self.finish(p, &t))
            .collect())
    }

    fn finish(&self, protected: Preprocessed, translated: &str) -> TranslationOutcome {
        let missing = missing_placeholders(translated, &protected.mapping);
        if !missing.is_empty() {
            warn!(
                "{} dropped placeholders {:?}; their terms are missing from the translation",
                self.provider.provider_name(),
                missing
            );
        }
        let text = self.manager.postprocess(translated, &protected.mapping);
        TranslationOutcome {
            text,
            terms: protected.mapping.len(),
            protected_text: protected.text,
            missing_placeholders: missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::{MockMode, MockTranslator};
    use crate::nlp::Toolkit;
    use crate::store::TermStore;
    use crate::term::Term;
    use std::collections::HashMap;

    fn manager() -> Arc<TerminologyManager> {
        let store: TermStore = [
            Term::new(1, "server", "servidor"),
            Term::new(2, "database", "base de datos"),
        ]
        .into_iter()
        .collect();
        Arc::new(TerminologyManager::new(store, Toolkit::minimal()))
    }

    fn translator(mode: MockMode) -> TerminologyTranslator<MockTranslator> {
        TerminologyTranslator::new(manager(), MockTranslator::new(mode))
    }

    #[tokio::test]
    async fn test_translate_restores_terms() {
        let outcome = translator(MockMode::NoOp)
            .translate("The Server is down", "es")
            .await
            .unwrap();
        assert_eq!(outcome.protected_text, "The <1> is down");
        assert_eq!(outcome.text, "The Servidor is down");
        assert_eq!(outcome.terms, 1);
        assert!(outcome.missing_placeholders.is_empty());
    }

    #[tokio::test]
    async fn test_translate_with_mapping() {
        let mut map = HashMap::new();
        map.insert(
            ("The <1> uses the <2>".to_string(), "es".to_string()),
            "El <1> usa la <2>".to_string(),
        );
        let outcome = translator(MockMode::Mappings(map))
            .translate("The SERVER uses the database", "es")
            .await
            .unwrap();
        assert_eq!(outcome.text, "El SERVIDOR usa la base de datos");
        assert_eq!(outcome.terms, 2);
    }

    #[tokio::test]
    async fn test_translate_survives_reordering() {
        let outcome = translator(MockMode::Reorder)
            .translate("Server feeds Database", "ja")
            .await
            .unwrap();
        assert_eq!(outcome.protected_text, "<1> feeds <2>");
        assert_eq!(outcome.text, "Base de datos feeds Servidor");
    }

    #[tokio::test]
    async fn test_translate_reports_dropped_placeholders() {
        let outcome = translator(MockMode::DropPlaceholders)
            .translate("The server is down", "es")
            .await
            .unwrap();
        assert_eq!(outcome.text, "The  is down");
        assert_eq!(outcome.missing_placeholders, vec!["<1>".to_string()]);
    }

    #[tokio::test]
    async fn test_translate_propagates_provider_error() {
        let result = translator(MockMode::Error("quota exceeded".to_string()))
            .translate("The server is down", "es")
            .await;
        match result {
            Err(TerminexError::Translation(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("Expected Translation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_batch() {
        let texts = vec![
            "Restart the server".to_string(),
            "Nothing to protect".to_string(),
            "DATABASE offline".to_string(),
        ];
        let outcomes = translator(MockMode::Suffix)
            .translate_batch(&texts, "fr")
            .await
            .unwrap();
        let restored: Vec<&str> = outcomes.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(
            restored,
            vec![
                "Restart the servidor_fr",
                "Nothing to protect_fr",
                "BASE DE DATOS offline_fr"
            ]
        );
        assert_eq!(outcomes[1].terms, 0);
    }

    #[tokio::test]
    async fn test_translate_batch_empty() {
        let outcomes = translator(MockMode::NoOp).translate_batch(&[], "fr").await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_source_locale() {
        let translator = translator(MockMode::NoOp);
        assert_eq!(translator.source_locale(), "en");
        assert_eq!(translator.with_source_locale("de").source_locale(), "de");
    }
}
