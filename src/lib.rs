//! Terminology-aware machine translation.
//!
//! Known glossary terms are swapped for numbered placeholders (`<1>`, `<42>`) before
//! text goes to a translation provider, then replaced with their controlled
//! translations in the letter case of the original text.
//!
//! ```ignore
//! use std::sync::Arc;
//! use terminex::{MockMode, MockTranslator, Term, TermStore, TerminologyManager,
//!     TerminologyTranslator, Toolkit};
//!
//! let store: TermStore = [Term::new(1, "server", "servidor")].into_iter().collect();
//! let manager = Arc::new(TerminologyManager::new(store, Toolkit::minimal()));
//! let translator = TerminologyTranslator::new(manager, MockTranslator::new(MockMode::NoOp));
//! let outcome = translator.translate("The Server is down", "es").await?;
//! assert_eq!(outcome.text, "The Servidor is down");
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod mt;
pub mod nlp;
pub mod pipeline;
pub mod store;
pub mod term;
pub mod translate;


pub use config::Config;
pub use error::{TerminexError, TerminexResult};
pub use loader::{LoadFailure, LoadReport, SourceReport};
pub use mt::{GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator};
pub use nlp::{Toolkit, ToolkitKind};
pub use pipeline::{
    CandidateSpan, OverlapPolicy, PlaceholderMapping, Preprocessed, TerminologyManager,
};
pub use store::TermStore;
pub use term::Term;
pub use translate::{TerminologyTranslator, TranslationOutcome};
