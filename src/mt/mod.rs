/// Machine Translation providers
///
/// The terminology pipeline is provider-agnostic: anything implementing
/// [`MachineTranslator`] can sit between preprocessing and postprocessing, as long as
/// it passes `<N>` placeholder tokens through untouched.
///
/// - [`GoogleTranslateProvider`] - Google Translate v2 REST API
/// - [`MockTranslator`] - deterministic offline provider for tests and dry runs
pub mod google_translate;
pub mod mock;
pub mod translator;

pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use translator::{MachineTranslator, normalize_locale, validate_locale};
