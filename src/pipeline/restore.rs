//! Case-preserving restoration of placeholders after translation

use regex::Captures;
use tracing::debug;

use super::placeholder::{PLACEHOLDER_RE, PlaceholderMapping};

/// Case pattern observed in the original surface text of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    /// "DATABASE": every cased character is uppercase
    Upper,
    /// "Database Server": every word starts uppercase, rest lowercase
    Title,
    /// "Database server": only the first character is uppercase
    Capitalized,
    /// Anything else: lowercase or mixed, translation used verbatim
    AsIs,
}

impl CasePattern {
    pub fn detect(original: &str) -> Self {
        if original.is_empty() {
            CasePattern::AsIs
        } else if is_upper(original) {
            CasePattern::Upper
        } else if is_title(original) {
            CasePattern::Title
        } else if original.chars().next().is_some_and(char::is_uppercase) {
            CasePattern::Capitalized
        } else {
            CasePattern::AsIs
        }
    }

    /// Render a translation in this pattern.
    ///
    /// Title and capitalized originals both capitalize only the first character of the
    /// translation; word-by-word title casing is wrong for most target languages.
    pub fn apply(self, translation: &str) -> String {
        match self {
            CasePattern::Upper => translation.to_uppercase(),
            CasePattern::Title | CasePattern::Capitalized => capitalize_first(translation),
            CasePattern::AsIs => translation.to_string(),
        }
    }
}

/// At least one cased character and no lowercase ones
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Uppercase letters only after uncased characters, lowercase only after cased ones
fn is_title(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace every placeholder known to `mapping` with its case-adjusted translation.
///
/// Tokens missing from the mapping are left verbatim. Replacement happens in a single
/// pass, so a translation that itself contains `<N>` is never substituted again.
pub fn restore_placeholders(text: &str, mapping: &PlaceholderMapping) -> String {
    if mapping.is_empty() || text.is_empty() {
        return text.to_string();
    }

    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            match mapping.term(token) {
                Some(term) => {
                    let pattern = CasePattern::detect(mapping.original(token).unwrap_or_default());
                    pattern.apply(&term.translation)
                }
                None => {
                    debug!("Leaving unknown placeholder {} untouched", token);
                    token.to_string()
                }
            }
        })
        .into_owned()
}

/// Tokens of `mapping` that do not occur in `text`, sorted
///
/// A non-empty result means the translation provider dropped or mangled a placeholder.
pub fn missing_placeholders(text: &str, mapping: &PlaceholderMapping) -> Vec<String> {
    let mut missing: Vec<String> = mapping
        .tokens()
        .filter(|token| !text.contains(token))
        .map(str::to_string)
        .collect();
    missing.sort();
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;
    use rstest::rstest;

    fn mapping(entries: &[(u64, &str, &str, &str)]) -> PlaceholderMapping {
        let mut mapping = PlaceholderMapping::new();
        for (id, term, translation, original) in entries {
            mapping.insert(
                &format!("<{}>", id),
                Term::new(*id, term, translation),
                original,
            );
        }
        mapping
    }

    #[rstest]
    #[case("DATABASE", CasePattern::Upper)]
    #[case("SQL-2", CasePattern::Upper)]
    #[case("Database", CasePattern::Title)]
    #[case("Load Balancer", CasePattern::Title)]
    #[case("Load balancer", CasePattern::Capitalized)]
    #[case("McKinley", CasePattern::Capitalized)]
    #[case("database", CasePattern::AsIs)]
    #[case("iPhone", CasePattern::AsIs)]
    #[case("", CasePattern::AsIs)]
    #[case("42", CasePattern::AsIs)]
    fn test_detect(#[case] original: &str, #[case] expected: CasePattern) {
        assert_eq!(CasePattern::detect(original), expected);
    }

    #[rstest]
    #[case("Database", "base de datos", "Base de datos")]
    #[case("DATABASE", "base de datos", "BASE DE DATOS")]
    #[case("database", "base de datos", "base de datos")]
    #[case("Load Balancer", "balanceador de carga", "Balanceador de carga")]
    #[case("Street", "ßtraße", "SStraße")]
    #[case("Server", "", "")]
    fn test_apply(#[case] original: &str, #[case] translation: &str, #[case] expected: &str) {
        assert_eq!(CasePattern::detect(original).apply(translation), expected);
    }

    #[rstest]
    #[case("Server", "Servidor SQL", "Servidor SQL")]
    #[case("Server", "servidor SQL", "Servidor SQL")]
    #[case("Load Balancer", "balanceador de carga AWS", "Balanceador de carga AWS")]
    #[case("Cluster", "clúster de Kubernetes", "Clúster de Kubernetes")]
    fn test_capitalize_keeps_rest_of_translation(
        #[case] original: &str,
        #[case] translation: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(CasePattern::detect(original).apply(translation), expected);
    }

    #[test]
    fn test_restore_replaces_all_occurrences() {
        let mapping = mapping(&[(1, "server", "servidor", "Server")]);
        assert_eq!(
            restore_placeholders("<1> y <1>", &mapping),
            "Servidor y Servidor"
        );
    }

    #[test]
    fn test_restore_unknown_tokens_left_alone() {
        let mapping = mapping(&[(1, "server", "servidor", "server")]);
        assert_eq!(
            restore_placeholders("El <1> usa <7> y <x>", &mapping),
            "El servidor usa <7> y <x>"
        );
    }

    #[test]
    fn test_restore_distinguishes_similar_ids() {
        let mapping = mapping(&[
            (1, "disk", "disco", "disk"),
            (12, "load balancer", "balanceador de carga", "LOAD BALANCER"),
        ]);
        assert_eq!(
            restore_placeholders("<12> <1>", &mapping),
            "BALANCEADOR DE CARGA disco"
        );
    }

    #[test]
    fn test_restore_never_rescans_translations() {
        let mapping = mapping(&[
            (1, "arrow", "flecha <2>", "arrow"),
            (2, "tag", "etiqueta", "tag"),
        ]);
        assert_eq!(restore_placeholders("<1>", &mapping), "flecha <2>");
    }

    #[test]
    fn test_restore_empty_mapping_is_identity() {
        let text = "Nothing <3> here";
        assert_eq!(restore_placeholders(text, &PlaceholderMapping::new()), text);
    }

    #[test]
    fn test_missing_placeholders() {
        let mapping = mapping(&[
            (1, "server", "servidor", "server"),
            (2, "disk", "disco", "disk"),
        ]);
        assert_eq!(
            missing_placeholders("El <2> falla", &mapping),
            vec!["<1>".to_string()]
        );
        assert!(missing_placeholders("<1> <2>", &mapping).is_empty());
    }
}
