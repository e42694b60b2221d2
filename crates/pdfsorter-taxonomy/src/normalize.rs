//! Topic normalization and folder-name sanitization

/// Turn a raw topic into a filesystem-safe folder name
///
/// Whitespace, path separators, `: * ? " < > | .` and control characters
/// become `_`; runs of `_` collapse; leading and trailing `_` are trimmed;
/// the result is capped at `max_len` characters. Case is preserved.
///
/// ```
/// use pdfsorter_taxonomy::sanitize_folder_name;
///
/// assert_eq!(sanitize_folder_name("Tech/Science", 50), "Tech_Science");
/// assert_eq!(sanitize_folder_name("  Machine  Learning ", 50), "Machine_Learning");
/// ```
pub fn sanitize_folder_name(raw: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        let c = if is_replaced(c) { '_' } else { c };
        if c == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.push(c);
    }

    if let Some((idx, _)) = out.char_indices().nth(max_len) {
        out.truncate(idx);
    }
    out.trim_end_matches('_').to_string()
}

/// Comparison key of a topic: the lower-cased sanitized name
pub fn normalize_topic(raw: &str, max_len: usize) -> String {
    sanitize_folder_name(raw, max_len).to_lowercase()
}

fn is_replaced(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsorter_domain::taxonomy::is_safe_folder_name;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_examples() {
        assert_eq!(sanitize_folder_name("Tech/Science", 50), "Tech_Science");
        assert_eq!(sanitize_folder_name("a<b>c:d\"e|f?g*h", 50), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_folder_name("C:\\Users\\..\\x", 50), "C_Users_x");
        assert_eq!(sanitize_folder_name("__Finance__", 50), "Finance");
        assert_eq!(sanitize_folder_name("Health\tcare\n", 50), "Health_care");
        assert_eq!(sanitize_folder_name("...", 50), "");
        assert_eq!(sanitize_folder_name("Économie Politique", 50), "Économie_Politique");
    }

    #[test]
    fn test_sanitize_caps_length() {
        assert_eq!(sanitize_folder_name(&"x".repeat(80), 50).chars().count(), 50);
        // Truncation never leaves a trailing separator
        assert_eq!(sanitize_folder_name("abcd efgh", 5), "abcd");
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(normalize_topic("Machine  Learning ", 50), "machine_learning");
        assert_eq!(normalize_topic("MACHINE LEARNING", 50), "machine_learning");
        assert_eq!(normalize_topic("machine-learning", 50), "machine-learning");
    }

    proptest! {
        #[test]
        fn prop_sanitized_names_are_safe(raw in "\\PC{0,80}") {
            let name = sanitize_folder_name(&raw, 50);
            prop_assert!(name.chars().count() <= 50);
            prop_assert!(name.is_empty() || is_safe_folder_name(&name));
            prop_assert!(!name.contains('.'));
            prop_assert!(!name.starts_with('_') && !name.ends_with('_'));
            prop_assert!(!name.contains("__"));
        }

        #[test]
        fn prop_sanitize_is_idempotent(raw in "\\PC{0,80}") {
            let once = sanitize_folder_name(&raw, 50);
            prop_assert_eq!(sanitize_folder_name(&once, 50), once.clone());
        }
    }
}
