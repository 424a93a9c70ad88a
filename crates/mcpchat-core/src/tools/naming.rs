//! Tool name translation between tool servers and the completion endpoint
//!
//! Tool servers name their tools freely (`"Read File"`, `"calc-add"`), while
//! completion endpoints only accept identifier-like function names. The
//! translation is lossy: several native names can map to the same endpoint
//! name, so callers resolve by testing candidates with [`matches`] instead of
//! inverting [`translate`].

/// Translate a native tool name into an endpoint-safe function name
///
/// Lowercases the name and replaces spaces and hyphens with underscores.
pub fn translate(native_name: &str) -> String {
    native_name.replace(['-', ' '], "_").to_lowercase()
}

/// Check whether an endpoint-reported name refers to the given native tool
pub fn matches(endpoint_name: &str, native_name: &str) -> bool {
    translate(native_name) == endpoint_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(translate("calc-add"), "calc_add");
        assert_eq!(translate("Read File"), "read_file");
        assert_eq!(translate("Mixed-Case Name"), "mixed_case_name");
        assert_eq!(translate("already_fine"), "already_fine");
    }

    #[test]
    fn test_translate_output_is_normalized() {
        for name in ["Get-IP Info", "  spaced  ", "UPPER-lower mix", "a-b-c d e"] {
            let out = translate(name);
            assert!(!out.contains('-'), "{out} still has a hyphen");
            assert!(!out.contains(' '), "{out} still has a space");
            assert_eq!(out, out.to_lowercase());
        }
    }

    #[test]
    fn test_matches_is_reflexive() {
        for name in ["calc-add", "Read File", "x", "", "Weird-Name With-Stuff"] {
            assert!(matches(&translate(name), name));
        }
    }

    #[test]
    fn test_matches_is_not_injective() {
        // Distinct native names can collide after translation
        assert!(matches("calc_add", "calc-add"));
        assert!(matches("calc_add", "Calc Add"));
        assert!(matches("calc_add", "calc_add"));
        assert!(!matches("calc-add", "calc-add"));
        assert!(!matches("calc_sub", "calc-add"));
    }
}
