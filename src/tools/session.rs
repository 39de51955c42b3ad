//! The resolved "current actor" for a tool call.
//!
//! Identity arrives as loose firstName/lastName arguments; it is normalized
//! here exactly once and then travels as an explicit value, so no handler
//! re-reads raw arguments or falls back to side channels.

/// A usable (firstName, lastName) pair, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub first_name: String,
    pub last_name: String,
}

impl Session {
    /// Normalize raw name arguments.
    ///
    /// Heuristic from the widget flows: when only `firstName` is supplied and
    /// it contains a space, split on the first space; the remainder becomes
    /// the last name, defaulting to the literal "User" when empty after the
    /// first token. Returns None when no usable pair can be derived.
    pub fn from_args(first_name: Option<&str>, last_name: Option<&str>) -> Option<Self> {
        let mut first = first_name.unwrap_or_default().trim().to_string();
        let mut last = last_name.unwrap_or_default().trim().to_string();

        if !first.is_empty()
            && last.is_empty()
            && let Some((head, rest)) = first.split_once(' ')
        {
            let head = head.to_string();
            let rest = rest.trim();
            last = if rest.is_empty() {
                "User".to_string()
            } else {
                rest.to_string()
            };
            first = head;
        }

        if first.is_empty() || last.is_empty() {
            return None;
        }

        Some(Self {
            first_name: first,
            last_name: last,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(first: Option<&str>, last: Option<&str>) -> Option<Session> {
        Session::from_args(first, last)
    }

    #[test]
    fn both_names_pass_through_trimmed() {
        let s = session(Some("  Jane "), Some(" Doe ")).unwrap();
        assert_eq!(s.first_name, "Jane");
        assert_eq!(s.last_name, "Doe");
        assert_eq!(s.full_name(), "Jane Doe");
    }

    #[test]
    fn full_name_in_first_field_is_split_on_first_space() {
        let s = session(Some("Jane Doe"), None).unwrap();
        assert_eq!(s.first_name, "Jane");
        assert_eq!(s.last_name, "Doe");

        let s = session(Some("Mary Ann van der Berg"), None).unwrap();
        assert_eq!(s.first_name, "Mary");
        assert_eq!(s.last_name, "Ann van der Berg");
    }

    #[test]
    fn single_token_is_not_split() {
        // Trimmed before splitting, so a trailing space is not a full name.
        assert_eq!(session(Some("Cher "), None), None);
    }

    #[test]
    fn inner_whitespace_folds_into_last_name() {
        let s = session(Some("Jane   Doe"), None).unwrap();
        assert_eq!(s.first_name, "Jane");
        assert_eq!(s.last_name, "Doe");
    }

    #[test]
    fn missing_or_blank_names_yield_none() {
        assert_eq!(session(None, None), None);
        assert_eq!(session(Some("   "), Some("")), None);
        assert_eq!(session(None, Some("Doe")), None);
    }

    #[test]
    fn splitting_does_not_apply_when_last_name_present() {
        let s = session(Some("Jane Doe"), Some("Smith")).unwrap();
        assert_eq!(s.first_name, "Jane Doe");
        assert_eq!(s.last_name, "Smith");
    }
}
