use crate::ValidationError;

/// Returns true for letters of the Russian Cyrillic alphabet (either case)
pub fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Returns true if the string contains at least one Cyrillic letter
///
/// # Examples
///
/// ```
/// use menu_scanner::url::contains_cyrillic;
///
/// assert!(contains_cyrillic("сайт.рф"));
/// assert!(contains_cyrillic("shop.магазин"));
/// assert!(!contains_cyrillic("example.com"));
/// ```
pub fn contains_cyrillic(s: &str) -> bool {
    s.chars().any(is_cyrillic_letter)
}

/// Checks a single label against the shared shape rule: non-empty, no
/// leading or trailing hyphen, inner characters accepted by `allowed`.
fn label_has_valid_shape(label: &str, allowed: impl Fn(char) -> bool) -> bool {
    if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label.chars().all(|c| allowed(c) || c == '-')
}

/// Validates the labels of a host that contains Cyrillic letters
///
/// The top-level label must consist solely of Cyrillic letters. Every other
/// label may contain Cyrillic letters, ASCII digits and inner hyphens.
/// Latin letters are rejected anywhere in a Cyrillic host, so `сайт.com`
/// and `www.сайт.рф` both fail.
pub fn validate_cyrillic_labels(host: &str, labels: &[&str]) -> Result<(), ValidationError> {
    let Some((tld, rest)) = labels.split_last() else {
        return Err(ValidationError::TooFewLabels(host.to_string()));
    };

    if tld.is_empty() || !tld.chars().all(is_cyrillic_letter) {
        tracing::debug!("Invalid Cyrillic TLD: {}", tld);
        return Err(ValidationError::InvalidCyrillicTld(tld.to_string()));
    }

    for label in rest {
        if !label_has_valid_shape(label, |c| is_cyrillic_letter(c) || c.is_ascii_digit()) {
            tracing::debug!("Invalid Cyrillic domain label '{}' in {}", label, host);
            return Err(ValidationError::InvalidLabel {
                domain: host.to_string(),
                label: label.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates the labels of a plain ASCII host
pub fn validate_ascii_labels(host: &str, labels: &[&str]) -> Result<(), ValidationError> {
    for label in labels {
        if !label_has_valid_shape(label, |c| c.is_ascii_alphanumeric()) {
            tracing::debug!("Invalid domain label '{}' in {}", label, host);
            return Err(ValidationError::InvalidLabel {
                domain: host.to_string(),
                label: label.to_string(),
            });
        }
    }

    Ok(())
}

/// Converts a Cyrillic label to its ASCII-compatible `xn--` form
///
/// The label is lowercased first, matching how hosts are compared.
pub fn label_to_ascii(label: &str) -> Result<String, ValidationError> {
    let lower = label.to_lowercase();
    idna::punycode::encode_str(&lower)
        .map(|encoded| format!("xn--{}", encoded))
        .ok_or_else(|| ValidationError::Punycode(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyrillic_letters() {
        assert!(is_cyrillic_letter('а'));
        assert!(is_cyrillic_letter('Я'));
        assert!(is_cyrillic_letter('ё'));
        assert!(is_cyrillic_letter('Ё'));
        assert!(!is_cyrillic_letter('a'));
        assert!(!is_cyrillic_letter('1'));
    }

    #[test]
    fn test_cyrillic_tld_required() {
        let err = validate_cyrillic_labels("сайт.com", &["сайт", "com"]).unwrap_err();
        assert_eq!(err, ValidationError::InvalidCyrillicTld("com".to_string()));
    }

    #[test]
    fn test_cyrillic_labels_accept_digits() {
        assert!(validate_cyrillic_labels("сайт2.рф", &["сайт2", "рф"]).is_ok());
        assert!(validate_cyrillic_labels("1.рф", &["1", "рф"]).is_ok());
        assert!(validate_cyrillic_labels("мой-сайт.рф", &["мой-сайт", "рф"]).is_ok());
    }

    #[test]
    fn test_cyrillic_labels_reject_latin() {
        assert!(validate_cyrillic_labels("www.сайт.рф", &["www", "сайт", "рф"]).is_err());
    }

    #[test]
    fn test_hyphen_edges_rejected() {
        assert!(validate_ascii_labels("-foo.com", &["-foo", "com"]).is_err());
        assert!(validate_ascii_labels("foo-.com", &["foo-", "com"]).is_err());
        assert!(validate_cyrillic_labels("-сайт.рф", &["-сайт", "рф"]).is_err());
    }

    #[test]
    fn test_ascii_rejects_other_characters() {
        assert!(validate_ascii_labels("a_b.com", &["a_b", "com"]).is_err());
        assert!(validate_ascii_labels("a..com", &["a", "", "com"]).is_err());
        assert!(validate_ascii_labels("münchen.de", &["münchen", "de"]).is_err());
    }

    #[test]
    fn test_label_to_ascii() {
        assert_eq!(label_to_ascii("сайт").unwrap(), "xn--80aswg");
        assert_eq!(label_to_ascii("рф").unwrap(), "xn--p1ai");
        assert_eq!(label_to_ascii("САЙТ").unwrap(), "xn--80aswg");
    }
}
