use super::domain::{contains_cyrillic, label_to_ascii, validate_ascii_labels, validate_cyrillic_labels};
use super::NormalizedUrl;
use crate::ValidationError;
use ::url::Url;

/// Schemes recognised as an explicit prefix on an address
const SCHEMES: &[&str] = &["https", "http"];

/// Validates an operator-supplied address and turns it into a fetchable URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Split off an explicit `http://` or `https://` prefix (kept for fetching)
/// 3. Drop one trailing `/`
/// 4. Split the host on `.`; at least two labels are required
/// 5. Validate labels (Cyrillic or ASCII rules, see [`super::domain`])
/// 6. Punycode every label that contains Cyrillic letters
/// 7. Prepend the scheme (`http` when none was given) and parse as a URL
///
/// Anything after the host, such as a path or port, fails label validation.
///
/// # Examples
///
/// ```
/// use menu_scanner::url::normalize_address;
///
/// let url = normalize_address("  example.com/ ").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/");
///
/// let url = normalize_address("https://сайт.рф").unwrap();
/// assert_eq!(url.as_str(), "https://xn--80aswg.xn--p1ai/");
///
/// assert!(normalize_address("localhost").is_err());
/// ```
pub fn normalize_address(raw: &str) -> Result<NormalizedUrl, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let (scheme, rest) = split_scheme(trimmed);
    let host = rest.strip_suffix('/').unwrap_or(rest);

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return Err(ValidationError::TooFewLabels(host.to_string()));
    }

    let ascii_host = if contains_cyrillic(host) {
        validate_cyrillic_labels(host, &labels)?;
        encode_cyrillic_host(&labels)?
    } else {
        validate_ascii_labels(host, &labels)?;
        host.to_string()
    };

    let candidate = format!("{}://{}", scheme.unwrap_or("http"), ascii_host);
    let url = Url::parse(&candidate).map_err(|e| ValidationError::Malformed {
        url: candidate.clone(),
        reason: e.to_string(),
    })?;

    Ok(NormalizedUrl {
        address: trimmed.to_string(),
        url,
    })
}

/// Splits a leading `http://` or `https://` off the address
fn split_scheme(address: &str) -> (Option<&'static str>, &str) {
    for &scheme in SCHEMES {
        if let Some(rest) = address
            .strip_prefix(scheme)
            .and_then(|r| r.strip_prefix("://"))
        {
            return (Some(scheme), rest);
        }
    }
    (None, address)
}

/// Rebuilds a host with each Cyrillic label replaced by its `xn--` form
fn encode_cyrillic_host(labels: &[&str]) -> Result<String, ValidationError> {
    let encoded = labels
        .iter()
        .map(|label| {
            if contains_cyrillic(label) {
                label_to_ascii(label)
            } else {
                Ok(label.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(encoded.join("."))
}
