//! Accept-header negotiation
//!
//! Decides whether a requester's declared acceptable media types intersect
//! the set a middleware instance is configured to produce. This is the gate
//! that lets several error middlewares coexist, each scoped to one content
//! family.

/// Single `Accept` header entry with its quality factor
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptValue {
    pub media_type: String,
    pub quality: f32,
}

impl AcceptValue {
    /// Parse one Accept entry (e.g., `application/json;q=0.8`)
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let media_type = parts.next()?.trim().to_ascii_lowercase();
        if media_type.is_empty() {
            return None;
        }

        let mut quality = 1.0;
        for param in parts {
            if let Some((key, val)) = param.trim().split_once('=') {
                if key.trim() == "q" {
                    quality = val.trim().parse().unwrap_or(1.0);
                }
            }
        }

        Some(Self {
            media_type,
            quality,
        })
    }

    /// Whether this entry covers the offered media type, wildcards included
    pub fn matches(&self, offered: &str) -> bool {
        let offered = strip_params(offered);
        if self.media_type == "*/*" {
            return true;
        }
        if let Some(range) = self.media_type.strip_suffix("/*") {
            return offered.split('/').next() == Some(range);
        }
        self.media_type == offered
    }
}

/// Parse a full Accept header into entries sorted by descending quality
pub fn parse_accept(header: &str) -> Vec<AcceptValue> {
    let mut values: Vec<AcceptValue> = header
        .split(',')
        .filter_map(|value| AcceptValue::parse(value.trim()))
        .collect();

    values.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    values
}

/// Whether the request's Accept header intersects the offered media types
///
/// A missing, empty, or unparsable header accepts anything. Entries with a
/// zero quality factor are explicit refusals and never match.
pub fn is_accepted<S: AsRef<str>>(accept_header: Option<&str>, offered: &[S]) -> bool {
    let header = match accept_header {
        Some(header) if !header.trim().is_empty() => header,
        _ => return true,
    };

    let values = parse_accept(header);
    if values.is_empty() {
        return true;
    }

    values.iter().filter(|value| value.quality > 0.0).any(|value| {
        offered
            .iter()
            .any(|offer| value.matches(&offer.as_ref().to_ascii_lowercase()))
    })
}

fn strip_params(media_type: &str) -> &str {
    media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_value_parsing() {
        let accept = AcceptValue::parse("application/json;q=0.8").unwrap();
        assert_eq!(accept.media_type, "application/json");
        assert_eq!(accept.quality, 0.8);

        let accept = AcceptValue::parse("text/html").unwrap();
        assert_eq!(accept.media_type, "text/html");
        assert_eq!(accept.quality, 1.0);

        assert!(AcceptValue::parse("").is_none());
    }

    #[test]
    fn test_accept_header_sorted_by_quality() {
        let values = parse_accept("text/plain;q=0.8,text/html,application/json;q=0.9");
        assert_eq!(values[0].media_type, "text/html");
        assert_eq!(values[1].media_type, "application/json");
        assert_eq!(values[2].media_type, "text/plain");
    }

    #[test]
    fn test_exact_intersection() {
        assert!(is_accepted(
            Some("application/json"),
            &["application/json"]
        ));
        assert!(!is_accepted(Some("text/html"), &["application/json"]));
    }

    #[test]
    fn test_wildcards_match() {
        assert!(is_accepted(Some("*/*"), &["application/json"]));
        assert!(is_accepted(Some("text/*"), &["text/html"]));
        assert!(!is_accepted(Some("text/*"), &["application/json"]));
    }

    #[test]
    fn test_missing_or_empty_header_accepts() {
        assert!(is_accepted(None, &["application/json"]));
        assert!(is_accepted(Some("  "), &["application/json"]));
    }

    #[test]
    fn test_zero_quality_is_a_refusal() {
        assert!(!is_accepted(Some("text/html;q=0"), &["text/html"]));
        assert!(is_accepted(
            Some("text/html;q=0,application/json"),
            &["application/json"]
        ));
    }

    #[test]
    fn test_offered_params_are_ignored() {
        assert!(is_accepted(
            Some("text/html"),
            &["text/html; charset=utf-8"]
        ));
    }
}
