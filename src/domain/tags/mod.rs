//! Record tags: normalization and boolean filtering

pub mod query;

pub use query::TagQuery;

/// Normalize user supplied tags.
///
/// Strips a leading `#`, lowercases, joins inner whitespace with `-`,
/// drops empties and duplicates (first occurrence wins).
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in raw {
        let trimmed = tag.as_ref().trim();
        let bare = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let normalized = bare
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["#Work", "work", "  deep  focus ", "", "#", "Home"]);
        assert_eq!(tags, vec!["work", "deep-focus", "home"]);
    }

    #[test]
    fn test_normalized_tags_match_queries() {
        let tags = normalize_tags(["#Errands"]);
        assert!(TagQuery::parse("errands").unwrap().matches(&tags));
    }
}
