//! Heuristic page rank
//!
//! An additive, deterministic score used to order pages. It is a tie-break
//! signal, not a relevance model.

/// Most points a page can earn for content length
const MAX_LENGTH_POINTS: f64 = 5.0;

/// Titles longer than this many characters earn the title bonus
const DESCRIPTIVE_TITLE_CHARS: usize = 10;

const TITLE_POINTS: f64 = 2.0;
const REPUTATION_POINTS: f64 = 10.0;
const TRANSPORT_POINTS: f64 = 1.0;

/// Whether `domain` is one of `reputable` or a subdomain of one
pub fn is_reputable(domain: &str, reputable: &[String]) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    reputable.iter().any(|known| {
        domain == *known
            || domain
                .strip_suffix(known.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Compute the rank of a page, rounded to one decimal place
pub fn page_rank(content: &str, title: &str, domain: &str, reputable: &[String]) -> f64 {
    let mut rank = (content.chars().count() as f64 / 1000.0).min(MAX_LENGTH_POINTS);

    if title.chars().count() > DESCRIPTIVE_TITLE_CHARS {
        rank += TITLE_POINTS;
    }

    if is_reputable(domain, reputable) {
        rank += REPUTATION_POINTS;
    }

    // Only http(s) URLs reach the fetcher, so this term is constant today.
    rank += TRANSPORT_POINTS;

    (rank * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reputable() -> Vec<String> {
        vec!["wikipedia.org".to_string(), "github.com".to_string()]
    }

    #[test]
    fn test_minimal_page() {
        assert_eq!(page_rank("", "Short", "example.com", &reputable()), 1.0);
    }

    #[test]
    fn test_length_points_are_capped() {
        let long = "a".repeat(50_000);
        assert_eq!(page_rank(&long, "", "example.com", &reputable()), 6.0);

        let medium = "a".repeat(2_345);
        assert_eq!(page_rank(&medium, "", "example.com", &reputable()), 3.3);
    }

    #[test]
    fn test_title_bonus() {
        assert_eq!(page_rank("", "0123456789", "example.com", &reputable()), 1.0);
        assert_eq!(page_rank("", "01234567890", "example.com", &reputable()), 3.0);
    }

    #[test]
    fn test_reputation_bonus_includes_subdomains() {
        assert_eq!(page_rank("", "", "en.wikipedia.org", &reputable()), 11.0);
        assert_eq!(page_rank("", "", "github.com", &reputable()), 11.0);
        assert_eq!(page_rank("", "", "notgithub.com", &reputable()), 1.0);
        assert_eq!(page_rank("", "", "github.com.evil.net", &reputable()), 1.0);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let content = "word ".repeat(900);
        let first = page_rank(&content, "A descriptive title", "en.wikipedia.org", &reputable());
        let second = page_rank(&content, "A descriptive title", "en.wikipedia.org", &reputable());
        assert_eq!(first, second);
        assert_eq!(first, 17.5);
    }
}
