//! Contact resolution with fuzzy matching.
//!
//! Candidate person names are capitalized one- or two-token sequences in
//! the raw text, filtered against an exclusion vocabulary so sentence
//! structure ("Meeting", "Tuesday", "March") is not mistaken for a name.
//! Each surviving candidate resolves against the contact catalog: exact
//! case-insensitive full-name match first, then token-level fuzzy matching,
//! and failing both it is reported as an unresolved name rather than
//! discarded.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{ContactMatch, Resolution};
use crate::store::Contact;

/// Default maximum normalized edit distance accepted by the fuzzy step.
pub const FUZZY_THRESHOLD: f32 = 0.3;

/// Minimum candidate length; shorter capitalized words are rarely names.
const MIN_CANDIDATE_LEN: usize = 3;

// ============================================================================
// Contact Resolver
// ============================================================================

/// Resolves person-name candidates in text against a contact catalog.
pub struct ContactResolver {
    /// Maximum normalized edit distance for a fuzzy hit.
    threshold: f32,
}

impl Default for ContactResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactResolver {
    /// Create a resolver with the default fuzzy threshold.
    pub fn new() -> Self {
        Self {
            threshold: FUZZY_THRESHOLD,
        }
    }

    /// Create a resolver with a custom fuzzy threshold.
    pub fn with_threshold(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Extract candidates from the raw text and resolve each against the
    /// catalog. Returns one [`Resolution`] per unique candidate, in order
    /// of first appearance.
    pub fn resolve(&self, text: &str, catalog: &[Contact]) -> Vec<Resolution> {
        self.candidates(text)
            .into_iter()
            .map(|name| self.resolve_candidate(&name, catalog))
            .collect()
    }

    /// Candidate extraction: capitalized one- or two-token sequences,
    /// deduplicated in first-seen order.
    fn candidates(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for cap in NAME_PATTERN.captures_iter(text) {
            let name = cap[1].to_string();
            if name.len() < MIN_CANDIDATE_LEN || is_excluded(&name) {
                continue;
            }
            if seen.insert(name.to_lowercase()) {
                names.push(name);
            }
        }

        names
    }

    /// Exact match always precedes fuzzy, so exact spellings can never be
    /// captured by a near-miss on another contact.
    fn resolve_candidate(&self, name: &str, catalog: &[Contact]) -> Resolution {
        let name_lower = name.to_lowercase();

        if let Some(contact) = catalog
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
        {
            return Resolution::Exact(ContactMatch {
                contact_id: contact.id.clone(),
                name: contact.name.clone(),
                score: 1.0,
            });
        }

        let best = catalog
            .iter()
            .map(|contact| (contact, fuzzy_distance(&name_lower, contact)))
            .filter(|(_, distance)| *distance <= self.threshold)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((contact, distance)) => Resolution::Fuzzy(ContactMatch {
                contact_id: contact.id.clone(),
                name: contact.name.clone(),
                score: 1.0 - distance,
            }),
            None => Resolution::Unresolved {
                name: name.to_string(),
            },
        }
    }
}

// ============================================================================
// Fuzzy matching
// ============================================================================

/// Token-level similarity over the contact's name and company fields.
///
/// The candidate is compared against each whole field and each field token;
/// the distance is the best (lowest) normalized Levenshtein distance found.
/// "Sarah" against "Sarah Johnson" scores 0.0 via the first-name token.
fn fuzzy_distance(candidate_lower: &str, contact: &Contact) -> f32 {
    let mut best = f32::MAX;

    let mut fields = vec![contact.name.as_str()];
    if let Some(company) = contact.company.as_deref() {
        fields.push(company);
    }

    for field in fields {
        let field_lower = field.to_lowercase();
        best = best.min(normalized_levenshtein(candidate_lower, &field_lower));
        for token in field_lower.split_whitespace() {
            best = best.min(normalized_levenshtein(candidate_lower, token));
        }
    }

    best
}

/// Levenshtein distance scaled by the longer string's length, in [0, 1].
fn normalized_levenshtein(a: &str, b: &str) -> f32 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    strsim::levenshtein(a, b) as f32 / longest as f32
}

// ============================================================================
// Exclusion vocabulary
// ============================================================================

/// Capitalized words that are sentence structure, not names: action
/// keywords, month names, weekday names, and common connectives.
static EXCLUDE_WORDS: &[&str] = &[
    // Action keywords
    "Meeting", "Call", "Email", "Text", "Send", "Schedule", "Remind", "Follow", "Check", "Reach",
    "Touch", "Introduce", "Connect", "Share", "Forward",
    // Months
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
    // Days
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    // Common words
    "Today", "Tomorrow", "Next", "This", "Last", "Week", "Month", "Year", "The", "And", "Or",
    "But", "For", "With", "About", "From", "To",
];

/// A candidate is excluded when it stands in a mutual case-insensitive
/// prefix relation with any vocabulary word, so "Mee" is dropped via
/// "Meeting" and "Marching" via "March".
fn is_excluded(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    EXCLUDE_WORDS.iter().any(|word| {
        let word_lower = word.to_lowercase();
        word_lower.starts_with(&name_lower) || name_lower.starts_with(&word_lower)
    })
}

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)\b").expect("Invalid regex"));

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Contact> {
        vec![
            Contact::with_id("c1", "Sarah Johnson").with_company("Acme Corp"),
            Contact::with_id("c2", "Mike Chen").with_company("StartupXYZ"),
            Contact::with_id("c3", "Alex Parker"),
            Contact::with_id("c4", "Alexandra Smith"),
        ]
    }

    fn single_match(resolutions: &[Resolution]) -> &ContactMatch {
        let matched: Vec<_> = resolutions.iter().filter_map(|r| r.matched()).collect();
        assert_eq!(matched.len(), 1, "expected one match in {resolutions:?}");
        matched[0]
    }

    #[test]
    fn test_exact_match_scores_one() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("coffee with Sarah Johnson", &catalog());

        let hit = single_match(&resolutions);
        assert_eq!(hit.contact_id, "c1");
        assert_eq!(hit.score, 1.0);
        assert!(matches!(resolutions[0], Resolution::Exact(_)));
    }

    #[test]
    fn test_first_name_resolves_fuzzily() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Follow up with Sarah next Tuesday", &catalog());

        let hit = single_match(&resolutions);
        assert_eq!(hit.contact_id, "c1");
        assert!(hit.score > 0.7);
    }

    #[test]
    fn test_misspelling_within_threshold() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Ping Sara about the deck", &catalog());

        let hit = single_match(&resolutions);
        assert_eq!(hit.contact_id, "c1");
        assert!(hit.score < 1.0);
    }

    #[test]
    fn test_company_field_participates() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Hand off to Acme", &catalog());

        let hit = single_match(&resolutions);
        assert_eq!(hit.contact_id, "c1");
    }

    #[test]
    fn test_unresolved_names_are_kept_not_discarded() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Georgetown trip in 3 days", &catalog());

        assert_eq!(
            resolutions,
            vec![Resolution::Unresolved {
                name: "Georgetown".to_string()
            }]
        );
    }

    #[test]
    fn test_exact_beats_fuzzy_on_prefix_overlap() {
        // "Alex Parker" must hit c3 exactly, never drift to "Alexandra".
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Intro Alex Parker to the team", &catalog());

        let exact: Vec<_> = resolutions
            .iter()
            .filter(|r| matches!(r, Resolution::Exact(_)))
            .collect();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].matched().unwrap().contact_id, "c3");
    }

    #[test]
    fn test_structural_words_are_not_candidates() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Meeting next Tuesday in March", &catalog());
        assert!(resolutions.is_empty());
    }

    #[test]
    fn test_short_candidates_are_dropped() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Cc Al on the thread", &catalog());
        assert!(resolutions.is_empty());
    }

    #[test]
    fn test_candidates_deduplicate() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Sarah and Sarah again", &catalog());
        assert_eq!(resolutions.len(), 1);
    }

    #[test]
    fn test_two_token_candidate_shape() {
        let resolver = ContactResolver::new();
        let resolutions = resolver.resolve("Mike Chen and Alex Parker sync", &catalog());

        let ids: Vec<_> = resolutions
            .iter()
            .filter_map(|r| r.matched())
            .map(|m| m.contact_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c2", "c3"]);
    }
}
