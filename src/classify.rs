//! Single-pass token classifier.
//!
//! Every token goes to exactly one of: the organization, the name, or the
//! bin (role markers, separators lost to a reset, dropped short suffixes).
//!
//! The organization is scanned first and stays open until a token closes
//! it. After that, tokens build the name; a token that looks like another
//! organization (a 学院 after a 大学) means the name fragments collected so
//! far were really a sub-unit, so they are discarded or, with
//! `include_secondary_unit`, folded into the organization.

use std::mem;
use tracing::debug;

use crate::keywords::KeywordSet;
use crate::registry::KeywordRegistry;

/// Token split produced by [`classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub organization_tokens: Vec<String>,
    pub name_tokens: Vec<String>,
    /// Once set, no further token is considered for the organization.
    pub organization_closed: bool,
    /// Latches on the first instructor marker.
    pub instructor: bool,
}

/// Classify `tokens` left to right. Blank tokens are skipped; the result
/// depends only on `tokens` and `registry`.
pub fn classify<S: AsRef<str>>(tokens: &[S], registry: &KeywordRegistry) -> Classification {
    let role_markers = registry.role_markers();
    let organization_keywords = registry.organization_keywords();
    let mut state = Classification::default();

    for raw in tokens {
        let token = raw.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        debug!(token, "classifying token");

        if !state.instructor {
            if let Some(marker) = registry.identity.instructor.first_within(token) {
                state.instructor = true;
                debug!(marker, "instructor marker found");
            }
        }

        if !state.organization_closed {
            state.scan_organization(token, registry);
        } else {
            state.scan_name(
                token,
                &role_markers,
                &organization_keywords,
                registry.formatting.include_secondary_unit,
            );
        }
    }

    state
}

impl Classification {
    fn scan_organization(&mut self, token: &str, registry: &KeywordRegistry) {
        self.organization_tokens.push(token.to_string());
        debug!(token, "added to organization");

        if let Some(keyword) = registry.organization.abbreviations.first_within(token) {
            self.organization_closed = true;
            debug!(keyword, "organization closed by abbreviation");
            return;
        }

        if let Some(keyword) = registry.organization.suffixes.first_within(token) {
            // A lone 1-2 char suffix (e.g. a bare 学院) is too ambiguous to
            // end the organization; drop it.
            if self.organization_tokens.len() > 1 || token.chars().count() > 2 {
                self.organization_closed = true;
                debug!(keyword, "organization closed by suffix");
            } else {
                self.organization_tokens.pop();
                debug!(keyword, token, "dropped lone short suffix");
            }
        }
    }

    fn scan_name(
        &mut self,
        token: &str,
        role_markers: &KeywordSet,
        organization_keywords: &KeywordSet,
        include_secondary_unit: bool,
    ) {
        if role_markers.contains(token) {
            debug!(token, "skipped role marker");
            return;
        }

        if let Some(keyword) = organization_keywords.first_within(token) {
            if include_secondary_unit {
                self.name_tokens.push(token.to_string());
                let unit = mem::take(&mut self.name_tokens);
                self.organization_tokens.extend(unit);
            }
            self.name_tokens.clear();
            debug!(keyword, token, "organization keyword in name part, name reset");
            return;
        }

        self.name_tokens.push(token.to_string());
        debug!(token, "added to name");
    }
}
