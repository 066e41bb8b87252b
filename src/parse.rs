use tracing::debug;

use crate::classify::classify;
use crate::format::finalize;
use crate::registry::KeywordRegistry;
use crate::segment::{DictionarySegmenter, Segmenter};
use applicant_types::{ApplicantResult, Role};

/// Parse an already segmented input.
///
/// Never fails: unrecognized parts fall back to the registry defaults, and
/// the output patterns were checked when the registry was loaded.
pub fn parse_tokens(
    input: &str,
    tokens: Vec<String>,
    registry: &KeywordRegistry,
) -> ApplicantResult {
    let classification = classify(&tokens, registry);
    let fields = finalize(&classification, registry);

    ApplicantResult::new(
        input.to_string(),
        tokens,
        fields.organization,
        fields.name,
        Role::from_instructor_flag(fields.instructor),
        fields.formatted,
    )
}

/// Segment `input` and parse it against one registry snapshot.
pub fn parse(
    input: &str,
    segmenter: &dyn Segmenter,
    registry: &KeywordRegistry,
) -> ApplicantResult {
    let tokens = segmenter.segment(input);
    debug!(?tokens, "segmented input");
    parse_tokens(input, tokens, registry)
}

/// A registry together with the segmenter dictionary built from it.
///
/// Both halves come from the same keywords, so tokens line up with keyword
/// boundaries.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: KeywordRegistry,
    segmenter: DictionarySegmenter,
}

impl Engine {
    pub fn new(registry: KeywordRegistry) -> Self {
        let segmenter = DictionarySegmenter::for_registry(&registry);
        Self {
            registry,
            segmenter,
        }
    }

    pub fn registry(&self) -> &KeywordRegistry {
        &self.registry
    }

    pub fn segmenter(&self) -> &DictionarySegmenter {
        &self.segmenter
    }

    pub fn segment(&self, input: &str) -> Vec<String> {
        self.segmenter.segment(input)
    }

    pub fn parse(&self, input: &str) -> ApplicantResult {
        parse(input, &self.segmenter, &self.registry)
    }
}
