use regex::Regex;
use serde::{Deserialize, Serialize};
use std::mem;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::classify::Classification;
use crate::error::{Error, Result};
use crate::keywords::KeywordSet;
use crate::registry::KeywordRegistry;

pub const ORGANIZATION_PLACEHOLDER: &str = "organization";
pub const NAME_PLACEHOLDER: &str = "name";

// `{{` and `}}` are literal braces, `{key}` is a placeholder, and any other
// brace is unbalanced.
static RE_TEMPLATE_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Organization,
    Name,
}

/// An output template such as `{organization}-{name}（教师）`.
///
/// Parsed once when the registry is loaded; in YAML it is the plain
/// template string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputPattern {
    source: String,
    pieces: Vec<Piece>,
}

impl OutputPattern {
    /// Parse a template; fails on a placeholder other than `{organization}`
    /// and `{name}`, or on a stray brace.
    pub fn parse(template: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in RE_TEMPLATE_BRACE.captures_iter(template) {
            let Some(m) = caps.get(0) else { continue };
            literal.push_str(&template[last..m.start()]);
            last = m.end();

            let piece = match m.as_str() {
                "{{" => {
                    literal.push('{');
                    continue;
                }
                "}}" => {
                    literal.push('}');
                    continue;
                }
                "{" | "}" => {
                    return Err(Error::Format(format!(
                        "unbalanced brace at byte {} in {template:?}",
                        m.start()
                    )));
                }
                _ => match caps.get(1).map_or("", |k| k.as_str()) {
                    ORGANIZATION_PLACEHOLDER => Piece::Organization,
                    NAME_PLACEHOLDER => Piece::Name,
                    other => {
                        return Err(Error::Format(format!(
                            "unknown placeholder {{{other}}} in {template:?}"
                        )));
                    }
                },
            };

            if !literal.is_empty() {
                pieces.push(Piece::Literal(mem::take(&mut literal)));
            }
            pieces.push(piece);
        }

        literal.push_str(&template[last..]);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn render(&self, organization: &str, name: &str) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Organization => out.push_str(organization),
                Piece::Name => out.push_str(name),
            }
        }
        out
    }
}

impl TryFrom<String> for OutputPattern {
    type Error = Error;

    fn try_from(template: String) -> Result<Self> {
        Self::parse(&template)
    }
}

impl From<OutputPattern> for String {
    fn from(pattern: OutputPattern) -> Self {
        pattern.source
    }
}

/// Remove every occurrence of every separator, then trim.
pub fn strip_separators(text: &str, separators: &KeywordSet) -> String {
    let mut cleaned = text.to_string();
    for separator in separators.iter() {
        if cleaned.contains(separator) {
            cleaned = cleaned.replace(separator, "");
        }
    }
    cleaned.trim().to_string()
}

/// Final output fields of one parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub organization: String,
    pub name: String,
    pub instructor: bool,
    pub formatted: String,
}

/// Join, clean and default the classified tokens, then render the pattern
/// selected by the instructor flag.
pub fn finalize(classification: &Classification, registry: &KeywordRegistry) -> Fields {
    let separators = &registry.formatting.separators;

    let organization =
        if classification.organization_closed && !classification.organization_tokens.is_empty() {
            let organization =
                strip_separators(&classification.organization_tokens.concat(), separators);
            debug!(%organization, "organization recognized");
            organization
        } else {
            let fallback = registry.organization.default_name.clone();
            warn!(%fallback, "no organization recognized, using default");
            fallback
        };

    let mut name = strip_separators(&classification.name_tokens.concat(), separators);
    if name.is_empty() {
        name = registry.name.default_name.clone();
        warn!(fallback = %name, "no name recognized, using default");
    } else {
        debug!(%name, "name recognized");
    }

    let pattern = if classification.instructor {
        &registry.formatting.instructor_pattern
    } else {
        &registry.formatting.non_instructor_pattern
    };
    let formatted = pattern.render(&organization, &name);

    Fields {
        organization,
        name,
        instructor: classification.instructor,
        formatted,
    }
}
