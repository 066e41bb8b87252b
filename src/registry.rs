//! Keyword registry: the role markers, organization keywords, defaults and
//! output patterns a parse reads.
//!
//! A [`KeywordRegistry`] is a plain value. Parses borrow it immutably;
//! [`SharedRegistry`] is the long-lived handle that swaps whole snapshots in
//! when keywords are added or removed, so a parse in flight never sees a
//! half-updated set.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::format::OutputPattern;
use crate::keywords::KeywordSet;
use crate::parse::Engine;
use applicant_types::ApplicantResult;

// ── Sections ─────────────────────────────────────────────────────────────

/// Role markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityKeywords {
    /// 教师, 老师, …: substring match sets the instructor flag
    pub instructor: KeywordSet,
    /// 学生, 学, …: never tested for the flag, only dropped from names
    pub non_instructor: KeywordSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    pub instructor_pattern: OutputPattern,
    pub non_instructor_pattern: OutputPattern,
    /// Removed character-wise from the joined organization and name.
    pub separators: KeywordSet,
    /// Fold a secondary unit (e.g. 计算机学院) into the organization.
    #[serde(default)]
    pub include_secondary_unit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationKeywords {
    /// 大学, 学院, …
    pub suffixes: KeywordSet,
    /// 哈理工, 河工大, …: closes the organization on sight
    #[serde(default)]
    pub abbreviations: KeywordSet,
    /// Words the segmenter keeps inside the surrounding run, so no keyword
    /// is split out of them (a name such as 张大 before 学生).
    #[serde(default)]
    pub excluded_keywords: KeywordSet,
    pub default_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDefaults {
    pub default_name: String,
}

// ── Registry snapshot ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRegistry {
    pub identity: IdentityKeywords,
    pub formatting: Formatting,
    pub organization: OrganizationKeywords,
    pub name: NameDefaults,
}

impl KeywordRegistry {
    /// Suffixes and abbreviations: anything that marks an organization.
    pub fn organization_keywords(&self) -> KeywordSet {
        self.organization
            .suffixes
            .union(&self.organization.abbreviations)
    }

    /// Instructor and non-instructor markers together.
    pub fn role_markers(&self) -> KeywordSet {
        self.identity.instructor.union(&self.identity.non_instructor)
    }

    pub fn add_abbreviations<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organization.abbreviations.extend(keywords);
    }

    pub fn add_excluded_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organization.excluded_keywords.extend(keywords);
    }

    /// Drop keywords from every organization keyword set.
    pub fn remove_keywords<'a, I>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for keyword in keywords {
            self.organization.suffixes.remove(keyword);
            self.organization.abbreviations.remove(keyword);
            self.organization.excluded_keywords.remove(keyword);
        }
    }

    /// Check everything a parse relies on.
    pub fn validate(&self) -> Result<()> {
        if self.identity.instructor.is_empty() {
            return Err(Error::Config(
                "identity.instructor must list at least one marker".into(),
            ));
        }
        if self.organization.suffixes.is_empty() {
            return Err(Error::Config(
                "organization.suffixes must list at least one keyword".into(),
            ));
        }
        if self.organization.default_name.trim().is_empty() {
            return Err(Error::Config("organization.default_name is empty".into()));
        }
        if self.name.default_name.trim().is_empty() {
            return Err(Error::Config("name.default_name is empty".into()));
        }
        Ok(())
    }
}

// ── Shared handle ────────────────────────────────────────────────────────

/// Read-mostly registry shared between threads.
///
/// Readers clone an `Arc<Engine>` and keep it for the whole parse. Writers
/// clone the current registry, change it, rebuild the segmenter dictionary
/// and swap the new engine in under the write lock.
pub struct SharedRegistry {
    current: RwLock<Arc<Engine>>,
}

impl SharedRegistry {
    pub fn new(registry: KeywordRegistry) -> Result<Self> {
        registry.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(Engine::new(registry))),
        })
    }

    pub fn snapshot(&self) -> Arc<Engine> {
        Arc::clone(&self.current.read())
    }

    pub fn parse(&self, input: &str) -> ApplicantResult {
        self.snapshot().parse(input)
    }

    /// Apply `change` to a copy of the registry and publish it if it still
    /// validates. On error the current snapshot stays in place.
    pub fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut KeywordRegistry),
    {
        let mut current = self.current.write();
        let mut registry = current.registry().clone();
        change(&mut registry);
        registry.validate()?;

        let engine = Engine::new(registry);
        info!(
            dictionary_words = engine.segmenter().len(),
            "keyword registry updated"
        );
        *current = Arc::new(engine);
        Ok(())
    }

    pub fn replace(&self, registry: KeywordRegistry) -> Result<()> {
        self.update(|current| *current = registry)
    }

    pub fn add_abbreviations(&self, keywords: &[String]) -> Result<()> {
        self.update(|registry| registry.add_abbreviations(keywords.iter().cloned()))
    }

    pub fn add_excluded_keywords(&self, keywords: &[String]) -> Result<()> {
        self.update(|registry| registry.add_excluded_keywords(keywords.iter().cloned()))
    }

    pub fn remove_keywords(&self, keywords: &[String]) -> Result<()> {
        self.update(|registry| registry.remove_keywords(keywords.iter().map(String::as_str)))
    }
}

#[cfg(test)]
pub(crate) fn pattern(template: &str) -> OutputPattern {
    OutputPattern::parse(template).unwrap()
}

/// Small registry with ASCII keywords, shared by unit tests.
#[cfg(test)]
pub(crate) fn test_registry() -> KeywordRegistry {
    KeywordRegistry {
        identity: IdentityKeywords {
            instructor: ["Teacher", "(Teacher)"].into_iter().collect(),
            non_instructor: ["Student", "(Student)"].into_iter().collect(),
        },
        formatting: Formatting {
            instructor_pattern: pattern("{organization}-{name}(Teacher)"),
            non_instructor_pattern: pattern("{organization}-{name}"),
            separators: ["—", "-", "(", ")"].into_iter().collect(),
            include_secondary_unit: false,
        },
        organization: OrganizationKeywords {
            suffixes: ["University", "College"].into_iter().collect(),
            abbreviations: ["HeGongDa"].into_iter().collect(),
            excluded_keywords: KeywordSet::new(),
            default_name: "UnknownOrg".into(),
        },
        name: NameDefaults {
            default_name: "Anonymous".into(),
        },
    }
}
