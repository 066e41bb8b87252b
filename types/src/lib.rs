use serde::{Deserialize, Serialize};
use std::fmt;

// ── Role ─────────────────────────────────────────────────────────────────

/// Role marker carried by an applicant string.
///
/// Only instructor markers are actively detected; anything else is treated
/// as a non-instructor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 教师 / 老师
    Instructor,
    /// 学生, or no marker at all
    #[default]
    NonInstructor,
}

impl Role {
    pub fn from_instructor_flag(instructor: bool) -> Self {
        if instructor {
            Self::Instructor
        } else {
            Self::NonInstructor
        }
    }

    pub fn is_instructor(&self) -> bool {
        matches!(self, Self::Instructor)
    }

    pub fn as_chinese(&self) -> &'static str {
        match self {
            Self::Instructor => "教师",
            Self::NonInstructor => "学生",
        }
    }
}

// ── Parse result ─────────────────────────────────────────────────────────

/// The outcome of parsing one applicant string.
///
/// Produced once per parse and never mutated afterwards; a new parse yields
/// a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantResult {
    input: String,
    /// Segmentation of `input`, kept for display and debugging.
    tokens: Vec<String>,
    organization: String,
    name: String,
    role: Role,
    /// `organization` and `name` rendered through the output pattern for `role`.
    formatted: String,
}

impl ApplicantResult {
    pub fn new(
        input: String,
        tokens: Vec<String>,
        organization: String,
        name: String,
        role: Role,
        formatted: String,
    ) -> Self {
        Self {
            input,
            tokens,
            organization,
            name,
            role,
            formatted,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_instructor(&self) -> bool {
        self.role.is_instructor()
    }

    pub fn formatted(&self) -> &str {
        &self.formatted
    }
}

impl fmt::Display for ApplicantResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ApplicantResult {
        ApplicantResult::new(
            "黄淮学院—潘豫皖".into(),
            vec!["黄淮".into(), "学院".into(), "—".into(), "潘豫皖".into()],
            "黄淮学院".into(),
            "潘豫皖".into(),
            Role::NonInstructor,
            "黄淮学院-潘豫皖".into(),
        )
    }

    #[test]
    fn test_display_uses_formatted() {
        assert_eq!(sample().to_string(), "黄淮学院-潘豫皖");
    }

    #[test]
    fn test_role_flag() {
        assert_eq!(Role::from_instructor_flag(true), Role::Instructor);
        assert_eq!(Role::from_instructor_flag(false), Role::NonInstructor);
        assert!(!sample().is_instructor());
        assert_eq!(Role::default(), Role::NonInstructor);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["organization"], "黄淮学院");
        assert_eq!(json["role"], "non_instructor");
        assert_eq!(json["tokens"].as_array().map(Vec::len), Some(4));
    }
}
