use serde::{Deserialize, Serialize};

/// A set of keywords with a fixed match priority.
///
/// Keywords are kept longest first (by character count); keywords of equal
/// length keep their insertion order. `first_within` walks them in that
/// order, so "职业技术学院" is reported before "学院" when a token contains
/// both, and the result never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword at its priority position. Empty strings and duplicates
    /// are ignored; returns whether the set changed.
    pub fn insert(&mut self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        if keyword.is_empty() || self.contains(&keyword) {
            return false;
        }

        let len = keyword.chars().count();
        let at = self
            .keywords
            .iter()
            .position(|k| k.chars().count() < len)
            .unwrap_or(self.keywords.len());
        self.keywords.insert(at, keyword);
        true
    }

    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            self.insert(keyword);
        }
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    /// Exact membership.
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// The highest-priority keyword occurring anywhere inside `token`.
    pub fn first_within(&self, token: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| token.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn union(&self, other: &KeywordSet) -> KeywordSet {
        let mut merged = self.clone();
        merged.extend(other.iter());
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        keywords.into_iter().collect()
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_first_then_insertion_order() {
        let set: KeywordSet = ["学院", "大学", "职业技术学院", "系", "研究院"]
            .into_iter()
            .collect();
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec!["职业技术学院", "研究院", "学院", "大学", "系"]);
    }

    #[test]
    fn test_first_within_prefers_longer_keyword() {
        let set: KeywordSet = ["学院", "职业技术学院"].into_iter().collect();
        assert_eq!(set.first_within("河南职业技术学院"), Some("职业技术学院"));
        assert_eq!(set.first_within("黄淮学院"), Some("学院"));
        assert_eq!(set.first_within("潘豫皖"), None);
    }

    #[test]
    fn test_empty_and_duplicate_ignored() {
        let mut set = KeywordSet::new();
        assert!(set.insert("大学"));
        assert!(!set.insert("大学"));
        assert!(!set.insert(""));
        assert_eq!(set.len(), 1);
        // an empty keyword would otherwise match every token
        assert_eq!(set.first_within("杨怡宁"), None);
    }

    #[test]
    fn test_remove_and_union() {
        let mut a: KeywordSet = ["教师", "老师"].into_iter().collect();
        let b: KeywordSet = ["学生", "老师"].into_iter().collect();
        let all = a.union(&b);
        assert_eq!(all.len(), 3);
        assert!(all.contains("学生"));

        assert!(a.remove("老师"));
        assert!(!a.remove("老师"));
        assert!(!a.contains("老师"));
    }

    #[test]
    fn test_deserialize_from_list() {
        let set: KeywordSet = serde_json::from_str(r#"["学", "学生", "学生"]"#).unwrap();
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec!["学生", "学"]);
    }
}
