//! Segmentation: raw string → ordered tokens.
//!
//! The classifier only needs tokens that never straddle a keyword, so the
//! built-in segmenter is a forward maximum matcher over a small user
//! dictionary built from the registry.

use std::collections::HashMap;
use tracing::debug;

use crate::registry::KeywordRegistry;

/// A run shorter than this is taken as a surname, and a role marker after
/// it stays attached (李老师).
const MIN_NAME_CHARS: usize = 2;

/// Splits text into tokens that, concatenated in order, give back the text.
pub trait Segmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordKind {
    /// Always its own token.
    Keyword,
    /// Its own token at the start of a run or after a name-length run.
    Marker,
    /// Kept inside the surrounding run.
    Protected,
}

/// Forward maximum matching against a user dictionary.
///
/// At each position the longest dictionary word wins. Characters outside any
/// word are grouped: a run of letters/digits/ideographs is one token, a run
/// of whitespace is one token, and every other character (punctuation,
/// symbols) stands alone.
#[derive(Debug, Clone, Default)]
pub struct DictionarySegmenter {
    words: HashMap<String, WordKind>,
    /// Longest word in chars; bounds the lookahead.
    max_word_len: usize,
}

impl DictionarySegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary for a registry: every organization keyword, every
    /// multi-character role marker, and the excluded keywords as protected
    /// words.
    pub fn for_registry(registry: &KeywordRegistry) -> Self {
        let mut segmenter = Self::new();

        for keyword in registry.organization_keywords().iter() {
            segmenter.add_word(keyword);
        }
        // single-char markers such as 学 would split names apart
        for marker in registry.role_markers().iter() {
            if marker.chars().count() > 1 {
                segmenter.add_marker(marker);
            }
        }
        for keyword in registry.organization.excluded_keywords.iter() {
            segmenter.protect_word(keyword);
        }

        debug!(words = segmenter.len(), "segmenter dictionary built");
        segmenter
    }

    /// Add a word that always becomes its own token.
    pub fn add_word(&mut self, word: &str) -> bool {
        self.insert(word, WordKind::Keyword)
    }

    /// Add a role marker. It is split off a run only when the run is empty
    /// or long enough to be a name. An existing keyword keeps its kind.
    pub fn add_marker(&mut self, word: &str) -> bool {
        if self.words.contains_key(word) {
            return false;
        }
        self.insert(word, WordKind::Marker)
    }

    /// Keep `word` inside the surrounding run: no dictionary word is
    /// matched starting within it. Replaces a keyword or marker entry.
    pub fn protect_word(&mut self, word: &str) -> bool {
        self.insert(word, WordKind::Protected)
    }

    pub fn del_word(&mut self, word: &str) -> bool {
        let removed = self.words.remove(word).is_some();
        if removed {
            self.max_word_len = self
                .words
                .keys()
                .map(|w| w.chars().count())
                .max()
                .unwrap_or(0);
        }
        removed
    }

    /// Whether `word` is split out as a token of its own.
    pub fn contains_word(&self, word: &str) -> bool {
        matches!(
            self.words.get(word),
            Some(WordKind::Keyword | WordKind::Marker)
        )
    }

    pub fn is_protected(&self, word: &str) -> bool {
        self.words.get(word) == Some(&WordKind::Protected)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn insert(&mut self, word: &str, kind: WordKind) -> bool {
        if word.is_empty() {
            return false;
        }
        self.max_word_len = self.max_word_len.max(word.chars().count());
        self.words.insert(word.to_string(), kind) != Some(kind)
    }

    /// Longest dictionary word starting at `start`, given the chars already
    /// pending in the current run.
    fn word_at(
        &self,
        chars: &[char],
        start: usize,
        run_len: usize,
    ) -> Option<(usize, WordKind)> {
        let marker_splits = run_len == 0 || run_len >= MIN_NAME_CHARS;
        let limit = self.max_word_len.min(chars.len() - start);

        (1..=limit).rev().find_map(|len| {
            let candidate: String = chars[start..start + len].iter().collect();
            match self.words.get(&candidate) {
                Some(WordKind::Marker) if !marker_splits => None,
                Some(&kind) => Some((len, kind)),
                None => None,
            }
        })
    }
}

impl Segmenter for DictionarySegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut run = String::new();
        let mut run_len = 0;
        let mut i = 0;

        while i < chars.len() {
            match self.word_at(&chars, i, run_len) {
                Some((len, WordKind::Protected)) => {
                    run.extend(&chars[i..i + len]);
                    run_len += len;
                    i += len;
                    continue;
                }
                Some((len, _)) => {
                    flush(&mut run, &mut run_len, &mut tokens);
                    tokens.push(chars[i..i + len].iter().collect());
                    i += len;
                    continue;
                }
                None => {}
            }

            let c = chars[i];
            if c.is_alphanumeric() {
                run.push(c);
                run_len += 1;
                i += 1;
            } else if c.is_whitespace() {
                flush(&mut run, &mut run_len, &mut tokens);
                let start = i;
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                tokens.push(chars[start..i].iter().collect());
            } else {
                flush(&mut run, &mut run_len, &mut tokens);
                tokens.push(c.to_string());
                i += 1;
            }
        }
        flush(&mut run, &mut run_len, &mut tokens);

        tokens
    }
}

fn flush(run: &mut String, run_len: &mut usize, tokens: &mut Vec<String>) {
    if !run.is_empty() {
        tokens.push(std::mem::take(run));
    }
    *run_len = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter(words: &[&str]) -> DictionarySegmenter {
        let mut s = DictionarySegmenter::new();
        for w in words {
            s.add_word(w);
        }
        s
    }

    #[test]
    fn test_keyword_boundaries() {
        let s = segmenter(&["大学", "学院", "学生"]);
        assert_eq!(
            s.segment("天津理工大学计算机科学与工程学院江小白学生"),
            vec!["天津理工", "大学", "计算机科学与工程", "学院", "江小白", "学生"]
        );
    }

    #[test]
    fn test_punctuation_and_whitespace() {
        let s = segmenter(&["学院"]);
        assert_eq!(
            s.segment("黄淮学院—潘豫皖  x"),
            vec!["黄淮", "学院", "—", "潘豫皖", "  ", "x"]
        );
    }

    #[test]
    fn test_longest_word_wins() {
        let s = segmenter(&["研究生", "研究生院"]);
        assert_eq!(s.segment("北京研究生院"), vec!["北京", "研究生院"]);
    }

    #[test]
    fn test_tokens_reconstruct_input() {
        let s = segmenter(&["大学", "哈理工", "老师"]);
        for text in ["哈理工   王老五，刘老六", "北京大学@!李四", "", "  \t", "李老师(教)"] {
            assert_eq!(s.segment(text).concat(), text);
        }
    }

    #[test]
    fn test_del_word() {
        let mut s = segmenter(&["路飞", "学院"]);
        assert_eq!(s.segment("安阳学院路飞燕"), vec!["安阳", "学院", "路飞", "燕"]);
        assert!(s.del_word("路飞"));
        assert!(!s.del_word("路飞"));
        assert_eq!(s.segment("安阳学院路飞燕"), vec!["安阳", "学院", "路飞燕"]);
    }

    #[test]
    fn test_registry_dictionary() {
        let mut registry = crate::registry::test_registry();
        registry.add_excluded_keywords(["College"]);
        let s = DictionarySegmenter::for_registry(&registry);
        assert!(s.contains_word("University"));
        assert!(s.contains_word("HeGongDa"));
        assert!(s.contains_word("(Student)"));
        assert!(!s.contains_word("College"));
        assert!(s.is_protected("College"));
        assert_eq!(
            s.segment("HenanUniversity WangWu"),
            vec!["Henan", "University", " ", "WangWu"]
        );
        assert_eq!(s.segment("HuangHuaiCollege"), vec!["HuangHuaiCollege"]);
    }

    #[test]
    fn test_marker_stays_after_surname() {
        let mut s = segmenter(&["学院"]);
        s.add_marker("老师");
        s.add_marker("学生");
        assert_eq!(s.segment("商丘学院-李老师"), vec!["商丘", "学院", "-", "李老师"]);
        assert_eq!(s.segment("刘诗诗老师"), vec!["刘诗诗", "老师"]);
        assert_eq!(s.segment("学生栗肃"), vec!["学生", "栗肃"]);
        assert_eq!(s.segment("郭学强老师学生"), vec!["郭学强", "老师", "学生"]);
        assert_eq!(s.segment("李 老师"), vec!["李", " ", "老师"]);
    }

    #[test]
    fn test_marker_never_overrides_keyword() {
        let mut s = segmenter(&["研究生院"]);
        assert!(!s.add_marker("研究生院"));
        assert_eq!(s.segment("李研究生院"), vec!["李", "研究生院"]);
    }

    #[test]
    fn test_protected_word_stays_in_run() {
        let mut s = segmenter(&["大学"]);
        s.add_marker("学生");
        assert_eq!(s.segment("河南大学张大学生"), vec!["河南", "大学", "张", "大学", "生"]);

        assert!(s.protect_word("张大"));
        assert!(!s.contains_word("张大"));
        assert_eq!(s.segment("河南大学张大学生"), vec!["河南", "大学", "张大", "学生"]);
        assert_eq!(s.segment("河南大学张大学生").concat(), "河南大学张大学生");
    }
}
