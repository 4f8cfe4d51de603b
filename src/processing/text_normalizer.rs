//! Text normalization for skill lists and free text

use crate::processing::skill_set::SkillSet;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Canonicalizes raw skill input into comparable `SkillSet`s.
pub struct TextNormalizer {
    stop_words: HashSet<&'static str>,
    irregular_lemmas: HashMap<&'static str, &'static str>,
    whitespace_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            stop_words: Self::create_stop_words(),
            irregular_lemmas: Self::create_irregular_lemmas(),
            whitespace_regex,
        }
    }

    /// Normalize a comma separated skill list.
    ///
    /// Each comma separated fragment is one skill: whitespace is collapsed,
    /// the text lowercased, every word lemmatized and stop-words dropped.
    /// Fragments that end up empty are discarded. A string with no comma is
    /// a single skill.
    pub fn normalize(&self, text: &str) -> SkillSet {
        split_skill_list(text)
            .filter_map(|fragment| self.normalize_phrase(fragment))
            .collect()
    }

    /// Normalize free text where every word is a candidate skill
    pub fn normalize_free_text(&self, text: &str) -> SkillSet {
        let cleaned = self.collapse_whitespace(&text.to_lowercase());

        cleaned
            .unicode_words()
            .map(|word| self.lemmatize(word))
            .filter(|lemma| !self.is_stop_word(lemma))
            .collect()
    }

    /// Re-run normalization over a set that may have been built by hand
    pub fn renormalize(&self, skills: &SkillSet) -> SkillSet {
        skills
            .iter()
            .flat_map(|skill| split_skill_list(skill).collect::<Vec<_>>())
            .filter_map(|fragment| self.normalize_phrase(fragment))
            .collect()
    }

    /// Normalize a single skill phrase, `None` if nothing survives
    pub fn normalize_phrase(&self, phrase: &str) -> Option<String> {
        let lowered = self.collapse_whitespace(&phrase.to_lowercase());

        let words: Vec<String> = lowered
            .split(' ')
            .map(strip_punctuation)
            .filter(|word| !word.is_empty())
            .map(|word| self.lemmatize(word))
            .filter(|lemma| !self.is_stop_word(lemma))
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }

    /// Reduce an English word to its lemma.
    ///
    /// Only plural nouns are reduced. Short words and words with
    /// non-alphabetic characters (`c++`, `node.js`, `s3`) pass through.
    /// The result is a fixed point: lemmatizing it again changes nothing.
    pub fn lemmatize(&self, word: &str) -> String {
        let mut current = word.to_lowercase();
        loop {
            let next = self.lemma_step(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn lemma_step(&self, word: &str) -> String {
        if let Some(lemma) = self.irregular_lemmas.get(word) {
            return lemma.to_string();
        }

        if word.chars().count() < 4 || !word.chars().all(|c| c.is_alphabetic()) {
            return word.to_string();
        }

        if word.len() > 4 && word.ends_with("ies") {
            return format!("{}y", &word[..word.len() - 3]);
        }

        for suffix in ["sses", "shes", "ches", "xes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }

        for protected in ["ss", "us", "is", "os", "as"] {
            if word.ends_with(protected) {
                return word.to_string();
            }
        }

        match word.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => word.to_string(),
        }
    }

    fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }

    /// English function words that carry no skill meaning
    fn create_stop_words() -> HashSet<&'static str> {
        [
            "a", "an", "and", "are", "as", "at", "be", "been", "being", "by", "for",
            "from", "has", "have", "had", "in", "into", "is", "of", "on", "or", "that",
            "the", "this", "these", "those", "to", "was", "were", "will", "with",
            "within", "using", "via", "etc", "per", "such", "than", "then", "also",
            "both", "each", "either", "nor", "not", "our", "your", "their", "we",
            "you", "they", "he", "she", "i", "me", "my",
        ]
        .into_iter()
        .collect()
    }

    fn create_irregular_lemmas() -> HashMap<&'static str, &'static str> {
        [
            ("analyses", "analysis"),
            ("analytics", "analytics"),
            ("caches", "cache"),
            ("children", "child"),
            ("criteria", "criterion"),
            ("devops", "devops"),
            ("indices", "index"),
            ("jenkins", "jenkins"),
            ("kubernetes", "kubernetes"),
            ("matrices", "matrix"),
            ("niches", "niche"),
            ("people", "person"),
            ("series", "series"),
            ("species", "species"),
            ("vertices", "vertex"),
            ("windows", "windows"),
        ]
        .into_iter()
        .collect()
    }
}

/// Split a raw comma separated skill string into trimmed, non-empty fragments.
///
/// Case is preserved; this is the raw view used for market demand counts.
pub fn split_skill_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Trim wrapping punctuation until the token is stable. A leading dot
/// (`.net`) and inner dots (`node.js`) are kept.
fn strip_punctuation(word: &str) -> &str {
    let mut current = word;
    loop {
        let next = current
            .trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\'' | ';' | ':' | '!' | '?'))
            .trim_end_matches('.');
        if next == current {
            return current;
        }
        current = next;
    }
}
