//! Normalized skill sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of normalized skill strings.
///
/// Entries are never empty and never repeated. First-insertion order is kept
/// so that rendering (and therefore embedding) is deterministic; equality is
/// set equality and ignores that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet {
    skills: Vec<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a skill, returning `false` if it was empty or already present
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        let skill = skill.trim();
        if skill.is_empty() || self.contains(skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.as_str())
    }

    /// Skills of `self` that are not in `other`, in `self` order
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.iter().filter(|s| !other.contains(s)).collect()
    }

    /// Skills of `self` that are also in `other`, in `self` order
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.iter().filter(|s| other.contains(s)).collect()
    }

    pub fn union(&self, other: &SkillSet) -> SkillSet {
        self.iter().chain(other.iter()).collect()
    }

    pub fn is_disjoint(&self, other: &SkillSet) -> bool {
        !self.iter().any(|s| other.contains(s))
    }

    /// Alphabetically sorted copy of the skills
    pub fn sorted(&self) -> Vec<String> {
        let mut skills = self.skills.clone();
        skills.sort();
        skills
    }

    /// Comma separated rendering that `TextNormalizer::normalize` parses back
    /// into the same set.
    pub fn to_text(&self) -> String {
        self.skills.join(", ")
    }

    /// Space separated rendering fed to the embedding model
    pub fn to_embedding_text(&self) -> String {
        self.skills.join(" ")
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|s| other.contains(s))
    }
}

impl Eq for SkillSet {}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.skills
    }
}

impl fmt::Display for SkillSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_empty_and_duplicates() {
        let mut set = SkillSet::new();
        assert!(set.insert("python"));
        assert!(!set.insert("python"));
        assert!(!set.insert("   "));
        assert!(!set.insert(""));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: SkillSet = vec!["sql", "python"].into_iter().collect();
        let b: SkillSet = vec!["python", "sql"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a.to_text(), b.to_text());
    }

    #[test]
    fn test_difference_and_intersection_partition() {
        let job: SkillSet = vec!["python", "sql", "aws"].into_iter().collect();
        let user: SkillSet = vec!["python", "excel"].into_iter().collect();

        let missing = job.difference(&user);
        let acquired = job.intersection(&user);

        assert_eq!(missing.iter().collect::<Vec<_>>(), vec!["sql", "aws"]);
        assert_eq!(acquired.iter().collect::<Vec<_>>(), vec!["python"]);
        assert!(missing.is_disjoint(&acquired));
        assert_eq!(missing.union(&acquired), job);
    }

    #[test]
    fn test_deserialize_enforces_invariant() {
        let set: SkillSet = serde_json::from_str(r#"["python", "", "python", "sql"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["python","sql"]"#);
    }

    #[test]
    fn test_renderings() {
        let set: SkillSet = vec!["machine learning", "sql"].into_iter().collect();
        assert_eq!(set.to_text(), "machine learning, sql");
        assert_eq!(set.to_embedding_text(), "machine learning sql");
        assert_eq!(set.sorted(), vec!["machine learning".to_string(), "sql".to_string()]);
    }
}
