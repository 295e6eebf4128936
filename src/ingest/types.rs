// src/ingest/types.rs
use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// One posting. All three fields are non-empty once constructed via [`JobRecord::new`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRecord {
    /// Canonical posting URL; the dedup/diff key.
    #[serde(alias = "URL")]
    pub identifier: String,
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Company")]
    pub organization: String,
}

impl JobRecord {
    /// Trims every field; returns `None` if any of them ends up empty.
    pub fn new(
        identifier: impl AsRef<str>,
        title: impl AsRef<str>,
        organization: impl AsRef<str>,
    ) -> Option<Self> {
        let identifier = identifier.as_ref().trim();
        let title = title.as_ref().trim();
        let organization = organization.as_ref().trim();
        if identifier.is_empty() || title.is_empty() || organization.is_empty() {
            return None;
        }
        Some(Self {
            identifier: identifier.to_string(),
            title: title.to_string(),
            organization: organization.to_string(),
        })
    }
}

/// Postings keyed by identifier. Iteration is in ascending identifier order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
    jobs: BTreeMap<String, JobRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `job`, overwriting any record with the same identifier.
    pub fn insert(&mut self, job: JobRecord) {
        self.jobs.insert(job.identifier.clone(), job);
    }

    /// Folds every record of `other` into `self`. Entries are added or
    /// overwritten, never removed.
    pub fn merge_from(&mut self, other: &Snapshot) {
        for job in other.records() {
            self.insert(job.clone());
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.jobs.contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&JobRecord> {
        self.jobs.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn records(&self) -> btree_map::Values<'_, String, JobRecord> {
        self.jobs.values()
    }

    pub fn identifiers(&self) -> btree_map::Keys<'_, String, JobRecord> {
        self.jobs.keys()
    }

    /// Every key equals its record's identifier and no field is blank.
    /// Snapshots built through [`Snapshot::insert`] always pass; data read
    /// back from disk may not.
    pub fn check_consistency(&self) -> Result<(), String> {
        for (key, job) in &self.jobs {
            if *key != job.identifier {
                return Err(format!(
                    "entry {key:?} holds identifier {:?}",
                    job.identifier
                ));
            }
            if JobRecord::new(&job.identifier, &job.title, &job.organization).is_none() {
                return Err(format!("entry {key:?} has a blank field"));
            }
        }
        Ok(())
    }
}

impl Extend<JobRecord> for Snapshot {
    fn extend<I: IntoIterator<Item = JobRecord>>(&mut self, iter: I) {
        for job in iter {
            self.insert(job);
        }
    }
}

impl FromIterator<JobRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = JobRecord>>(iter: I) -> Self {
        let mut snap = Snapshot::new();
        snap.extend(iter);
        snap
    }
}

/// A listing site that can produce postings or fail on its own.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<JobRecord>, SourceError>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, title: &str) -> JobRecord {
        JobRecord::new(id, title, "Acme").unwrap()
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert!(JobRecord::new("https://x/1", "Dev", "Acme").is_some());
        assert!(JobRecord::new("", "Dev", "Acme").is_none());
        assert!(JobRecord::new("https://x/1", "   ", "Acme").is_none());
        assert!(JobRecord::new("https://x/1", "Dev", "\n\t").is_none());
    }

    #[test]
    fn new_trims_fields() {
        let j = JobRecord::new(" https://x/1 ", " Dev ", " Acme ").unwrap();
        assert_eq!(j.identifier, "https://x/1");
        assert_eq!(j.title, "Dev");
        assert_eq!(j.organization, "Acme");
    }

    #[test]
    fn collision_overwrites_and_merge_never_removes() {
        let mut prev: Snapshot = [job("https://x/1", "Old"), job("https://x/3", "Gone")]
            .into_iter()
            .collect();
        let cur: Snapshot = [job("https://x/1", "New"), job("https://x/2", "Other")]
            .into_iter()
            .collect();

        prev.merge_from(&cur);
        assert_eq!(prev.len(), 3);
        assert_eq!(prev.get("https://x/1").unwrap().title, "New");
        assert!(prev.contains("https://x/3"));
    }

    #[test]
    fn iteration_is_sorted_by_identifier() {
        let snap: Snapshot = [job("https://x/b", "B"), job("https://x/a", "A")]
            .into_iter()
            .collect();
        let ids: Vec<_> = snap.identifiers().cloned().collect();
        assert_eq!(ids, vec!["https://x/a", "https://x/b"]);
    }

    #[test]
    fn consistency_flags_mismatched_keys_and_blank_fields() {
        let good: Snapshot = [job("https://x/1", "Dev")].into_iter().collect();
        assert!(good.check_consistency().is_ok());

        let moved: Snapshot = serde_json::from_str(
            r#"{"https://x/1":{"identifier":"https://x/2","title":"Dev","organization":"Acme"}}"#,
        )
        .unwrap();
        let reason = moved.check_consistency().unwrap_err();
        assert!(reason.contains("https://x/2"), "{reason}");

        let blank: Snapshot = serde_json::from_str(
            r#"{"https://x/1":{"identifier":"https://x/1","title":" ","organization":"Acme"}}"#,
        )
        .unwrap();
        assert!(blank.check_consistency().unwrap_err().contains("blank"));
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let legacy = r#"{"https://x/1":{"URL":"https://x/1","Title":"Dev","Company":"Acme"}}"#;
        let snap: Snapshot = serde_json::from_str(legacy).unwrap();
        assert_eq!(snap.get("https://x/1"), Some(&job("https://x/1", "Dev")));
    }
}
