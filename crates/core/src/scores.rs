//! Persistent high-score table. Storage itself belongs to the caller; this module
//! owns ordering, capping and the JSON shape.

use serde::{Deserialize, Serialize};

use crate::error::ScoreTableError;

/// Key the table is stored under.
pub const STORAGE_KEY: &str = "roguelike_scores";
pub const MAX_ENTRIES: usize = 20;
pub const DEFAULT_TOP: usize = 10;
const ANONYMOUS: &str = "Anonymous";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub recorded_at_unix_ms: u64,
}

/// Entries sorted by score, highest first, at most [`MAX_ENTRIES`] long.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a run result. Ties keep earlier entries ahead; the entry is dropped
    /// again if it falls outside the cap.
    pub fn record(&mut self, name: &str, score: u32, recorded_at_unix_ms: u64) -> ScoreEntry {
        let trimmed = name.trim();
        let entry = ScoreEntry {
            name: if trimmed.is_empty() { ANONYMOUS.to_owned() } else { trimmed.to_owned() },
            score,
            recorded_at_unix_ms,
        };
        self.entries.push(entry.clone());
        self.normalize();
        entry
    }

    pub fn top(&self, count: usize) -> &[ScoreEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn high_score(&self) -> u32 {
        self.entries.first().map_or(0, |entry| entry.score)
    }

    pub fn is_new_record(&self, score: u32) -> bool {
        score > self.high_score()
    }

    /// 1-based position `score` would take: ahead of the first entry it strictly beats.
    pub fn rank_for(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|entry| score > entry.score)
            .map_or(self.entries.len() + 1, |index| index + 1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String, ScoreTableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses an exported table. Anything but an array of entries is rejected.
    pub fn from_json(json: &str) -> Result<Self, ScoreTableError> {
        let mut table: Self = serde_json::from_str(json)?;
        table.normalize();
        Ok(table)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(scores: &[u32]) -> ScoreTable {
        let mut table = ScoreTable::new();
        for (i, score) in scores.iter().enumerate() {
            table.record(&format!("p{i}"), *score, i as u64);
        }
        table
    }

    #[test]
    fn record_keeps_descending_order() {
        let table = table(&[50, 300, 120]);
        let scores: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 120, 50]);
        assert_eq!(table.high_score(), 300);
    }

    #[test]
    fn ties_keep_the_earlier_entry_first() {
        let table = table(&[100, 100]);
        assert_eq!(table.entries()[0].name, "p0");
        assert_eq!(table.entries()[1].name, "p1");
    }

    #[test]
    fn table_is_capped() {
        let scores: Vec<u32> = (1..=25).collect();
        let table = table(&scores);
        assert_eq!(table.len(), MAX_ENTRIES);
        assert_eq!(table.entries().last().map(|e| e.score), Some(6));
        assert_eq!(table.top(DEFAULT_TOP).len(), 10);
        assert_eq!(table.top(100).len(), 20);
    }

    #[test]
    fn rank_counts_strictly_beaten_entries() {
        let table = table(&[300, 200, 100]);
        assert_eq!(table.rank_for(400), 1);
        assert_eq!(table.rank_for(200), 3);
        assert_eq!(table.rank_for(150), 3);
        assert_eq!(table.rank_for(50), 4);
        assert_eq!(ScoreTable::new().rank_for(0), 1);
    }

    #[test]
    fn new_record_must_beat_high_score() {
        let table = table(&[120]);
        assert!(!table.is_new_record(120));
        assert!(table.is_new_record(121));
        assert!(ScoreTable::new().is_new_record(1));
    }

    #[test]
    fn blank_names_become_anonymous() {
        let mut table = ScoreTable::new();
        assert_eq!(table.record("   ", 10, 0).name, "Anonymous");
        assert_eq!(table.record(" Ada ", 20, 0).name, "Ada");
    }

    #[test]
    fn json_is_a_bare_array() {
        let table = table(&[10]);
        let json = table.to_json().unwrap();
        assert!(json.trim_start().starts_with('['));
        assert_eq!(ScoreTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn import_rejects_non_arrays_and_sorts_arrays() {
        assert!(ScoreTable::from_json(r#"{"name":"x"}"#).is_err());
        assert!(ScoreTable::from_json("not json").is_err());
        let imported = ScoreTable::from_json(
            r#"[{"name":"a","score":5,"recorded_at_unix_ms":1},
                {"name":"b","score":9,"recorded_at_unix_ms":2}]"#,
        )
        .unwrap();
        assert_eq!(imported.high_score(), 9);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut table = table(&[1, 2, 3]);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.high_score(), 0);
    }
}
