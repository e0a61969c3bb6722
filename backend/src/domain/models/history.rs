use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::calendar;

/// A retained daily completion summary for one pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_day", deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    /// Stable pet id; absent on entries written before ids existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
    #[serde(alias = "catName")]
    pub pet_name: String,
    pub completed: u32,
    pub total: u32,
}

fn serialize_day<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&calendar::format_day_key(*day))
}

fn deserialize_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    calendar::parse_day_key(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid day key: {}", raw)))
}

impl HistoryEntry {
    /// Whether this entry summarizes the given pet. Entries without an id
    /// fall back to matching by name.
    pub fn is_for_pet(&self, pet_id: &str, pet_name: &str) -> bool {
        match &self.pet_id {
            Some(id) => id == pet_id,
            None => self.pet_name == pet_name,
        }
    }
}

/// Outcome of writing one day's summary into the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Chronologically ordered daily summaries, at most one per (day, pet)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the counts of the matching entry or append a new one
    pub fn upsert(
        &mut self,
        date: NaiveDate,
        pet_id: &str,
        pet_name: &str,
        completed: u32,
        total: u32,
    ) -> Upsert {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.date == date && e.is_for_pet(pet_id, pet_name))
        {
            existing.pet_id = Some(pet_id.to_string());
            existing.pet_name = pet_name.to_string();
            existing.completed = completed;
            existing.total = total;
            return Upsert::Updated;
        }

        self.entries.push(HistoryEntry {
            date,
            pet_id: Some(pet_id.to_string()),
            pet_name: pet_name.to_string(),
            completed,
            total,
        });
        Upsert::Inserted
    }

    /// Drop entries dated strictly before `cutoff`, returning how many went
    pub fn prune_before(&mut self, cutoff: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.date >= cutoff);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_upsert_same_day_and_pet_overwrites() {
        let mut ledger = HistoryLedger::default();
        assert_eq!(ledger.upsert(day(2024, 6, 2), "pet::1", "Bella", 1, 2), Upsert::Inserted);
        assert_eq!(ledger.upsert(day(2024, 6, 2), "pet::1", "Bella", 2, 2), Upsert::Updated);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].completed, 2);
        assert_eq!(ledger.entries()[0].total, 2);
    }

    #[test]
    fn test_upsert_distinguishes_days_and_pets() {
        let mut ledger = HistoryLedger::default();
        ledger.upsert(day(2024, 6, 1), "pet::1", "Bella", 1, 2);
        ledger.upsert(day(2024, 6, 2), "pet::1", "Bella", 1, 2);
        ledger.upsert(day(2024, 6, 2), "pet::2", "Luna", 0, 3);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_upsert_adopts_entry_without_id() {
        let mut ledger = HistoryLedger::new(vec![HistoryEntry {
            date: day(2024, 6, 2),
            pet_id: None,
            pet_name: "Bella".to_string(),
            completed: 0,
            total: 2,
        }]);

        assert_eq!(ledger.upsert(day(2024, 6, 2), "pet::1", "Bella", 1, 2), Upsert::Updated);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].pet_id.as_deref(), Some("pet::1"));
    }

    #[test]
    fn test_prune_before_keeps_cutoff_day() {
        let mut ledger = HistoryLedger::default();
        ledger.upsert(day(2024, 4, 30), "pet::1", "Bella", 1, 1);
        ledger.upsert(day(2024, 5, 2), "pet::1", "Bella", 1, 1);
        ledger.upsert(day(2024, 6, 1), "pet::1", "Bella", 1, 1);

        assert_eq!(ledger.prune_before(day(2024, 5, 2)), 1);
        let dates: Vec<NaiveDate> = ledger.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(2024, 5, 2), day(2024, 6, 1)]);
    }

    #[test]
    fn test_entry_serialization_uses_day_key() {
        let entry = HistoryEntry {
            date: day(2024, 6, 2),
            pet_id: Some("pet::1".to_string()),
            pet_name: "Bella".to_string(),
            completed: 1,
            total: 2,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"date\":\"2024-06-02\""));
    }

    #[test]
    fn test_entry_accepts_legacy_day_key() {
        let json = r#"{"date":"Sun Jun 02 2024","pet_name":"Bella","completed":1,"total":2}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, day(2024, 6, 2));
        assert!(entry.pet_id.is_none());
    }

    #[test]
    fn test_entry_accepts_legacy_name_field() {
        let json = r#"{"date":"Sun Jun 02 2024","catName":"Bella","completed":2,"total":2}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.pet_name, "Bella");
        assert!(entry.is_for_pet("pet::1", "Bella"));
    }
}
