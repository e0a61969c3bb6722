use serde::{Deserialize, Serialize};

/// A single daily care task as shown on the checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub completed: bool,
}

/// Pet ID in format: "pet::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    /// Birthday as entered during setup (usually YYYY-MM-DD, may be partial)
    pub birthday: String,
    /// Age supplied at creation, in years
    pub age: f64,
    /// Whole years between the birthday's year and the current year, if the birthday parses
    pub years_since_birthday: Option<i32>,
    /// Tasks in the order they were chosen at setup
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePetResponse {
    pub pet: Option<Pet>,
    /// Position of the active pet in the registry
    pub index: Option<usize>,
    pub pet_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetListResponse {
    pub pets: Vec<Pet>,
    pub active_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub birthday: String,
    pub age: f64,
    /// Task names picked from the setup form, in display order
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePetResponse {
    pub pet: Pet,
    pub active_index: Option<usize>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectPetResponse {
    pub active_index: Option<usize>,
    pub pet: Option<Pet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleTaskRequest {
    pub task_index: usize,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleTaskResponse {
    /// None when there was no active pet and nothing changed
    pub pet: Option<Pet>,
    pub all_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetTodayResponse {
    pub pet: Option<Pet>,
    /// Number of tasks that were cleared
    pub cleared: usize,
}

/// Everything the home page needs to draw the checklist in one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    /// Header date, e.g. "Sunday, June 2, 2024"
    pub date_display: String,
    pub pet: Option<Pet>,
    pub completed: usize,
    pub total: usize,
    /// Drives the completion celebration
    pub all_completed: bool,
    /// The pet switcher is only shown with more than one pet
    pub show_switcher: bool,
}

/// One retained daily summary for a pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local day in YYYY-MM-DD format
    pub date: String,
    pub pet_id: Option<String>,
    pub pet_name: String,
    pub completed: u32,
    pub total: u32,
}

impl HistoryEntry {
    /// Completion ratio rounded to a whole percent, None for a pet without tasks
    pub fn completion_percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let percent = (f64::from(self.completed) / f64::from(self.total) * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Entries in chronological order (oldest first)
    pub entries: Vec<HistoryEntry>,
}

impl HistoryResponse {
    /// Entries with the most recent day first, the way the history page lists them
    pub fn most_recent_first(&self) -> Vec<HistoryEntry> {
        self.entries.iter().rev().cloned().collect()
    }
}

/// Why the rendering layer is being asked to redraw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefreshReason {
    /// The midnight timer fired and the day boundary was checked
    Rollover,
}

/// Pushed to subscribers so they can re-query without polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshEvent {
    pub reason: RefreshReason,
    /// Local day the check ran for, YYYY-MM-DD
    pub day: String,
    pub reset_performed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, completed: u32, total: u32) -> HistoryEntry {
        HistoryEntry {
            date: date.to_string(),
            pet_id: Some("pet::1".to_string()),
            pet_name: "Bella".to_string(),
            completed,
            total,
        }
    }

    #[test]
    fn test_completion_percent() {
        assert_eq!(entry("2024-06-02", 1, 2).completion_percent(), Some(50));
        assert_eq!(entry("2024-06-02", 2, 3).completion_percent(), Some(67));
        assert_eq!(entry("2024-06-02", 3, 3).completion_percent(), Some(100));
    }

    #[test]
    fn test_completion_percent_without_tasks() {
        assert_eq!(entry("2024-06-02", 0, 0).completion_percent(), None);
    }

    #[test]
    fn test_most_recent_first() {
        let response = HistoryResponse {
            entries: vec![entry("2024-06-01", 1, 2), entry("2024-06-02", 2, 2)],
        };
        let reversed = response.most_recent_first();
        assert_eq!(reversed[0].date, "2024-06-02");
        assert_eq!(reversed[1].date, "2024-06-01");
        // storage order is untouched
        assert_eq!(response.entries[0].date, "2024-06-01");
    }

    #[test]
    fn test_refresh_event_serialization() {
        let event = RefreshEvent {
            reason: RefreshReason::Rollover,
            day: "2024-06-03".to_string(),
            reset_performed: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"Rollover\""));
        let parsed: RefreshEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
