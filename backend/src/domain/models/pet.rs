use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A named daily care task with its completion flag for today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
        }
    }
}

/// Domain model representing a pet profile and its daily checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Stable identifier; empty for records written before ids existed
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default, deserialize_with = "age_or_zero")]
    pub age: f64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// Older records may hold `null` for an age that failed to parse
fn age_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Pet {
    /// Generate a unique ID for a pet
    pub fn generate_id() -> String {
        format!("pet::{}", Uuid::new_v4())
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// True iff the pet has at least one task and every task is done
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    /// Clear every completion flag, returning how many were set
    pub fn reset_tasks(&mut self) -> usize {
        let mut cleared = 0;
        for task in self.tasks.iter_mut().filter(|t| t.completed) {
            task.completed = false;
            cleared += 1;
        }
        cleared
    }

    /// Whole years between the birthday's year and `today`'s year.
    ///
    /// Only the leading year of the birthday is looked at, so partial dates
    /// such as "2019" or "2019-04" still work.
    pub fn years_since_birthday(&self, today: NaiveDate) -> Option<i32> {
        let year_part = self.birthday.trim().get(..4)?;
        if !year_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let birth_year: i32 = year_part.parse().ok()?;
        Some(today.year() - birth_year)
    }
}

/// The ordered pet list plus the currently selected pet.
///
/// `active` is `Some(i)` with `i < pets.len()` whenever there are pets and
/// `None` when there are none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetRegistry {
    pets: Vec<Pet>,
    active: Option<usize>,
}

impl PetRegistry {
    /// Build a registry from stored state, clamping a missing or stale index
    pub fn new(pets: Vec<Pet>, stored_index: Option<usize>) -> Self {
        let mut registry = Self { pets, active: stored_index };
        registry.clamp_active();
        registry
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub(crate) fn pets_mut(&mut self) -> &mut [Pet] {
        &mut self.pets
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_pet(&self) -> Option<&Pet> {
        self.active.and_then(|i| self.pets.get(i))
    }

    pub fn active_pet_mut(&mut self) -> Option<&mut Pet> {
        let index = self.active?;
        self.pets.get_mut(index)
    }

    pub fn find_by_id(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == pet_id)
    }

    /// Append a pet; the first pet becomes active. Returns the new pet's index.
    pub fn push(&mut self, pet: Pet) -> usize {
        self.pets.push(pet);
        if self.pets.len() == 1 {
            self.active = Some(0);
        }
        self.pets.len() - 1
    }

    /// Undo the last `push`, re-clamping the selection
    pub(crate) fn remove_last(&mut self) -> Option<Pet> {
        let pet = self.pets.pop();
        self.clamp_active();
        pet
    }

    /// Rotate to the next pet, wrapping around. None when there is nothing to rotate.
    pub fn select_next(&mut self) -> Option<usize> {
        self.rotate(1)
    }

    /// Rotate to the previous pet, wrapping around. None when there is nothing to rotate.
    pub fn select_previous(&mut self) -> Option<usize> {
        self.rotate(self.pets.len().saturating_sub(1))
    }

    fn rotate(&mut self, step: usize) -> Option<usize> {
        let len = self.pets.len();
        if len <= 1 {
            return None;
        }
        let next = (self.active.unwrap_or(0) + step) % len;
        self.active = Some(next);
        Some(next)
    }

    /// Clear every task of every pet, returning how many flags were cleared
    pub fn reset_all_tasks(&mut self) -> usize {
        self.pets.iter_mut().map(Pet::reset_tasks).sum()
    }

    fn clamp_active(&mut self) {
        self.active = match (self.pets.len(), self.active) {
            (0, _) => None,
            (len, Some(i)) if i < len => Some(i),
            _ => Some(0),
        };
    }
}
