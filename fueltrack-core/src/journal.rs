//! Meal store access scoped to one identity.
//!
//! A [`Journal`] can only be built from an [`Identity`], and every read and
//! write it performs is filtered or stamped with that identity.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{MealEntry, MealRecord, DATE_FORMAT};
use crate::session::Identity;
use crate::stats::{aggregate, Stats};
use crate::store::{MealStore, StoreError};

/// Format of the human-readable date shown on the dashboard, e.g. `January 02, 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Everything the dashboard shows for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub username: Identity,
    /// Display form of today's date.
    pub date: String,
    /// Today's date as `YYYY-MM-DD`.
    pub today: String,
    #[serde(flatten)]
    pub stats: Stats,
}

pub struct Journal<'a> {
    meals: &'a MealStore,
    identity: &'a Identity,
}

impl<'a> Journal<'a> {
    pub fn new(meals: &'a MealStore, identity: &'a Identity) -> Self {
        Self { meals, identity }
    }

    pub fn identity(&self) -> &Identity {
        self.identity
    }

    /// All of this identity's records, in stored order.
    pub fn meals(&self) -> Vec<MealRecord> {
        self.meals.load_owned_by(self.identity.as_str())
    }

    /// Records a meal stamped with the date and time of `now`.
    pub fn log_meal(&self, entry: MealEntry, now: NaiveDateTime) -> Result<MealRecord, StoreError> {
        let record = MealRecord::new(self.identity.as_str(), entry, now);
        self.meals.append(record.clone())?;

        tracing::info!("{} logged {}", self.identity, record.name);
        Ok(record)
    }

    /// Deletes every record belonging to this identity.
    pub fn reset(&self) -> Result<usize, StoreError> {
        let removed = self.meals.delete_by_owner(self.identity.as_str())?;

        tracing::info!("Removed {} record(s) for {}", removed, self.identity);
        Ok(removed)
    }

    /// Computes the dashboard as of `now`.
    pub fn dashboard(&self, now: NaiveDateTime) -> Dashboard {
        let today = now.format(DATE_FORMAT).to_string();
        let stats = aggregate(&self.meals(), &today);

        Dashboard {
            username: self.identity.clone(),
            date: now.format(DISPLAY_DATE_FORMAT).to_string(),
            today,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn on(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_log_meal_is_owned_and_stamped() {
        let temp_dir = TempDir::new().unwrap();
        let store = MealStore::in_dir(temp_dir.path());
        let alice = Identity::new("alice");
        let journal = Journal::new(&store, &alice);

        let record = journal
            .log_meal(MealEntry::new("Steak", 800, 60), on(2, 19))
            .unwrap();

        assert!(record.is_owned_by("alice"));
        assert_eq!(record.date.as_deref(), Some("2024-01-02"));
        assert_eq!(record.time, "07:30 PM");
        assert_eq!(journal.meals(), vec![record]);
    }

    #[test]
    fn test_journals_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let store = MealStore::in_dir(temp_dir.path());
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");

        Journal::new(&store, &alice)
            .log_meal(MealEntry::new("A", 100, 1), on(1, 8))
            .unwrap();
        Journal::new(&store, &bob)
            .log_meal(MealEntry::new("B", 200, 2), on(1, 9))
            .unwrap();

        let alice_meals = Journal::new(&store, &alice).meals();
        assert_eq!(alice_meals.len(), 1);
        assert_eq!(alice_meals[0].name, "A");

        let bob_dashboard = Journal::new(&store, &bob).dashboard(on(1, 12));
        assert_eq!(bob_dashboard.stats.lifetime_calories, 200);
    }

    #[test]
    fn test_reset_only_clears_own_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = MealStore::in_dir(temp_dir.path());
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");

        let alice_journal = Journal::new(&store, &alice);
        alice_journal
            .log_meal(MealEntry::new("A1", 100, 1), on(1, 8))
            .unwrap();
        alice_journal
            .log_meal(MealEntry::new("A2", 100, 1), on(2, 8))
            .unwrap();
        Journal::new(&store, &bob)
            .log_meal(MealEntry::new("B", 200, 2), on(1, 9))
            .unwrap();

        assert_eq!(alice_journal.reset().unwrap(), 2);

        assert!(alice_journal.meals().is_empty());
        assert_eq!(Journal::new(&store, &bob).meals().len(), 1);
    }

    #[test]
    fn test_dashboard() {
        let temp_dir = TempDir::new().unwrap();
        let store = MealStore::in_dir(temp_dir.path());
        let alice = Identity::new("alice");
        let journal = Journal::new(&store, &alice);

        journal
            .log_meal(MealEntry::new("Oats", 500, 30), on(1, 8))
            .unwrap();
        journal
            .log_meal(MealEntry::new("Chicken", 700, 50), on(2, 13))
            .unwrap();

        let dashboard = journal.dashboard(on(2, 20));

        assert_eq!(dashboard.username, alice);
        assert_eq!(dashboard.date, "January 02, 2024");
        assert_eq!(dashboard.today, "2024-01-02");
        assert_eq!(dashboard.stats.today_calories, 700);
        assert_eq!(dashboard.stats.avg_calories, 600);
        assert_eq!(dashboard.stats.today_meals.len(), 1);
        assert_eq!(dashboard.stats.today_meals[0].name, "Chicken");
    }

    #[test]
    fn test_dashboard_serializes_flat() {
        let temp_dir = TempDir::new().unwrap();
        let store = MealStore::in_dir(temp_dir.path());
        let alice = Identity::new("alice");

        let value = serde_json::to_value(Journal::new(&store, &alice).dashboard(on(3, 9))).unwrap();

        assert_eq!(value["username"], "alice");
        assert_eq!(value["today_calories"], 0);
        assert_eq!(value["avg_protein"], 0);
        assert!(value["today_meals"].as_array().unwrap().is_empty());
    }
}
