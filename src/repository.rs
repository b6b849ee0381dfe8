use crate::errors::ValidationError;
use crate::models::{Cheer, Comment, Frequency, Habit, HabitEntry, HabitUpdate, NewHabit};
use crate::store::{self, CHEERS_KEY, COMMENTS_KEY, ENTRIES_KEY, HABITS_KEY, KeyValueStore};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

pub const MAX_COMMENT_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub enum CheerToggle {
    Added(Cheer),
    Removed,
}

/// Habits, entries and community data for one local user.
///
/// Every call reads the current collections from the store and writes the
/// full collection back on mutation, so the store is the single source of
/// truth. Store failures are logged by the store helpers and read as empty.
pub struct HabitRepository<S> {
    store: S,
    user_id: String,
}

impl<S: KeyValueStore> HabitRepository<S> {
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn list_habits(&self) -> Vec<Habit> {
        store::get_or_default(&self.store, HABITS_KEY)
    }

    pub fn habit(&self, id: &str) -> Option<Habit> {
        self.list_habits().into_iter().find(|habit| habit.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.list_habits().is_empty()
    }

    pub async fn create_habit(&mut self, new: NewHabit) -> Result<Habit, ValidationError> {
        let name = clean_name(&new.name)?;
        check_frequency(new.frequency)?;

        let now = Utc::now();
        let habit = Habit {
            id: new_id(),
            user_id: self.user_id.clone(),
            name,
            description: clean_description(new.description),
            frequency: new.frequency,
            is_private: new.is_private,
            archived: false,
            created_at: now,
            updated_at: now,
        };

        let mut habits = self.list_habits();
        habits.push(habit.clone());
        store::set(&mut self.store, HABITS_KEY, &habits).await;
        info!(habit_id = %habit.id, "created habit");
        Ok(habit)
    }

    pub async fn update_habit(
        &mut self,
        id: &str,
        update: HabitUpdate,
    ) -> Result<Option<Habit>, ValidationError> {
        let mut habits = self.list_habits();
        let Some(habit) = habits.iter_mut().find(|habit| habit.id == id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            habit.name = clean_name(&name)?;
        }
        if let Some(description) = update.description {
            habit.description = clean_description(Some(description));
        }
        if let Some(frequency) = update.frequency {
            check_frequency(frequency)?;
            habit.frequency = frequency;
        }
        if let Some(is_private) = update.is_private {
            habit.is_private = is_private;
        }
        if let Some(archived) = update.archived {
            habit.archived = archived;
        }
        habit.updated_at = Utc::now();

        let updated = habit.clone();
        store::set(&mut self.store, HABITS_KEY, &habits).await;
        Ok(Some(updated))
    }

    /// Removes the habit together with its entries, comments and cheers.
    pub async fn delete_habit(&mut self, id: &str) -> bool {
        let mut habits = self.list_habits();
        let before = habits.len();
        habits.retain(|habit| habit.id != id);
        if habits.len() == before {
            return false;
        }
        store::set(&mut self.store, HABITS_KEY, &habits).await;

        let mut entries = self.list_entries();
        entries.retain(|entry| entry.habit_id != id);
        store::set(&mut self.store, ENTRIES_KEY, &entries).await;

        let mut comments = self.list_comments();
        comments.retain(|comment| comment.habit_id != id);
        store::set(&mut self.store, COMMENTS_KEY, &comments).await;

        let mut cheers = self.list_cheers();
        cheers.retain(|cheer| cheer.habit_id != id);
        store::set(&mut self.store, CHEERS_KEY, &cheers).await;

        info!(habit_id = %id, "deleted habit");
        true
    }

    pub async fn archive_habit(&mut self, id: &str) -> bool {
        let update = HabitUpdate {
            archived: Some(true),
            ..HabitUpdate::default()
        };
        matches!(self.update_habit(id, update).await, Ok(Some(_)))
    }

    pub fn list_entries(&self) -> Vec<HabitEntry> {
        store::get_or_default(&self.store, ENTRIES_KEY)
    }

    pub fn entries_for_habit(&self, habit_id: &str) -> Vec<HabitEntry> {
        let mut entries = self.list_entries();
        entries.retain(|entry| entry.habit_id == habit_id);
        entries
    }

    /// Flips the first entry for `habit_id` on `date`, or records a new
    /// completed entry when the day has none.
    pub async fn toggle_completion(&mut self, habit_id: &str, date: NaiveDate) -> HabitEntry {
        let mut entries = self.list_entries();
        let existing = entries
            .iter()
            .position(|entry| entry.habit_id == habit_id && entry.date == date);
        let toggled = match existing {
            Some(index) => {
                let entry = &mut entries[index];
                entry.completed = !entry.completed;
                entry.clone()
            }
            None => {
                let entry = HabitEntry {
                    id: new_id(),
                    habit_id: habit_id.to_string(),
                    user_id: self.user_id.clone(),
                    date,
                    completed: true,
                    notes: None,
                    created_at: Utc::now(),
                };
                entries.push(entry.clone());
                entry
            }
        };
        store::set(&mut self.store, ENTRIES_KEY, &entries).await;
        toggled
    }

    pub fn is_completed_on(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.list_entries()
            .iter()
            .find(|entry| entry.habit_id == habit_id && entry.date == date)
            .is_some_and(|entry| entry.completed)
    }

    /// Sets or clears the note on the entry for `date`. Returns `None` when the
    /// day has no entry yet.
    pub async fn set_entry_note(
        &mut self,
        habit_id: &str,
        date: NaiveDate,
        note: Option<String>,
    ) -> Option<HabitEntry> {
        let mut entries = self.list_entries();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.habit_id == habit_id && entry.date == date)?;
        entry.notes = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let updated = entry.clone();
        store::set(&mut self.store, ENTRIES_KEY, &entries).await;
        Some(updated)
    }

    pub fn list_comments(&self) -> Vec<Comment> {
        store::get_or_default(&self.store, COMMENTS_KEY)
    }

    pub fn comments_for_habit(&self, habit_id: &str) -> Vec<Comment> {
        let mut comments = self.list_comments();
        comments.retain(|comment| comment.habit_id == habit_id);
        comments.sort_by_key(|comment| comment.created_at);
        comments
    }

    pub async fn add_comment(&mut self, habit_id: &str, content: &str) -> Result<Comment, ValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        let len = content.chars().count();
        if len > MAX_COMMENT_LEN {
            return Err(ValidationError::CommentTooLong {
                len,
                max: MAX_COMMENT_LEN,
            });
        }

        let comment = Comment {
            id: new_id(),
            habit_id: habit_id.to_string(),
            user_id: self.user_id.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let mut comments = self.list_comments();
        comments.push(comment.clone());
        store::set(&mut self.store, COMMENTS_KEY, &comments).await;
        Ok(comment)
    }

    pub fn list_cheers(&self) -> Vec<Cheer> {
        store::get_or_default(&self.store, CHEERS_KEY)
    }

    pub fn cheers_for_habit(&self, habit_id: &str) -> Vec<Cheer> {
        let mut cheers = self.list_cheers();
        cheers.retain(|cheer| cheer.habit_id == habit_id);
        cheers
    }

    /// A second cheer with the same emoji from the same user takes the first back.
    pub async fn toggle_cheer(&mut self, habit_id: &str, emoji: &str) -> Result<CheerToggle, ValidationError> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(ValidationError::EmptyEmoji);
        }

        let mut cheers = self.list_cheers();
        let existing = cheers.iter().position(|cheer| {
            cheer.habit_id == habit_id && cheer.user_id == self.user_id && cheer.emoji == emoji
        });

        let outcome = match existing {
            Some(index) => {
                cheers.remove(index);
                CheerToggle::Removed
            }
            None => {
                let cheer = Cheer {
                    id: new_id(),
                    habit_id: habit_id.to_string(),
                    user_id: self.user_id.clone(),
                    emoji: emoji.to_string(),
                    created_at: Utc::now(),
                };
                cheers.push(cheer.clone());
                CheerToggle::Added(cheer)
            }
        };
        store::set(&mut self.store, CHEERS_KEY, &cheers).await;
        Ok(outcome)
    }

    /// Fills an empty store with two users' habits and a week of history.
    /// Returns `false` without writing when habits already exist.
    pub async fn seed_demo_data(&mut self, today: NaiveDate) -> bool {
        if !self.is_empty() {
            return false;
        }

        let me = self.user_id.clone();
        let friend = "2".to_string();
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let demo_habit = |id: &str, user: &str, name: &str, description: &str, is_private: bool| Habit {
            id: id.to_string(),
            user_id: user.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            frequency: Frequency::Daily,
            is_private,
            archived: false,
            created_at: since,
            updated_at: since,
        };
        let habits = vec![
            demo_habit("demo-water", &me, "Drink 8 glasses of water", "Stay hydrated throughout the day", true),
            demo_habit("demo-meditation", &me, "Morning meditation", "10 minutes of mindfulness meditation", false),
            demo_habit("demo-reading", &me, "Read for 30 minutes", "Read books to expand knowledge", false),
            demo_habit("demo-workout", &friend, "Daily workout", "Exercise for at least 30 minutes", false),
        ];

        let history: Vec<(&str, &str, Vec<bool>)> = vec![
            ("demo-water", me.as_str(), vec![true, true, true, false, true, true, true]),
            ("demo-meditation", me.as_str(), vec![true, true, true, true, true]),
            ("demo-reading", me.as_str(), vec![true, false, true]),
            ("demo-workout", friend.as_str(), vec![true, true, true]),
        ];
        let entries: Vec<HabitEntry> = history
            .iter()
            .flat_map(|(habit_id, user, days)| {
                days.iter().enumerate().map(move |(days_ago, completed)| HabitEntry {
                    id: new_id(),
                    habit_id: habit_id.to_string(),
                    user_id: user.to_string(),
                    date: today - Duration::days(days_ago as i64),
                    completed: *completed,
                    notes: None,
                    created_at: Utc::now(),
                })
            })
            .collect();

        let comment = |habit_id: &str, user: &str, content: &str| Comment {
            id: new_id(),
            habit_id: habit_id.to_string(),
            user_id: user.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let comments = vec![
            comment("demo-meditation", &friend, "Great job on the meditation streak! I love how consistent you are!"),
            comment("demo-meditation", &me, "Thanks! It's been really helping with my focus throughout the day."),
            comment("demo-reading", &friend, "What book are you reading? I'm always looking for recommendations!"),
            comment("demo-workout", &me, "Your workout consistency is inspiring! What's your favorite exercise?"),
        ];

        let cheer = |habit_id: &str, user: &str, emoji: &str| Cheer {
            id: new_id(),
            habit_id: habit_id.to_string(),
            user_id: user.to_string(),
            emoji: emoji.to_string(),
            created_at: Utc::now(),
        };
        let cheers = vec![
            cheer("demo-meditation", &friend, "🔥"),
            cheer("demo-meditation", &me, "🌟"),
            cheer("demo-reading", &friend, "📚"),
            cheer("demo-workout", &me, "💪"),
        ];

        store::set(&mut self.store, HABITS_KEY, &habits).await;
        store::set(&mut self.store, ENTRIES_KEY, &entries).await;
        store::set(&mut self.store, COMMENTS_KEY, &comments).await;
        store::set(&mut self.store, CHEERS_KEY, &cheers).await;
        info!(habits = habits.len(), entries = entries.len(), "seeded demo data");
        true
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn clean_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn check_frequency(frequency: Frequency) -> Result<(), ValidationError> {
    match frequency {
        Frequency::Custom { interval_days: 0 } => Err(ValidationError::ZeroInterval),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn repo() -> HabitRepository<MemoryStore> {
        let mut store = MemoryStore::new();
        store.init().await.unwrap();
        HabitRepository::new(store, "1")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn new_habit(name: &str) -> NewHabit {
        NewHabit {
            name: name.into(),
            description: None,
            frequency: Frequency::Daily,
            is_private: false,
        }
    }

    #[tokio::test]
    async fn create_trims_and_assigns_unique_ids() {
        let mut repo = repo().await;
        let a = repo.create_habit(new_habit("  Stretch  ")).await.unwrap();
        let b = repo.create_habit(new_habit("Stretch")).await.unwrap();
        assert_eq!(a.name, "Stretch");
        assert_eq!(a.user_id, "1");
        assert_ne!(a.id, b.id);
        assert_eq!(repo.list_habits().len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_blank_name_and_zero_interval() {
        let mut repo = repo().await;
        assert_eq!(repo.create_habit(new_habit("   ")).await, Err(ValidationError::EmptyName));

        let mut custom = new_habit("Water plants");
        custom.frequency = Frequency::Custom { interval_days: 0 };
        assert_eq!(repo.create_habit(custom).await, Err(ValidationError::ZeroInterval));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let mut repo = repo().await;
        let habit = repo.create_habit(new_habit("Run")).await.unwrap();
        let update = HabitUpdate {
            description: Some("5k".into()),
            frequency: Some(Frequency::Custom { interval_days: 3 }),
            ..HabitUpdate::default()
        };
        let updated = repo.update_habit(&habit.id, update).await.unwrap().unwrap();
        assert_eq!(updated.name, "Run");
        assert_eq!(updated.description.as_deref(), Some("5k"));
        assert_eq!(updated.frequency, Frequency::Custom { interval_days: 3 });
        assert!(updated.updated_at >= habit.updated_at);
        assert_eq!(repo.habit(&habit.id).unwrap(), updated);
    }

    #[tokio::test]
    async fn update_unknown_habit_is_none() {
        let mut repo = repo().await;
        assert_eq!(repo.update_habit("missing", HabitUpdate::default()).await, Ok(None));
        assert!(!repo.archive_habit("missing").await);
    }

    #[tokio::test]
    async fn archive_sets_flag() {
        let mut repo = repo().await;
        let habit = repo.create_habit(new_habit("Floss")).await.unwrap();
        assert!(repo.archive_habit(&habit.id).await);
        assert!(repo.habit(&habit.id).unwrap().archived);
    }

    #[tokio::test]
    async fn delete_cascades() {
        let mut repo = repo().await;
        let keep = repo.create_habit(new_habit("Keep")).await.unwrap();
        let gone = repo.create_habit(new_habit("Gone")).await.unwrap();
        repo.toggle_completion(&keep.id, day(1)).await;
        repo.toggle_completion(&gone.id, day(1)).await;
        repo.toggle_completion(&gone.id, day(2)).await;
        repo.add_comment(&gone.id, "nice").await.unwrap();
        repo.toggle_cheer(&gone.id, "🔥").await.unwrap();

        assert!(repo.delete_habit(&gone.id).await);
        assert!(!repo.delete_habit(&gone.id).await);
        assert_eq!(repo.list_habits(), vec![keep.clone()]);
        assert_eq!(repo.list_entries().len(), 1);
        assert_eq!(repo.list_entries()[0].habit_id, keep.id);
        assert!(repo.list_comments().is_empty());
        assert!(repo.list_cheers().is_empty());
    }

    #[tokio::test]
    async fn toggle_creates_then_flips_same_entry() {
        let mut repo = repo().await;
        let first = repo.toggle_completion("h", day(4)).await;
        assert!(first.completed);
        assert!(repo.is_completed_on("h", day(4)));

        let second = repo.toggle_completion("h", day(4)).await;
        assert_eq!(second.id, first.id);
        assert!(!second.completed);
        assert!(!repo.is_completed_on("h", day(4)));
        assert_eq!(repo.entries_for_habit("h").len(), 1);

        repo.toggle_completion("h", day(5)).await;
        assert_eq!(repo.entries_for_habit("h").len(), 2);
        assert!(!repo.is_completed_on("other", day(5)));
    }

    #[tokio::test]
    async fn note_requires_existing_entry() {
        let mut repo = repo().await;
        assert!(repo.set_entry_note("h", day(1), Some("tired".into())).await.is_none());
        repo.toggle_completion("h", day(1)).await;
        let entry = repo.set_entry_note("h", day(1), Some(" tired ".into())).await.unwrap();
        assert_eq!(entry.notes.as_deref(), Some("tired"));
        let cleared = repo.set_entry_note("h", day(1), Some("  ".into())).await.unwrap();
        assert_eq!(cleared.notes, None);
    }

    #[tokio::test]
    async fn comments_validate_length() {
        let mut repo = repo().await;
        assert_eq!(repo.add_comment("h", "  ").await, Err(ValidationError::EmptyComment));
        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        assert!(matches!(
            repo.add_comment("h", &long).await,
            Err(ValidationError::CommentTooLong { .. })
        ));
        let comment = repo.add_comment("h", " keep going ").await.unwrap();
        assert_eq!(comment.content, "keep going");
        assert_eq!(repo.comments_for_habit("h"), vec![comment]);
    }

    #[tokio::test]
    async fn cheer_toggles_per_emoji() {
        let mut repo = repo().await;
        assert!(matches!(repo.toggle_cheer("h", "🔥").await, Ok(CheerToggle::Added(_))));
        assert!(matches!(repo.toggle_cheer("h", "🎉").await, Ok(CheerToggle::Added(_))));
        assert_eq!(repo.cheers_for_habit("h").len(), 2);
        assert_eq!(repo.toggle_cheer("h", "🔥").await, Ok(CheerToggle::Removed));
        assert_eq!(repo.cheers_for_habit("h").len(), 1);
        assert_eq!(repo.toggle_cheer("h", "").await, Err(ValidationError::EmptyEmoji));
    }

    #[tokio::test]
    async fn seed_only_fills_empty_store() {
        let mut repo = repo().await;
        assert!(repo.seed_demo_data(day(10)).await);
        assert_eq!(repo.list_habits().len(), 4);
        assert_eq!(repo.list_entries().len(), 18);
        assert!(repo.is_completed_on("demo-meditation", day(10)));
        assert!(!repo.seed_demo_data(day(10)).await);

        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(repo.list_habits().iter().all(|habit| habit.created_at == since));
    }
}
