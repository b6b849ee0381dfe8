use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Intended cadence of a habit. Not enforced by the streak calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom { interval_days: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub is_private: bool,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitEntry {
    pub id: String,
    pub habit_id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Derived per-habit statistics. Recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HabitStats {
    pub habit_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: u8,
    pub total_entries: usize,
    pub completed_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub habit_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cheer {
    pub id: String,
    pub habit_id: String,
    pub user_id: String,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub frequency: Frequency,
    pub category: &'static str,
    pub is_popular: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub is_private: bool,
}

/// Partial edit of a habit; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub is_private: Option<bool>,
    pub archived: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToggleRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CheerRequest {
    pub emoji: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct HabitListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct FeedQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TemplateQuery {
    #[serde(default)]
    pub popular: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheerOption {
    pub emoji: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitWithStats {
    pub habit: Habit,
    pub stats: HabitStats,
    pub completed_today: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitStatsResponse {
    #[serde(flatten)]
    pub stats: HabitStats,
    pub message: String,
    pub streak_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheerResponse {
    pub added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheer: Option<Cheer>,
    pub counts: BTreeMap<String, usize>,
}
