use crate::models::{Cheer, Comment, Habit, HabitEntry, HabitStats};
use crate::stats::{entries_for, habit_stats_at, today};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

pub const CHEER_EMOJIS: [(&str, &str); 6] = [
    ("🔥", "Fire"),
    ("💪", "Strong"),
    ("🌟", "Star"),
    ("👍", "Thumbs Up"),
    ("❤️", "Love"),
    ("🎉", "Celebrate"),
];

const TRENDING_STREAK: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    Trending,
    Recent,
}

impl FromStr for FeedFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "all" => Ok(Self::All),
            "trending" => Ok(Self::Trending),
            "recent" => Ok(Self::Recent),
            other => Err(format!("unknown feed filter '{other}'")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedItem {
    pub habit: Habit,
    pub stats: HabitStats,
    pub latest_entry: Option<NaiveDate>,
    pub comments: Vec<Comment>,
    pub cheers: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedSummary {
    pub active_habits: usize,
    pub total_streaks: u32,
    pub active_users: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommunityFeed {
    pub filter: FeedFilter,
    pub summary: FeedSummary,
    pub items: Vec<FeedItem>,
}

pub fn build_feed(
    filter: FeedFilter,
    habits: &[Habit],
    entries: &[HabitEntry],
    comments: &[Comment],
    cheers: &[Cheer],
) -> CommunityFeed {
    build_feed_at(today(), filter, habits, entries, comments, cheers)
}

/// Shared, unarchived habits ordered by current streak. The summary always
/// describes every shared habit regardless of `filter`.
pub fn build_feed_at(
    today: NaiveDate,
    filter: FeedFilter,
    habits: &[Habit],
    entries: &[HabitEntry],
    comments: &[Comment],
    cheers: &[Cheer],
) -> CommunityFeed {
    let items: Vec<FeedItem> = habits
        .iter()
        .filter(|habit| !habit.is_private && !habit.archived)
        .map(|habit| {
            let habit_entries = entries_for(&habit.id, entries);
            let mut habit_comments: Vec<Comment> = comments
                .iter()
                .filter(|comment| comment.habit_id == habit.id)
                .cloned()
                .collect();
            habit_comments.sort_by_key(|comment| comment.created_at);

            FeedItem {
                stats: habit_stats_at(today, habit, &habit_entries),
                latest_entry: habit_entries.iter().map(|entry| entry.date).max(),
                comments: habit_comments,
                cheers: cheer_counts(&habit.id, cheers),
                habit: habit.clone(),
            }
        })
        .collect();

    let summary = FeedSummary {
        active_habits: items.len(),
        total_streaks: items.iter().map(|item| item.stats.current_streak).sum(),
        active_users: items
            .iter()
            .map(|item| item.habit.user_id.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
    };

    let since = today - Duration::days(1);
    let mut items: Vec<FeedItem> = items
        .into_iter()
        .filter(|item| match filter {
            FeedFilter::All => true,
            FeedFilter::Trending => item.stats.current_streak >= TRENDING_STREAK,
            FeedFilter::Recent => item.latest_entry.is_some_and(|date| date >= since),
        })
        .collect();
    items.sort_by(|a, b| b.stats.current_streak.cmp(&a.stats.current_streak));

    CommunityFeed {
        filter,
        summary,
        items,
    }
}

pub fn cheer_counts(habit_id: &str, cheers: &[Cheer]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for cheer in cheers.iter().filter(|cheer| cheer.habit_id == habit_id) {
        *counts.entry(cheer.emoji.clone()).or_insert(0) += 1;
    }
    counts
}
