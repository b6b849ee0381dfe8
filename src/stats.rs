use crate::models::{Habit, HabitEntry, HabitStats};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekdayPoint {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_habits: usize,
    pub private_habits: usize,
    pub community_habits: usize,
    pub completed_today: usize,
    pub total_entries: usize,
    pub completed_entries: usize,
    pub completion_rate: u8,
    pub best_streak: u32,
    pub this_week: Vec<WeekdayPoint>,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_streak(entries: &[HabitEntry]) -> u32 {
    current_streak_at(today(), entries)
}

/// Length of the unbroken run of completed days ending today, or ending
/// yesterday when today has no completion yet.
pub fn current_streak_at(today: NaiveDate, entries: &[HabitEntry]) -> u32 {
    let days = completed_days(entries);
    let anchor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    let mut day = anchor;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

pub fn longest_streak(entries: &[HabitEntry]) -> u32 {
    let days = completed_days(entries);
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in days {
        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

/// Percentage of all entries that are completed, rounded half up.
pub fn completion_rate(entries: &[HabitEntry]) -> u8 {
    let completed = entries.iter().filter(|entry| entry.completed).count();
    rate(completed, entries.len())
}

pub fn habit_stats(habit: &Habit, entries: &[HabitEntry]) -> HabitStats {
    habit_stats_at(today(), habit, entries)
}

pub fn habit_stats_at(today: NaiveDate, habit: &Habit, entries: &[HabitEntry]) -> HabitStats {
    HabitStats {
        habit_id: habit.id.clone(),
        current_streak: current_streak_at(today, entries),
        longest_streak: longest_streak(entries),
        completion_rate: completion_rate(entries),
        total_entries: entries.len(),
        completed_entries: entries.iter().filter(|entry| entry.completed).count(),
    }
}

/// Checks run in priority order; the first match wins.
pub fn motivational_message(stats: &HabitStats) -> &'static str {
    if stats.current_streak >= 30 {
        "🔥 Incredible! You're on fire!"
    } else if stats.current_streak >= 7 {
        "🌟 Great job! Keep the momentum going!"
    } else if stats.current_streak >= 3 {
        "💪 Nice streak! You're building a great habit!"
    } else if stats.completion_rate >= 80 {
        "🎯 Excellent consistency!"
    } else if stats.completion_rate >= 60 {
        "👍 Good progress! Keep it up!"
    } else if stats.longest_streak > stats.current_streak {
        "🔄 You've done this before - you can do it again!"
    } else {
        "🚀 Every journey begins with a single step!"
    }
}

pub fn format_streak_text(streak: u32) -> String {
    match streak {
        0 => "No streak yet".to_string(),
        1 => "1 day streak".to_string(),
        n => format!("{n} day streak"),
    }
}

pub fn build_overview(habits: &[Habit], entries: &[HabitEntry]) -> OverviewStats {
    build_overview_at(today(), habits, entries)
}

pub fn build_overview_at(today: NaiveDate, habits: &[Habit], entries: &[HabitEntry]) -> OverviewStats {
    let completed_entries = entries.iter().filter(|entry| entry.completed).count();
    let completed_on = |date: NaiveDate| {
        entries
            .iter()
            .filter(|entry| entry.completed && entry.date == date)
            .count()
    };

    let best_streak = habits
        .iter()
        .map(|habit| longest_streak(&entries_for(&habit.id, entries)))
        .max()
        .unwrap_or(0);

    let start = week_start(today);
    let this_week = (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            WeekdayPoint {
                date,
                completed: completed_on(date),
                total: habits.len(),
            }
        })
        .collect();

    let private_habits = habits.iter().filter(|habit| habit.is_private).count();

    OverviewStats {
        total_habits: habits.len(),
        private_habits,
        community_habits: habits.len() - private_habits,
        completed_today: completed_on(today),
        total_entries: entries.len(),
        completed_entries,
        completion_rate: rate(completed_entries, entries.len()),
        best_streak,
        this_week,
    }
}

pub fn entries_for(habit_id: &str, entries: &[HabitEntry]) -> Vec<HabitEntry> {
    entries
        .iter()
        .filter(|entry| entry.habit_id == habit_id)
        .cloned()
        .collect()
}

fn completed_days(entries: &[HabitEntry]) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .filter(|entry| entry.completed)
        .map(|entry| entry.date)
        .collect()
}

fn rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u8
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
    }

    fn entry(days_ago: i64, completed: bool) -> HabitEntry {
        HabitEntry {
            id: format!("e{days_ago}-{completed}"),
            habit_id: "h1".into(),
            user_id: "1".into(),
            date: today() - Duration::days(days_ago),
            completed,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn habit() -> Habit {
        Habit {
            id: "h1".into(),
            user_id: "1".into(),
            name: "Read".into(),
            description: None,
            frequency: Frequency::Daily,
            is_private: false,
            archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stats(current: u32, longest: u32, rate: u8) -> HabitStats {
        HabitStats {
            habit_id: "h1".into(),
            current_streak: current,
            longest_streak: longest,
            completion_rate: rate,
            ..HabitStats::default()
        }
    }

    #[test]
    fn nothing_completed_is_all_zero() {
        let entries = vec![entry(0, false), entry(1, false)];
        assert_eq!(current_streak_at(today(), &entries), 0);
        assert_eq!(longest_streak(&entries), 0);
        assert_eq!(completion_rate(&entries), 0);
        assert_eq!(completion_rate(&[]), 0);
    }

    #[test]
    fn single_completion_today_is_streak_of_one() {
        assert_eq!(current_streak_at(today(), &[entry(0, true)]), 1);
    }

    #[test]
    fn three_consecutive_days_in_any_order() {
        let entries = vec![entry(1, true), entry(0, true), entry(2, true)];
        assert_eq!(current_streak_at(today(), &entries), 3);
    }

    #[test]
    fn gap_breaks_current_streak() {
        let entries = vec![entry(0, true), entry(3, true)];
        assert_eq!(current_streak_at(today(), &entries), 1);
    }

    #[test]
    fn run_ending_yesterday_still_counts() {
        let entries = vec![entry(1, true), entry(2, true)];
        assert_eq!(current_streak_at(today(), &entries), 2);
    }

    #[test]
    fn run_ending_two_days_ago_is_broken() {
        let entries = vec![entry(2, true), entry(3, true)];
        assert_eq!(current_streak_at(today(), &entries), 0);
    }

    #[test]
    fn duplicate_days_count_once() {
        let entries = vec![entry(0, true), entry(0, true), entry(1, true)];
        assert_eq!(current_streak_at(today(), &entries), 2);
        assert_eq!(longest_streak(&entries), 2);
    }

    #[test]
    fn future_entries_do_not_extend_streak() {
        let entries = vec![entry(-1, true), entry(0, true)];
        assert_eq!(current_streak_at(today(), &entries), 1);
    }

    #[test]
    fn longest_streak_picks_the_longer_run() {
        let mut entries: Vec<_> = (10..15).map(|d| entry(d, true)).collect();
        entries.push(entry(3, true));
        entries.push(entry(2, true));
        assert_eq!(longest_streak(&entries), 5);
    }

    #[test]
    fn completion_rate_ignores_order() {
        let mut entries = vec![entry(0, true), entry(1, false), entry(2, true), entry(3, true)];
        let forward = completion_rate(&entries);
        entries.reverse();
        assert_eq!(completion_rate(&entries), forward);
        assert_eq!(forward, 75);
    }

    #[test]
    fn completion_rate_rounds_half_up() {
        let entries: Vec<_> = (0..8).map(|d| entry(d, d == 0)).collect();
        assert_eq!(completion_rate(&entries), 13);
    }

    #[test]
    fn habit_stats_end_to_end() {
        let entries = vec![entry(0, true), entry(1, true), entry(2, false)];
        let stats = habit_stats_at(today(), &habit(), &entries);
        assert_eq!(stats.habit_id, "h1");
        assert_eq!(stats.completion_rate, 67);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.completed_entries, 2);
    }

    #[test]
    fn streak_outranks_completion_rate() {
        assert_eq!(motivational_message(&stats(30, 30, 0)), "🔥 Incredible! You're on fire!");
    }

    #[test]
    fn message_cascade_order() {
        assert_eq!(motivational_message(&stats(7, 7, 0)), "🌟 Great job! Keep the momentum going!");
        assert_eq!(
            motivational_message(&stats(3, 3, 100)),
            "💪 Nice streak! You're building a great habit!"
        );
        assert_eq!(motivational_message(&stats(2, 9, 80)), "🎯 Excellent consistency!");
        assert_eq!(motivational_message(&stats(0, 9, 60)), "👍 Good progress! Keep it up!");
        assert_eq!(
            motivational_message(&stats(1, 4, 10)),
            "🔄 You've done this before - you can do it again!"
        );
        assert_eq!(
            motivational_message(&stats(0, 0, 0)),
            "🚀 Every journey begins with a single step!"
        );
    }

    #[test]
    fn streak_text() {
        assert_eq!(format_streak_text(0), "No streak yet");
        assert_eq!(format_streak_text(1), "1 day streak");
        assert_eq!(format_streak_text(12), "12 day streak");
    }

    #[test]
    fn overview_covers_monday_to_sunday() {
        // 2026-01-07 is a Wednesday.
        let entries = vec![entry(0, true), entry(1, true), entry(2, false), entry(9, true)];
        let overview = build_overview_at(today(), &[habit()], &entries);

        assert_eq!(overview.this_week.len(), 7);
        assert_eq!(overview.this_week[0].date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(overview.this_week[1].completed, 1);
        assert_eq!(overview.this_week[2].completed, 1);
        assert!(overview.this_week.iter().all(|day| day.total == 1));
        assert_eq!(overview.completed_today, 1);
        assert_eq!(overview.completion_rate, 75);
        assert_eq!(overview.best_streak, 2);
        assert_eq!(overview.community_habits, 1);
    }
}
