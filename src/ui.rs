use crate::models::HabitWithStats;
use crate::stats::{format_streak_text, motivational_message};
use chrono::NaiveDate;

pub fn render_index(date: NaiveDate, habits: &[HabitWithStats]) -> String {
    let cards = if habits.is_empty() {
        EMPTY_HTML.to_string()
    } else {
        habits.iter().map(render_card).collect::<Vec<_>>().join("\n")
    };
    let done = habits.iter().filter(|item| item.completed_today).count();

    INDEX_HTML
        .replace("{{DATE}}", &date.format("%A, %B %-d").to_string())
        .replace("{{DONE}}", &done.to_string())
        .replace("{{TOTAL}}", &habits.len().to_string())
        .replace("{{CARDS}}", &cards)
}

fn render_card(item: &HabitWithStats) -> String {
    let (button_class, button_label) = if item.completed_today {
        ("toggle done", "Completed today")
    } else {
        ("toggle", "Mark complete")
    };
    let description = item
        .habit
        .description
        .as_deref()
        .map(|text| format!("<p class=\"desc\">{}</p>", escape(text)))
        .unwrap_or_default();

    CARD_HTML
        .replace("{{ID}}", &escape(&item.habit.id))
        .replace("{{NAME}}", &escape(&item.habit.name))
        .replace("{{DESCRIPTION}}", &description)
        .replace("{{VISIBILITY}}", if item.habit.is_private { "Private" } else { "Community" })
        .replace("{{STREAK}}", &format_streak_text(item.stats.current_streak))
        .replace("{{LONGEST}}", &item.stats.longest_streak.to_string())
        .replace("{{RATE}}", &item.stats.completion_rate.to_string())
        .replace("{{MESSAGE}}", motivational_message(&item.stats))
        .replace("{{BUTTON_CLASS}}", button_class)
        .replace("{{BUTTON_LABEL}}", button_label)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const EMPTY_HTML: &str = r#"<p class="empty">No habits yet. Create one with <code>POST /api/habits</code>.</p>"#;

const CARD_HTML: &str = r#"<article class="card">
  <header>
    <h2>{{NAME}}</h2>
    <span class="badge">{{VISIBILITY}}</span>
  </header>
  {{DESCRIPTION}}
  <dl>
    <div><dt>Current</dt><dd>{{STREAK}}</dd></div>
    <div><dt>Best</dt><dd>{{LONGEST}} days</dd></div>
    <div><dt>Rate</dt><dd>{{RATE}}%</dd></div>
  </dl>
  <p class="message">{{MESSAGE}}</p>
  <form method="post" action="/habits/{{ID}}/toggle">
    <button class="{{BUTTON_CLASS}}" type="submit">{{BUTTON_LABEL}}</button>
  </form>
</article>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg: #f6f4ee;
      --ink: #25282b;
      --muted: #6b6f73;
      --accent: #2f7d5b;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(37, 40, 43, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(860px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    .summary {
      color: var(--muted);
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 22px 24px;
    }

    .card header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
    }

    .card h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .badge {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .desc,
    .message {
      color: var(--muted);
    }

    dl {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
      margin: 14px 0;
    }

    dt {
      font-size: 0.75rem;
      text-transform: uppercase;
      color: var(--muted);
    }

    dd {
      margin: 0;
      font-weight: 600;
    }

    .toggle {
      border: 2px solid var(--accent);
      background: transparent;
      color: var(--accent);
      border-radius: 999px;
      padding: 8px 18px;
      font: inherit;
      cursor: pointer;
    }

    .toggle.done {
      background: var(--accent);
      color: #fff;
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Today's habits</h1>
      <p class="summary">{{DATE}} &middot; {{DONE}} of {{TOTAL}} done</p>
    </header>
    {{CARDS}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Habit, HabitStats};
    use chrono::Utc;

    fn item(name: &str, completed_today: bool) -> HabitWithStats {
        HabitWithStats {
            habit: Habit {
                id: "h1".into(),
                user_id: "1".into(),
                name: name.into(),
                description: None,
                frequency: Frequency::Daily,
                is_private: true,
                archived: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            stats: HabitStats {
                habit_id: "h1".into(),
                current_streak: 4,
                longest_streak: 9,
                completion_rate: 90,
                total_entries: 10,
                completed_entries: 9,
            },
            completed_today,
        }
    }

    #[test]
    fn renders_cards_with_escaped_names() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let html = render_index(date, &[item("<b>Run</b>", true)]);
        assert!(html.contains("&lt;b&gt;Run&lt;/b&gt;"));
        assert!(html.contains("4 day streak"));
        assert!(html.contains("1 of 1 done"));
        assert!(html.contains("/habits/h1/toggle"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn placeholders_in_user_text_stay_literal() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut goal = item("Goal {{RATE}}", false);
        goal.habit.description = Some("{{STREAK}} or bust".into());
        let html = render_index(date, &[goal]);
        assert!(html.contains("Goal &#123;&#123;RATE&#125;&#125;"));
        assert!(html.contains("&#123;&#123;STREAK&#125;&#125; or bust"));
        assert!(!html.contains("Goal 90"));
        assert!(!html.contains("4 day streak or bust"));
    }

    #[test]
    fn renders_empty_state() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let html = render_index(date, &[]);
        assert!(html.contains("No habits yet"));
    }
}
