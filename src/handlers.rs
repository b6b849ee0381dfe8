use crate::community::{CHEER_EMOJIS, FeedFilter, build_feed, cheer_counts, CommunityFeed};
use crate::errors::AppError;
use crate::models::{
    CheerOption, CheerRequest, CheerResponse, Comment, CommentRequest, FeedQuery, Habit,
    HabitEntry, HabitListQuery, HabitStatsResponse, HabitTemplate, HabitUpdate, HabitWithStats,
    NewHabit, NoteRequest, TemplateQuery, ToggleRequest,
};
use crate::repository::{CheerToggle, HabitRepository};
use crate::state::{AppState, DynStore};
use crate::stats::{
    OverviewStats, build_overview, format_streak_text, habit_stats_at, motivational_message, today,
};
use crate::templates::{TEMPLATES, popular_templates};
use crate::ui::render_index;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use chrono::NaiveDate;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let date = today();
    let repo = state.repo.lock().await;
    let habits: Vec<HabitWithStats> = repo
        .list_habits()
        .into_iter()
        .filter(|habit| !habit.archived)
        .map(|habit| with_stats(&repo, habit, date))
        .collect();
    Html(render_index(date, &habits))
}

pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitListQuery>,
) -> Json<Vec<HabitWithStats>> {
    let date = today();
    let repo = state.repo.lock().await;
    let habits = repo
        .list_habits()
        .into_iter()
        .filter(|habit| query.include_archived || !habit.archived)
        .map(|habit| with_stats(&repo, habit, date))
        .collect();
    Json(habits)
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let mut repo = state.repo.lock().await;
    let habit = repo.create_habit(payload).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitWithStats>, AppError> {
    let repo = state.repo.lock().await;
    let habit = find_habit(&repo, &id)?;
    Ok(Json(with_stats(&repo, habit, today())))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HabitUpdate>,
) -> Result<Json<Habit>, AppError> {
    let mut repo = state.repo.lock().await;
    repo.update_habit(&id, payload).await?
        .map(Json)
        .ok_or_else(|| missing(&id))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut repo = state.repo.lock().await;
    if repo.delete_habit(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(missing(&id))
    }
}

pub async fn archive_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let mut repo = state.repo.lock().await;
    if !repo.archive_habit(&id).await {
        return Err(missing(&id));
    }
    Ok(Json(find_habit(&repo, &id)?))
}

/// An empty body toggles today. A body that is present must be a valid
/// `ToggleRequest`.
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<HabitEntry>, AppError> {
    let date = toggle_date(&body, today())?;
    let mut repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    Ok(Json(repo.toggle_completion(&id, date).await))
}

pub async fn toggle_today(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let mut repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    repo.toggle_completion(&id, today()).await;
    Ok(Redirect::to("/"))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HabitEntry>>, AppError> {
    let repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    let mut entries = repo.entries_for_habit(&id);
    entries.sort_by_key(|entry| entry.date);
    Ok(Json(entries))
}

pub async fn set_note(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<HabitEntry>, AppError> {
    let date = parse_date(&date)?;
    let mut repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    repo.set_entry_note(&id, date, payload.notes)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no entry for {id} on {date}")))
}

pub async fn habit_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitStatsResponse>, AppError> {
    let repo = state.repo.lock().await;
    let habit = find_habit(&repo, &id)?;
    let stats = habit_stats_at(today(), &habit, &repo.entries_for_habit(&id));
    Ok(Json(HabitStatsResponse {
        message: motivational_message(&stats).to_string(),
        streak_text: format_streak_text(stats.current_streak),
        stats,
    }))
}

pub async fn overview(State(state): State<AppState>) -> Json<OverviewStats> {
    let repo = state.repo.lock().await;
    Json(build_overview(&repo.list_habits(), &repo.list_entries()))
}

pub async fn community(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<CommunityFeed>, AppError> {
    let filter = query
        .filter
        .as_deref()
        .unwrap_or_default()
        .parse::<FeedFilter>()
        .map_err(AppError::bad_request)?;
    let repo = state.repo.lock().await;
    Ok(Json(build_feed(
        filter,
        &repo.list_habits(),
        &repo.list_entries(),
        &repo.list_comments(),
        &repo.list_cheers(),
    )))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    Ok(Json(repo.comments_for_habit(&id)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let mut repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    let comment = repo.add_comment(&id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn cheer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CheerRequest>,
) -> Result<Json<CheerResponse>, AppError> {
    let mut repo = state.repo.lock().await;
    find_habit(&repo, &id)?;
    let cheer = match repo.toggle_cheer(&id, &payload.emoji).await? {
        CheerToggle::Added(cheer) => Some(cheer),
        CheerToggle::Removed => None,
    };
    Ok(Json(CheerResponse {
        added: cheer.is_some(),
        cheer,
        counts: cheer_counts(&id, &repo.list_cheers()),
    }))
}

pub async fn templates(Query(query): Query<TemplateQuery>) -> Json<Vec<&'static HabitTemplate>> {
    if query.popular {
        Json(popular_templates().collect())
    } else {
        Json(TEMPLATES.iter().collect())
    }
}

pub async fn cheer_options() -> Json<Vec<CheerOption>> {
    Json(
        CHEER_EMOJIS
            .iter()
            .map(|&(emoji, label)| CheerOption { emoji, label })
            .collect(),
    )
}

fn with_stats(repo: &HabitRepository<DynStore>, habit: Habit, date: NaiveDate) -> HabitWithStats {
    let entries = repo.entries_for_habit(&habit.id);
    HabitWithStats {
        stats: habit_stats_at(date, &habit, &entries),
        completed_today: repo.is_completed_on(&habit.id, date),
        habit,
    }
}

fn find_habit(repo: &HabitRepository<DynStore>, id: &str) -> Result<Habit, AppError> {
    repo.habit(id).ok_or_else(|| missing(id))
}

fn missing(id: &str) -> AppError {
    AppError::not_found(format!("habit {id} not found"))
}

fn toggle_date(body: &[u8], today: NaiveDate) -> Result<NaiveDate, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(today);
    }
    let request: ToggleRequest = serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request(format!("invalid toggle request: {err}")))?;
    Ok(request.date.unwrap_or(today))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD")))
}
