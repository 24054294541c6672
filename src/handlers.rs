use crate::errors::AppError;
use crate::models::{SaveLogForm, SaveSubjectForm};
use crate::state::AppState;
use crate::storage;
use crate::ui::{render_index, render_summary};
use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::Html,
    Form,
};

const RECENT_LIMIT: i64 = 10;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let db = state.db.lock().await;
    let subjects = storage::list_subjects(&db)?;
    let logs = storage::recent_logs(&db, RECENT_LIMIT)?;
    Ok(Html(render_index(&subjects, &logs)))
}

pub async fn save_subject(
    State(state): State<AppState>,
    Form(form): Form<SaveSubjectForm>,
) -> Result<(StatusCode, [(HeaderName, &'static str); 1]), AppError> {
    let name = form.subject.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("subject not entered"));
    }

    let db = state.db.lock().await;
    storage::add_subject(&db, name)?;
    Ok(redirect_home())
}

pub async fn save_log(
    State(state): State<AppState>,
    Form(form): Form<SaveLogForm>,
) -> Result<(StatusCode, [(HeaderName, &'static str); 1]), AppError> {
    let subject = form.subject.trim();
    if subject.is_empty() {
        return Err(AppError::bad_request("subject not entered"));
    }
    let subject_id: i64 = subject
        .parse()
        .map_err(|_| AppError::bad_request("subject must be a numeric id"))?;
    let duration: i64 = form
        .duration
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request("duration must be an integer"))?;

    let db = state.db.lock().await;
    storage::add_log(&db, subject_id, duration)?;
    Ok(redirect_home())
}

pub async fn summary(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let db = state.db.lock().await;
    let by_subject = storage::summarize_by_subject(&db)?;
    let by_month = storage::summarize_by_month(&db)?;
    Ok(Html(render_summary(&by_subject, &by_month)))
}

// Plain 302, matching what browsers got from the form endpoints originally.
fn redirect_home() -> (StatusCode, [(HeaderName, &'static str); 1]) {
    (StatusCode::FOUND, [(header::LOCATION, "/")])
}
