//! Route registration for the `/api` surface

use axum::{
    Extension, Router,
    routing::{delete, get},
};
use services::AppServices;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{dashboard, groups, study_activities, study_sessions, words};

/// Build the full router with every service attached as an extension.
pub fn router(services: &AppServices) -> Router {
    let api = Router::new()
        // Words
        .route("/words", get(words::list_words).post(words::create_word))
        .route(
            "/words/{id}",
            get(words::get_word)
                .put(words::update_word)
                .delete(words::delete_word),
        )
        // Groups
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/groups/{id}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/groups/{id}/words",
            get(groups::list_group_words).post(groups::add_group_word),
        )
        .route(
            "/groups/{id}/words/{word_id}",
            delete(groups::remove_group_word),
        )
        .route(
            "/groups/{id}/study-sessions",
            get(groups::list_group_study_sessions),
        )
        // Study sessions
        .route(
            "/study-sessions",
            get(study_sessions::list_study_sessions).post(study_sessions::create_study_session),
        )
        .route(
            "/study-sessions/{id}",
            get(study_sessions::get_study_session),
        )
        .route(
            "/study-sessions/{id}/reviews",
            get(study_sessions::list_session_reviews)
                .post(study_sessions::create_session_review),
        )
        // Study activities
        .route(
            "/study-activities",
            get(study_activities::list_study_activities)
                .post(study_activities::create_study_activity),
        )
        .route(
            "/study-activities/{id}",
            get(study_activities::get_study_activity)
                .put(study_activities::update_study_activity)
                .delete(study_activities::delete_study_activity),
        )
        .route(
            "/study-activities/{id}/study-sessions",
            get(study_activities::list_study_activity_sessions),
        )
        // Dashboard
        .route("/dashboard/stats", get(dashboard::quick_stats))
        .route(
            "/dashboard/last-study-session",
            get(dashboard::last_study_session),
        )
        .route("/dashboard/study-progress", get(dashboard::study_progress))
        .layer(Extension(services.words()))
        .layer(Extension(services.groups()))
        .layer(Extension(services.study_activities()))
        .layer(Extension(services.study_sessions()))
        .layer(Extension(services.dashboard()));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
