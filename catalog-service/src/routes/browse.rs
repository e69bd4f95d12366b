use crate::routes::AppState;
use crate::views::page::{render_page, PageContext};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Json, Redirect},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

pub const DEFAULT_LIMIT: usize = 12;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectParams {
    pub name: Option<String>,
    pub limit: Option<String>,
}

pub fn clamp_limit(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT)
}

async fn page(state: &AppState, query: &str, subject: &str, limit: usize) -> Html<String> {
    let context = PageContext {
        query: query.to_string(),
        subject: subject.to_string(),
        limit,
        chart_enabled: state.chart_enabled,
    };
    let session = state.frontend.session().lock().await;
    Html(render_page(&session, &context))
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    page(&state, "", &state.default_subject, DEFAULT_LIMIT).await
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let query = params.q.unwrap_or_default();
    let limit = clamp_limit(params.limit.as_deref());
    info!("Search request: '{}' (limit {})", query, limit);

    let request = state.frontend.search(&query, limit).await;
    state.frontend.spawn_chart(request);

    page(&state, query.trim(), &state.default_subject, limit).await
}

pub async fn subject(
    State(state): State<AppState>,
    Query(params): Query<SubjectParams>,
) -> Html<String> {
    let subject = params
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| state.default_subject.clone());
    let limit = clamp_limit(params.limit.as_deref());
    info!("Subject request: '{}' (limit {})", subject, limit);

    let request = state.frontend.load_subject(&subject, limit).await;
    state.frontend.spawn_chart(request);

    page(&state, "", &subject, limit).await
}

pub async fn work_details(
    State(state): State<AppState>,
    Path(work_id): Path<String>,
) -> Html<String> {
    state.frontend.load_work(&work_id).await;
    page(&state, "", &state.default_subject, DEFAULT_LIMIT).await
}

pub async fn close_modal(State(state): State<AppState>) -> Redirect {
    state.frontend.close_modal().await;
    Redirect::to("/")
}

pub async fn trending(State(state): State<AppState>) -> Redirect {
    state.frontend.load_trending().await;
    Redirect::to("/")
}

pub async fn chart_config(State(state): State<AppState>) -> Json<Option<Value>> {
    let session = state.frontend.session().lock().await;
    Json(session.chart().map(|widget| widget.chart.config()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routes::router;
    use crate::services::frontend::Frontend;
    use crate::services::testing::{summary, StubCatalog};
    use axum::{body::Body, http::Request, http::StatusCode, Router};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(catalog: StubCatalog) -> (Router, Frontend) {
        let config = Config::from_lookup(|_| None);
        let frontend = Frontend::new(Arc::new(catalog), &config);
        let state = AppState {
            frontend: frontend.clone(),
            default_subject: config.default_subject.clone(),
            chart_enabled: config.chart_enabled,
        };
        (router(state), frontend)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), 12);
        assert_eq!(clamp_limit(Some("24")), 24);
        assert_eq!(clamp_limit(Some("0")), 1);
        assert_eq!(clamp_limit(Some("500")), 100);
        assert_eq!(clamp_limit(Some("-4")), 12);
    }

    #[tokio::test]
    async fn test_search_page_escapes_results() {
        let catalog = StubCatalog::default().with_listing(
            "dune",
            vec![summary("<script>alert(1)</script>", Some("OL1W"))],
        );
        let (app, _) = app(catalog);

        let (status, html) = get(&app, "/search?q=dune&limit=6").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("Loaded 1 result(s)."));
    }

    #[tokio::test]
    async fn test_subject_defaults_to_configured_subject() {
        let catalog =
            StubCatalog::default().with_listing("history", vec![summary("Histories", None)]);
        let (app, _) = app(catalog);

        let (status, html) = get(&app, "/subject").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Subject: history"));
        assert!(html.contains("Histories"));
    }

    #[tokio::test]
    async fn test_work_page_opens_modal_and_close_redirects() {
        let (app, frontend) = app(StubCatalog::default().with_work("OL1W", &["Fiction"]));

        let (_, html) = get(&app, "/works/OL1W").await;
        assert!(html.contains("Work OL1W"));
        assert!(html.contains(r#"<span class="badge">Fiction</span>"#));

        let (status, _) = get(&app, "/modal/close").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(!frontend.session().lock().await.modal().is_open());
    }

    #[tokio::test]
    async fn test_chart_json_is_null_without_chart() {
        let (app, _) = app(StubCatalog::default());
        let (status, body) = get(&app, "/chart.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(StubCatalog::default());
        let (status, body) = get(&app, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("catalog-service"));
    }
}
