use crate::config::Config;
use crate::services::carousel::CarouselLoader;
use crate::services::catalog::CatalogApi;
use crate::services::chart::ChartBuilder;
use crate::session::{ChartRequest, UiSession, ViewArea};
use crate::views::cards::{render, RenderedGrid};
use crate::views::modal::{work_detail_body, DETAIL_ERROR_BODY, DETAIL_ERROR_TITLE};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub const EMPTY_QUERY: &str = "Type something to search.";
pub const SUBJECT_FAILED: &str = "Subject failed to load.";
pub const NO_WORK_ID: &str = "<p>No work id found for this item.</p>";

/// Drives catalog loads into the shared session. Failures are logged and turned
/// into status text; nothing here returns an error to the caller.
#[derive(Clone)]
pub struct Frontend {
    catalog: Arc<dyn CatalogApi + Send + Sync>,
    charts: Arc<ChartBuilder>,
    carousel: Arc<CarouselLoader>,
    session: Arc<Mutex<UiSession>>,
    catalog_base: String,
}

impl Frontend {
    pub fn new(catalog: Arc<dyn CatalogApi + Send + Sync>, config: &Config) -> Self {
        Self {
            charts: Arc::new(ChartBuilder::new(catalog.clone(), config.chart_enabled)),
            carousel: Arc::new(CarouselLoader::new(catalog.clone())),
            catalog,
            session: Arc::new(Mutex::new(UiSession::new())),
            catalog_base: config.catalog_base_url.clone(),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<UiSession>> {
        &self.session
    }

    pub async fn search(&self, query: &str, limit: usize) -> Option<ChartRequest> {
        let query = query.trim();
        if query.is_empty() {
            self.session.lock().await.set_status(EMPTY_QUERY);
            return None;
        }

        let token = {
            let mut session = self.session.lock().await;
            session.set_status("Searching...");
            session.begin(ViewArea::Grid)
        };

        let result = self.catalog.search(query, limit).await;
        let label = format!("Search results for \"{}\"", query);

        let mut session = self.session.lock().await;
        match result {
            Ok(books) => {
                let loaded = books.len().min(limit);
                let request = session.apply_grid(token, render(&books, &label));
                session.set_status_if_current(token, format!("Loaded {} result(s).", loaded));
                info!("Search '{}' returned {} result(s)", query, books.len());
                request
            }
            Err(e) => {
                error!("Search '{}' failed: {}", query, e);
                session.set_status_if_current(token, "Search failed. Check server logs.");
                session.apply_grid(token, render(&[], &label))
            }
        }
    }

    pub async fn load_subject(&self, subject: &str, limit: usize) -> Option<ChartRequest> {
        let token = {
            let mut session = self.session.lock().await;
            session.set_status(format!("Loading subject: {}...", subject));
            session.begin(ViewArea::Grid)
        };

        let result = self.catalog.by_subject(subject, limit).await;
        let label = format!("Subject: {}", subject);

        let mut session = self.session.lock().await;
        match result {
            Ok(books) => {
                let loaded = books.len().min(limit);
                let request = session.apply_grid(token, render(&books, &label));
                session.set_status_if_current(
                    token,
                    format!("Loaded {} book(s) from \"{}\".", loaded, subject),
                );
                info!("Subject '{}' returned {} work(s)", subject, books.len());
                request
            }
            Err(e) => {
                error!("Subject '{}' failed: {}", subject, e);
                session.set_status_if_current(token, "Subject failed. Check server logs.");
                session.apply_grid(token, RenderedGrid::placeholder(&label, SUBJECT_FAILED))
            }
        }
    }

    pub async fn load_work(&self, work_id: &str) {
        let work_id = work_id.trim();
        if work_id.is_empty() {
            self.session.lock().await.open_modal("Book", NO_WORK_ID.to_string());
            return;
        }

        let token = {
            let mut session = self.session.lock().await;
            session.set_status("Loading details...");
            session.begin(ViewArea::Modal)
        };

        let result = self.catalog.work_details(work_id).await;

        let mut session = self.session.lock().await;
        match result {
            Ok(detail) => {
                let body = work_detail_body(&detail, work_id, &self.catalog_base);
                if session.apply_modal(token, &detail.title, body) {
                    session.set_status("Details loaded.");
                }
            }
            Err(e) => {
                error!("Details for {} failed: {}", work_id, e);
                if session.apply_modal(token, DETAIL_ERROR_TITLE, DETAIL_ERROR_BODY.to_string()) {
                    session.set_status("Details failed. Check server logs.");
                }
            }
        }
    }

    pub async fn close_modal(&self) {
        self.session.lock().await.close_modal();
    }

    pub async fn load_trending(&self) {
        let token = {
            let mut session = self.session.lock().await;
            session.set_status("Loading trending...");
            session.begin(ViewArea::Carousel)
        };

        let result = self.carousel.load().await;

        let mut session = self.session.lock().await;
        match result {
            Ok(slides) => {
                if session.apply_carousel(token, slides) {
                    session.set_status("Trending loaded.");
                }
            }
            Err(e) => {
                error!("Trending failed: {}", e);
                if session.clear_carousel(token) {
                    session.set_status("Trending failed. Check server logs.");
                }
            }
        }
    }

    /// Builds the subject chart for a rendered result set and installs it if that
    /// result set is still on screen.
    pub async fn refresh_chart(&self, request: ChartRequest) {
        let Some(chart) = self.charts.build(&request.work_ids).await else {
            return;
        };

        let mut session = self.session.lock().await;
        if session.apply_chart(&request, chart) {
            info!("Subject chart updated from {} work(s)", request.work_ids.len());
        }
    }

    /// Runs the chart refresh in the background so the caller can respond immediately.
    pub fn spawn_chart(&self, request: Option<ChartRequest>) {
        if let Some(request) = request {
            let frontend = self.clone();
            tokio::spawn(async move { frontend.refresh_chart(request).await });
        }
    }
}
