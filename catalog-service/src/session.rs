//! State of the single browsing session the frontend serves.
//!
//! Every view area keeps its own request generation. A load takes a
//! [`LoadToken`] before it suspends on the catalog; when the response comes
//! back it is applied only if no newer load for the same area was started in
//! the meantime. Carousel and chart instances are replaced whole, and the
//! previous instance is disposed before the new one is installed.
use crate::services::carousel::CarouselSlides;
use crate::services::chart::SubjectChart;
use crate::views::cards::RenderedGrid;
use crate::views::modal::Modal;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewArea {
    Grid,
    Modal,
    Carousel,
    Chart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    area: ViewArea,
    generation: u64,
}

/// Chart refresh scheduled by a grid render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub token: LoadToken,
    pub grid_generation: u64,
    pub work_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselWidget {
    pub instance: u64,
    pub slides: CarouselSlides,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartWidget {
    pub instance: u64,
    pub chart: SubjectChart,
}

#[derive(Debug, Default)]
struct Generations {
    grid: u64,
    modal: u64,
    carousel: u64,
    chart: u64,
}

impl Generations {
    fn slot(&mut self, area: ViewArea) -> &mut u64 {
        match area {
            ViewArea::Grid => &mut self.grid,
            ViewArea::Modal => &mut self.modal,
            ViewArea::Carousel => &mut self.carousel,
            ViewArea::Chart => &mut self.chart,
        }
    }

    fn current(&self, area: ViewArea) -> u64 {
        match area {
            ViewArea::Grid => self.grid,
            ViewArea::Modal => self.modal,
            ViewArea::Carousel => self.carousel,
            ViewArea::Chart => self.chart,
        }
    }
}

#[derive(Debug, Default)]
pub struct UiSession {
    generations: Generations,
    next_instance: u64,
    status: String,
    grid: Option<RenderedGrid>,
    modal: Modal,
    carousel: Option<CarouselWidget>,
    chart: Option<ChartWidget>,
    last_loaded_work_ids: Vec<String>,
}

impl UiSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, area: ViewArea) -> LoadToken {
        let slot = self.generations.slot(area);
        *slot += 1;
        LoadToken {
            area,
            generation: *slot,
        }
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        self.generations.current(token.area) == token.generation
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Sets the status only while `token` is still the latest load of its area.
    pub fn set_status_if_current(&mut self, token: LoadToken, message: impl Into<String>) {
        if self.is_current(token) {
            self.set_status(message);
        }
    }

    pub fn grid(&self) -> Option<&RenderedGrid> {
        self.grid.as_ref()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn carousel(&self) -> Option<&CarouselWidget> {
        self.carousel.as_ref()
    }

    pub fn chart(&self) -> Option<&ChartWidget> {
        self.chart.as_ref()
    }

    pub fn last_loaded_work_ids(&self) -> &[String] {
        &self.last_loaded_work_ids
    }

    /// Replaces the grid. Returns the chart refresh to run, if the render produced work ids.
    /// A stale token leaves everything untouched and returns `None`.
    pub fn apply_grid(&mut self, token: LoadToken, grid: RenderedGrid) -> Option<ChartRequest> {
        if token.area != ViewArea::Grid || !self.is_current(token) {
            debug!("Dropping stale grid response (generation {})", token.generation);
            return None;
        }

        self.last_loaded_work_ids = grid.work_ids.clone();
        self.grid = Some(grid);

        if self.last_loaded_work_ids.is_empty() {
            return None;
        }

        Some(ChartRequest {
            token: self.begin(ViewArea::Chart),
            grid_generation: token.generation,
            work_ids: self.last_loaded_work_ids.clone(),
        })
    }

    pub fn apply_modal(&mut self, token: LoadToken, title: &str, body_html: String) -> bool {
        if token.area != ViewArea::Modal || !self.is_current(token) {
            debug!("Dropping stale detail response (generation {})", token.generation);
            return false;
        }
        self.modal.open(title, body_html);
        true
    }

    /// Opens the modal immediately, superseding any detail load still in flight.
    pub fn open_modal(&mut self, title: &str, body_html: String) {
        self.begin(ViewArea::Modal);
        self.modal.open(title, body_html);
    }

    /// Closes the modal; detail loads still in flight will not reopen it.
    pub fn close_modal(&mut self) {
        self.begin(ViewArea::Modal);
        self.modal.close();
    }

    /// Clears the carousel area, disposing the current instance.
    pub fn clear_carousel(&mut self, token: LoadToken) -> bool {
        if token.area != ViewArea::Carousel || !self.is_current(token) {
            return false;
        }
        if let Some(old) = self.carousel.take() {
            debug!("Destroying carousel instance {}", old.instance);
        }
        true
    }

    pub fn apply_carousel(&mut self, token: LoadToken, slides: CarouselSlides) -> bool {
        if !self.clear_carousel(token) {
            debug!("Dropping stale trending response (generation {})", token.generation);
            return false;
        }
        self.next_instance += 1;
        self.carousel = Some(CarouselWidget {
            instance: self.next_instance,
            slides,
        });
        true
    }

    pub fn apply_chart(&mut self, request: &ChartRequest, chart: SubjectChart) -> bool {
        if !self.is_current(request.token)
            || self.generations.current(ViewArea::Grid) != request.grid_generation
        {
            debug!("Dropping chart built for an outdated result set");
            return false;
        }

        if let Some(old) = self.chart.take() {
            debug!("Destroying chart instance {}", old.instance);
        }
        self.next_instance += 1;
        self.chart = Some(ChartWidget {
            instance: self.next_instance,
            chart,
        });
        true
    }
}
