use crate::services::catalog::{CatalogApi, CatalogError};
use crate::views::carousel::{render_slides, CarouselOptions};
use std::sync::Arc;
use tracing::info;

/// Slide markup ready to be installed as the next carousel instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselSlides {
    pub slides_html: String,
    pub slide_count: usize,
    pub options: CarouselOptions,
}

pub struct CarouselLoader {
    catalog: Arc<dyn CatalogApi + Send + Sync>,
}

impl CarouselLoader {
    pub fn new(catalog: Arc<dyn CatalogApi + Send + Sync>) -> Self {
        Self { catalog }
    }

    pub async fn load(&self) -> Result<CarouselSlides, CatalogError> {
        let picks = self.catalog.trending().await?;
        info!("Loaded {} trending picks", picks.len());

        Ok(CarouselSlides {
            slides_html: render_slides(&picks),
            slide_count: picks.len(),
            options: CarouselOptions::default(),
        })
    }
}
