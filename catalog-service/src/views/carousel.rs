use crate::models::catalog::TrendingPick;
use crate::utils::html::escape_html;
use serde::Serialize;
use std::collections::BTreeMap;
use urlencoding::encode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub slides_per_view: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    #[serde(rename = "nextEl")]
    pub next_el: &'static str,
    #[serde(rename = "prevEl")]
    pub prev_el: &'static str,
}

/// Swiper initialization options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselOptions {
    pub slides_per_view: f64,
    pub space_between: u32,
    pub breakpoints: BTreeMap<u32, Breakpoint>,
    pub navigation: Navigation,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        let breakpoints = [(640, 2.2), (900, 3.2), (1100, 4.2)]
            .into_iter()
            .map(|(width, slides_per_view)| (width, Breakpoint { slides_per_view }))
            .collect();

        Self {
            slides_per_view: 1.2,
            space_between: 12,
            breakpoints,
            navigation: Navigation {
                next_el: ".swiper-button-next",
                prev_el: ".swiper-button-prev",
            },
        }
    }
}

pub fn render_slides(picks: &[TrendingPick]) -> String {
    picks.iter().map(render_slide).collect()
}

fn render_slide(pick: &TrendingPick) -> String {
    let title = escape_html(&pick.title);
    let cover = pick
        .cover_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="Cover of {}" loading="lazy">"#,
                escape_html(url),
                title
            )
        })
        .unwrap_or_default();

    let card = format!(
        r#"<div class="cover">{cover}</div><div class="book-body"><h3 class="title">{title}</h3><p class="muted">From a public shelf</p></div>"#
    );

    match &pick.work_id {
        Some(work_id) => format!(
            r#"<div class="swiper-slide"><a class="book" href="/works/{}">{}</a></div>"#,
            encode(work_id),
            card
        ),
        None => format!(r#"<div class="swiper-slide"><div class="book">{}</div></div>"#, card),
    }
}
