use crate::models::catalog::BookSummary;
use crate::utils::html::escape_html;
use std::fmt::Write;
use urlencoding::encode;

pub const NO_RESULTS: &str = "No results found.";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// The result grid produced by one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedGrid {
    /// Caption shown above the cards.
    pub hint: String,
    pub cards_html: String,
    /// Work ids of the rendered cards, in order; cards without one are skipped.
    pub work_ids: Vec<String>,
}

impl RenderedGrid {
    /// A grid holding a single placeholder card.
    pub fn placeholder(hint: &str, message: &str) -> Self {
        Self {
            hint: hint.to_string(),
            cards_html: format!(r#"<div class="card">{}</div>"#, escape_html(message)),
            work_ids: Vec::new(),
        }
    }
}

pub fn render(results: &[BookSummary], label: &str) -> RenderedGrid {
    if results.is_empty() {
        return RenderedGrid::placeholder(label, NO_RESULTS);
    }

    let mut grid = RenderedGrid {
        hint: label.to_string(),
        ..Default::default()
    };

    for book in results {
        grid.cards_html.push_str(&render_card(book));
        if let Some(work_id) = &book.work_id {
            grid.work_ids.push(work_id.clone());
        }
    }

    grid
}

fn render_card(book: &BookSummary) -> String {
    let title = escape_html(&book.title);
    let author = escape_html(book.author.as_deref().unwrap_or(UNKNOWN_AUTHOR));

    let mut byline = author;
    if let Some(year) = &book.year {
        let _ = write!(byline, " • {}", escape_html(&year.to_string()));
    }

    let cover = book
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

    let body = format!(
        r#"<div class="cover">{cover}</div><div class="book-body"><h3 class="title">{title}</h3><p class="muted">{byline}</p></div>"#
    );

    match &book.work_id {
        Some(work_id) => format!(
            r#"<a class="book" href="/works/{}" data-work-id="{}">{}</a>"#,
            encode(work_id),
            escape_html(work_id),
            body
        ),
        None => format!(r#"<div class="book">{}</div>"#, body),
    }
}
