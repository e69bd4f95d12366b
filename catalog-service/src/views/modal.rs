use crate::models::catalog::{WorkDetail, MAX_DETAIL_SUBJECTS};
use crate::utils::html::escape_html;
use urlencoding::encode;

pub const DETAIL_ERROR_TITLE: &str = "Error";
pub const DETAIL_ERROR_BODY: &str = "<p>Could not load book details.</p>";

#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    /// Plain text; escaped when the overlay is rendered.
    pub title: String,
    /// Caller-assembled markup, inserted as-is.
    pub body_html: String,
}

/// The single detail overlay. Opening replaces whatever was shown before.
#[derive(Debug, Clone, Default)]
pub struct Modal {
    content: Option<ModalContent>,
}

impl Modal {
    pub fn open(&mut self, title: &str, body_html: String) {
        self.content = Some(ModalContent {
            title: title.to_string(),
            body_html,
        });
    }

    pub fn close(&mut self) {
        self.content = None;
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    pub fn render(&self) -> String {
        match self.content() {
            Some(content) => format!(
                r#"<div id="overlay" class="overlay" aria-hidden="false"><div class="modal" role="dialog"><a id="closeModal" class="close" href="/modal/close" aria-label="Close">×</a><h2 id="modalTitle">{}</h2><div id="modalBody">{}</div></div></div>"#,
                escape_html(&content.title),
                content.body_html
            ),
            None => r#"<div id="overlay" class="overlay hidden" aria-hidden="true"></div>"#
                .to_string(),
        }
    }
}

pub fn work_detail_body(detail: &WorkDetail, work_id: &str, catalog_base: &str) -> String {
    let badges: String = detail
        .subjects
        .iter()
        .take(MAX_DETAIL_SUBJECTS)
        .map(|subject| format!(r#"<span class="badge">{}</span>"#, escape_html(subject)))
        .collect();

    let mut body = format!("<p>{}</p>", escape_html(&detail.description));
    if !badges.is_empty() {
        body.push_str(&format!(r#"<div class="badges">{}</div>"#, badges));
    }
    body.push_str(&format!(
        r#"<p class="source"><a href="{}/works/{}" target="_blank" rel="noreferrer">View on Open Library →</a></p>"#,
        escape_html(catalog_base.trim_end_matches('/')),
        encode(work_id)
    ));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(subjects: usize) -> WorkDetail {
        WorkDetail {
            title: "Dune".to_string(),
            description: "Spice & <sand>".to_string(),
            subjects: (0..subjects).map(|i| format!("Subject {}", i)).collect(),
        }
    }

    #[test]
    fn test_open_replaces_previous_content() {
        let mut modal = Modal::default();
        assert!(!modal.is_open());

        modal.open("First", "<p>one</p>".to_string());
        modal.open("Second", "<p>two</p>".to_string());
        assert_eq!(modal.content().unwrap().title, "Second");
        assert!(modal.render().contains("<p>two</p>"));
        assert!(!modal.render().contains("<p>one</p>"));

        modal.close();
        assert!(!modal.is_open());
        assert!(modal.render().contains("hidden"));
    }

    #[test]
    fn test_title_is_escaped_body_is_not() {
        let mut modal = Modal::default();
        modal.open("<b>Title</b>", "<em>body</em>".to_string());
        let html = modal.render();
        assert!(html.contains("&lt;b&gt;Title&lt;/b&gt;"));
        assert!(html.contains("<em>body</em>"));
    }

    #[test]
    fn test_detail_body_caps_subjects_and_escapes() {
        let body = work_detail_body(&detail(20), "OL1W", "https://openlibrary.org");
        assert_eq!(body.matches("class=\"badge\"").count(), 12);
        assert!(body.contains("Spice &amp; &lt;sand&gt;"));
        assert!(body.contains(r#"href="https://openlibrary.org/works/OL1W""#));
    }

    #[test]
    fn test_detail_body_without_subjects() {
        let body = work_detail_body(&detail(0), "OL1W", "https://openlibrary.org");
        assert!(!body.contains("badges"));
    }
}
