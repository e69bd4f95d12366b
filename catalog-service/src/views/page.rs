use crate::session::UiSession;
use crate::utils::html::{escape_html, script_json};

pub const SUBJECTS: [&str; 8] = [
    "history",
    "science_fiction",
    "fantasy",
    "romance",
    "mystery",
    "biography",
    "philosophy",
    "poetry",
];
pub const LIMITS: [usize; 4] = [6, 12, 24, 48];

/// Form values echoed back into the page.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub query: String,
    pub subject: String,
    pub limit: usize,
    pub chart_enabled: bool,
}

const STYLE: &str = r#"
body{font-family:system-ui,sans-serif;margin:0;background:#f6f4ef;color:#222}
header,main{max-width:1100px;margin:0 auto;padding:16px}
.controls form{display:inline-flex;gap:8px;margin-right:16px}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(180px,1fr));gap:12px}
.book,.card{display:block;background:#fff;border-radius:8px;overflow:hidden;color:inherit;text-decoration:none;box-shadow:0 1px 3px #0002}
.card{padding:16px}
.cover{height:240px;background:#ddd}.cover img{width:100%;height:100%;object-fit:cover}
.book-body{padding:8px}.title{font-size:1rem;margin:0 0 4px}.muted{color:#666;margin:0}
.badge{display:inline-block;background:#eee;border-radius:999px;padding:2px 8px;margin:2px;font-size:.8rem}
.overlay{position:fixed;inset:0;background:#0008;display:flex;align-items:center;justify-content:center}
.overlay.hidden{display:none}.modal{background:#fff;max-width:640px;padding:24px;border-radius:8px;position:relative}
.close{position:absolute;top:8px;right:12px;text-decoration:none;font-size:1.5rem;color:#333}
body.modal-open{overflow:hidden}
"#;

const MODAL_SCRIPT: &str = r#"
(function(){
  var overlay=document.getElementById("overlay");
  function close(){ if(!overlay.classList.contains("hidden")) location.href="/modal/close"; }
  overlay.addEventListener("click",function(e){ if(e.target===overlay) close(); });
  window.addEventListener("keydown",function(e){ if(e.key==="Escape") close(); });
})();
"#;

fn select_options<T: ToString>(values: &[T], selected: &str) -> String {
    values
        .iter()
        .map(|value| {
            let value = escape_html(&value.to_string());
            let marker = if value == selected { " selected" } else { "" };
            format!(r#"<option value="{value}"{marker}>{value}</option>"#)
        })
        .collect()
}

fn carousel_section(session: &UiSession) -> String {
    let (slides, init) = match session.carousel() {
        Some(widget) => (
            widget.slides.slides_html.as_str(),
            format!(
                r##"<script>window.trendingSwiper=window.Swiper?new Swiper("#trendingSwiper",{}):null;</script>"##,
                script_json(&widget.slides.options)
            ),
        ),
        None => ("", String::new()),
    };

    format!(
        r#"<section><h2>Trending picks</h2><div id="trendingSwiper" class="swiper"><div id="trendingWrap" class="swiper-wrapper">{slides}</div><div class="swiper-button-prev"></div><div class="swiper-button-next"></div></div><p><a href="/trending">Refresh</a></p></section>{init}"#
    )
}

fn chart_section(session: &UiSession, chart_enabled: bool) -> String {
    if !chart_enabled {
        return String::new();
    }

    let config = session.chart().map(|widget| widget.chart.config());
    format!(
        r#"<section><h2>Top subjects</h2><canvas id="subjectsChart"></canvas></section>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
<script>
(function(){{
  var canvas=document.getElementById("subjectsChart"),chart=null;
  function draw(config){{ if(!window.Chart||!config) return; if(chart) chart.destroy(); chart=new Chart(canvas,config); }}
  draw({});
  setTimeout(function(){{ fetch("/chart.json").then(function(r){{return r.json();}}).then(draw).catch(function(){{}}); }},1500);
}})();
</script>"#,
        script_json(&config)
    )
}

pub fn render_page(session: &UiSession, context: &PageContext) -> String {
    let (hint, cards) = session
        .grid()
        .map(|grid| (escape_html(&grid.hint), grid.cards_html.as_str()))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Book Discovery</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.css">
<style>{style}</style>
</head>
<body{body_class}>
<header>
<h1>Book Discovery</h1>
<div class="controls">
<form action="/search" method="get"><input id="q" name="q" value="{query}" placeholder="Search books"><input type="hidden" name="limit" value="{limit}"><button id="btnSearch">Search</button></form>
<form action="/subject" method="get"><select id="subject" name="name">{subjects}</select><select id="limit" name="limit">{limits}</select><button id="btnSubject">Browse</button></form>
</div>
<p id="status">{status}</p>
</header>
<main>
<p id="hint" class="muted">{hint}</p>
<div id="grid" class="grid" data-work-ids="{work_ids}">{cards}</div>
<script src="https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.js"></script>
{carousel}
{chart}
</main>
{modal}
<script>{modal_script}</script>
</body>
</html>"#,
        style = STYLE,
        body_class = if session.modal().is_open() { r#" class="modal-open""# } else { "" },
        query = escape_html(&context.query),
        limit = context.limit,
        subjects = select_options(&SUBJECTS, &context.subject),
        limits = select_options(&LIMITS, &context.limit.to_string()),
        status = escape_html(session.status()),
        hint = hint,
        cards = cards,
        work_ids = escape_html(&session.last_loaded_work_ids().join(",")),
        carousel = carousel_section(session),
        chart = chart_section(session, context.chart_enabled),
        modal = session.modal().render(),
        modal_script = MODAL_SCRIPT,
    )
}
