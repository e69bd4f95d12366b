use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::Value;

fn coerce_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_save_body(body: &str) -> Option<(String, String)> {
    let value: Value = serde_json::from_str(body).ok()?;
    let work_id = coerce_field(value.get("work_id"))?;
    let title = coerce_field(value.get("title"))?;
    Some((work_id, title))
}

fn resolve_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(50)
        .clamp(0, 100)
}

fn benchmark_parse_save_body(c: &mut Criterion) {
    let body = r#"{"work_id":"  OL45883W ","title":" Dune ","author":"Frank Herbert","cover_url":"https://covers.openlibrary.org/b/id/11481354-M.jpg"}"#;

    c.bench_function("parse_save_body", |b| {
        b.iter(|| parse_save_body(black_box(body)))
    });
}

fn benchmark_resolve_limit(c: &mut Criterion) {
    let inputs = [None, Some("25"), Some("200"), Some("lots")];

    c.bench_function("resolve_limit", |b| {
        b.iter(|| {
            for input in inputs {
                resolve_limit(black_box(input));
            }
        })
    });
}

criterion_group!(benches, benchmark_parse_save_body, benchmark_resolve_limit);
criterion_main!(benches);
