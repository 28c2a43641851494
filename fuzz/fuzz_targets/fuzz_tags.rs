#![no_main]

use insight_statsd::{format_line, render_tags, MetricType};
use libfuzzer_sys::fuzz_target;

// Fuzz target focusing on edge cases in tags
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Split the data into chunks to create multiple tags
    let mut tags: Vec<String> = Vec::new();
    let mut start = 0;
    let chunk_size = if data.len() > 10 { data.len() / 10 } else { 1 };

    for _ in 0..10 {
        if start >= data.len() {
            break;
        }
        let end = std::cmp::min(start + chunk_size, data.len());
        let tag = String::from_utf8_lossy(&data[start..end]).to_string();
        if !tag.is_empty() {
            tags.push(tag);
        }
        start = end;
    }

    let (constant, adhoc) = tags.split_at(tags.len() / 2);
    let constant = (!constant.is_empty()).then(|| render_tags(constant, None));
    let constant = constant.as_deref();

    let rendered = render_tags(adhoc, constant);
    if adhoc.is_empty() && constant.is_none() {
        assert!(rendered.is_empty());
    } else {
        assert!(rendered.starts_with("|#"));
    }

    let tag_refs: Vec<&str> = adhoc.iter().map(String::as_str).collect();
    let line = format_line("fuzz.", "metric", 42.into(), MetricType::Count, &tag_refs, constant);
    assert!(line.starts_with("fuzz.metric:42|c"));
    assert!(line.ends_with(&rendered));
});
