//! Human-readable trace report.
//!
//! Produces the report as a list of lines so it can be asserted on directly;
//! [`log_report`] forwards them to the `tracing` sink one event per line.

use serde_json::Value;

use crate::otlp::payload::{Attribute, Span, Timestamp, TracePayload, UNKNOWN};

const RULE_WIDTH: usize = 80;
const RAW_PREVIEW_CHARS: usize = 500;

/// Render the full report for one payload. `raw` is the decoded JSON the
/// payload was built from; its pretty-printed form is previewed at the end.
pub fn render_report(payload: &TracePayload, raw: &Value) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = vec![
        rule.clone(),
        "Received OTLP Trace Data:".to_string(),
        rule.clone(),
        format!("Number of resource spans: {}", payload.resource_spans.len()),
    ];

    for (idx, resource_span) in payload.resource_spans.iter().enumerate() {
        out.push(format!("--- Resource Span {} ---", idx + 1));

        if !resource_span.resource_attributes.is_empty() {
            out.push("Resource Attributes:".to_string());
            push_attributes(&mut out, &resource_span.resource_attributes, "  ");
        }

        out.push(format!("Number of scope spans: {}", resource_span.scope_spans.len()));

        for (scope_idx, scope_span) in resource_span.scope_spans.iter().enumerate() {
            out.push(format!("  --- Scope Span {} ---", scope_idx + 1));

            if let Some(scope) = &scope_span.scope {
                out.push(format!("  Scope Name: {}", scope.name));
                out.push(format!("  Scope Version: {}", scope.version));
            }

            out.push(format!("  Number of spans: {}", scope_span.spans.len()));

            for (span_idx, span) in scope_span.spans.iter().enumerate() {
                out.push(format!("    --- Span {} ---", span_idx + 1));
                push_span(&mut out, span);
            }
        }
    }

    out.push(format!("Total spans: {}", payload.span_count()));
    out.push(rule.clone());
    out.push(format!("Raw JSON (first {RAW_PREVIEW_CHARS} chars):"));
    out.push(raw_preview(raw));
    out.push(rule);
    out
}

fn push_span(out: &mut Vec<String>, span: &Span) {
    let time = |t: &Option<Timestamp>| t.as_ref().map_or(UNKNOWN, |t| t.raw.as_str()).to_string();

    out.push(format!("    Trace ID: {}", span.trace_id));
    out.push(format!("    Span ID: {}", span.span_id));
    out.push(format!("    Name: {}", span.name));
    out.push(format!("    Kind: {}", span.kind));
    out.push(format!("    Start Time: {}", time(&span.start_time)));
    out.push(format!("    End Time: {}", time(&span.end_time)));

    if let Some(duration) = span.duration_ms() {
        out.push(format!("    Duration: {duration:.2} ms"));
    }

    if !span.attributes.is_empty() {
        out.push("    Attributes:".to_string());
        push_attributes(out, &span.attributes, "      ");
    }

    if !span.events.is_empty() {
        out.push(format!("    Events ({}):", span.events.len()));
        for event in &span.events {
            out.push(format!("      - {} at {}", event.name, event.time));
        }
    }

    if let Some(status) = &span.status {
        if status.message.is_empty() {
            out.push(format!("    Status: {}", status.code));
        } else {
            out.push(format!("    Status: {} - {}", status.code, status.message));
        }
    }
}

fn push_attributes(out: &mut Vec<String>, attributes: &[Attribute], indent: &str) {
    for attr in attributes {
        out.push(format!("{indent}{}: {}", attr.key, attr.value));
    }
}

/// First 500 characters of the pretty-printed payload.
fn raw_preview(raw: &Value) -> String {
    serde_json::to_string_pretty(raw)
        .unwrap_or_else(|_| raw.to_string())
        .chars()
        .take(RAW_PREVIEW_CHARS)
        .collect()
}

/// Emit a rendered report at INFO, one event per line.
pub fn log_report(lines: &[String]) {
    for line in lines {
        tracing::info!("{}", line);
    }
}
