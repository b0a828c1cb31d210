use std::io::IsTerminal;

use bsonframe_codec::{Layout, Span};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SpanOutput<'a> {
    offset: usize,
    len: usize,
    phase: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct LayoutOutput<'a> {
    jpeg_size: usize,
    document_len: u32,
    message_len: usize,
    payload_offset: usize,
    spans: Vec<SpanOutput<'a>>,
}

impl<'a> From<&'a Span> for SpanOutput<'a> {
    fn from(span: &'a Span) -> Self {
        Self {
            offset: span.offset,
            len: span.len,
            phase: span.phase.as_str(),
            label: span.label,
        }
    }
}

pub fn print_layout(layout: &Layout, format: OutputFormat) {
    println!("{}", render_layout(layout, format));
}

pub fn render_layout(layout: &Layout, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let out = LayoutOutput {
                jpeg_size: layout.jpeg_size(),
                document_len: layout.document_len(),
                message_len: layout.message_len(),
                payload_offset: layout.payload_offset(),
                spans: layout.spans().iter().map(SpanOutput::from).collect(),
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "SIZE", "PHASE", "FIELD"]);
            for span in layout.spans() {
                table.add_row(vec![
                    span.offset.to_string(),
                    span.len.to_string(),
                    span.phase.to_string(),
                    span.label.to_string(),
                ]);
            }
            format!("{table}\n{}", summary(layout))
        }
        OutputFormat::Pretty => {
            let mut lines: Vec<String> = layout
                .spans()
                .iter()
                .map(|span| {
                    format!(
                        "{:>10} +{:<10} {:<16} {}",
                        span.offset,
                        span.len,
                        span.phase.as_str(),
                        span.label
                    )
                })
                .collect();
            lines.push(summary(layout));
            lines.join("\n")
        }
    }
}

fn summary(layout: &Layout) -> String {
    format!(
        "document_len={} message_len={} payload_offset={}",
        layout.document_len(),
        layout.message_len(),
        layout.payload_offset()
    )
}
