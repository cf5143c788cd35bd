use colored::Colorize;

use crate::mask::MaskState;
use crate::script::StepRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

fn paint_state(state: MaskState, colorize: bool) -> String {
    let label = format!("{:<10}", state.as_str());
    if !colorize {
        return label;
    }
    match state {
        MaskState::Complete => label.green().to_string(),
        MaskState::Incomplete => label.yellow().to_string(),
        MaskState::Empty => label.dimmed().to_string(),
    }
}

/// One line per step: number, action, quoted value, cursor, state.
pub fn render_text(records: &[StepRecord], colorize: bool) -> Vec<u8> {
    let action_width = records
        .iter()
        .map(|r| r.action.chars().count())
        .max()
        .unwrap_or(0)
        .max("action".len());
    let value_width = records
        .iter()
        .map(|r| r.value.chars().count() + 2)
        .max()
        .unwrap_or(0)
        .max("value".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:>3}  {:<aw$}  {:<vw$}  {:>6}  {}\n",
        "#",
        "action",
        "value",
        "cursor",
        "state",
        aw = action_width,
        vw = value_width
    ));
    for r in records {
        let quoted = format!("\"{}\"", r.value);
        let mut line = format!(
            "{:>3}  {:<aw$}  {:<vw$}  {:>6}  {}",
            r.step,
            r.action,
            quoted,
            r.cursor,
            paint_state(r.state, colorize),
            aw = action_width,
            vw = value_width
        );
        if r.suppressed {
            let tag = if colorize {
                "suppressed".red().to_string()
            } else {
                "suppressed".to_string()
            };
            line.push_str("  ");
            line.push_str(&tag);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(records: &[StepRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_xml(records: &[StepRecord]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str("<steps>\n");
    for r in records {
        out.push_str(&format!("  <step n=\"{}\">\n", r.step));
        out.push_str(&format!("    <action>{}</action>\n", escape_xml(&r.action)));
        out.push_str(&format!("    <value>{}</value>\n", escape_xml(&r.value)));
        out.push_str(&format!("    <cursor>{}</cursor>\n", r.cursor));
        out.push_str(&format!("    <state>{}</state>\n", r.state.as_str()));
        out.push_str(&format!("    <suppressed>{}</suppressed>\n", r.suppressed));
        out.push_str("  </step>\n");
    }
    out.push_str("</steps>\n");
    out.into_bytes()
}

pub fn render(records: &[StepRecord], format: OutputFormat, colorize: bool) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(records, colorize),
        OutputFormat::Json => render_json(records),
        OutputFormat::Xml => render_xml(records),
    }
}
