use anyhow::Result;
use colored::Colorize;
use romcheck_core::{InputFailure, Outcome, Report, Status};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const NAME_WIDTH: usize = 48;
/// Characters kept in front of the extension when a name is shortened.
const TAIL_CHARS: usize = 4;
const ELLIPSIS: &str = "...";

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Header")]
    header: String,
    #[tabled(rename = "Extension")]
    extension: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Suggested")]
    suggested: String,
}

impl Row {
    fn from_outcome(outcome: &Outcome) -> Self {
        let (header, extension, suggested) = match &outcome.result {
            Ok(v) => (
                v.support
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| v.category.to_string()),
                v.declared.to_string(),
                v.suggestion().map(|e| e.to_string()).unwrap_or_default(),
            ),
            Err(e) => (e.to_string(), "-".to_string(), String::new()),
        };

        Row {
            file: shorten_name(&outcome.display_name, NAME_WIDTH),
            header,
            extension,
            status: status_label(outcome.status()),
            suggested,
        }
    }
}

fn status_label(status: Status) -> String {
    match status {
        Status::Match => "OK".green().to_string(),
        Status::Mismatch => "WRONG".red().bold().to_string(),
        Status::Unknown => "?".yellow().to_string(),
        Status::NotApplicable => "n/a".dimmed().to_string(),
    }
}

/// Shortens `name` to `max` characters, keeping the extension and the
/// last few characters before it, e.g. `Pokemon - Cr...sion.gbc`.
fn shorten_name(name: &str, max: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max {
        return name.to_string();
    }

    let ext_start = chars
        .iter()
        .rposition(|&c| c == '.')
        .filter(|&i| chars.len() - i <= 8)
        .unwrap_or(chars.len());
    let (base, ext) = chars.split_at(ext_start);
    let ellipsis = ELLIPSIS.chars().count();

    if max <= ellipsis + ext.len() {
        return format!("{ELLIPSIS}{}", ext.iter().collect::<String>());
    }

    let tail_len = TAIL_CHARS.min(base.len()).min(max - ellipsis - ext.len());
    let head_len = max - ellipsis - ext.len() - tail_len;
    let head: String = base[..head_len.min(base.len() - tail_len)].iter().collect();
    let tail: String = base[base.len() - tail_len..].iter().collect();
    let ext: String = ext.iter().collect();
    format!("{head}{ELLIPSIS}{tail}{ext}")
}

pub fn print_failures(failures: &[InputFailure]) {
    for failure in failures {
        println!("{} {}", "skipped".yellow(), failure);
    }
}

pub fn print_table(report: &Report) {
    let rows: Vec<Row> = report.outcomes.iter().map(Row::from_outcome).collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");

    let summary = report.summary();
    println!(
        "{} ROMs | {} correct | {} wrong | {} unknown",
        summary.total,
        summary.matched.to_string().green(),
        summary.mismatched.to_string().red(),
        summary.unknown.to_string().yellow(),
    );
}

#[derive(Serialize)]
struct JsonRow<'a> {
    file: &'a str,
    status: &'static str,
    #[serde(flatten)]
    verdict: Option<&'a romcheck_core::VerdictRecord>,
    suggested: Option<String>,
    error_kind: Option<&'static str>,
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    roms: Vec<JsonRow<'a>>,
    skipped: Vec<String>,
}

/// Builds the JSON document: `{ "roms": [...], "skipped": [...] }`.
pub fn json_report(report: &Report, failures: &[InputFailure]) -> Result<serde_json::Value> {
    let roms = report
        .outcomes
        .iter()
        .map(|o| JsonRow {
            file: &o.display_name,
            status: match o.status() {
                Status::Match => "match",
                Status::Mismatch => "mismatch",
                Status::Unknown => "unknown",
                Status::NotApplicable => "not-applicable",
            },
            verdict: o.result.as_ref().ok(),
            suggested: o
                .result
                .as_ref()
                .ok()
                .and_then(|v| v.suggestion())
                .map(|e| e.to_string()),
            error_kind: o.result.as_ref().err().map(|e| e.kind()),
            error: o.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();

    let out = JsonReport {
        roms,
        skipped: failures.iter().map(|f| f.to_string()).collect(),
    };
    Ok(serde_json::to_value(&out)?)
}

pub fn print_json(report: &Report, failures: &[InputFailure]) -> Result<()> {
    let out = json_report(report, failures)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
