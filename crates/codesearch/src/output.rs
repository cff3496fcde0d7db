use codesearch_core::SearchResponse;
use colored::Colorize;
use std::io::{self, Write};

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// `file:line:column: snippet` per match, then warnings and a stats line
pub fn print_response(response: &SearchResponse) -> io::Result<()> {
    let mut out = io::stdout().lock();

    for m in &response.matches {
        for line in &m.context_before {
            writeln!(out, "{}-{}", m.file.dimmed(), line.dimmed())?;
        }
        writeln!(
            out,
            "{}:{}:{}: {}",
            m.file.magenta(),
            m.line.to_string().green(),
            m.column,
            m.snippet
        )?;
        for line in &m.context_after {
            writeln!(out, "{}-{}", m.file.dimmed(), line.dimmed())?;
        }
    }

    for warning in &response.warnings {
        writeln!(out, "{} {}", "warning:".yellow().bold(), warning)?;
    }

    writeln!(out, "{}", stats_line(response).dimmed())
}

fn stats_line(response: &SearchResponse) -> String {
    let stats = &response.stats;
    let mut line = format!(
        "{} matches in {} files via {} ({} ms)",
        stats.matches_returned, stats.files_matched, response.engine, stats.duration_ms
    );
    if let Some(scanned) = stats.files_scanned {
        line.push_str(&format!(", {} files scanned", scanned));
    }
    if response.truncated {
        line.push_str(", truncated");
    }
    line
}
