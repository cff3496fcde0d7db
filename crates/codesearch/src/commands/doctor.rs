//! Doctor command - search engine health check

use crate::context::{Context, resolve_root, runtime};
use crate::output::{print_json, print_text};
use anyhow::Result;
use chrono::Utc;
use codesearch_core::Config;
use codesearch_engines::{EngineReport, SearchService};
use codesearch_exec::locate_binary;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Doctor command JSON output schema
#[derive(Debug, Serialize, Deserialize)]
struct DoctorOutput {
    schema_version: String,
    root: String,
    timestamp: String,
    checks: Vec<Check>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Check {
    id: String,
    name: String,
    status: CheckStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Run the engine health check
///
/// Always returns Ok(()) once the root resolves: an invalid `codesearch.toml`
/// is reported as a failed check and the engines are probed with defaults.
pub fn run(root: Option<PathBuf>, json: bool) -> Result<()> {
    let mut checks = Vec::new();

    let service = match Context::new(root.clone()) {
        Ok(ctx) => {
            checks.push(Check {
                id: "config_valid".to_string(),
                name: "Configuration file".to_string(),
                status: CheckStatus::Ok,
                message: "codesearch.toml is valid (or absent)".to_string(),
                details: None,
            });
            ctx.service
        }
        Err(e) => {
            checks.push(Check {
                id: "config_valid".to_string(),
                name: "Configuration file".to_string(),
                status: CheckStatus::Error,
                message: format!("Failed to load config: {}", e),
                details: None,
            });
            SearchService::new(resolve_root(root)?, Config::default())?
        }
    };

    let rt = runtime()?;
    let report = rt.block_on(service.selector().report(service.root()));
    checks.extend(engine_checks(&report));

    let output = DoctorOutput {
        schema_version: "1.0".to_string(),
        root: service.root().display().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        checks,
    };

    if json {
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_human_readable(&output)?;
    }

    Ok(())
}

fn engine_checks(report: &EngineReport) -> Vec<Check> {
    let mut checks: Vec<Check> = report
        .engines
        .iter()
        .map(|engine| {
            let located = locate_binary(&engine.binary);
            let mut details = BTreeMap::new();
            details.insert("binary".to_string(), engine.binary.clone().into());
            details.insert("source".to_string(), located.source.to_string().into());
            if let Some(path) = located.path {
                details.insert("path".to_string(), path.display().to_string().into());
            }

            let (status, message) = if engine.available {
                (CheckStatus::Ok, format!("{} is available", engine.name))
            } else {
                (
                    CheckStatus::Warning,
                    format!("{} is not available", engine.name),
                )
            };

            Check {
                id: format!("engine_{}", engine.name.replace('-', "_")),
                name: engine.name.clone(),
                status,
                message,
                details: Some(details),
            }
        })
        .collect();

    let mut details = BTreeMap::new();
    details.insert(
        "inside_git_repo".to_string(),
        serde_json::Value::Bool(report.inside_git_repo),
    );
    checks.push(Check {
        id: "text_engine".to_string(),
        name: "Text search".to_string(),
        status: CheckStatus::Ok,
        message: format!("Text search will use {}", report.text_engine),
        details: Some(details),
    });

    checks
}

fn print_human_readable(output: &DoctorOutput) -> std::io::Result<()> {
    print_text(&"Search Engine Health Check".bold().to_string())?;
    print_text(&format!("Root: {}", output.root))?;
    print_text("")?;

    print_text(&"Checks:".bold().to_string())?;
    for check in &output.checks {
        let status_str = match check.status {
            CheckStatus::Ok => "✓".green(),
            CheckStatus::Warning => "⚠".yellow(),
            CheckStatus::Error => "✗".red(),
        };

        print_text(&format!(
            "  {} {}: {}",
            status_str,
            check.name.bold(),
            check.message
        ))?;

        if let Some(details) = &check.details {
            for (key, value) in details {
                print_text(&format!("      {}: {}", key, value))?;
            }
        }
    }

    print_text("")?;
    print_text(&format!("Timestamp: {}", output.timestamp))
}
