use std::path::PathBuf;

use chrono::{DateTime, Utc};
use guava_core::catalog::ComparisonRow;
use guava_core::config::{default_config_path, ClientConfig};
use guava_core::models::Source;
use guava_core::pricing::{format_price, format_range, plan_price, PriceSummary};
use guava_core::session::Session;
use guava_core::storage::FileStore;
use guava_core::util::normalize_base_url;
use guava_core::{Plan, Service};
use serde::Serialize;

use crate::error::CliError;

/// Global flags that shape how the session is opened.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub config_path: Option<PathBuf>,
    pub storage_path: Option<PathBuf>,
    pub api_base_url: Option<String>,
}

pub fn resolve_config_path(options: &SessionOptions) -> Result<PathBuf, CliError> {
    options
        .config_path
        .clone()
        .or_else(default_config_path)
        .ok_or_else(|| {
            CliError::Config("Could not resolve a config directory; pass --config".to_string())
        })
}

pub fn resolve_config(options: &SessionOptions) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::resolve(options.config_path.as_deref())?;
    apply_cli_overrides(&mut config, options)?;
    Ok(config)
}

pub fn apply_cli_overrides(
    config: &mut ClientConfig,
    options: &SessionOptions,
) -> Result<(), CliError> {
    if let Some(url) = options.api_base_url.as_deref() {
        config.api_base_url = normalize_base_url(url).map_err(CliError::Config)?;
    }
    if let Some(path) = options.storage_path.clone() {
        config.storage_path = Some(path);
    }
    Ok(())
}

pub fn open_session(options: &SessionOptions) -> Result<Session<FileStore>, CliError> {
    let config = resolve_config(options)?;
    tracing::debug!("Opening session against {}", config.api_base_url);
    Ok(Session::open(config)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Space-joined free text, `None` when blank.
pub fn join_text(parts: &[String]) -> Option<String> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoAction {
    Show,
    Set(String),
    Clear,
}

/// `--clear` wins; otherwise non-blank text sets and no text shows.
pub fn memo_action(text: &[String], clear: bool) -> MemoAction {
    if clear {
        return MemoAction::Clear;
    }
    join_text(text).map_or(MemoAction::Show, MemoAction::Set)
}

pub fn source_note(source: Source) -> &'static str {
    match source {
        Source::Server => "",
        Source::Local => " (server unreachable, saved locally)",
    }
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

fn price_label(summary: Option<&PriceSummary>) -> String {
    summary.map_or_else(|| "-".to_string(), format_range)
}

pub fn format_service_line(service: &Service) -> String {
    let summary = PriceSummary::from_plans(&service.plans);
    format!(
        "{:>4}  {} [{}]  {}",
        service.id,
        service.name,
        service.category,
        price_label(summary.as_ref())
    )
}

pub fn format_plan_line(plan: &Plan) -> String {
    let price = plan_price(plan).map_or_else(
        || plan.price.clone().unwrap_or_else(|| "-".to_string()),
        format_price,
    );
    format!("  {:>4}  {}  {} / {}", plan.id, plan.name, price, plan.cycle)
}

pub fn format_comparison_lines(rows: &[ComparisonRow]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            format!(
                "{:>4}  {} [{}]  {}  ({} plan{})",
                row.service_id,
                row.name,
                row.category,
                price_label(row.price.as_ref()),
                row.plan_count,
                if row.plan_count == 1 { "" } else { "s" }
            )
        })
        .collect()
}
