//! Seed file loading
//!
//! One seed per line, seven comma-separated fields:
//!
//! ```text
//! # domain, maxUrlCount, priority, maxDepth, crossHostAllowed, connectTimeoutMs, socketTimeoutMs
//! example.org, -1, 0, 2, false, 3000, 30000
//! ```
//!
//! Empty fields keep their defaults. Lines starting with `#` and lines with the
//! wrong field count are skipped.

use crate::task::{TaskConf, UrlTask};
use crate::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

const SEED_FIELDS: usize = 7;

/// Loads seed tasks from a file
///
/// # Errors
///
/// Only failing to read the file is an error; bad lines are logged and
/// skipped so they never affect the other seeds.
pub fn load_seed_tasks(path: &Path) -> ConfigResult<Vec<UrlTask>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_seed_tasks(&content))
}

/// Parses seed tasks from file content, skipping anything unusable
pub fn parse_seed_tasks(content: &str) -> Vec<UrlTask> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match parse_seed_line(line)? {
            Ok(conf) => Some(UrlTask::seed(conf)),
            Err(e) => {
                tracing::warn!("Skipping seed line {}: {}", index + 1, e);
                None
            }
        })
        .collect()
}

/// Parses one seed line
///
/// Returns `None` for comments, blank lines and lines that do not have
/// exactly seven fields.
pub fn parse_seed_line(line: &str) -> Option<ConfigResult<TaskConf>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != SEED_FIELDS {
        tracing::debug!("Ignoring seed line with {} fields: {}", fields.len(), line);
        return None;
    }

    Some(build_conf(&fields))
}

fn build_conf(fields: &[&str]) -> ConfigResult<TaskConf> {
    let mut conf = TaskConf::new(fields[0])?;

    if let Some(count) = parse_field::<i64>("maxUrlCount", fields[1])? {
        conf.max_url_count = u64::try_from(count).ok();
    }
    if let Some(priority) = parse_field("priority", fields[2])? {
        conf.priority = priority;
    }
    if let Some(depth) = parse_field("maxDepth", fields[3])? {
        conf.max_depth = Some(depth);
    }
    if !fields[4].is_empty() {
        conf.cross_host_allowed = fields[4].eq_ignore_ascii_case("true");
    }
    if let Some(timeout) = parse_field("connectTimeoutMs", fields[5])? {
        conf.connect_timeout_ms = timeout;
    }
    if let Some(timeout) = parse_field("socketTimeoutMs", fields[6])? {
        conf.socket_timeout_ms = timeout;
    }

    Ok(conf)
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> ConfigResult<Option<T>> {
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::SeedField {
            field,
            value: value.to_string(),
        })
}
