use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::model::filter::FilterForm;
use crate::model::task::{Priority, TaskStatus};
use crate::validation::TaskDraft;

pub const TASK_KEYS: [&str; 4] = ["priority", "status", "responsible", "list"];
pub const FILTER_KEYS: [&str; 3] = ["priority", "status", "responsible"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Splits a whitespace-separated input line the same way a shell would for plain words.
pub fn split_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(|s| s.to_string()).collect()
}

/// Applies `key:value` tokens onto `draft`; free words replace the description when present.
/// Responsible names may contain spaces: use `_` in place of a space (`resp:Mary_Ann`).
pub fn apply_args(draft: &mut TaskDraft, args: &[String]) -> Result<()> {
    let parsed = parse_args(args);
    if !parsed.name.is_empty() {
        draft.description = parsed.name;
    }

    for (key, value) in parsed.metadata {
        match expand_key(&key, &TASK_KEYS)?.as_str() {
            "priority" => draft.priority = value.parse::<Priority>().map_err(|e| anyhow!(e))?,
            "status" => draft.status = value.parse::<TaskStatus>().map_err(|e| anyhow!(e))?,
            "responsible" => draft.responsible = value.replace('_', " "),
            "list" => {
                draft.task_list_id = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(value.parse().map_err(|_| anyhow!("Invalid list id: '{}'", value))?)
                };
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn draft_from_args(args: &[String]) -> Result<TaskDraft> {
    let mut draft = TaskDraft::default();
    apply_args(&mut draft, args)?;
    Ok(draft)
}

/// Builds a filter form from `key:value` tokens (`st:done`, `pri:h`, `resp:Alice`).
pub fn filter_from_args(args: &[String]) -> Result<FilterForm> {
    let parsed = parse_args(args);
    if !parsed.name.is_empty() {
        return Err(anyhow!("Unexpected filter text: '{}'", parsed.name));
    }

    let mut form = FilterForm::default();
    for (key, value) in parsed.metadata {
        match expand_key(&key, &FILTER_KEYS)?.as_str() {
            "priority" => form.priority = Some(value.parse().map_err(|e: String| anyhow!(e))?),
            "status" => form.status = Some(value.parse().map_err(|e: String| anyhow!(e))?),
            "responsible" => form.responsible = Some(value.replace('_', " ")),
            _ => {}
        }
    }
    Ok(form)
}
