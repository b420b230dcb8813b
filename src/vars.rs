/*!
 * Raw-text preprocessing applied before the pipeline proper.
 *
 * Two substitutions run on the raw file content, ahead of front matter
 * handling and segmentation:
 *
 * - `{{{ .path.to.key }}}` placeholders are resolved against a
 *   `variables.json` object by dot path; unresolved placeholders stay intact.
 * - Deprecated `{{< copyable ... >}}` marker lines are removed entirely.
 */

use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\{\s*\.(.+?)\s*\}\}\}").expect("valid variable pattern"));

static COPYABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{< copyable\s+(.+?)\s+>\}\}\r?\n").expect("valid copyable pattern"));

/// Load the variables table, returning an empty object when the file is
/// missing or unreadable
pub fn load_variables(path: &Path) -> Value {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not parse variables from {:?}: {}", path, e);
                Value::Object(Default::default())
            }
        },
        Err(e) => {
            warn!("Could not load variables from {:?}: {}", path, e);
            Value::Object(Default::default())
        }
    }
}

/// Resolve a dot path like `release.version` against a JSON object
fn value_by_path<'a>(variables: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(variables, |current, key| current.get(key))
}

/// Replace `{{{ .path }}}` placeholders with their variable values.
///
/// Placeholders whose path does not resolve to a scalar value are left as-is
/// so they stay visible in the output for an operator to notice.
pub fn substitute_variables(content: &str, variables: &Value) -> String {
    VARIABLE_PATTERN
        .replace_all(content, |caps: &regex::Captures| {
            let path = caps[1].trim();
            match value_by_path(variables, path) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Remove deprecated `{{< copyable ... >}}` marker lines
pub fn strip_copyable(content: &str) -> String {
    COPYABLE_PATTERN.replace_all(content, "").into_owned()
}

/// Read a variables file if configured and apply both substitutions
pub fn preprocess(content: &str, variables_file: Option<&Path>) -> Result<String> {
    let stripped = strip_copyable(content);
    let result = match variables_file {
        Some(path) if path.exists() => {
            let variables = load_variables(path);
            substitute_variables(&stripped, &variables)
        }
        Some(path) => {
            warn!("Variables file not found: {:?}", path);
            stripped
        }
        None => stripped,
    };
    Ok(result)
}
