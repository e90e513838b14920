use crate::utils::error::{LaunchError, Result};
use regex::Regex;
use std::io::Cursor;
use std::path::Path;

const SHADOW_PREFIX: &str = "__SEO_LAUNCHER_SHADOWED_";

/// Reads `KEY=value` pairs from an env file without touching the process
/// environment. Returns `None` when the file does not exist.
///
/// `${VAR}` references to any of `shadowed` resolve only against earlier
/// lines of the file, never against the process environment, so they
/// expand to nothing unless the file itself defines them.
pub fn read_env_file(path: &Path, shadowed: &[&str]) -> Result<Option<Vec<(String, String)>>> {
    if !path.is_file() {
        tracing::debug!("No env file at {}", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let content = shadow_keys(&content, shadowed)?;

    let mut pairs = Vec::new();
    for item in dotenvy::from_read_iter(Cursor::new(content)) {
        let (key, value) = item?;
        pairs.push((unshadow(&key, shadowed), unshadow(&value, shadowed)));
    }

    tracing::debug!("Read {} entries from {}", pairs.len(), path.display());
    Ok(Some(pairs))
}

// dotenvy consults the process environment first when substituting, so
// shadowed names are renamed to aliases nothing in the process can define.
fn shadow_keys(content: &str, shadowed: &[&str]) -> Result<String> {
    let mut content = content.to_string();
    for key in shadowed {
        let name = regex::escape(key);
        let alias = format!("{}{}", SHADOW_PREFIX, key);
        let reference = compile(&format!(r"\$\{{{name}\}}|\$({name})\b"))?;
        let assignment = compile(&format!(r"(?m)^(\s*(?:export\s+)?){name}(\s*=)"))?;

        content = reference
            .replace_all(&content, |caps: &regex::Captures| {
                if caps.get(1).is_some() {
                    format!("${}", alias)
                } else {
                    format!("${{{}}}", alias)
                }
            })
            .into_owned();
        content = assignment
            .replace_all(&content, format!("${{1}}{}${{2}}", alias).as_str())
            .into_owned();
    }
    Ok(content)
}

fn unshadow(text: &str, shadowed: &[&str]) -> String {
    let mut text = text.to_string();
    for key in shadowed {
        text = text.replace(&format!("{}{}", SHADOW_PREFIX, key), key);
    }
    text
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| LaunchError::ConfigError {
        message: format!("invalid env key pattern: {}", e),
    })
}
