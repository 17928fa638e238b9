use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::TranslationKeyMap;

/// A locale file that could not be loaded.
#[derive(Debug, Clone)]
pub struct MessageScanWarning {
    pub file_path: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ScanMessagesResult {
    pub key_map: TranslationKeyMap,
    /// Locales that were loaded, in directory order.
    pub locales: Vec<String>,
    pub warnings: Vec<MessageScanWarning>,
}

/// Load one `<locale>.json` file into `key_map`.
pub fn parse_json_file(path: &Path, locale: &str, key_map: &mut TranslationKeyMap) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;

    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))?;

    flatten_json(&json, String::new(), locale, key_map);
    Ok(())
}

fn flatten_json(value: &Value, prefix: String, locale: &str, key_map: &mut TranslationKeyMap) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_json(val, new_prefix, locale, key_map);
            }
        }
        Value::String(s) => {
            if !prefix.is_empty() {
                key_map.insert(prefix, locale, s.clone());
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                return;
            }

            // String arrays are one message; arrays of objects are indexed
            // (e.g. faq.items.0.question).
            let is_string_array = arr.iter().all(|v| matches!(v, Value::String(_)));

            if is_string_array && !prefix.is_empty() {
                let values: Vec<&str> = arr.iter().filter_map(|v| v.as_str()).collect();
                key_map.insert(prefix, locale, values.join(", "));
            } else {
                for (index, val) in arr.iter().enumerate() {
                    let new_prefix = if prefix.is_empty() {
                        index.to_string()
                    } else {
                        format!("{}.{}", prefix, index)
                    };
                    flatten_json(val, new_prefix, locale, key_map);
                }
            }
        }
        _ => {}
    }
}

/// Extracts locale from filename.
///
/// Examples:
/// - "en.json" -> Some("en")
/// - "zh-CN.json" -> Some("zh-CN")
/// - "/path/to/messages/ja.json" -> Some("ja")
pub fn extract_locale(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Build the key map from every `<locale>.json` file in `message_dir`.
///
/// Files that fail to parse become warnings; a missing directory is an error.
pub fn scan_message_files(message_dir: impl AsRef<Path>) -> Result<ScanMessagesResult> {
    let message_dir = message_dir.as_ref();
    let mut result = ScanMessagesResult::default();

    if !message_dir.exists() {
        bail!(
            "Messages directory '{}' does not exist.\n\
             Hint: Check your .skiverrc.json 'messagesRoot' setting.",
            message_dir.display()
        );
    }

    if !message_dir.is_dir() {
        bail!("'{}' is not a directory.", message_dir.display());
    }

    let mut paths: Vec<_> = fs::read_dir(message_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    for path in paths {
        let Some(locale) = extract_locale(&path) else {
            continue;
        };
        match parse_json_file(&path, &locale, &mut result.key_map) {
            Ok(()) => result.locales.push(locale),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping locale file");
                result.warnings.push(MessageScanWarning {
                    file_path: path.to_string_lossy().to_string(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    Ok(result)
}
