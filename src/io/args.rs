//! Argument parsing for `fastnotes mcp <tool> ...`
//!
//! Tool arguments may be given as bare words or as `key:value` pairs:
//! - `fastnotes mcp save_note Buy milk`
//! - `fastnotes mcp save_note content:"Buy milk"`
//! - `fastnotes mcp delete_note note_id:3f2a...`

use std::collections::HashMap;

/// Whether `key:value` names one of the tool's parameters rather than
/// being note text. A value must follow the colon directly.
fn is_param(known: &[&str], key: &str, value: &str) -> bool {
    known.contains(&key) && !value.is_empty() && !value.starts_with(char::is_whitespace)
}

fn strip_quotes(value: &str) -> &str {
    if value.len() > 1 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse positional arguments into free text and key:value pairs
///
/// Bare words are joined with single spaces into one positional text, so
/// unquoted note content works. A word is a key:value pair only when the
/// part before the first `:` is one of the `known` parameter names and a
/// value follows it; `"Remember: buy milk"` and `https://example.com`
/// stay text.
///
/// Handles quoted values that may be split by shell:
/// - `["content:\"Buy", "milk\""]` gets reconstructed to `content:"Buy milk"`
///
/// # Example
/// ```
/// use fastnotes::io::args::parse_positional_args;
///
/// let args = vec!["Buy".to_string(), "milk".to_string()];
/// let (text, params) = parse_positional_args(&args, &["content"]);
/// assert_eq!(text, Some("Buy milk".to_string()));
/// assert!(params.is_empty());
/// ```
pub fn parse_positional_args(
    args: &[String],
    known: &[&str],
) -> (Option<String>, HashMap<String, String>) {
    let mut params = HashMap::new();
    let mut words: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        match arg.split_once(':') {
            Some((key, value)) if is_param(known, key, value) => {
                let final_value = if value.starts_with('"') && !value.ends_with('"') {
                    // Opening quote without a closing one: the shell split the value
                    let mut full_value = value.to_string();
                    while i + 1 < args.len() {
                        i += 1;
                        full_value.push(' ');
                        full_value.push_str(&args[i]);
                        if args[i].ends_with('"') {
                            break;
                        }
                    }
                    strip_quotes(&full_value).to_string()
                } else {
                    strip_quotes(value).to_string()
                };

                params.insert(key.to_string(), final_value);
            }
            _ => words.push(arg),
        }

        i += 1;
    }

    let positional = (!words.is_empty()).then(|| words.join(" "));
    (positional, params)
}

/// Extract a required string parameter or use positional argument
pub fn get_required_string(
    positional: Option<String>,
    params: &HashMap<String, String>,
    key: &str,
    error_msg: &str,
) -> Result<String, String> {
    params
        .get(key)
        .cloned()
        .or(positional)
        .ok_or_else(|| error_msg.to_string())
}

/// Extract an optional string parameter
pub fn get_string_param(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params.get(key).cloned()
}
