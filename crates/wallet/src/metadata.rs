use regex::Regex;

use crate::error::WalletError;

/// How a primary file's metadata is parsed, when metadata mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Toml,
    Yaml,
    Json,
}

impl MetadataFormat {
    /// `auto` resolves the format from the primary file's extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "toml" => Some(MetadataFormat::Toml),
            "yaml" | "yml" => Some(MetadataFormat::Yaml),
            "json" => Some(MetadataFormat::Json),
            _ => None,
        }
    }
}

pub fn parse_metadata(bytes: &[u8], format: MetadataFormat) -> Result<serde_json::Value, WalletError> {
    let text = std::str::from_utf8(bytes).map_err(|e| WalletError::MetadataParse(e.to_string()))?;
    match format {
        MetadataFormat::Json => {
            serde_json::from_str(text).map_err(|e| WalletError::MetadataParse(e.to_string()))
        }
        MetadataFormat::Toml => {
            let value: toml::Value = toml::from_str(text).map_err(|e| WalletError::MetadataParse(e.to_string()))?;
            serde_json::to_value(value).map_err(|e| WalletError::MetadataParse(e.to_string()))
        }
        MetadataFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| WalletError::MetadataParse(e.to_string()))?;
            serde_json::to_value(value).map_err(|e| WalletError::MetadataParse(e.to_string()))
        }
    }
}

/// Expands a template string against parsed metadata.
///
/// Tokens are `{{.dotted.path}}`, optionally with `[n]` array indices
/// appended to a path segment (e.g. `{{.accounts[0].file}}`). Failed
/// resolution (missing field, or a non-scalar leaf) is a hard error — we
/// never silently substitute an empty or "<no value>" placeholder.
pub fn expand_template(template: &str, metadata: &serde_json::Value) -> Result<String, WalletError> {
    let token_re = Regex::new(r"\{\{\s*\.([A-Za-z0-9_.\[\]]+)\s*\}\}").expect("static regex");

    let mut out = String::with_capacity(template.len());
    let mut last_end = 0;
    for caps in token_re.captures_iter(template) {
        let whole = caps.get(0).expect("group 0 always matches");
        out.push_str(&template[last_end..whole.start()]);

        let path = &caps[1];
        let resolved = resolve_path(metadata, path)
            .ok_or_else(|| WalletError::TemplateExpansion(format!("no value for `{path}`")))?;
        out.push_str(&resolved);

        last_end = whole.end();
    }
    out.push_str(&template[last_end..]);
    Ok(out)
}

fn resolve_path<'a>(root: &'a serde_json::Value, path: &str) -> Option<String> {
    let mut current = root;
    for segment in path.split('.') {
        let (key, indices) = split_indices(segment);
        if !key.is_empty() {
            current = current.get(key)?;
        }
        for idx in indices {
            current = current.get(idx)?;
        }
    }
    scalar_to_string(current)
}

/// Splits `foo[0][1]` into (`"foo"`, `[0, 1]`).
fn split_indices(segment: &str) -> (&str, Vec<usize>) {
    let bracket_pos = segment.find('[');
    let (key, rest) = match bracket_pos {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => (segment, ""),
    };

    let mut indices = Vec::new();
    let mut remaining = rest;
    while let Some(close) = remaining.find(']') {
        if let Some(open_rel) = remaining[..close].find('[') {
            if let Ok(idx) = remaining[open_rel + 1..close].parse::<usize>() {
                indices.push(idx);
            }
        }
        remaining = &remaining[close + 1..];
    }
    (key, indices)
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_simple_dotted_path() {
        let metadata = serde_json::json!({"address": "0xabc", "nested": {"file": "key.json"}});
        let expanded = expand_template("{{.nested.file}}", &metadata).unwrap();
        assert_eq!(expanded, "key.json");
    }

    #[test]
    fn expands_indexed_path() {
        let metadata = serde_json::json!({"accounts": [{"file": "a.json"}, {"file": "b.json"}]});
        let expanded = expand_template("{{.accounts[1].file}}", &metadata).unwrap();
        assert_eq!(expanded, "b.json");
    }

    #[test]
    fn missing_field_is_a_hard_error() {
        let metadata = serde_json::json!({"address": "0xabc"});
        assert!(expand_template("{{.missing}}", &metadata).is_err());
    }

    #[test]
    fn template_with_literal_surrounding_text() {
        let metadata = serde_json::json!({"id": 7});
        let expanded = expand_template("wallet-{{.id}}.key.json", &metadata).unwrap();
        assert_eq!(expanded, "wallet-7.key.json");
    }

    #[test]
    fn auto_format_resolves_from_extension() {
        assert_eq!(MetadataFormat::from_extension(".toml"), Some(MetadataFormat::Toml));
        assert_eq!(MetadataFormat::from_extension("yaml"), Some(MetadataFormat::Yaml));
        assert_eq!(MetadataFormat::from_extension("json"), Some(MetadataFormat::Json));
        assert_eq!(MetadataFormat::from_extension("txt"), None);
    }

    #[test]
    fn parses_toml_metadata() {
        let value = parse_metadata(b"file = \"a.json\"\npassword = \"b.pwd\"", MetadataFormat::Toml).unwrap();
        assert_eq!(value["file"], "a.json");
    }

    #[test]
    fn parses_yaml_metadata() {
        let value = parse_metadata(b"file: a.json\npassword: b.pwd", MetadataFormat::Yaml).unwrap();
        assert_eq!(value["file"], "a.json");
    }
}
