//! Generates the diagnostic catalog lookups from `catalog/diagnostics.json`.
//!
//! Outputs (all in `OUT_DIR`):
//! - `generated_codes.rs`: one `pub const NAME: &str = "CMDxxxx";` per entry, plus `ALL`
//! - `generated_summary.rs`, `generated_explain.rs`, `generated_templates.rs`:
//!   `match id { .. }` expressions mapping a code to its summary, description,
//!   or message template

use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const HEADER: &str = "// Auto-generated from catalog/diagnostics.json. DO NOT EDIT.\n\n";

#[derive(Deserialize)]
struct Catalog {
    diagnostics: Vec<Entry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    id: String,
    const_name: String,
    summary: String,
    template: String,
    context_keys: Vec<String>,
    description: String,
}

fn main() {
    let catalog_path = Path::new("catalog/diagnostics.json");
    println!("cargo:rerun-if-changed={}", catalog_path.display());

    let raw = fs::read_to_string(catalog_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", catalog_path.display()));
    let catalog: Catalog = serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("{} is not a valid catalog: {e}", catalog_path.display()));
    let entries = catalog.diagnostics;
    validate(&entries);

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let mut codes = String::from(HEADER);
    for entry in &entries {
        let _ = writeln!(codes, "/// {}", entry.summary);
        let _ = writeln!(codes, "pub const {}: &str = \"{}\";\n", entry.const_name, entry.id);
    }
    codes.push_str("/// Every diagnostic code defined in the catalog, in catalog order.\n");
    codes.push_str("pub const ALL: &[&str] = &[\n");
    for entry in &entries {
        let _ = writeln!(codes, "    {},", entry.const_name);
    }
    codes.push_str("];\n");
    write_out(&out_dir, "generated_codes.rs", &codes);

    write_out(&out_dir, "generated_summary.rs", &lookup(&entries, |e| &e.summary));
    write_out(&out_dir, "generated_explain.rs", &lookup(&entries, |e| &e.description));
    write_out(&out_dir, "generated_templates.rs", &lookup(&entries, |e| &e.template));
}

/// Panic on duplicate ids or names, malformed constant names, and template
/// placeholders missing from `contextKeys`.
fn validate(entries: &[Entry]) {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for entry in entries {
        let Entry { id, const_name, .. } = entry;
        assert!(ids.insert(id.as_str()), "duplicate id '{id}'");
        assert!(names.insert(const_name.as_str()), "{id}: duplicate constName '{const_name}'");
        assert!(
            const_name.starts_with(|c: char| c.is_ascii_uppercase())
                && const_name
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'),
            "{id}: constName '{const_name}' is not SCREAMING_SNAKE_CASE"
        );
        for placeholder in placeholders(&entry.template) {
            assert!(
                entry.context_keys.iter().any(|key| key == placeholder),
                "{id}: template uses '{{{placeholder}}}' which is not listed in contextKeys"
            );
        }
    }
}

/// A `match id { .. }` expression returning `Some(field)` for known codes.
fn lookup(entries: &[Entry], field: impl Fn(&Entry) -> &str) -> String {
    let mut out = String::from(HEADER);
    out.push_str("match id {\n");
    for entry in entries {
        let escaped: String = field(entry).chars().flat_map(char::escape_default).collect();
        let _ = writeln!(out, "    \"{}\" => Some(\"{escaped}\"),", entry.id);
    }
    out.push_str("    _ => None,\n}\n");
    out
}

/// Names between `{` and `}` in a message template.
fn placeholders(template: &str) -> Vec<&str> {
    template
        .split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}'))
        .map(|(key, _)| key.trim())
        .filter(|key| !key.is_empty())
        .collect()
}

fn write_out(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap_or_else(|e| panic!("failed to write {name}: {e}"));
}
