use std::collections::BTreeSet;
use std::error::Error;
use std::{ fs, path::Path, path::PathBuf };
use serde_json::{ Value, Map };
use anyhow::{ bail, Result };

/// Locale every other dictionary is checked against.
const REFERENCE_LOCALE: &str = "en";

fn main() -> Result<(), Box<dyn Error>> {
    let messages_dir = find_messages_directory()?;
    let out_path = Path::new(&std::env::var("OUT_DIR")?).join("all_translations.json");

    println!("cargo:rerun-if-env-changed=NEXUS_INTL_MESSAGES_DIR");
    println!("cargo:rerun-if-changed={}", messages_dir.display());

    // Always create the file, even if empty, so include_str! works
    if !messages_dir.exists() {
        println!("cargo:warning=No messages/ folder found at {}", messages_dir.display());
        fs::write(out_path, "{}")?;
        return Ok(());
    }

    let translations = build_translations(&messages_dir)?;
    check_key_parity(&translations)?;
    fs::write(out_path, serde_json::to_string_pretty(&translations)?)?;

    Ok(())
}

fn build_translations(messages_dir: &Path) -> Result<Value> {
    let mut translations = Map::new();

    for entry in fs::read_dir(messages_dir)? {
        let file_path = entry?.path();
        if !file_path.is_file() {
            continue;
        }
        if let Some("json") = file_path.extension().and_then(|e| e.to_str()) {
            let Some(lang_code) = file_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            println!("cargo:rerun-if-changed={}", file_path.display());
            let content = fs::read_to_string(&file_path)?;
            let json: Value = serde_json::from_str(&content)?;
            if !json.is_object() {
                bail!("{} must contain a JSON object", file_path.display());
            }
            translations.insert(lang_code.to_string(), json);
        }
    }

    Ok(Value::Object(translations))
}

// Every locale must expose every key of the reference locale
fn check_key_parity(translations: &Value) -> Result<()> {
    let Some(langs) = translations.as_object() else {
        return Ok(());
    };
    let Some(reference) = langs.get(REFERENCE_LOCALE) else {
        bail!("messages/{REFERENCE_LOCALE}.json is required");
    };

    let mut reference_keys = BTreeSet::new();
    collect_keys(reference, "", &mut reference_keys);

    let mut problems = Vec::new();
    for (lang_code, dictionary) in langs {
        if lang_code == REFERENCE_LOCALE {
            continue;
        }
        let mut keys = BTreeSet::new();
        collect_keys(dictionary, "", &mut keys);

        let missing: Vec<&String> = reference_keys.difference(&keys).collect();
        if !missing.is_empty() {
            problems.push(format!("{lang_code}: {missing:?}"));
        }
        for extra in keys.difference(&reference_keys) {
            println!("cargo:warning=locale '{lang_code}' has key '{extra}' not present in '{REFERENCE_LOCALE}'");
        }
    }

    if !problems.is_empty() {
        bail!("translation keys missing:\n{}", problems.join("\n"));
    }
    Ok(())
}

fn collect_keys(value: &Value, prefix: &str, keys: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_keys(nested, &path, keys);
            }
        }
        Value::String(_) => {
            keys.insert(prefix.to_string());
        }
        _ => {}
    }
}

fn find_messages_directory() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("NEXUS_INTL_MESSAGES_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    Ok(Path::new(&manifest_dir).join("messages"))
}
