//! `gosem config get/set`: read and modify configuration.

use gosem_core::GosemConfig;

pub(crate) fn cmd_config_get(key: &str) -> anyhow::Result<()> {
    let config = GosemConfig::load_or_default();
    let json = serde_json::to_value(&config)?;

    match navigate_json(&json, key) {
        Some(v) => {
            let pretty = serde_json::to_string_pretty(v)?;
            println!("{pretty}");
        }
        None => {
            anyhow::bail!("Unknown config key: {key}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_config_set(key: &str, value: &str) -> anyhow::Result<()> {
    let config = GosemConfig::load_or_default();
    let config_path = GosemConfig::default_path();
    let updated = apply_setting(&config, key, value)?;
    updated.save(&config_path)?;
    eprintln!("Updated {key} and saved to {}", config_path.display());
    Ok(())
}

/// Return `config` with `key` set to `value`.
///
/// The value is parsed as JSON first (`false`, `["a.json"]`) and falls back to
/// a plain string (`gosem=debug`).
fn apply_setting(config: &GosemConfig, key: &str, value: &str) -> anyhow::Result<GosemConfig> {
    let mut json = serde_json::to_value(config)?;
    let new_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    set_json_path(&mut json, key, new_value)?;

    // Round-trip through the typed config to reject ill-typed values.
    Ok(serde_json::from_value(json)?)
}

/// Navigate a JSON value by a dot-separated path.
fn navigate_json<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Set an existing value at a dot-separated JSON path.
fn set_json_path(
    root: &mut serde_json::Value,
    path: &str,
    value: serde_json::Value,
) -> anyhow::Result<()> {
    let parts: Vec<&str> = path.split('.').collect();
    let Some((last, sections)) = parts.split_last() else {
        anyhow::bail!("Empty key path");
    };

    let mut current = root;
    for part in sections {
        current = current
            .get_mut(*part)
            .ok_or_else(|| anyhow::anyhow!("Unknown config section: {part}"))?;
    }

    let Some(obj) = current.as_object_mut() else {
        anyhow::bail!("Config path does not lead to an object");
    };
    if !obj.contains_key(*last) {
        anyhow::bail!("Unknown config key: {last}");
    }
    obj.insert((*last).to_string(), value);
    Ok(())
}
