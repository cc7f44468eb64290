use anyhow::Result;
use serde::Serialize;

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print a list view together with its header stats.
pub fn print_list<T: Serialize, S: Serialize>(key: &str, items: Option<&[T]>, stats: &S) -> Result<()> {
    print_json(&list_value(key, items, stats)?)
}

/// JSON shape of a list view. `None` items means stats only: the list and
/// its `total` are left out.
pub fn list_value<T: Serialize, S: Serialize>(
    key: &str,
    items: Option<&[T]>,
    stats: &S,
) -> Result<serde_json::Value> {
    let mut out = serde_json::Map::new();
    if let Some(items) = items {
        out.insert("total".into(), serde_json::json!(items.len()));
    }
    out.insert("stats".into(), serde_json::to_value(stats)?);
    if let Some(items) = items {
        out.insert(key.into(), serde_json::to_value(items)?);
    }
    Ok(serde_json::Value::Object(out))
}
