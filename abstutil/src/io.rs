use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn to_json<T: Serialize>(obj: &T) -> String {
    serde_json::to_string_pretty(obj).unwrap()
}

/// Creates parent directories as needed.
pub fn write_json<T: Serialize>(path: &str, obj: &T) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    fs_err::write(path, to_json(obj))?;
    info!("Wrote {}", path);
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let contents = fs_err::read_to_string(path)?;
    let obj: T =
        serde_json::from_str(&contents).with_context(|| format!("parsing JSON from {}", path))?;
    Ok(obj)
}

pub fn read_toml<T: DeserializeOwned>(path: &str) -> Result<T> {
    let contents = fs_err::read_to_string(path)?;
    let obj: T = toml::from_str(&contents).with_context(|| format!("parsing TOML from {}", path))?;
    Ok(obj)
}
