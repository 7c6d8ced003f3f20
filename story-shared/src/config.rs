use std::fs;
use std::path::Path;
use std::sync::RwLock;

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use toml::Table;

static STORE: OnceCell<RwLock<Table>> = OnceCell::new();

/// 从文件加载配置。文件不存在时使用空表（各 section 走 Default）。
pub fn init<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();

    let content = if path.exists() {
        log::info!("Loading config from {:?}", path);
        fs::read_to_string(path)?
    } else {
        log::warn!("Config file not found at {:?}, using defaults.", path);
        String::new()
    };

    init_from_str(&content);
    Ok(())
}

/// Replaces the whole table. Calling it again reloads rather than failing,
/// so a host can re-read its config between scripts.
pub fn init_from_str(content: &str) {
    let table: Table = toml::from_str(content).unwrap_or_else(|e| {
        log::error!("Config syntax error: {}, using empty config.", e);
        Table::new()
    });

    let store = STORE.get_or_init(|| RwLock::new(Table::new()));
    match store.write() {
        Ok(mut guard) => *guard = table,
        Err(poisoned) => *poisoned.into_inner() = table,
    }
}

pub fn is_initialized() -> bool {
    STORE.get().is_some()
}

/// Reads `[key]` into `T`. Missing store, missing section, or a section that
/// does not match `T` all fall back to `T::default()`.
pub fn get<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(store) = STORE.get() else {
        log::debug!("Config not initialized, section '[{}]' uses defaults.", key);
        return T::default();
    };
    let guard = match store.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    match guard.get(key) {
        Some(value) => value.clone().try_into().unwrap_or_else(|e| {
            log::warn!("Config section '[{}]' mismatch: {}. Using default.", key, e);
            T::default()
        }),
        None => T::default(),
    }
}

pub fn sections() -> Vec<String> {
    STORE
        .get()
        .map(|store| match store.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().keys().cloned().collect(),
        })
        .unwrap_or_default()
}
