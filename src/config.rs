use std::path::PathBuf;

use crate::error::{LoaderError, Result};

/// Dataset root directory.
pub const DATA_ENV: &str = "ILLIXR_DATA";
/// `eager` or `lazy`.
pub const LOAD_MODE_ENV: &str = "ILLIXR_OFFLINE_EYE_LOAD";
/// Reject timestamps that only one stream recorded.
pub const REQUIRE_COMPLETE_ENV: &str = "ILLIXR_OFFLINE_EYE_REQUIRE_COMPLETE";

/// Manifest file inside each stream directory.
pub const MANIFEST_FILE: &str = "data.csv";
/// Image directory inside each stream directory.
pub const IMAGE_DIR: &str = "data";

/// Lazy loading puts disk reads on the playback path, and the scheduler
/// cannot preempt blocking IO, so eager is the default.
pub const DEFAULT_LOAD_MODE: LoadMode = LoadMode::Eager;

/// When frames are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// 构建表的时候解码全部图像
    #[default]
    Eager,
    /// 第一次访问时解码
    Lazy,
}

impl std::str::FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(LoadMode::Eager),
            "lazy" => Ok(LoadMode::Lazy),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for LoadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadMode::Eager => write!(f, "eager"),
            LoadMode::Lazy => write!(f, "lazy"),
        }
    }
}

/// Everything the table builder needs, resolved once before any IO.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub root: PathBuf,
    pub mode: LoadMode,
    pub require_complete: bool,
}

impl LoaderConfig {
    #[allow(dead_code)]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: DEFAULT_LOAD_MODE,
            require_complete: false,
        }
    }

    #[allow(dead_code)]
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    #[allow(dead_code)]
    pub fn with_require_complete(mut self, require_complete: bool) -> Self {
        self.require_complete = require_complete;
        self
    }

    /// Resolve the config through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = lookup(DATA_ENV).ok_or(LoaderError::ConfigurationMissing { var: DATA_ENV })?;

        let mode = match lookup(LOAD_MODE_ENV) {
            Some(value) => value.parse::<LoadMode>().map_err(|_| LoaderError::InvalidConfig {
                var: LOAD_MODE_ENV,
                value: value.clone(),
            })?,
            None => DEFAULT_LOAD_MODE,
        };

        let require_complete = match lookup(REQUIRE_COMPLETE_ENV) {
            Some(value) => parse_flag(&value).ok_or(LoaderError::InvalidConfig {
                var: REQUIRE_COMPLETE_ENV,
                value,
            })?,
            None => false,
        };

        Ok(Self {
            root: PathBuf::from(root),
            mode,
            require_complete,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_root_is_configuration_missing() {
        let err = LoaderConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::ConfigurationMissing { var } if var == DATA_ENV
        ));
    }

    #[test]
    fn defaults_to_eager() {
        let config = LoaderConfig::from_lookup(lookup_from(&[(DATA_ENV, "/data")])).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.mode, LoadMode::Eager);
        assert!(!config.require_complete);
    }

    #[test]
    fn reads_mode_and_flag() {
        let config = LoaderConfig::from_lookup(lookup_from(&[
            (DATA_ENV, "/data"),
            (LOAD_MODE_ENV, " Lazy "),
            (REQUIRE_COMPLETE_ENV, "true"),
        ]))
        .unwrap();
        assert_eq!(config.mode, LoadMode::Lazy);
        assert!(config.require_complete);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = LoaderConfig::from_lookup(lookup_from(&[
            (DATA_ENV, "/data"),
            (LOAD_MODE_ENV, "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::InvalidConfig { var, ref value } if var == LOAD_MODE_ENV && value == "sometimes"
        ));
    }
}
