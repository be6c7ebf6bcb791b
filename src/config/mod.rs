use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use tracing::warn;

use crate::{locator::DEFAULT_WINDOWS_ROOT, platform::Platform};

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then the rc file at `path`, then the environment.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            match fs::File::open(path) {
                Ok(file) => read_rc(BufReader::new(file), &mut map),
                Err(e) => warn!(path = %path.display(), error = %e, "cannot read config file"),
            }
        }

        // Environment takes precedence
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            config_path: path.to_path_buf(),
        }
    }

    /// Build a config from explicit pairs on top of the defaults, ignoring
    /// the rc file and the environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        map.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self {
            inner: map,
            config_path: PathBuf::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Override directory for the R runner, if configured.
    pub fn r_path(&self) -> Option<PathBuf> {
        self.get_path("RBRIDGE_R_PATH")
    }

    pub fn windows_root(&self) -> PathBuf {
        self.get_path("RBRIDGE_WINDOWS_ROOT")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WINDOWS_ROOT))
    }

    /// `RBRIDGE_OS` if set to a known platform, else the host classification.
    pub fn platform(&self) -> Platform {
        match self.get("RBRIDGE_OS") {
            Some(v) if !v.eq_ignore_ascii_case("auto") => v.parse().unwrap_or_else(|e| {
                warn!(value = %v, error = %e, "ignoring RBRIDGE_OS");
                Platform::current()
            }),
            _ => Platform::current(),
        }
    }

    pub fn log_filter(&self) -> String {
        self.get("RBRIDGE_LOG").unwrap_or_else(|| "warn".into())
    }
}

fn read_rc(reader: impl BufRead, map: &mut HashMap<String, String>) {
    for line in reader.lines().map_while(|l| l.ok()) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("RBRIDGE_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("rbridge").join(".rbridgerc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("RBRIDGE_WINDOWS_ROOT".into(), DEFAULT_WINDOWS_ROOT.into());
    m.insert("RBRIDGE_OS".into(), "auto".into());
    m.insert("RBRIDGE_LOG".into(), "warn".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let cfg = Config::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(cfg.r_path(), None);
        assert_eq!(cfg.windows_root(), PathBuf::from(DEFAULT_WINDOWS_ROOT));
        assert_eq!(cfg.platform(), Platform::current());
        assert_eq!(cfg.log_filter(), "warn");
    }

    #[test]
    fn explicit_values_win() {
        let cfg = Config::from_pairs([
            ("RBRIDGE_R_PATH", "/opt/R/bin"),
            ("RBRIDGE_OS", "win"),
            ("RBRIDGE_WINDOWS_ROOT", "D:\\R"),
        ]);
        assert_eq!(cfg.r_path(), Some(PathBuf::from("/opt/R/bin")));
        assert_eq!(cfg.platform(), Platform::Win);
        assert_eq!(cfg.windows_root(), PathBuf::from("D:\\R"));
    }

    #[test]
    fn blank_override_counts_as_unset() {
        let cfg = Config::from_pairs([("RBRIDGE_R_PATH", "  ")]);
        assert_eq!(cfg.r_path(), None);
    }

    #[test]
    fn unknown_platform_falls_back_to_host() {
        let cfg = Config::from_pairs([("RBRIDGE_OS", "beos")]);
        assert_eq!(cfg.platform(), Platform::current());
    }

    #[test]
    fn only_prefixed_env_keys_are_config() {
        assert!(is_config_key("RBRIDGE_R_PATH"));
        assert!(is_config_key("RBRIDGE_FUTURE_KEY"));
        assert!(!is_config_key("R_HOME"));
        assert!(!is_config_key("PATH"));
    }

    #[test]
    fn rc_file_lines_are_parsed() {
        let tmp = tempfile::tempdir().unwrap();
        let rc = tmp.path().join(".rbridgerc");
        fs::write(
            &rc,
            "# local R\nRBRIDGE_WINDOWS_ROOT = E:\\Apps\\R\n\nnot a pair\nRBRIDGE_EXTRA=1\n",
        )
        .unwrap();
        let mut map = HashMap::new();
        read_rc(BufReader::new(fs::File::open(&rc).unwrap()), &mut map);
        assert_eq!(map.get("RBRIDGE_WINDOWS_ROOT").map(String::as_str), Some("E:\\Apps\\R"));
        assert_eq!(map.get("RBRIDGE_EXTRA").map(String::as_str), Some("1"));
        assert_eq!(map.len(), 2);
    }
}
