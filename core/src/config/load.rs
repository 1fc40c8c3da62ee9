use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::error::ConfigError;

use super::types::ModInputConfig;

pub const DEFAULT_CONFIG_FILE: &str = "modinput.toml";

const ENV_CHECKPOINT_DIR: &str = "MODINPUT_CHECKPOINT_DIR";
const ENV_LOG_LEVEL: &str = "MODINPUT_LOG_LEVEL";
const ENV_MAX_CONCURRENCY: &str = "MODINPUT_MAX_CONCURRENCY";

/// An explicit path must exist; the default file is optional.
pub fn load(path: Option<&Path>) -> Result<ModInputConfig, ConfigError> {
    let mut cfg = match path {
        Some(p) => read_file(p)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => read_file(Path::new(DEFAULT_CONFIG_FILE))?,
        None => ModInputConfig::default(),
    };
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<ModInputConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<ModInputConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Blank values are ignored, like unset ones.
pub fn apply_env_overrides<F>(cfg: &mut ModInputConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = var(ENV_CHECKPOINT_DIR) {
        cfg.checkpoint.dir = Some(PathBuf::from(v.trim()));
    }
    if let Some(v) = var(ENV_LOG_LEVEL) {
        cfg.logging.level = v.trim().to_string();
    }
    if let Some(v) = var(ENV_MAX_CONCURRENCY) {
        let n: usize = v.trim().parse().map_err(|e| ConfigError::EnvInvalid {
            key: ENV_MAX_CONCURRENCY.to_string(),
            source: anyhow!("{e}: {v:?}"),
        })?;
        if n == 0 {
            return Err(ConfigError::EnvInvalid {
                key: ENV_MAX_CONCURRENCY.to_string(),
                source: anyhow!("must be at least 1"),
            });
        }
        cfg.run.max_concurrency = n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: ModInputConfig = toml::from_str("[run]\nstanza_timeout_secs = 30\n").unwrap();
        assert_eq!(cfg.run.max_concurrency, 1);
        assert_eq!(cfg.run.stanza_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.file_prefix, "modinput");
        assert!(cfg.checkpoint.dir.is_none());
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let cfg: ModInputConfig = toml::from_str("[run]\nstanza_timeout_secs = 0\n").unwrap();
        assert_eq!(cfg.run.stanza_timeout(), None);
    }

    #[test]
    fn explicit_file_is_read_and_env_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(
            &path,
            "[run]\nmax_concurrency = 4\n[checkpoint]\ndir = \"/var/cp\"\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let mut cfg = read_file(&path).unwrap();
        assert_eq!(cfg.run.max_concurrency, 4);
        assert_eq!(cfg.checkpoint.dir, Some(PathBuf::from("/var/cp")));

        let vars = env(&[
            (ENV_CHECKPOINT_DIR, "/other"),
            (ENV_LOG_LEVEL, "  "),
            (ENV_MAX_CONCURRENCY, "2"),
        ]);
        apply_env_overrides(&mut cfg, |k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.checkpoint.dir, Some(PathBuf::from("/other")));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.run.max_concurrency, 2);
    }

    #[test]
    fn invalid_env_values_are_reported() {
        for bad in ["zero", "0", "-1"] {
            let vars = env(&[(ENV_MAX_CONCURRENCY, bad)]);
            let err = apply_env_overrides(&mut ModInputConfig::default(), |k| vars.get(k).cloned())
                .unwrap_err();
            assert!(matches!(err, ConfigError::EnvInvalid { ref key, .. } if key == ENV_MAX_CONCURRENCY));
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load(Some(tmp.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[run\nmax_concurrency = ").unwrap();
        assert!(matches!(read_file(&path), Err(ConfigError::Parse { .. })));
    }
}
