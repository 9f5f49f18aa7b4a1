use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tagging: TaggingConfig,
}

/// 태그 선별 기본값. `tag` 명령의 플래그로 실행마다 덮어쓸 수 있다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    /// 태그를 채택할 최소 인기도. count가 이 값을 초과해야 포함된다.
    #[serde(default = "default_min_count")]
    pub min_count: u32,
    /// 고려할 최대 태그 수 (순위 앞쪽부터).
    #[serde(default = "default_max_tags")]
    pub max_tags: u32,
}

fn default_min_count() -> u32 {
    5
}

fn default_max_tags() -> u32 {
    20
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            min_count: default_min_count(),
            max_tags: default_max_tags(),
        }
    }
}

impl TaggingConfig {
    /// 두 값 모두 양의 정수여야 한다. 원격 조회 전에 호출된다.
    pub fn validate(&self) -> Result<()> {
        if self.min_count == 0 {
            anyhow::bail!("min_count는 1 이상이어야 합니다");
        }
        if self.max_tags == 0 {
            anyhow::bail!("max_tags는 1 이상이어야 합니다");
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("grouptag")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TaggingConfig::default();
        assert_eq!(cfg.min_count, 5);
        assert_eq!(cfg.max_tags, 20);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[tagging]\nmin_count = 10\n").unwrap();
        assert_eq!(cfg.tagging.min_count, 10);
        assert_eq!(cfg.tagging.max_tags, 20);
    }

    #[test]
    fn test_zero_values_rejected() {
        let zero_min = TaggingConfig {
            min_count: 0,
            max_tags: 20,
        };
        assert!(zero_min.validate().is_err());

        let zero_max = TaggingConfig {
            min_count: 5,
            max_tags: 0,
        };
        assert!(zero_max.validate().is_err());
    }
}
