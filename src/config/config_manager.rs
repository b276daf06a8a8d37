// ==========================================
// 货舱 ULD 配载系统 - 站点配置管理器
// ==========================================
// 职责: 站点配置加载、默认值、路径解析
// 存储: JSON 文件 (缺省 <config_dir>/uld-deck-planner/config.json)
// ==========================================

use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 显式指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "ULD_DECK_PLANNER_CONFIG";

/// 支持的界面语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

pub mod config_keys {
    pub const ORIGIN_CODE: &str = "origin_code";
    pub const DEFAULT_FLIGHT_NO: &str = "default_flight_no";
    pub const DEFAULT_DESTINATION: &str = "default_destination";
    pub const LOCALE: &str = "locale";
}

// ==========================================
// StationConfig - 站点配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// 始发站三字码（CPM 汇总行）
    pub origin_code: String,
    /// 航班号为空时的占位
    pub default_flight_no: String,
    /// 目的站为空时的占位
    pub default_destination: String,
    /// 界面语言
    pub locale: String,
    /// 额外的机型档案文件（相对路径以配置文件所在目录为基准）
    pub profile_files: Vec<PathBuf>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            origin_code: "CZL".to_string(),
            default_flight_no: "XX".to_string(),
            default_destination: "XXX".to_string(),
            locale: "zh-CN".to_string(),
            profile_files: Vec::new(),
        }
    }
}

impl StationConfig {
    /// 规范化并校验
    ///
    /// # 校验规则
    /// 1. origin_code 为三位字母（自动转大写）
    /// 2. default_flight_no / default_destination 不能为空
    /// 3. locale 必须是支持的语言
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.origin_code = self.origin_code.trim().to_uppercase();
        if self.origin_code.len() != 3 || !self.origin_code.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ConfigError::ConfigValueError {
                key: config_keys::ORIGIN_CODE.to_string(),
                value: self.origin_code,
                message: "必须为三位字母".to_string(),
            });
        }

        self.default_flight_no = self.default_flight_no.trim().to_uppercase();
        if self.default_flight_no.is_empty() {
            return Err(ConfigError::ConfigValueError {
                key: config_keys::DEFAULT_FLIGHT_NO.to_string(),
                value: String::new(),
                message: "不能为空".to_string(),
            });
        }

        self.default_destination = self.default_destination.trim().to_uppercase();
        if self.default_destination.is_empty() {
            return Err(ConfigError::ConfigValueError {
                key: config_keys::DEFAULT_DESTINATION.to_string(),
                value: String::new(),
                message: "不能为空".to_string(),
            });
        }

        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(ConfigError::ConfigValueError {
                key: config_keys::LOCALE.to_string(),
                value: self.locale,
                message: format!("仅支持 {:?}", SUPPORTED_LOCALES),
            });
        }

        Ok(self)
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    config: StationConfig,
}

impl ConfigManager {
    /// 从内存配置创建
    pub fn new(config: StationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            path: None,
            config: config.validated()?,
        })
    }

    /// 从 JSON 文件加载（缺失的键使用默认值）
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.display().to_string(),
            source,
        })?;

        let config: StationConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
                path: path.display().to_string(),
                source,
            })?;
        let config = config.validated()?;

        info!(
            path = %path.display(),
            origin_code = %config.origin_code,
            locale = %config.locale,
            profile_files = config.profile_files.len(),
            "站点配置加载完成"
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            config,
        })
    }

    /// 解析配置路径并加载; 文件不存在时使用默认配置
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::resolve_path(explicit) {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                debug!(path = %path.display(), "配置文件不存在, 使用默认配置");
                Self::new(StationConfig::default())
            }
            None => Self::new(StationConfig::default()),
        }
    }

    /// 配置路径: 显式参数 → 环境变量 → 用户配置目录
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        dirs::config_dir().map(|dir| dir.join("uld-deck-planner").join("config.json"))
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 机型档案文件的绝对路径
    pub fn profile_file_paths(&self) -> Vec<PathBuf> {
        let base = self.path.as_deref().and_then(Path::parent);
        self.config
            .profile_files
            .iter()
            .map(|p| match base {
                Some(dir) if p.is_relative() => dir.join(p),
                _ => p.clone(),
            })
            .collect()
    }
}
