//! 自动装配配置
//!
//! 配置项来自带 `ADSP_DI_` 前缀的环境变量，或者一个 JSON 配置节。

use crate::errors::ConfigError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ADSP_DI_";

/// 关闭按名称装配优化的环境变量
pub const DISABLE_OPTIMIZATIONS_ENV: &str = "ADSP_DI_DISABLE_AUTOWIRE_BY_NAME_OPTIMIZATIONS";

/// 运行环境
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Environment {
    /// 开发环境，支持类型热重载
    Development,
    /// 测试环境
    Test,
    /// 生产环境
    #[default]
    Production,
    /// 自定义环境
    Custom(String),
}

impl Environment {
    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Self::Development,
            "test" => Self::Test,
            "prod" | "production" => Self::Production,
            _ => Self::Custom(s.trim().to_string()),
        })
    }
}

impl TryFrom<String> for Environment {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Test => f.write_str("test"),
            Self::Production => f.write_str("production"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// 自动装配配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutowireSettings {
    /// 关闭所有按名称装配优化
    pub disable_autowire_by_name_optimizations: bool,
    /// 运行环境
    pub environment: Environment,
    /// 显式开启类型热重载
    pub reload_enabled: Option<bool>,
}

impl AutowireSettings {
    /// 从进程环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// 从键值对加载，只读取带前缀的键
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|rest| (rest.to_ascii_lowercase(), value))
            })
            .collect();
        debug!("加载了 {} 个自动装配环境变量", vars.len());

        let mut settings = Self::default();
        if let Some(value) = vars.get("disable_autowire_by_name_optimizations") {
            settings.disable_autowire_by_name_optimizations =
                parse_flag("disable_autowire_by_name_optimizations", value)?;
        }
        if let Some(value) = vars.get("environment") {
            settings.environment = value.parse().unwrap_or_default();
        }
        if let Some(value) = vars.get("reload_enabled") {
            settings.reload_enabled = Some(parse_flag("reload_enabled", value)?);
        }
        Ok(settings)
    }

    /// 从 JSON 配置节绑定
    pub fn from_section(section: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(section)?)
    }

    /// 是否需要实时重新内省类型
    pub fn is_reload_enabled(&self) -> bool {
        self.environment.is_development() || self.reload_enabled.unwrap_or(false)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::TypeConversionError {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// 优化开关
///
/// 每次调用都会重新读取，运维可以在运行时随时关闭优化。
#[derive(Debug, Default)]
pub struct OptimizationSwitch {
    disabled: AtomicBool,
}

impl OptimizationSwitch {
    /// 创建开关
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled: AtomicBool::new(disabled),
        }
    }

    /// 进程级开关
    pub fn global() -> Arc<Self> {
        GLOBAL_SWITCH.clone()
    }

    /// 优化是否被关闭
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }

    /// 设置关闭状态
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Release);
    }
}

static GLOBAL_SWITCH: Lazy<Arc<OptimizationSwitch>> = Lazy::new(|| {
    let disabled = match std::env::var(DISABLE_OPTIMIZATIONS_ENV) {
        Ok(value) => parse_flag(DISABLE_OPTIMIZATIONS_ENV, &value).unwrap_or_else(|e| {
            warn!("忽略无效的优化开关配置: {}", e);
            false
        }),
        Err(_) => false,
    };
    Arc::new(OptimizationSwitch::new(disabled))
});
