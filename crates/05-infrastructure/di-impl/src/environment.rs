//! 系统运行环境

use di_abstractions::RuntimeEnvironment;
use infrastructure_common::{AutowireSettings, ConfigError, LifecycleState};
use parking_lot::RwLock;
use tracing::info;

/// 基于配置和启动状态的运行环境
#[derive(Debug)]
pub struct SystemEnvironment {
    settings: AutowireSettings,
    state: RwLock<LifecycleState>,
}

impl SystemEnvironment {
    /// 创建运行环境
    pub fn new(settings: AutowireSettings) -> Self {
        Self {
            settings,
            state: RwLock::new(LifecycleState::Running),
        }
    }

    /// 从环境变量创建
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(AutowireSettings::from_env()?))
    }

    /// 当前配置
    pub fn settings(&self) -> &AutowireSettings {
        &self.settings
    }

    /// 当前启动状态
    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    /// 设置启动状态
    pub fn set_state(&self, state: LifecycleState) {
        let mut current = self.state.write();
        if *current != state {
            info!("运行环境状态变更: {:?} -> {:?}", *current, state);
            *current = state;
        }
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new(AutowireSettings::default())
    }
}

impl RuntimeEnvironment for SystemEnvironment {
    fn is_initializing(&self) -> bool {
        self.state().is_initializing()
    }

    fn is_reload_enabled(&self) -> bool {
        self.settings.is_reload_enabled()
    }
}
