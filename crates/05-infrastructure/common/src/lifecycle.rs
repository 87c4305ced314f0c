//! 组件生命周期

use serde::{Deserialize, Serialize};

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// 单例模式 - 整个应用生命周期内只创建一个实例
    #[default]
    Singleton,
    /// 原型模式 - 每次请求都创建新实例
    Prototype,
}

impl Lifetime {
    /// 是否为原型
    pub fn is_prototype(self) -> bool {
        matches!(self, Self::Prototype)
    }
}

/// 系统启动阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// 未初始化
    #[default]
    Uninitialized,
    /// 初始化中
    Initializing,
    /// 运行中
    Running,
    /// 已停止
    Stopped,
}

impl LifecycleState {
    /// 是否仍处于初始化阶段
    pub fn is_initializing(self) -> bool {
        matches!(self, Self::Initializing)
    }
}
