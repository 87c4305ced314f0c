//! Bean 工厂抽象接口
//!
//! 按名称查找 bean 以及实例化 bean 类型的能力

use crate::bean::Bean;
use infrastructure_common::{AutowireResult, BeanRef, TypeInfo};

/// Bean 工厂 trait
///
/// 按名称查找容器中的 bean
pub trait BeanFactory: Send + Sync {
    /// 是否存在指定名称的 bean
    fn contains_bean(&self, name: &str) -> bool;

    /// 获取指定名称的 bean，不存在时返回 `NoSuchBean`
    ///
    /// 实现可能递归创建其他 bean，调用方不得在调用期间持有锁。
    fn get_bean(&self, name: &str) -> AutowireResult<BeanRef>;
}

/// 实例化策略 trait
pub trait InstantiationStrategy: Send + Sync {
    /// 创建指定类型的新实例
    fn instantiate(&self, class: &TypeInfo) -> AutowireResult<Box<dyn Bean>>;
}
