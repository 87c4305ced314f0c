//! 通用自动装配容器抽象接口
//!
//! 优化层只通过这里的接口回退到通用容器

use crate::bean::{Bean, BeanWrapper};
use crate::factory::{BeanFactory, InstantiationStrategy};
use crate::values::PropertyValues;
use infrastructure_common::{AutowireResult, BeanDefinition, PropertyDescriptor};
use std::fmt;

/// 自动装配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutowireMode {
    /// 不自动装配
    #[default]
    No,
    /// 按属性名装配
    ByName,
    /// 按属性类型装配
    ByType,
    /// 构造器装配
    Constructor,
}

impl fmt::Display for AutowireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::No => "no",
            Self::ByName => "byName",
            Self::ByType => "byType",
            Self::Constructor => "constructor",
        };
        f.write_str(name)
    }
}

/// 通用自动装配 trait
///
/// 未经优化、完全通用的装配路径
pub trait GeneralAutowirer: Send + Sync {
    /// 装配已存在实例的属性
    fn autowire_bean_properties(
        &self,
        bean: &mut dyn Bean,
        mode: AutowireMode,
        dependency_check: bool,
    ) -> AutowireResult<()>;

    /// 填充属性阶段的按名称装配，结果写入 `pvs`
    fn autowire_by_name(
        &self,
        bean_name: &str,
        definition: &BeanDefinition,
        wrapper: &BeanWrapper<'_>,
        pvs: &mut PropertyValues,
    ) -> AutowireResult<()>;

    /// 容器自身的依赖检查排除规则
    fn is_excluded_from_dependency_check(&self, _descriptor: &PropertyDescriptor) -> bool {
        false
    }
}

/// 优化层需要的全部容器能力
pub trait AutowireContainer: BeanFactory + InstantiationStrategy + GeneralAutowirer {}

impl<T> AutowireContainer for T where T: BeanFactory + InstantiationStrategy + GeneralAutowirer + ?Sized
{}
