//! Bean 实例抽象

use infrastructure_common::{AutowireResult, BeanClass, PropertyDescriptor};
use std::any::Any;

/// 容器管理的 bean 实例
///
/// 实现者负责暴露运行时类型和属性内省视图。
pub trait Bean: Any + Send + Sync {
    /// 运行时类型
    fn bean_class(&self) -> BeanClass;

    /// 内省全部属性
    fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>>;

    /// 转换为 `Any`
    fn as_any(&self) -> &dyn Any;

    /// 转换为可变 `Any`，写访问器通过它修改实例
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 需要完整容器生命周期回调的 bean 返回 `Some`
    fn as_aware(&self) -> Option<&dyn Aware> {
        None
    }
}

/// 感知容器的标记 trait
///
/// 实现该 trait 的 bean 总是交给通用容器装配。
pub trait Aware: Send + Sync {}

/// Bean 包装器
///
/// 填充属性阶段对实例的只读视图。
#[derive(Clone, Copy)]
pub struct BeanWrapper<'a> {
    instance: &'a dyn Bean,
}

impl<'a> BeanWrapper<'a> {
    /// 包装实例
    pub fn new(instance: &'a dyn Bean) -> Self {
        Self { instance }
    }

    /// 被包装的实例
    pub fn wrapped_instance(&self) -> &'a dyn Bean {
        self.instance
    }

    /// 被包装实例的类型
    pub fn wrapped_class(&self) -> BeanClass {
        self.instance.bean_class()
    }

    /// 内省被包装实例的属性
    pub fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
        self.instance.property_descriptors()
    }
}

impl std::fmt::Debug for BeanWrapper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanWrapper")
            .field("wrapped_class", &self.wrapped_class())
            .finish()
    }
}
