//! Bean 定义

use crate::lifecycle::Lifetime;
use crate::metadata::TypeInfo;

/// Bean 定义
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    /// bean 名称
    pub name: String,
    /// bean 类型
    pub bean_class: TypeInfo,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl BeanDefinition {
    /// 创建新的 bean 定义
    pub fn new<T: 'static>(name: impl Into<String>, lifetime: Lifetime) -> Self {
        Self {
            name: name.into(),
            bean_class: TypeInfo::of::<T>(),
            lifetime,
        }
    }

    /// 单例定义
    pub fn singleton<T: 'static>(name: impl Into<String>) -> Self {
        Self::new::<T>(name, Lifetime::Singleton)
    }

    /// 原型定义
    pub fn prototype<T: 'static>(name: impl Into<String>) -> Self {
        Self::new::<T>(name, Lifetime::Prototype)
    }

    /// 是否为原型
    pub fn is_prototype(&self) -> bool {
        self.lifetime.is_prototype()
    }
}
