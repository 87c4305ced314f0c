//! 元数据定义
//!
//! 提供 Bean 类型的身份信息，以及代理包装后的类型归一化

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            module_path: name.clone(),
            name,
            id: type_id,
        }
    }

    /// 从类型获取类型信息
    pub fn of<T: 'static + ?Sized>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: full_name
                .split("::")
                .last()
                .unwrap_or("Unknown")
                .to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.split("::").last().unwrap_or(&self.name)
    }

    /// 是否为指定类型
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_path)
    }
}

/// Bean 的运行时类型
///
/// 动态代理或子类化生成的包装类型会记录其目标类型。
/// 缓存和内省总是以 [`BeanClass::user_class`] 为准，这样不同代理机制生成的实例
/// 只要目标类型相同就会映射到同一个缓存条目。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeanClass {
    runtime: TypeInfo,
    target: Option<TypeInfo>,
}

impl BeanClass {
    /// 普通类型
    pub fn of<T: 'static>() -> Self {
        Self {
            runtime: TypeInfo::of::<T>(),
            target: None,
        }
    }

    /// 从类型信息创建
    pub fn from_type_info(runtime: TypeInfo) -> Self {
        Self {
            runtime,
            target: None,
        }
    }

    /// 代理类型，`P` 为代理本身，`T` 为被代理的用户类型
    pub fn proxy<P: 'static, T: 'static>() -> Self {
        Self {
            runtime: TypeInfo::of::<P>(),
            target: Some(TypeInfo::of::<T>()),
        }
    }

    /// 运行时实际类型
    pub fn runtime_class(&self) -> &TypeInfo {
        &self.runtime
    }

    /// 剥离代理后的用户类型
    pub fn user_class(&self) -> &TypeInfo {
        self.target.as_ref().unwrap_or(&self.runtime)
    }

    /// 运行时类型是否与用户类型不同
    pub fn is_proxy(&self) -> bool {
        self.target
            .as_ref()
            .is_some_and(|target| target != &self.runtime)
    }
}

impl fmt::Display for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) if target != &self.runtime => {
                write!(f, "{} (proxy of {})", self.runtime, target)
            }
            _ => write!(f, "{}", self.runtime),
        }
    }
}
