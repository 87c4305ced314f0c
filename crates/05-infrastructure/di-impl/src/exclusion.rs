//! 按名称装配的排除策略

use infrastructure_common::{PropertyDescriptor, PropertyType};
use std::fmt;
use std::sync::Arc;

/// 编译器合成属性名中使用的分隔符
pub const DEFAULT_SYNTHETIC_MARKER: char = '$';

/// 属性名判定函数
pub type NamePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// 排除策略
///
/// 合成属性和被忽略类型的属性永远不参与按名称装配，
/// 容器自身的排除规则由 [`GeneralAutowirer::is_excluded_from_dependency_check`] 另行判断。
///
/// [`GeneralAutowirer::is_excluded_from_dependency_check`]: di_abstractions::GeneralAutowirer::is_excluded_from_dependency_check
#[derive(Clone)]
pub struct ExclusionPolicy {
    synthetic_name: NamePredicate,
    ignored_types: Vec<PropertyType>,
}

impl ExclusionPolicy {
    /// 默认策略：名称含 `$` 的属性和闭包类型属性被排除
    pub fn new() -> Self {
        Self::with_synthetic_marker(DEFAULT_SYNTHETIC_MARKER)
    }

    /// 使用指定分隔符识别合成属性
    pub fn with_synthetic_marker(marker: char) -> Self {
        Self {
            synthetic_name: Arc::new(move |name: &str| name.contains(marker)),
            ignored_types: vec![PropertyType::Callable],
        }
    }

    /// 替换合成属性判定
    pub fn synthetic_names<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.synthetic_name = Arc::new(predicate);
        self
    }

    /// 忽略指定类型的依赖
    pub fn ignore_type(mut self, property_type: PropertyType) -> Self {
        if !self.ignored_types.contains(&property_type) {
            self.ignored_types.push(property_type);
        }
        self
    }

    /// 名称是否为合成属性
    pub fn is_synthetic(&self, name: &str) -> bool {
        (self.synthetic_name)(name)
    }

    /// 类型是否被忽略
    pub fn is_ignored_type(&self, property_type: &PropertyType) -> bool {
        self.ignored_types.contains(property_type)
    }

    /// 属性是否被排除
    ///
    /// 属性名或写方法名任一为合成名称即排除。
    pub fn is_excluded(&self, descriptor: &PropertyDescriptor) -> bool {
        self.is_synthetic(descriptor.name())
            || descriptor
                .write_accessor()
                .is_some_and(|writer| self.is_synthetic(writer.method()))
            || self.is_ignored_type(descriptor.property_type())
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionPolicy")
            .field("synthetic_name", &"<predicate>")
            .field("ignored_types", &self.ignored_types)
            .finish()
    }
}
