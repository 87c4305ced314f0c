//! 类型到可装配属性集合的缓存

use dashmap::DashMap;
use infrastructure_common::{PropertySetDescriptor, TypeInfo};
use std::sync::Arc;

/// 一个类型解析出的可装配属性集合
///
/// 保持内省顺序，属性名唯一。发布后不再修改。
#[derive(Debug, Clone, Default)]
pub struct ResolvedProperties {
    properties: Vec<PropertySetDescriptor>,
}

impl ResolvedProperties {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加属性，同名属性已存在时返回 `false`
    pub fn insert(&mut self, property: PropertySetDescriptor) -> bool {
        if self.contains(property.name()) {
            return false;
        }
        self.properties.push(property);
        true
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&PropertySetDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// 是否包含指定属性
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 属性名列表
    pub fn names(&self) -> Vec<&str> {
        self.properties.iter().map(PropertySetDescriptor::name).collect()
    }

    /// 遍历属性
    pub fn iter(&self) -> std::slice::Iter<'_, PropertySetDescriptor> {
        self.properties.iter()
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedProperties {
    type Item = &'a PropertySetDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertySetDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 类型属性缓存
///
/// 以剥离代理后的用户类型为键。读取不加全局锁，并发发布同一个键时后写入者生效。
/// 返回的条目是 `Arc` 克隆，调用方不会持有分片锁。
#[derive(Debug, Default)]
pub struct ClassPropertyCache {
    entries: DashMap<TypeInfo, Arc<ResolvedProperties>>,
}

impl ClassPropertyCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取缓存条目
    pub fn get(&self, class: &TypeInfo) -> Option<Arc<ResolvedProperties>> {
        self.entries.get(class).map(|entry| Arc::clone(entry.value()))
    }

    /// 发布条目
    pub fn publish(&self, class: TypeInfo, properties: Arc<ResolvedProperties>) {
        self.entries.insert(class, properties);
    }

    /// 驱逐条目，返回是否存在
    pub fn evict(&self, class: &TypeInfo) -> bool {
        self.entries.remove(class).is_some()
    }

    /// 是否缓存了指定类型
    pub fn contains(&self, class: &TypeInfo) -> bool {
        self.entries.contains_key(class)
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
