//! 属性值集合

use infrastructure_common::BeanRef;
use std::fmt;

/// 单个属性值
#[derive(Clone)]
pub struct PropertyValue {
    /// 属性名
    pub name: String,
    /// 属性值
    pub value: BeanRef,
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValue")
            .field("name", &self.name)
            .field("value", &"<bean>")
            .finish()
    }
}

/// 可变属性值集合，保持插入顺序
#[derive(Debug, Clone, Default)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否包含指定属性
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|pv| pv.name == name)
    }

    /// 添加属性值，已存在时替换
    pub fn add(&mut self, name: impl Into<String>, value: BeanRef) {
        let name = name.into();
        match self.values.iter_mut().find(|pv| pv.name == name) {
            Some(existing) => existing.value = value,
            None => self.values.push(PropertyValue { name, value }),
        }
    }

    /// 获取属性值
    pub fn get(&self, name: &str) -> Option<&BeanRef> {
        self.values
            .iter()
            .find(|pv| pv.name == name)
            .map(|pv| &pv.value)
    }

    /// 属性名列表
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|pv| pv.name.as_str()).collect()
    }

    /// 遍历属性值
    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.values.iter()
    }

    /// 属性值数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
