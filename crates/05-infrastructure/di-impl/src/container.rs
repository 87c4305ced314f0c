//! 默认的通用 bean 容器
//!
//! 不做任何缓存的按名称装配实现，作为优化路径的回退目标。

use crate::applier::translate_write_error;
use dashmap::DashMap;
use di_abstractions::{
    AutowireMode, Bean, BeanFactory, BeanWrapper, GeneralAutowirer, InstantiationStrategy,
    PropertyValues,
};
use infrastructure_common::{
    AutowireError, AutowireResult, BeanDefinition, BeanRef, DependencyError, PropertyDescriptor,
    PropertyType, TypeInfo,
};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// 原型工厂函数类型
pub type PrototypeFactoryFn = Arc<dyn Fn() -> AutowireResult<BeanRef> + Send + Sync>;

/// 构造函数类型
pub type ConstructorFn = Arc<dyn Fn() -> Box<dyn Bean> + Send + Sync>;

/// 简单的 bean 注册信息
#[derive(Clone)]
enum BeanRegistration {
    /// 单例实例
    Singleton(BeanRef),
    /// 每次查找都创建新实例
    Prototype(PrototypeFactoryFn),
}

impl fmt::Debug for BeanRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton(_) => f.write_str("Singleton(<bean>)"),
            Self::Prototype(_) => f.write_str("Prototype(<function>)"),
        }
    }
}

/// 默认写方法声明接口中应被忽略的感知接口
const DEFAULT_IGNORED_INTERFACES: [&str; 3] = ["Aware", "BeanNameAware", "BeanFactoryAware"];

/// 默认的通用 bean 容器
pub struct DefaultBeanContainer {
    /// 按名称注册的 bean
    beans: DashMap<String, BeanRegistration>,
    /// 按类型注册的构造函数
    constructors: DashMap<TypeInfo, ConstructorFn>,
    ignored_interfaces: RwLock<HashSet<String>>,
    ignored_types: RwLock<Vec<PropertyType>>,
}

impl DefaultBeanContainer {
    /// 创建新的容器
    pub fn new() -> Self {
        Self {
            beans: DashMap::new(),
            constructors: DashMap::new(),
            ignored_interfaces: RwLock::new(
                DEFAULT_IGNORED_INTERFACES
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
            ),
            ignored_types: RwLock::new(vec![PropertyType::Callable]),
        }
    }

    /// 注册单例 bean
    pub fn register_singleton(&self, name: impl Into<String>, instance: BeanRef) {
        let name = name.into();
        info!("注册单例 bean: {}", name);
        self.beans.insert(name, BeanRegistration::Singleton(instance));
    }

    /// 注册单例实例
    pub fn register_instance<T>(&self, name: impl Into<String>, instance: T)
    where
        T: Any + Send + Sync,
    {
        self.register_singleton(name, Arc::new(instance));
    }

    /// 注册原型 bean
    pub fn register_prototype<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> AutowireResult<BeanRef> + Send + Sync + 'static,
    {
        let name = name.into();
        info!("注册原型 bean: {}", name);
        self.beans
            .insert(name, BeanRegistration::Prototype(Arc::new(factory)));
    }

    /// 注册类型的构造函数
    pub fn register_constructor<T>(&self)
    where
        T: Bean + Default,
    {
        self.register_constructor_with(TypeInfo::of::<T>(), || Box::new(T::default()));
    }

    /// 以自定义函数注册构造函数
    pub fn register_constructor_with<F>(&self, class: TypeInfo, constructor: F)
    where
        F: Fn() -> Box<dyn Bean> + Send + Sync + 'static,
    {
        debug!("注册构造函数: {}", class);
        self.constructors.insert(class, Arc::new(constructor));
    }

    /// 忽略由指定接口声明的写方法
    pub fn ignore_dependency_interface(&self, interface: impl Into<String>) {
        self.ignored_interfaces.write().insert(interface.into());
    }

    /// 忽略指定类型的依赖
    pub fn ignore_dependency_type(&self, property_type: PropertyType) {
        let mut ignored = self.ignored_types.write();
        if !ignored.contains(&property_type) {
            ignored.push(property_type);
        }
    }

    /// 已注册的 bean 名称
    pub fn bean_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.beans.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// 将属性值写入实例
    pub fn apply_property_values(&self, bean: &mut dyn Bean, pvs: &PropertyValues) -> AutowireResult<()> {
        if pvs.is_empty() {
            return Ok(());
        }
        let bean_class = bean.bean_class().to_string();
        let descriptors = bean.property_descriptors()?;

        for pv in pvs.iter() {
            let descriptor = descriptors
                .iter()
                .find(|d| d.name() == pv.name)
                .ok_or_else(|| AutowireError::InvocationFailure {
                    property: pv.name.clone(),
                    bean_class: bean_class.clone(),
                    source: format!("属性 '{}' 不存在", pv.name).into(),
                })?;
            self.write_property(bean, &bean_class, descriptor, Arc::clone(&pv.value))?;
        }
        Ok(())
    }

    /// 满足按名称装配条件的属性
    fn is_autowire_candidate(&self, descriptor: &PropertyDescriptor) -> bool {
        descriptor.write_accessor().is_some()
            && !self.is_excluded_from_dependency_check(descriptor)
            && !descriptor.property_type().is_simple()
    }

    fn write_property(
        &self,
        bean: &mut dyn Bean,
        bean_class: &str,
        descriptor: &PropertyDescriptor,
        value: BeanRef,
    ) -> AutowireResult<()> {
        let Some(writer) = descriptor.write_accessor() else {
            return Err(AutowireError::InvocationFailure {
                property: descriptor.name().to_string(),
                bean_class: bean_class.to_string(),
                source: format!("属性 '{}' 没有写方法", descriptor.name()).into(),
            });
        };
        if !writer.is_accessible() {
            writer.set_accessible();
        }
        writer
            .invoke(bean.as_any_mut(), value)
            .map_err(|e| translate_write_error(descriptor.name(), bean_class, descriptor.property_type(), e))
    }

    fn autowire_existing_by_name(&self, bean: &mut dyn Bean) -> AutowireResult<()> {
        let bean_class = bean.bean_class().to_string();
        let descriptors = bean.property_descriptors()?;

        for descriptor in descriptors.iter().filter(|d| self.is_autowire_candidate(d)) {
            let name = descriptor.name();
            if !self.contains_bean(name) {
                trace!("{} 的属性 '{}' 没有同名 bean，跳过", bean_class, name);
                continue;
            }
            let value = self.get_bean(name)?;
            self.write_property(bean, &bean_class, descriptor, value)?;
            debug!("通用装配: {} 的属性 '{}'", bean_class, name);
        }
        Ok(())
    }

    fn check_dependencies(&self, bean: &dyn Bean) -> AutowireResult<()> {
        let bean_class = bean.bean_class().to_string();
        let unsatisfied = bean
            .property_descriptors()?
            .into_iter()
            .find(|d| self.is_autowire_candidate(d) && !self.contains_bean(d.name()));

        match unsatisfied {
            Some(descriptor) => Err(AutowireError::UnsatisfiedDependency {
                property: descriptor.name().to_string(),
                bean_class,
            }),
            None => Ok(()),
        }
    }
}

impl Default for DefaultBeanContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultBeanContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultBeanContainer")
            .field("beans", &self.bean_names())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

impl BeanFactory for DefaultBeanContainer {
    fn contains_bean(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    fn get_bean(&self, name: &str) -> AutowireResult<BeanRef> {
        // 先复制注册信息再调用工厂，工厂可能递归查找其他 bean
        let registration = self
            .beans
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AutowireError::no_such_bean(name))?;

        match registration {
            BeanRegistration::Singleton(instance) => Ok(instance),
            BeanRegistration::Prototype(factory) => factory(),
        }
    }
}

impl InstantiationStrategy for DefaultBeanContainer {
    fn instantiate(&self, class: &TypeInfo) -> AutowireResult<Box<dyn Bean>> {
        let constructor = self
            .constructors
            .get(class)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: class.to_string(),
            })?;
        Ok(constructor())
    }
}

impl GeneralAutowirer for DefaultBeanContainer {
    fn autowire_bean_properties(
        &self,
        bean: &mut dyn Bean,
        mode: AutowireMode,
        dependency_check: bool,
    ) -> AutowireResult<()> {
        match mode {
            AutowireMode::ByName => self.autowire_existing_by_name(bean)?,
            AutowireMode::No => {}
            AutowireMode::ByType | AutowireMode::Constructor => {
                warn!("默认容器不支持 {} 装配模式，跳过", mode);
            }
        }

        if dependency_check {
            self.check_dependencies(bean)?;
        }
        Ok(())
    }

    fn autowire_by_name(
        &self,
        bean_name: &str,
        _definition: &BeanDefinition,
        wrapper: &BeanWrapper<'_>,
        pvs: &mut PropertyValues,
    ) -> AutowireResult<()> {
        for descriptor in wrapper.property_descriptors()? {
            let name = descriptor.name();
            if !self.is_autowire_candidate(&descriptor) || pvs.contains(name) {
                continue;
            }
            if self.contains_bean(name) {
                let value = self.get_bean(name)?;
                pvs.add(name, value);
                debug!("通用按名称装配: bean '{}' 的属性 '{}'", bean_name, name);
            } else {
                trace!("bean '{}' 的属性 '{}' 没有同名 bean", bean_name, name);
            }
        }
        Ok(())
    }

    fn is_excluded_from_dependency_check(&self, descriptor: &PropertyDescriptor) -> bool {
        let by_interface = descriptor
            .declaring_interface()
            .is_some_and(|interface| self.ignored_interfaces.read().contains(interface));
        by_interface || self.ignored_types.read().contains(descriptor.property_type())
    }
}
