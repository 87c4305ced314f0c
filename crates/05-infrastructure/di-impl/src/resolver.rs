//! 可装配属性解析器

use crate::cache::{ClassPropertyCache, ResolvedProperties};
use crate::exclusion::ExclusionPolicy;
use di_abstractions::{with_privileges, AutowireContainer, Bean, PrivilegedExecutor};
use infrastructure_common::{
    AutowireError, AutowireResult, BeanClass, PropertyDescriptor, PropertySetDescriptor, TypeInfo,
    WriteAccessor,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 可装配属性解析器
///
/// 内省一个类型的全部属性，挑选出可以按名称装配的属性：
///
/// 1. 存在写访问器
/// 2. 容器中存在与属性同名的 bean
/// 3. 未被排除策略或容器自身规则排除
/// 4. 声明类型不是简单类型
///
/// 未开启热重载时，结果以用户类型为键发布到缓存。
pub struct PropertyResolver<C: ?Sized> {
    container: Arc<C>,
    cache: Arc<ClassPropertyCache>,
    exclusions: ExclusionPolicy,
    privileged: Arc<dyn PrivilegedExecutor>,
    reload_enabled: bool,
}

impl<C> PropertyResolver<C>
where
    C: AutowireContainer + ?Sized,
{
    /// 创建解析器
    pub fn new(
        container: Arc<C>,
        cache: Arc<ClassPropertyCache>,
        exclusions: ExclusionPolicy,
        privileged: Arc<dyn PrivilegedExecutor>,
        reload_enabled: bool,
    ) -> Self {
        Self {
            container,
            cache,
            exclusions,
            privileged,
            reload_enabled,
        }
    }

    /// 是否每次都重新内省
    pub fn is_reload_enabled(&self) -> bool {
        self.reload_enabled
    }

    /// 解析已存在实例的可装配属性
    ///
    /// 代理实例不直接内省，而是内省一个新建的用户类型实例。
    pub fn resolve_for_bean(&self, bean: &dyn Bean) -> AutowireResult<Arc<ResolvedProperties>> {
        let class = bean.bean_class();
        if class.is_proxy() {
            self.resolve(&class, || {
                let fresh = self.container.instantiate(class.user_class())?;
                fresh.property_descriptors()
            })
        } else {
            self.resolve(&class, || bean.property_descriptors())
        }
    }

    /// 解析指定类型的可装配属性
    ///
    /// `introspect` 只在缓存未命中时调用。
    pub fn resolve<F>(&self, class: &BeanClass, introspect: F) -> AutowireResult<Arc<ResolvedProperties>>
    where
        F: FnOnce() -> AutowireResult<Vec<PropertyDescriptor>>,
    {
        let user_class = class.user_class();
        if !self.reload_enabled {
            if let Some(cached) = self.cache.get(user_class) {
                trace!("属性缓存命中: {}", user_class);
                return Ok(cached);
            }
        }

        let descriptors = introspect().map_err(|e| match e {
            AutowireError::ResolutionFailure { .. } => e,
            other => AutowireError::resolution_failure(user_class.to_string(), other.to_string()),
        })?;

        let mut resolved = ResolvedProperties::new();
        for descriptor in &descriptors {
            let Some(writer) = descriptor.write_accessor() else {
                continue;
            };
            if !self.container.contains_bean(descriptor.name())
                || self.is_excluded(descriptor)
                || descriptor.property_type().is_simple()
            {
                continue;
            }

            self.ensure_accessible(user_class, writer)?;
            let Some(property) = PropertySetDescriptor::from_descriptor(descriptor) else {
                continue;
            };
            if !resolved.insert(property) {
                warn!("{} 存在重复的属性 '{}'，忽略后者", user_class, descriptor.name());
            }
        }

        let resolved = Arc::new(resolved);
        if self.reload_enabled {
            debug!("热重载已开启，不缓存 {} 的属性", user_class);
        } else {
            self.cache.publish(user_class.clone(), Arc::clone(&resolved));
            debug!("缓存 {} 的可装配属性: {:?}", user_class, resolved.names());
        }
        Ok(resolved)
    }

    /// 属性是否被排除
    pub fn is_excluded(&self, descriptor: &PropertyDescriptor) -> bool {
        self.exclusions.is_excluded(descriptor)
            || self.container.is_excluded_from_dependency_check(descriptor)
    }

    fn ensure_accessible(&self, class: &TypeInfo, writer: &WriteAccessor) -> AutowireResult<()> {
        if writer.is_accessible() {
            return Ok(());
        }
        with_privileges(self.privileged.as_ref(), || {
            writer.set_accessible();
            Ok(())
        })
        .map_err(|e| {
            AutowireError::resolution_failure(
                class.to_string(),
                format!("无法设置写方法 {} 为可访问: {}", writer.method(), e),
            )
        })
    }
}
