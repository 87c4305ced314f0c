//! 优化的自动装配工厂
//!
//! 按名称装配的入口。根据开关、环境和实例能力选择优化路径或通用容器路径，
//! 优化路径失败时驱逐缓存并回退到通用容器一次。

use crate::applier::ByNameAutowireApplier;
use crate::cache::{ClassPropertyCache, ResolvedProperties};
use crate::environment::SystemEnvironment;
use crate::exclusion::ExclusionPolicy;
use crate::resolver::PropertyResolver;
use di_abstractions::{
    AutowireContainer, AutowireMode, Bean, BeanWrapper, NoSecurityPolicy, PrivilegedExecutor,
    PropertyValues, RuntimeEnvironment,
};
use infrastructure_common::{AutowireResult, AutowireSettings, BeanDefinition, OptimizationSwitch};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 单次装配请求选择的路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutowirePath {
    /// 交给通用容器
    Disabled,
    /// 使用缓存的属性集合直接写入，失败时回退到通用容器一次
    Optimized,
}

/// 优化的自动装配工厂
pub struct OptimizedAutowireFactory<C: ?Sized> {
    container: Arc<C>,
    environment: Arc<dyn RuntimeEnvironment>,
    switch: Arc<OptimizationSwitch>,
    cache: Arc<ClassPropertyCache>,
    resolver: PropertyResolver<C>,
    applier: ByNameAutowireApplier<C>,
}

impl<C> OptimizedAutowireFactory<C>
where
    C: AutowireContainer + ?Sized,
{
    /// 使用默认配置创建
    pub fn new(container: Arc<C>) -> Self {
        Self::builder(container).build()
    }

    /// 创建构建器
    pub fn builder(container: Arc<C>) -> OptimizedAutowireFactoryBuilder<C> {
        OptimizedAutowireFactoryBuilder::new(container)
    }

    /// 装配已存在实例的属性
    ///
    /// 系统初始化期间不做任何事。
    pub fn autowire_bean_properties(
        &self,
        bean: &mut dyn Bean,
        mode: AutowireMode,
        dependency_check: bool,
    ) -> AutowireResult<()> {
        if self.environment.is_initializing() {
            debug!("系统初始化中，跳过自动装配: {}", bean.bean_class());
            return Ok(());
        }

        match self.classify(bean, mode, dependency_check) {
            AutowirePath::Optimized => self.autowire_optimized(bean, mode, dependency_check),
            AutowirePath::Disabled => {
                self.container
                    .autowire_bean_properties(bean, mode, dependency_check)
            }
        }
    }

    /// 按名称装配已存在实例的属性
    pub fn autowire_by_name(&self, bean: &mut dyn Bean, dependency_check: bool) -> AutowireResult<()> {
        self.autowire_bean_properties(bean, AutowireMode::ByName, dependency_check)
    }

    /// 判断一次装配请求应走的路径
    pub fn classify(&self, bean: &dyn Bean, mode: AutowireMode, dependency_check: bool) -> AutowirePath {
        if mode != AutowireMode::ByName
            || self.switch.is_disabled()
            || dependency_check
            || bean.as_aware().is_some()
        {
            AutowirePath::Disabled
        } else {
            AutowirePath::Optimized
        }
    }

    fn autowire_optimized(
        &self,
        bean: &mut dyn Bean,
        mode: AutowireMode,
        dependency_check: bool,
    ) -> AutowireResult<()> {
        let result = self
            .resolver
            .resolve_for_bean(bean)
            .and_then(|properties| self.applier.apply(bean, &properties));

        let Err(e) = result else {
            return Ok(());
        };

        let class = bean.bean_class();
        error!("使用优化路径装配 {} 失败: {}", class, e);
        error!("改用通用容器重新装配 {}", class);
        self.cache.evict(class.user_class());

        self.container
            .autowire_bean_properties(bean, mode, dependency_check)
    }

    /// 填充属性阶段的按名称装配
    ///
    /// 只有原型 bean 走优化路径；已存在于 `pvs` 中的属性不会被覆盖。
    pub fn autowire_by_name_during_population(
        &self,
        bean_name: &str,
        definition: &BeanDefinition,
        wrapper: &BeanWrapper<'_>,
        pvs: &mut PropertyValues,
    ) -> AutowireResult<()> {
        if self.switch.is_disabled() || !definition.is_prototype() {
            return self
                .container
                .autowire_by_name(bean_name, definition, wrapper, pvs);
        }

        let class = wrapper.wrapped_class();
        let properties = self
            .resolver
            .resolve(&class, || wrapper.property_descriptors())?;

        for property in properties.iter() {
            let property_name = property.name();
            if pvs.contains(property_name) {
                continue;
            }
            let other = self.container.get_bean(property_name)?;
            pvs.add(property_name, other);
            debug!(
                "按名称装配: bean '{}' 的属性 '{}' 引用 bean '{}'",
                bean_name, property_name, property_name
            );
        }
        Ok(())
    }

    /// 解析实例的可装配属性（使用缓存）
    pub fn resolve_autowireable_properties(
        &self,
        bean: &dyn Bean,
    ) -> AutowireResult<Arc<ResolvedProperties>> {
        self.resolver.resolve_for_bean(bean)
    }

    /// 属性缓存
    pub fn property_cache(&self) -> &ClassPropertyCache {
        &self.cache
    }

    /// 清空属性缓存
    pub fn clear_property_cache(&self) {
        info!("清空属性缓存，共 {} 个条目", self.cache.len());
        self.cache.clear();
    }

    /// 是否开启了热重载
    pub fn is_reload_enabled(&self) -> bool {
        self.resolver.is_reload_enabled()
    }

    /// 优化开关
    pub fn optimization_switch(&self) -> &Arc<OptimizationSwitch> {
        &self.switch
    }

    /// 被包装的容器
    pub fn container(&self) -> &Arc<C> {
        &self.container
    }
}

/// 优化装配工厂构建器
pub struct OptimizedAutowireFactoryBuilder<C: ?Sized> {
    container: Arc<C>,
    environment: Option<Arc<dyn RuntimeEnvironment>>,
    privileged: Arc<dyn PrivilegedExecutor>,
    switch: Option<Arc<OptimizationSwitch>>,
    exclusions: ExclusionPolicy,
    disable_optimizations: bool,
}

impl<C> OptimizedAutowireFactoryBuilder<C>
where
    C: AutowireContainer + ?Sized,
{
    /// 创建构建器，未指定开关时使用进程级优化开关
    pub fn new(container: Arc<C>) -> Self {
        Self {
            container,
            environment: None,
            privileged: Arc::new(NoSecurityPolicy),
            switch: None,
            exclusions: ExclusionPolicy::default(),
            disable_optimizations: false,
        }
    }

    /// 设置运行环境
    pub fn environment(mut self, environment: Arc<dyn RuntimeEnvironment>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// 应用配置：以配置创建运行环境，配置要求时关闭本工厂的优化开关
    ///
    /// 未指定开关时工厂使用独立的关闭状态开关，进程级开关保持不变。
    pub fn settings(mut self, settings: AutowireSettings) -> Self {
        self.disable_optimizations = settings.disable_autowire_by_name_optimizations;
        self.environment = Some(Arc::new(SystemEnvironment::new(settings)));
        self
    }

    /// 设置特权执行器
    pub fn privileged_executor(mut self, privileged: Arc<dyn PrivilegedExecutor>) -> Self {
        self.privileged = privileged;
        self
    }

    /// 使用独立的优化开关
    pub fn optimization_switch(mut self, switch: Arc<OptimizationSwitch>) -> Self {
        self.switch = Some(switch);
        self
    }

    /// 设置排除策略
    pub fn exclusions(mut self, exclusions: ExclusionPolicy) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// 构建工厂
    ///
    /// 热重载标志在构建时读取一次。
    pub fn build(self) -> OptimizedAutowireFactory<C> {
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(SystemEnvironment::default()) as Arc<dyn RuntimeEnvironment>);
        let switch = match self.switch {
            Some(switch) => {
                if self.disable_optimizations {
                    switch.set_disabled(true);
                }
                switch
            }
            None if self.disable_optimizations => Arc::new(OptimizationSwitch::new(true)),
            None => OptimizationSwitch::global(),
        };

        let reload_enabled = environment.is_reload_enabled();
        let cache = Arc::new(ClassPropertyCache::new());
        let resolver = PropertyResolver::new(
            Arc::clone(&self.container),
            Arc::clone(&cache),
            self.exclusions,
            Arc::clone(&self.privileged),
            reload_enabled,
        );
        let applier = ByNameAutowireApplier::new(Arc::clone(&self.container), self.privileged);

        info!(
            "构建优化自动装配工厂: reload_enabled={}, optimizations_disabled={}",
            reload_enabled,
            switch.is_disabled()
        );

        OptimizedAutowireFactory {
            container: self.container,
            environment,
            switch,
            cache,
            resolver,
            applier,
        }
    }
}
