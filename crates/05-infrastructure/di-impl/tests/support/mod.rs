//! 测试夹具：带调用记录的容器和几个测试 bean

#![allow(dead_code)]

use di_abstractions::{
    AutowireMode, Aware, Bean, BeanFactory, BeanWrapper, GeneralAutowirer, InstantiationStrategy,
    PropertyValues,
};
use di_impl::{DefaultBeanContainer, OptimizedAutowireFactory, SystemEnvironment};
use infrastructure_common::{
    AutowireError, AutowireResult, BeanClass, BeanDefinition, BeanRef, OptimizationSwitch,
    PropertyDescriptor, PropertyType, PropertyWriteError, TypeInfo, WriteAccessor,
};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 被注入的依赖
#[derive(Debug, Default)]
pub struct Engine {
    pub model: &'static str,
}

/// 测试 bean：`engine` 可装配，`name` 是简单类型
#[derive(Debug, Default)]
pub struct Widget {
    pub engine: Option<Arc<Engine>>,
    pub name: Option<String>,
    pub introspections: Arc<AtomicUsize>,
}

impl Widget {
    pub fn with_counter(introspections: Arc<AtomicUsize>) -> Self {
        Self {
            introspections,
            ..Self::default()
        }
    }
}

pub fn widget_properties() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("engine", PropertyType::reference::<Engine>()).with_writer(
            WriteAccessor::typed("set_engine", |w: &mut Widget, engine: Arc<Engine>| {
                w.engine = Some(engine);
                Ok(())
            }),
        ),
        PropertyDescriptor::new("name", PropertyType::Text).with_writer(WriteAccessor::typed(
            "set_name",
            |w: &mut Widget, name: Arc<String>| {
                w.name = Some(name.as_str().to_string());
                Ok(())
            },
        )),
    ]
}

impl Bean for Widget {
    fn bean_class(&self) -> BeanClass {
        BeanClass::of::<Self>()
    }

    fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
        self.introspections.fetch_add(1, Ordering::SeqCst);
        Ok(widget_properties())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 子类化代理：写入委托给目标实例，自身不能安全内省
#[derive(Debug, Default)]
pub struct SubclassWidgetProxy {
    pub target: Widget,
}

/// 另一种代理机制生成的代理
#[derive(Debug, Default)]
pub struct InterfaceWidgetProxy {
    pub target: Widget,
}

macro_rules! widget_proxy {
    ($proxy:ty) => {
        impl Bean for $proxy {
            fn bean_class(&self) -> BeanClass {
                BeanClass::proxy::<$proxy, Widget>()
            }

            fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
                Err(AutowireError::resolution_failure(
                    stringify!($proxy),
                    "代理实例不能直接内省",
                ))
            }

            fn as_any(&self) -> &dyn Any {
                &self.target
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                &mut self.target
            }
        }
    };
}

widget_proxy!(SubclassWidgetProxy);
widget_proxy!(InterfaceWidgetProxy);

/// 具有三个引用属性的 bean，`beta` 的写方法可以被设置为失败若干次
#[derive(Debug, Default)]
pub struct Gadget {
    pub written: Vec<String>,
    pub beta_failures: Arc<AtomicUsize>,
}

impl Gadget {
    pub fn failing_beta(times: usize) -> Self {
        Self {
            written: Vec::new(),
            beta_failures: Arc::new(AtomicUsize::new(times)),
        }
    }
}

fn recording_writer(name: &'static str) -> WriteAccessor {
    WriteAccessor::typed(format!("set_{name}"), move |g: &mut Gadget, _: Arc<Engine>| {
        g.written.push(name.to_string());
        Ok(())
    })
}

impl Bean for Gadget {
    fn bean_class(&self) -> BeanClass {
        BeanClass::of::<Self>()
    }

    fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
        let failures = Arc::clone(&self.beta_failures);
        let beta = WriteAccessor::typed("set_beta", move |g: &mut Gadget, _: Arc<Engine>| {
            let remaining = failures.load(Ordering::SeqCst);
            if remaining > 0 {
                failures.store(remaining - 1, Ordering::SeqCst);
                return Err(PropertyWriteError::raised("beta setter failed"));
            }
            g.written.push("beta".to_string());
            Ok(())
        });

        Ok(vec![
            PropertyDescriptor::new("alpha", PropertyType::reference::<Engine>())
                .with_writer(recording_writer("alpha")),
            PropertyDescriptor::new("beta", PropertyType::reference::<Engine>()).with_writer(beta),
            PropertyDescriptor::new("gamma", PropertyType::reference::<Engine>())
                .with_writer(recording_writer("gamma")),
        ])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 感知容器的 bean
#[derive(Debug, Default)]
pub struct AwareWidget {
    pub inner: Widget,
}

impl Aware for AwareWidget {}

impl Bean for AwareWidget {
    fn bean_class(&self) -> BeanClass {
        BeanClass::of::<Self>()
    }

    fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
        self.inner.property_descriptors()
    }

    fn as_any(&self) -> &dyn Any {
        &self.inner
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.inner
    }

    fn as_aware(&self) -> Option<&dyn Aware> {
        Some(self)
    }
}

/// 记录调用情况的容器，委托给 [`DefaultBeanContainer`]
#[derive(Debug, Default)]
pub struct RecordingContainer {
    pub inner: DefaultBeanContainer,
    pub lookups: Mutex<Vec<String>>,
    pub failing_lookups: Mutex<HashSet<String>>,
    pub fallbacks: AtomicUsize,
    pub population_fallbacks: AtomicUsize,
}

impl RecordingContainer {
    pub fn with_engine() -> Arc<Self> {
        let container = Self::default();
        container.inner.register_instance("engine", Engine { model: "V8" });
        container.inner.register_constructor::<Widget>();
        Arc::new(container)
    }

    pub fn fail_lookup(&self, name: &str) {
        self.failing_lookups.lock().insert(name.to_string());
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::SeqCst)
    }

    pub fn population_fallbacks(&self) -> usize {
        self.population_fallbacks.load(Ordering::SeqCst)
    }
}

impl BeanFactory for RecordingContainer {
    fn contains_bean(&self, name: &str) -> bool {
        self.inner.contains_bean(name)
    }

    fn get_bean(&self, name: &str) -> AutowireResult<BeanRef> {
        self.lookups.lock().push(name.to_string());
        if self.failing_lookups.lock().contains(name) {
            return Err(AutowireError::no_such_bean(name));
        }
        self.inner.get_bean(name)
    }
}

impl InstantiationStrategy for RecordingContainer {
    fn instantiate(&self, class: &TypeInfo) -> AutowireResult<Box<dyn Bean>> {
        self.inner.instantiate(class)
    }
}

impl GeneralAutowirer for RecordingContainer {
    fn autowire_bean_properties(
        &self,
        bean: &mut dyn Bean,
        mode: AutowireMode,
        dependency_check: bool,
    ) -> AutowireResult<()> {
        self.fallbacks.fetch_add(1, Ordering::SeqCst);
        self.inner
            .autowire_bean_properties(bean, mode, dependency_check)
    }

    fn autowire_by_name(
        &self,
        bean_name: &str,
        definition: &BeanDefinition,
        wrapper: &BeanWrapper<'_>,
        pvs: &mut PropertyValues,
    ) -> AutowireResult<()> {
        self.population_fallbacks.fetch_add(1, Ordering::SeqCst);
        self.inner.autowire_by_name(bean_name, definition, wrapper, pvs)
    }

    fn is_excluded_from_dependency_check(&self, descriptor: &PropertyDescriptor) -> bool {
        self.inner.is_excluded_from_dependency_check(descriptor)
    }
}

/// 以独立开关和给定环境构建工厂
pub fn factory_with(
    container: Arc<RecordingContainer>,
    environment: Arc<SystemEnvironment>,
) -> OptimizedAutowireFactory<RecordingContainer> {
    OptimizedAutowireFactory::builder(container)
        .environment(environment)
        .optimization_switch(Arc::new(OptimizationSwitch::new(false)))
        .build()
}

/// 默认环境下的工厂
pub fn factory(container: Arc<RecordingContainer>) -> OptimizedAutowireFactory<RecordingContainer> {
    factory_with(container, Arc::new(SystemEnvironment::default()))
}

pub fn widget_key() -> TypeInfo {
    TypeInfo::of::<Widget>()
}
