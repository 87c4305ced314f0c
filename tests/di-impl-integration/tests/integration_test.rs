//! 默认容器与优化装配工厂的端到端测试

use di_abstractions::{
    AutowireMode, Bean, BeanFactory, BeanWrapper, GeneralAutowirer, PropertyValues,
};
use di_impl::{DefaultBeanContainer, OptimizedAutowireFactory, SystemEnvironment};
use infrastructure_common::{
    AutowireError, AutowireResult, AutowireSettings, BeanClass, BeanDefinition, BeanRef,
    OptimizationSwitch, PropertyDescriptor, PropertyType, WriteAccessor,
};
use serde_json::json;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 数据源
#[derive(Debug)]
struct DataSource {
    url: String,
}

/// 订单仓储，每次查找都是新实例
#[derive(Debug, Default)]
struct OrderRepository {
    data_source: Option<Arc<DataSource>>,
    table: Option<String>,
}

impl Bean for OrderRepository {
    fn bean_class(&self) -> BeanClass {
        BeanClass::of::<Self>()
    }

    fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
        Ok(vec![
            PropertyDescriptor::new("dataSource", PropertyType::reference::<DataSource>())
                .with_writer(WriteAccessor::typed(
                    "set_data_source",
                    |r: &mut OrderRepository, ds: Arc<DataSource>| {
                        r.data_source = Some(ds);
                        Ok(())
                    },
                )),
            PropertyDescriptor::new("table", PropertyType::Text).with_writer(WriteAccessor::typed(
                "set_table",
                |r: &mut OrderRepository, table: Arc<String>| {
                    r.table = Some(table.as_str().to_string());
                    Ok(())
                },
            )),
        ])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 订单服务
#[derive(Debug, Default)]
struct OrderService {
    repository: Option<Arc<DataSource>>,
    callbacks: Vec<String>,
    beans: HashMap<String, bool>,
}

impl Bean for OrderService {
    fn bean_class(&self) -> BeanClass {
        BeanClass::of::<Self>()
    }

    fn property_descriptors(&self) -> AutowireResult<Vec<PropertyDescriptor>> {
        Ok(vec![
            PropertyDescriptor::new("dataSource", PropertyType::reference::<DataSource>())
                .with_writer(WriteAccessor::typed(
                    "set_data_source",
                    |s: &mut OrderService, ds: Arc<DataSource>| {
                        s.repository = Some(ds);
                        Ok(())
                    },
                )),
            PropertyDescriptor::new("onCompleted", PropertyType::Callable).with_writer(
                WriteAccessor::typed("set_on_completed", |s: &mut OrderService, _: Arc<String>| {
                    s.callbacks.push("onCompleted".to_string());
                    Ok(())
                }),
            ),
            PropertyDescriptor::new("beanFactory", PropertyType::reference::<DefaultBeanContainer>())
                .declared_by("BeanFactoryAware")
                .with_writer(WriteAccessor::typed(
                    "set_bean_factory",
                    |s: &mut OrderService, _: Arc<DefaultBeanContainer>| {
                        s.beans.insert("beanFactory".to_string(), true);
                        Ok(())
                    },
                )),
        ])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn container() -> Arc<DefaultBeanContainer> {
    let container = DefaultBeanContainer::new();
    container.register_instance(
        "dataSource",
        DataSource {
            url: "postgres://localhost/orders".to_string(),
        },
    );
    container.register_instance("table", "orders".to_string());
    container.register_instance("onCompleted", "callback".to_string());
    container.register_instance("beanFactory", DefaultBeanContainer::new());
    container.register_prototype("orderRepository", || {
        Ok(Arc::new(OrderRepository::default()) as BeanRef)
    });
    container.register_constructor::<OrderRepository>();
    Arc::new(container)
}

fn factory(container: Arc<DefaultBeanContainer>) -> OptimizedAutowireFactory<DefaultBeanContainer> {
    OptimizedAutowireFactory::builder(container)
        .environment(Arc::new(SystemEnvironment::default()))
        .optimization_switch(Arc::new(OptimizationSwitch::new(false)))
        .build()
}

#[test]
fn test_prototype_population_then_apply() -> anyhow::Result<()> {
    init_test_logger();
    let container = container();
    let factory = factory(container.clone());
    let definition = BeanDefinition::prototype::<OrderRepository>("orderRepository");

    for _ in 0..3 {
        let mut repository = OrderRepository::default();
        let mut pvs = PropertyValues::new();
        factory.autowire_by_name_during_population(
            "orderRepository",
            &definition,
            &BeanWrapper::new(&repository),
            &mut pvs,
        )?;
        assert_eq!(pvs.names(), vec!["dataSource"]);

        container.apply_property_values(&mut repository, &pvs)?;
        let data_source = repository.data_source.as_ref().map(|ds| ds.url.as_str());
        assert_eq!(data_source, Some("postgres://localhost/orders"));
        assert!(repository.table.is_none());
    }

    assert_eq!(factory.property_cache().len(), 1);
    Ok(())
}

#[test]
fn test_ignored_types_and_interfaces_are_skipped() -> anyhow::Result<()> {
    init_test_logger();
    let container = container();
    let factory = factory(container.clone());

    let mut service = OrderService::default();
    factory.autowire_by_name(&mut service, false)?;

    assert!(service.repository.is_some());
    assert!(service.callbacks.is_empty());
    assert!(service.beans.is_empty());

    let props = factory.resolve_autowireable_properties(&service)?;
    assert_eq!(props.names(), vec!["dataSource"]);
    Ok(())
}

#[test]
fn test_general_container_matches_optimized_result() -> anyhow::Result<()> {
    init_test_logger();
    let container = container();
    let factory = factory(container.clone());

    let mut optimized = OrderService::default();
    factory.autowire_by_name(&mut optimized, false)?;

    let mut general = OrderService::default();
    container.autowire_bean_properties(&mut general, AutowireMode::ByName, false)?;

    assert_eq!(optimized.repository.is_some(), general.repository.is_some());
    assert_eq!(optimized.callbacks, general.callbacks);
    assert_eq!(optimized.beans, general.beans);
    Ok(())
}

#[test]
fn test_settings_from_configuration_section() -> anyhow::Result<()> {
    init_test_logger();
    let settings = AutowireSettings::from_section(json!({
        "environment": "development",
        "disable_autowire_by_name_optimizations": false
    }))?;
    assert!(settings.is_reload_enabled());

    let container = container();
    let factory = OptimizedAutowireFactory::builder(container)
        .optimization_switch(Arc::new(OptimizationSwitch::new(false)))
        .settings(settings)
        .build();

    let mut service = OrderService::default();
    factory.autowire_by_name(&mut service, false)?;
    factory.autowire_by_name(&mut service, false)?;

    assert!(factory.is_reload_enabled());
    assert!(factory.property_cache().is_empty());
    assert!(service.repository.is_some());
    Ok(())
}

#[test]
fn test_settings_from_environment_variables() -> anyhow::Result<()> {
    init_test_logger();
    let settings = AutowireSettings::from_vars(
        [
            ("ADSP_DI_DISABLE_AUTOWIRE_BY_NAME_OPTIMIZATIONS", "true"),
            ("ADSP_DI_ENVIRONMENT", "production"),
            ("PATH", "/usr/bin"),
        ]
        .map(|(key, value)| (key.to_string(), value.to_string())),
    )?;
    let switch = Arc::new(OptimizationSwitch::new(false));
    let factory = OptimizedAutowireFactory::builder(container())
        .optimization_switch(switch.clone())
        .settings(settings)
        .build();

    assert!(switch.is_disabled());
    assert!(!factory.is_reload_enabled());

    let mut service = OrderService::default();
    factory.autowire_by_name(&mut service, false)?;
    assert!(service.repository.is_some());
    assert!(factory.property_cache().is_empty());
    Ok(())
}

#[test]
fn test_dependency_check_uses_general_path() {
    init_test_logger();
    let container = Arc::new(DefaultBeanContainer::new());
    let factory = factory(container);

    let mut repository = OrderRepository::default();
    let err = factory.autowire_by_name(&mut repository, true).unwrap_err();

    assert!(matches!(
        err,
        AutowireError::UnsatisfiedDependency { ref property, .. } if property == "dataSource"
    ));
    assert!(factory.property_cache().is_empty());
}

#[test]
fn test_prototype_lookup_creates_new_instances() -> anyhow::Result<()> {
    let container = container();
    let first = container.get_bean("orderRepository")?;
    let second = container.get_bean("orderRepository")?;

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(first.downcast_ref::<OrderRepository>().is_some());
    assert!(container.get_bean("missing").is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_population_of_prototypes() -> anyhow::Result<()> {
    init_test_logger();
    let container = container();
    let shared = Arc::new(factory(container.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let shared = Arc::clone(&shared);
        let container = Arc::clone(&container);
        handles.push(tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
            let name = format!("orderRepository#{i}");
            let definition = BeanDefinition::prototype::<OrderRepository>(name.clone());
            let mut repository = OrderRepository::default();
            let mut pvs = PropertyValues::new();
            shared.autowire_by_name_during_population(
                &name,
                &definition,
                &BeanWrapper::new(&repository),
                &mut pvs,
            )?;
            container.apply_property_values(&mut repository, &pvs)?;
            Ok(repository.data_source.is_some())
        }));
    }

    for handle in handles {
        assert!(handle.await??);
    }
    assert_eq!(shared.property_cache().len(), 1);
    Ok(())
}
