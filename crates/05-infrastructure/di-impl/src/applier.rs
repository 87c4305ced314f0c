//! 按名称装配的写入器

use crate::cache::ResolvedProperties;
use di_abstractions::{with_privileges, Bean, BeanFactory, PrivilegedExecutor};
use infrastructure_common::{AutowireError, AutowireResult, PropertyType, PropertyWriteError};
use std::sync::Arc;
use tracing::debug;

/// 按名称装配写入器
///
/// 以属性名作为 bean 名查找依赖并写入目标实例。遇到第一个错误立即停止，
/// 已经写入的属性保持不变。
pub struct ByNameAutowireApplier<C: ?Sized> {
    container: Arc<C>,
    privileged: Arc<dyn PrivilegedExecutor>,
}

impl<C> ByNameAutowireApplier<C>
where
    C: BeanFactory + ?Sized,
{
    /// 创建写入器
    pub fn new(container: Arc<C>, privileged: Arc<dyn PrivilegedExecutor>) -> Self {
        Self {
            container,
            privileged,
        }
    }

    /// 将解析出的属性依次写入实例
    pub fn apply(&self, bean: &mut dyn Bean, properties: &ResolvedProperties) -> AutowireResult<()> {
        let bean_class = bean.bean_class().to_string();

        for property in properties {
            let name = property.name();
            let value = self
                .container
                .get_bean(name)
                .map_err(|e| AutowireError::InvocationFailure {
                    property: name.to_string(),
                    bean_class: bean_class.clone(),
                    source: Box::new(e),
                })?;

            let writer = property.write_accessor();
            with_privileges(self.privileged.as_ref(), || {
                writer.invoke(bean.as_any_mut(), Arc::clone(&value))
            })
            .map_err(|e| translate_write_error(name, &bean_class, property.declared_type(), e))?;

            debug!("已装配属性 '{}' (bean: {})", name, bean_class);
        }

        Ok(())
    }
}

/// 将写访问器的底层错误翻译为装配错误
///
/// 类型转换失败视为类型不匹配，其余都是调用失败。
pub(crate) fn translate_write_error(
    property: &str,
    bean_class: &str,
    declared_type: &PropertyType,
    error: PropertyWriteError,
) -> AutowireError {
    match error {
        PropertyWriteError::ClassCast { .. } | PropertyWriteError::TypeMismatch { .. } => {
            AutowireError::TypeMismatch {
                property: property.to_string(),
                bean_class: bean_class.to_string(),
                required_type: declared_type.to_string(),
                source: error,
            }
        }
        PropertyWriteError::IllegalAccess { .. } | PropertyWriteError::Raised(_) => {
            AutowireError::InvocationFailure {
                property: property.to_string(),
                bean_class: bean_class.to_string(),
                source: Box::new(error),
            }
        }
    }
}
