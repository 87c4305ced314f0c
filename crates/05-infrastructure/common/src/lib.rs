//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 依赖注入基础设施的公共数据模型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] / [`BeanClass`] - 类型身份与代理归一化
//! - [`PropertyDescriptor`] / [`PropertySetDescriptor`] - 属性内省模型
//! - [`BeanDefinition`] / [`Lifetime`] - bean 定义与生命周期
//! - [`AutowireSettings`] / [`OptimizationSwitch`] - 自动装配配置
//! - [`AutowireError`] - 自动装配错误分类

pub mod component;
pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;
pub mod property;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
pub use property::*;
