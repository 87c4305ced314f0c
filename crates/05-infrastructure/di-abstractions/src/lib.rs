//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义按名称自动装配优化层所消费的容器能力。
//!
//! ## 核心接口
//!
//! - [`Bean`] - 可被装配的 bean 实例
//! - [`BeanFactory`] - 按名称查找 bean
//! - [`InstantiationStrategy`] - 实例化 bean 类型
//! - [`GeneralAutowirer`] - 通用（未优化）的自动装配路径
//! - [`RuntimeEnvironment`] - 初始化与热重载信号
//! - [`PrivilegedExecutor`] - 特权执行包装

pub mod bean;
pub mod container;
pub mod environment;
pub mod factory;
pub mod values;

pub use bean::*;
pub use container::*;
pub use environment::*;
pub use factory::*;
pub use values::*;
