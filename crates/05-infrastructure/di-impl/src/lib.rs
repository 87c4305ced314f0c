//! # 按名称自动装配优化
//!
//! 在通用依赖注入容器之上提供按名称装配的快速路径：
//!
//! - [`ClassPropertyCache`] - 以类型为键缓存可装配属性集合
//! - [`PropertyResolver`] - 内省类型并挑选可装配属性
//! - [`ByNameAutowireApplier`] - 按属性名查找 bean 并写入
//! - [`OptimizedAutowireFactory`] - 入口，失败时驱逐缓存并回退到通用容器
//! - [`DefaultBeanContainer`] - 不带缓存的通用容器实现

pub mod applier;
pub mod cache;
pub mod container;
pub mod environment;
pub mod exclusion;
pub mod factory;
pub mod resolver;

pub use applier::*;
pub use cache::*;
pub use container::*;
pub use environment::*;
pub use exclusion::*;
pub use factory::*;
pub use resolver::*;
