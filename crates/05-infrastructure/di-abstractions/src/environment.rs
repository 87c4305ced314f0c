//! 运行环境与权限执行抽象

use infrastructure_common::PropertyWriteError;

/// 运行环境 trait
pub trait RuntimeEnvironment: Send + Sync {
    /// 系统是否仍在初始化
    fn is_initializing(&self) -> bool;

    /// 类型定义是否可能在运行时被重新加载
    fn is_reload_enabled(&self) -> bool;
}

/// 特权执行 trait
///
/// 写访问器调用和可访问性设置都通过它执行。
pub trait PrivilegedExecutor: Send + Sync {
    /// 是否启用了安全策略
    fn is_security_active(&self) -> bool;

    /// 以提升的权限执行操作
    fn run_privileged(
        &self,
        action: &mut dyn FnMut() -> Result<(), PropertyWriteError>,
    ) -> Result<(), PropertyWriteError>;
}

/// 未启用安全策略时直接执行
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecurityPolicy;

impl PrivilegedExecutor for NoSecurityPolicy {
    fn is_security_active(&self) -> bool {
        false
    }

    fn run_privileged(
        &self,
        action: &mut dyn FnMut() -> Result<(), PropertyWriteError>,
    ) -> Result<(), PropertyWriteError> {
        action()
    }
}

/// 需要时以特权执行操作，否则直接执行
pub fn with_privileges<F>(
    executor: &dyn PrivilegedExecutor,
    mut action: F,
) -> Result<(), PropertyWriteError>
where
    F: FnMut() -> Result<(), PropertyWriteError>,
{
    if executor.is_security_active() {
        executor.run_privileged(&mut action)
    } else {
        action()
    }
}
