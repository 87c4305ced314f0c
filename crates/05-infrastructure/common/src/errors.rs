//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置类型转换失败: {key}={value}")]
    TypeConversionError { key: String, value: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },
}

/// 写访问器调用失败
///
/// 写访问器本身只报告底层原因，由调用方翻译成 [`AutowireError`]。
#[derive(Error, Debug)]
pub enum PropertyWriteError {
    /// 访问器内部向下转型失败
    #[error("类型转换失败: 期望 {expected}, 实际 {actual}")]
    ClassCast { expected: String, actual: String },

    /// 访问器在调用前直接检测到类型不兼容
    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// 受限访问器尚未被设置为可访问
    #[error("写方法不可访问: {method}")]
    IllegalAccess { method: String },

    /// 访问器执行时抛出的领域错误
    #[error("{0}")]
    Raised(Box<dyn std::error::Error + Send + Sync>),
}

impl PropertyWriteError {
    /// 包装访问器内部抛出的错误
    pub fn raised(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Raised(error.into())
    }
}

/// 自动装配错误类型
#[derive(Error, Debug)]
pub enum AutowireError {
    #[error("属性 '{property}' 类型不匹配 (bean: {bean_class}): 需要 {required_type}, 原因: {source}")]
    TypeMismatch {
        property: String,
        bean_class: String,
        required_type: String,
        source: PropertyWriteError,
    },

    #[error("属性 '{property}' 写入失败 (bean: {bean_class}): {source}")]
    InvocationFailure {
        property: String,
        bean_class: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("没有名为 '{name}' 的 bean")]
    NoSuchBean { name: String },

    #[error("解析 {class} 的可装配属性失败: {message}")]
    ResolutionFailure { class: String, message: String },

    #[error("未满足的依赖: {bean_class} 的属性 '{property}'")]
    UnsatisfiedDependency { property: String, bean_class: String },

    #[error("容器错误: {source}")]
    Container {
        #[from]
        source: DependencyError,
    },
}

impl AutowireError {
    /// 创建 bean 不存在错误
    pub fn no_such_bean(name: impl Into<String>) -> Self {
        Self::NoSuchBean { name: name.into() }
    }

    /// 创建解析失败错误
    pub fn resolution_failure(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResolutionFailure {
            class: class.into(),
            message: message.into(),
        }
    }

    /// 出错的属性名（如果有）
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { property, .. }
            | Self::InvocationFailure { property, .. }
            | Self::UnsatisfiedDependency { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// 自动装配结果类型别名
pub type AutowireResult<T> = Result<T, AutowireError>;
