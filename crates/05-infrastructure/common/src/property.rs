//! 属性模型
//!
//! Bean 通过 [`PropertyDescriptor`] 暴露自身的可写属性，容器据此完成按名称装配。
//! Rust 没有运行时反射，写访问器以闭包形式由 Bean 自行提供。

use crate::errors::PropertyWriteError;
use crate::metadata::TypeInfo;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 容器中共享的 bean 实例
pub type BeanRef = Arc<dyn Any + Send + Sync>;

/// 写访问器的调用函数
pub type WriteFn =
    Arc<dyn Fn(&mut dyn Any, BeanRef) -> Result<(), PropertyWriteError> + Send + Sync>;

/// 属性的声明类型
///
/// 封闭的语义类型集合，[`PropertyType::is_simple`] 决定该属性是否值得交给容器注入。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// 布尔值
    Boolean,
    /// 字符
    Character,
    /// 整数
    Integer,
    /// 浮点数
    Float,
    /// 字符串
    Text,
    /// 枚举，携带枚举类型名
    Enum(String),
    /// 日期/时间
    DateTime,
    /// URI/URL
    Uri,
    /// 区域设置
    Locale,
    /// 类型令牌
    TypeToken,
    /// 数组
    Array(Box<PropertyType>),
    /// 集合
    Collection(Box<PropertyType>),
    /// 闭包/回调
    Callable,
    /// 对其他 bean 类型的引用
    Reference(TypeInfo),
}

impl PropertyType {
    /// 引用类型
    pub fn reference<T: 'static + ?Sized>() -> Self {
        Self::Reference(TypeInfo::of::<T>())
    }

    /// 数组类型
    pub fn array_of(element: PropertyType) -> Self {
        Self::Array(Box::new(element))
    }

    /// 集合类型
    pub fn collection_of(element: PropertyType) -> Self {
        Self::Collection(Box::new(element))
    }

    /// 简单类型永远不参与按名称装配
    pub fn is_simple(&self) -> bool {
        match self {
            Self::Boolean
            | Self::Character
            | Self::Integer
            | Self::Float
            | Self::Text
            | Self::Enum(_)
            | Self::DateTime
            | Self::Uri
            | Self::Locale
            | Self::TypeToken => true,
            Self::Array(element) => element.is_simple(),
            Self::Collection(_) | Self::Callable | Self::Reference(_) => false,
        }
    }

    /// 引用的类型信息
    pub fn type_info(&self) -> Option<&TypeInfo> {
        match self {
            Self::Reference(info) => Some(info),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("bool"),
            Self::Character => f.write_str("char"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("string"),
            Self::Enum(name) => write!(f, "enum {name}"),
            Self::DateTime => f.write_str("datetime"),
            Self::Uri => f.write_str("uri"),
            Self::Locale => f.write_str("locale"),
            Self::TypeToken => f.write_str("type"),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Collection(element) => write!(f, "collection<{element}>"),
            Self::Callable => f.write_str("callable"),
            Self::Reference(info) => write!(f, "{info}"),
        }
    }
}

/// 写方法可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// 公开
    Public,
    /// 受限，调用前必须先设置为可访问
    Restricted,
}

/// 写访问器
#[derive(Clone)]
pub struct WriteAccessor {
    method: String,
    visibility: Visibility,
    accessible: Arc<AtomicBool>,
    invoker: WriteFn,
}

impl WriteAccessor {
    /// 创建公开的写访问器
    pub fn new<F>(method: impl Into<String>, invoker: F) -> Self
    where
        F: Fn(&mut dyn Any, BeanRef) -> Result<(), PropertyWriteError> + Send + Sync + 'static,
    {
        Self {
            method: method.into(),
            visibility: Visibility::Public,
            accessible: Arc::new(AtomicBool::new(false)),
            invoker: Arc::new(invoker),
        }
    }

    /// 创建强类型写访问器
    ///
    /// 目标和值的向下转型失败都会报告为 [`PropertyWriteError::ClassCast`]。
    pub fn typed<T, V, F>(method: impl Into<String>, setter: F) -> Self
    where
        T: Any,
        V: Any + Send + Sync,
        F: Fn(&mut T, Arc<V>) -> Result<(), PropertyWriteError> + Send + Sync + 'static,
    {
        Self::new(method, move |target: &mut dyn Any, value: BeanRef| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(|| PropertyWriteError::ClassCast {
                    expected: std::any::type_name::<T>().to_string(),
                    actual: "incompatible target".to_string(),
                })?;
            let actual = value_type_id(&value);
            let value = value
                .downcast::<V>()
                .map_err(|_| PropertyWriteError::ClassCast {
                    expected: std::any::type_name::<V>().to_string(),
                    actual: format!("{actual:?}"),
                })?;
            setter(target, value)
        })
    }

    /// 标记为受限访问
    pub fn restricted(mut self) -> Self {
        self.visibility = Visibility::Restricted;
        self
    }

    /// 写方法名
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 可见性
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// 当前是否可以直接调用
    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Public || self.accessible.load(Ordering::Acquire)
    }

    /// 强制设置为可访问，对所有克隆生效
    pub fn set_accessible(&self) {
        self.accessible.store(true, Ordering::Release);
    }

    /// 调用写方法
    pub fn invoke(&self, target: &mut dyn Any, value: BeanRef) -> Result<(), PropertyWriteError> {
        if !self.is_accessible() {
            return Err(PropertyWriteError::IllegalAccess {
                method: self.method.clone(),
            });
        }
        (self.invoker)(target, value)
    }
}

impl fmt::Debug for WriteAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteAccessor")
            .field("method", &self.method)
            .field("visibility", &self.visibility)
            .field("accessible", &self.is_accessible())
            .field("invoker", &"<function>")
            .finish()
    }
}

fn value_type_id(value: &BeanRef) -> TypeId {
    let inner: &(dyn Any + Send + Sync) = &**value;
    inner.type_id()
}

/// 内省得到的属性描述
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    property_type: PropertyType,
    write: Option<WriteAccessor>,
    declaring_interface: Option<String>,
}

impl PropertyDescriptor {
    /// 创建只读属性描述
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            write: None,
            declaring_interface: None,
        }
    }

    /// 设置写访问器
    pub fn with_writer(mut self, write: WriteAccessor) -> Self {
        self.write = Some(write);
        self
    }

    /// 写方法由指定接口声明
    pub fn declared_by(mut self, interface: impl Into<String>) -> Self {
        self.declaring_interface = Some(interface.into());
        self
    }

    /// 属性名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明类型
    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    /// 写访问器
    pub fn write_accessor(&self) -> Option<&WriteAccessor> {
        self.write.as_ref()
    }

    /// 声明写方法的接口
    pub fn declaring_interface(&self) -> Option<&str> {
        self.declaring_interface.as_deref()
    }
}

/// 可按名称装配的属性
///
/// 只有存在写访问器、未被排除、且不是简单类型的属性才会出现在解析结果中。
#[derive(Debug, Clone)]
pub struct PropertySetDescriptor {
    name: String,
    declared_type: PropertyType,
    write: WriteAccessor,
}

impl PropertySetDescriptor {
    /// 从内省描述创建，没有写访问器时返回 `None`
    pub fn from_descriptor(descriptor: &PropertyDescriptor) -> Option<Self> {
        descriptor.write_accessor().map(|write| Self {
            name: descriptor.name().to_string(),
            declared_type: descriptor.property_type().clone(),
            write: write.clone(),
        })
    }

    /// 属性名，同时也是候选 bean 名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明类型
    pub fn declared_type(&self) -> &PropertyType {
        &self.declared_type
    }

    /// 写访问器
    pub fn write_accessor(&self) -> &WriteAccessor {
        &self.write
    }
}
