/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : ModuleWrapper - 子模块的所有权容器（空 / 独占 / 共享）
 *
 * | 持有方式 | Clone 行为 |
 * |---------|-----------|
 * | Empty   | 仍为 Empty |
 * | Unique  | 深拷贝（`Module::clone_module`），两个 wrapper 绝不指向同一实例 |
 * | Shared  | 共享同一实例，引用计数 +1 |
 *
 * Container 只通过本类型访问子模块，因此其余逻辑无需区分所有权。
 */

use super::Module;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// 共享的模块（如权重共享的层，或同时被容器内外引用的层）
///
/// 注意：同一实例若在一次 `forward` 中被重入借用（例如同一个共享模块在同一个 Sequential
/// 中注册了两次且其 `forward` 又访问了自己），`RefCell` 会 panic，这属于调用方错误。
pub type SharedModule = Rc<RefCell<Box<dyn Module>>>;

/// 把一个模块包装成共享模块
pub fn share<M: Module + 'static>(module: M) -> SharedModule {
    Rc::new(RefCell::new(Box::new(module)))
}

#[derive(Default)]
pub enum ModuleWrapper {
    #[default]
    Empty,
    Unique(Box<dyn Module>),
    Shared(SharedModule),
}

impl ModuleWrapper {
    pub fn unique<M: Module + 'static>(module: M) -> Self {
        Self::Unique(Box::new(module))
    }

    pub const fn shared(module: SharedModule) -> Self {
        Self::Shared(module)
    }

    /// 释放持有的模块，变为 Empty
    pub fn reset(&mut self) {
        *self = Self::Empty;
    }

    /// 非占有的只读访问；Empty 时返回 None
    pub fn get(&self) -> Option<ModuleRef<'_>> {
        match self {
            Self::Empty => None,
            Self::Unique(module) => Some(ModuleRef::Unique(module.as_ref())),
            Self::Shared(module) => Some(ModuleRef::Shared(module.borrow())),
        }
    }

    /// 非占有的可写访问；Empty 时返回 None
    pub fn get_mut(&mut self) -> Option<ModuleRefMut<'_>> {
        match self {
            Self::Empty => None,
            Self::Unique(module) => Some(ModuleRefMut::Unique(module.as_mut())),
            Self::Shared(module) => Some(ModuleRefMut::Shared(module.borrow_mut())),
        }
    }

    /// 是否持有模块
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    pub const fn is_unique(&self) -> bool {
        matches!(self, Self::Unique(_))
    }

    pub const fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// 转为共享持有并返回共享句柄
    ///
    /// - Unique：原地转换（只发生一次），之后的 clone 都是别名
    /// - Shared：返回已有句柄
    /// - Empty：返回 None
    pub fn make_shared(&mut self) -> Option<SharedModule> {
        if self.is_unique() {
            if let Self::Unique(module) = std::mem::take(self) {
                *self = Self::Shared(Rc::new(RefCell::new(module)));
            }
        }
        match self {
            Self::Shared(module) => Some(Rc::clone(module)),
            _ => None,
        }
    }
}

impl Clone for ModuleWrapper {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Unique(module) => Self::Unique(module.clone_module()),
            Self::Shared(module) => Self::Shared(Rc::clone(module)),
        }
    }
}

impl From<Box<dyn Module>> for ModuleWrapper {
    fn from(module: Box<dyn Module>) -> Self {
        Self::Unique(module)
    }
}

impl From<SharedModule> for ModuleWrapper {
    fn from(module: SharedModule) -> Self {
        Self::Shared(module)
    }
}

impl fmt::Debug for ModuleWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "ModuleWrapper::Empty"),
            Self::Unique(module) => f
                .debug_tuple("ModuleWrapper::Unique")
                .field(&module.pretty_string())
                .finish(),
            // 不借用共享模块，避免在其被可写借用期间打印时 panic
            Self::Shared(module) => f
                .debug_struct("ModuleWrapper::Shared")
                .field("strong_count", &Rc::strong_count(module))
                .finish(),
        }
    }
}

/// `ModuleWrapper::get` 返回的只读观察者
pub enum ModuleRef<'a> {
    Unique(&'a (dyn Module + 'static)),
    Shared(Ref<'a, Box<dyn Module>>),
}

impl Deref for ModuleRef<'_> {
    type Target = dyn Module;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Unique(module) => *module,
            Self::Shared(module) => module.as_ref(),
        }
    }
}

/// `ModuleWrapper::get_mut` 返回的可写观察者
pub enum ModuleRefMut<'a> {
    Unique(&'a mut (dyn Module + 'static)),
    Shared(RefMut<'a, Box<dyn Module>>),
}

impl Deref for ModuleRefMut<'_> {
    type Target = dyn Module;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Unique(module) => &**module,
            Self::Shared(module) => module.as_ref(),
        }
    }
}

impl DerefMut for ModuleRefMut<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::Unique(module) => &mut **module,
            Self::Shared(module) => module.as_mut(),
        }
    }
}
