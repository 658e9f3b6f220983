/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 负责神经网络模块树的组合：子模块所有权、参数扁平化与路由、train/eval 传播
 */

pub mod checkpoint;
mod container;
mod descriptor;
mod error;
pub mod layer;
mod module;
mod sequential;
mod variable;
mod wrapper;

pub use container::{Container, NO_PREVIOUS_MODULE};
pub use descriptor::{ModuleDescriptor, ParamDescriptor};
pub use error::ModuleError;
pub use layer::{Linear, ReLU};
pub use module::{Module, ModuleBase, UnaryModule, unary_forward};
pub use sequential::Sequential;
pub use variable::Variable;
pub use wrapper::{ModuleRef, ModuleRefMut, ModuleWrapper, SharedModule, share};

#[cfg(test)]
mod tests;
