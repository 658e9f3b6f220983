//! # nn_container
//!
//! 神经网络模块树的组合与参数聚合引擎：
//! - `ModuleWrapper`：子模块既可独占也可与其他计算图共享
//! - `Container`：把整棵子树的参数扁平化为一个有序列表，并能把参数更新路由回所属子模块
//! - `Sequential`：按注册顺序串联子模块的前向计算
//!
//! 单线程、同步执行；张量数值计算与自动求导不在本库范围内。

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
