/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Module/Container 的错误类型
 */

use crate::errors::TensorError;
use thiserror::Error;

/// 模块树操作错误类型
///
/// 这些都是结构性错误（模型搭建或测试期间就应被发现），不存在可重试的瞬时故障。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModuleError {
    /// 子模块或参数下标越界
    #[error("{what}下标越界：index={index}，但长度仅为{len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// 调用约定不满足（如单值 forward 的输出个数不为 1、注册空模块）
    #[error("{0}")]
    InvalidArgument(String),
    /// 演示层内部的张量运算错误
    #[error(transparent)]
    Tensor(#[from] TensorError),
    /// 检查点读写失败
    #[error("检查点错误：{0}")]
    Checkpoint(String),
}
