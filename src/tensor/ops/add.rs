/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 张量的加法，支持 NumPy 风格的广播（broadcasting）。
 *                 Linear 层的 `x·W + b` 需要把形状为[1, out]的偏置广播到整个 batch。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::Add;

impl Tensor {
    /// 两个张量相加，形状无法广播时返回错误而不是panic
    pub fn try_add(&self, other: &Self) -> Result<Self, TensorError> {
        if !self.can_broadcast_with(other) {
            return Err(TensorError::OperatorError {
                operator: Operator::Add,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            });
        }
        Ok(Self {
            data: &self.data + &other.data,
        })
    }
}

impl<'b> Add<&'b Tensor> for &Tensor {
    type Output = Tensor;

    /// # Panics
    /// 如果形状不兼容（无法广播）
    fn add(self, other: &'b Tensor) -> Tensor {
        match self.try_add(other) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{e}"),
        }
    }
}
