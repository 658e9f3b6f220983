use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::Ix2;

impl Tensor {
    /// 矩阵乘法。只接受2阶张量，且前一个张量的列数须等于后一个张量的行数。
    pub fn mat_mul(&self, other: &Self) -> Result<Self, TensorError> {
        let shape_error = || TensorError::OperatorError {
            operator: Operator::MatMul,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        if self.dimension() != 2 || other.dimension() != 2 || self.shape()[1] != other.shape()[0]
        {
            return Err(shape_error());
        }

        let lhs = self
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| shape_error())?;
        let rhs = other
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| shape_error())?;
        Ok(Self {
            data: lhs.dot(&rhs).into_dyn(),
        })
    }
}
