/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:20:11
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 张量：参数（Variable）所承载的数值。本库只关心参数的聚合与路由，
 *                 因此这里只保留演示层（Linear/ReLU）与检查点所需的最小运算集合。
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod eq;
    pub mod mat_mul;
}

mod print;
mod property;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；若为矩阵，`shape`可以是[n,m]。
    ///
    /// # Panics
    /// `data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let expected_len = shape.iter().product::<usize>();
        assert!(
            data.len() == expected_len,
            "{}",
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        );
        Self::from_raw(data.to_vec(), shape)
    }

    /// 全零张量
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 全一张量
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller）
    pub fn new_normal(mean: f32, std_dev: f32, shape: &[usize]) -> Self {
        let mut rng = rand::thread_rng();
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::from_raw(data, shape)
    }

    /// 逐元素映射，返回新张量
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }
}

// 私有方法
impl Tensor {
    fn from_raw(data: Vec<f32>, shape: &[usize]) -> Self {
        // 长度已由调用方保证
        let data = Array::from_shape_vec(IxDyn(shape), data).expect("数据长度须与形状一致");
        Self { data }
    }
}
