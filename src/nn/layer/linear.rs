/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : Linear (全连接) 层
 */

use crate::nn::{Module, ModuleBase, ModuleError, UnaryModule, Variable, unary_forward};
use crate::tensor::Tensor;

/// Linear (全连接) 层：`output = x @ W + b`
///
/// # 参数顺序
/// - `params()[0]`：权重 [in_features, out_features]
/// - `params()[1]`：偏置 [1, out_features]（可选）
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
#[derive(Debug)]
pub struct Linear {
    base: ModuleBase,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// 创建新的 Linear 层（权重 Kaiming 初始化，偏置零初始化）
    pub fn new(in_features: usize, out_features: usize, use_bias: bool) -> Self {
        let std = (2.0 / in_features.max(1) as f32).sqrt();
        let weights = Tensor::new_normal(0.0, std, &[in_features, out_features]);
        let bias = use_bias.then(|| Tensor::zeros(&[1, out_features]));
        Self::build(weights, bias, in_features, out_features)
    }

    /// 用给定的权重/偏置创建（便于复现与测试）
    pub fn from_tensors(weights: Tensor, bias: Option<Tensor>) -> Result<Self, ModuleError> {
        let shape = weights.shape().to_vec();
        let [in_features, out_features] = shape[..] else {
            return Err(ModuleError::InvalidArgument(format!(
                "Linear 权重须为 2 阶张量，实际形状为{shape:?}"
            )));
        };
        if let Some(ref bias) = bias {
            if bias.shape() != [1, out_features] {
                return Err(ModuleError::InvalidArgument(format!(
                    "Linear 偏置形状须为{:?}，实际为{:?}",
                    [1, out_features],
                    bias.shape()
                )));
            }
        }
        Ok(Self::build(weights, bias, in_features, out_features))
    }

    fn build(weights: Tensor, bias: Option<Tensor>, in_features: usize, out_features: usize) -> Self {
        let mut params = vec![Variable::new(weights, true)];
        if let Some(bias) = bias {
            params.push(Variable::new(bias, true));
        }
        Self {
            base: ModuleBase::new(params),
            in_features,
            out_features,
        }
    }

    pub const fn in_features(&self) -> usize {
        self.in_features
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn has_bias(&self) -> bool {
        self.base.len() > 1
    }
}

impl UnaryModule for Linear {
    fn forward_unary(&mut self, input: &Variable) -> Result<Variable, ModuleError> {
        let weights = self.base.param(0)?;
        // x @ W: [batch, in] @ [in, out] = [batch, out]
        let mut output = input.tensor().mat_mul(&weights.tensor())?;
        if self.has_bias() {
            output = output.try_add(&self.base.param(1)?.tensor())?;
        }
        let calc_grad = input.is_calc_grad() || self.params().iter().any(Variable::is_calc_grad);
        Ok(Variable::new(output, calc_grad))
    }
}

impl Module for Linear {
    fn base(&self) -> &ModuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModuleBase {
        &mut self.base
    }

    fn forward(&mut self, inputs: &[Variable]) -> Result<Vec<Variable>, ModuleError> {
        unary_forward(self, inputs)
    }

    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(Self {
            base: self.base.deep_copy(),
            in_features: self.in_features,
            out_features: self.out_features,
        })
    }

    fn pretty_string(&self) -> String {
        format!(
            "Linear ({}->{}) ({})",
            self.in_features,
            self.out_features,
            if self.has_bias() { "with bias" } else { "without bias" }
        )
    }
}
