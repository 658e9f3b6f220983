/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : nn 模块单元测试 + 测试用的 Mock 模块
 */

mod checkpoint;
mod layer_linear;

use crate::nn::{Module, ModuleBase, ModuleError, Variable};
use crate::tensor::Tensor;
use std::cell::Cell;
use std::rc::Rc;

/// 测试用模块
///
/// - 第 i 个参数的值为 `[base_value + i]`
/// - forward 对每个输入逐元素 +1（`num_outputs` 非空时改为输出指定个数的值）
/// - 记录 train/eval 被调用的次数（clone 出的实例共用计数器）
/// - `frozen` 为 true 时 train/eval 只改标志，不碰参数的梯度开关
#[derive(Debug)]
pub(super) struct Mock {
    base: ModuleBase,
    name: String,
    num_outputs: Option<usize>,
    frozen: bool,
    train_calls: Rc<Cell<usize>>,
    eval_calls: Rc<Cell<usize>>,
}

impl Mock {
    pub(super) fn new(name: &str, num_params: usize) -> Self {
        Self::with_base_value(name, num_params, 1.0)
    }

    pub(super) fn with_base_value(name: &str, num_params: usize, base_value: f32) -> Self {
        let params = (0..num_params)
            .map(|i| Variable::new(Tensor::new(&[base_value + i as f32], &[1]), true))
            .collect();
        Self {
            base: ModuleBase::new(params),
            name: name.to_string(),
            num_outputs: None,
            frozen: false,
            train_calls: Rc::new(Cell::new(0)),
            eval_calls: Rc::new(Cell::new(0)),
        }
    }

    pub(super) fn outputs(mut self, num_outputs: usize) -> Self {
        self.num_outputs = Some(num_outputs);
        self
    }

    pub(super) fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub(super) fn train_calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.train_calls)
    }

    pub(super) fn eval_calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.eval_calls)
    }
}

impl Module for Mock {
    fn base(&self) -> &ModuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModuleBase {
        &mut self.base
    }

    fn forward(&mut self, inputs: &[Variable]) -> Result<Vec<Variable>, ModuleError> {
        let outputs: Vec<Variable> = inputs
            .iter()
            .map(|x| Variable::new(x.tensor().map(|v| v + 1.0), x.is_calc_grad()))
            .collect();
        Ok(match self.num_outputs {
            Some(n) => outputs.into_iter().cycle().take(n).collect(),
            None => outputs,
        })
    }

    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(Self {
            base: self.base.deep_copy(),
            name: self.name.clone(),
            num_outputs: self.num_outputs,
            frozen: self.frozen,
            train_calls: Rc::clone(&self.train_calls),
            eval_calls: Rc::clone(&self.eval_calls),
        })
    }

    fn pretty_string(&self) -> String {
        format!("Mock({})", self.name)
    }

    fn train(&mut self) {
        self.train_calls.set(self.train_calls.get() + 1);
        if self.frozen {
            self.base.set_train_flag(true);
        } else {
            self.base.train();
        }
    }

    fn eval(&mut self) {
        self.eval_calls.set(self.eval_calls.get() + 1);
        if self.frozen {
            self.base.set_train_flag(false);
        } else {
            self.base.eval();
        }
    }
}

/// 标量参数
pub(super) fn scalar_param(value: f32) -> Variable {
    Variable::new(Tensor::new(&[value], &[1]), true)
}

/// 参数的标量值
pub(super) fn value_of(param: &Variable) -> f32 {
    param.tensor().number().expect("测试参数应为标量")
}
