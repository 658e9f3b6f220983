use crate::nn::{Module, ModuleBase, ModuleError, UnaryModule, Variable, unary_forward};

/// ReLU 激活，没有参数
#[derive(Debug, Default)]
pub struct ReLU {
    base: ModuleBase,
}

impl ReLU {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnaryModule for ReLU {
    fn forward_unary(&mut self, input: &Variable) -> Result<Variable, ModuleError> {
        Ok(Variable::new(
            input.tensor().map(|x| x.max(0.0)),
            input.is_calc_grad(),
        ))
    }
}

impl Module for ReLU {
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
        })
    }

    fn pretty_string(&self) -> String {
        "ReLU".to_string()
    }
}
