/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Sequential - 按注册顺序串联子模块的 Container
 */

use super::{Container, Module, ModuleBase, ModuleError, ModuleWrapper, SharedModule, Variable};
use std::fmt;

/// 顺序容器：前一个子模块的输出就是后一个子模块的输入
///
/// # 使用示例
/// ```ignore
/// let mut model = Sequential::new()
///     .with(Linear::new(4, 8, true))
///     .with(ReLU::new())
///     .with(Linear::new(8, 2, true));
/// let y = model.forward_one(&x)?;
/// assert_eq!(model.params().len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct Sequential {
    container: Container,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加独占子模块
    pub fn with<M: Module + 'static>(mut self, module: M) -> Self {
        self.container.add(module);
        self
    }

    /// 链式添加共享子模块
    pub fn with_shared(mut self, module: SharedModule) -> Self {
        self.container.add_shared(module);
        self
    }

    pub fn add<M: Module + 'static>(&mut self, module: M) {
        self.container.add(module);
    }

    pub fn add_shared(&mut self, module: SharedModule) {
        self.container.add_shared(module);
    }

    pub fn add_wrapper(&mut self, module: ModuleWrapper) -> Result<(), ModuleError> {
        self.container.add_wrapper(module)
    }

    pub fn add_param(&mut self, param: Variable) {
        self.container.add_param(param);
    }

    pub const fn container(&self) -> &Container {
        &self.container
    }

    pub const fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// 单值前向：要求整条链最终恰好输出一个值
    pub fn forward_one(&mut self, input: &Variable) -> Result<Variable, ModuleError> {
        let output = self.forward(std::slice::from_ref(input))?;
        let num_outputs = output.len();
        match <[Variable; 1]>::try_from(output) {
            Ok([single]) => Ok(single),
            Err(_) => Err(ModuleError::InvalidArgument(format!(
                "Sequential 单值 forward 要求输出个数为 1，实际为 {num_outputs}"
            ))),
        }
    }

    /// `forward_one` 的别名
    pub fn call(&mut self, input: &Variable) -> Result<Variable, ModuleError> {
        self.forward_one(input)
    }
}

impl Module for Sequential {
    /// Container 缓存的扁平参数与模式标志
    ///
    /// 只供读取。参数请用 `params`/`param`，其中属于子模块的下标读的是子模块当前的参数。
    fn base(&self) -> &ModuleBase {
        self.container.base()
    }

    /// 注意：直接在返回值上调用 `train`/`eval`/`set_params` 会绕过孤儿参数的区分与子模块路由，
    /// 请改用 `Sequential` 自身的同名方法
    fn base_mut(&mut self) -> &mut ModuleBase {
        self.container.base_mut()
    }

    /// 依次调用每个子模块；没有子模块时原样返回输入
    fn forward(&mut self, inputs: &[Variable]) -> Result<Vec<Variable>, ModuleError> {
        let mut output = inputs.to_vec();
        for i in 0..self.container.len() {
            output = self.container.forward_child(i, &output)?;
        }
        Ok(output)
    }

    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(Self {
            container: self.container.copy(),
        })
    }

    fn pretty_string(&self) -> String {
        format!("Sequential{}", self.container.pretty_string())
    }

    fn params(&self) -> Vec<Variable> {
        self.container.params()
    }

    fn param(&self, position: usize) -> Result<Variable, ModuleError> {
        self.container.param(position)
    }

    fn set_params(&mut self, var: Variable, position: usize) -> Result<(), ModuleError> {
        self.container.set_params(var, position)
    }

    fn train(&mut self) {
        self.container.train();
    }

    fn eval(&mut self) {
        self.container.eval();
    }

    fn zero_grad(&self) {
        self.container.zero_grad();
    }
}

impl fmt::Display for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_string())
    }
}
