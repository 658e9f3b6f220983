/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : Module trait 定义
 */

use super::{ModuleError, Variable};

/// 模块 trait
///
/// # 设计原则
/// - 每个模块都持有一个 `ModuleBase`（有序参数列表 + train/eval 标志），
///   trait 的默认实现全部落在它上面，叶子模块通常只需实现 `forward`/`clone_module`/`pretty_string`
/// - Container 类模块重写 `train`/`eval`/`set_params`，把调用向下路由到子模块
/// - `forward` 接收并返回一组 `Variable`，单输入单输出的模块请实现 `UnaryModule`
///
/// # 使用示例
///
/// ```ignore
/// use nn_container::nn::{Module, ModuleBase, ModuleError, Variable};
///
/// #[derive(Clone)]
/// struct Scale {
///     base: ModuleBase,
/// }
///
/// impl Module for Scale {
///     fn base(&self) -> &ModuleBase { &self.base }
///     fn base_mut(&mut self) -> &mut ModuleBase { &mut self.base }
///     fn forward(&mut self, inputs: &[Variable]) -> Result<Vec<Variable>, ModuleError> {
///         Ok(inputs.to_vec())
///     }
///     fn clone_module(&self) -> Box<dyn Module> {
///         Box::new(Self { base: self.base.deep_copy() })
///     }
///     fn pretty_string(&self) -> String { "Scale".to_string() }
/// }
/// ```
pub trait Module {
    fn base(&self) -> &ModuleBase;

    fn base_mut(&mut self) -> &mut ModuleBase;

    /// 前向计算
    fn forward(&mut self, inputs: &[Variable]) -> Result<Vec<Variable>, ModuleError>;

    /// 深拷贝：参数也会复制出新的存储
    fn clone_module(&self) -> Box<dyn Module>;

    /// 人类可读的描述（用于日志/调试）
    fn pretty_string(&self) -> String;

    /// 获取所有参数（共享句柄，按模块自身定义的顺序）
    ///
    /// 用于：
    /// - 优化器需要知道要更新哪些参数
    /// - 序列化/保存模型参数
    /// - Container 注册子模块时的参数扁平化
    fn params(&self) -> Vec<Variable> {
        self.base().params().to_vec()
    }

    fn param(&self, position: usize) -> Result<Variable, ModuleError> {
        self.base().param(position)
    }

    /// 替换`position`处的参数；越界时报错，不会新增参数
    fn set_params(&mut self, var: Variable, position: usize) -> Result<(), ModuleError> {
        self.base_mut().set_params(var, position)
    }

    /// 切换到训练模式：所有参数开启梯度计算
    fn train(&mut self) {
        self.base_mut().train();
    }

    /// 切换到评估模式：所有参数关闭梯度计算
    fn eval(&mut self) {
        self.base_mut().eval();
    }

    fn is_train(&self) -> bool {
        self.base().is_train()
    }

    /// 清空所有参数已累积的梯度
    fn zero_grad(&self) {
        for param in self.params() {
            param.zero_grad();
        }
    }

    /// 获取参数数量
    fn num_params(&self) -> usize {
        self.params().len()
    }
}

/// 单输入单输出的模块（如激活函数、Linear）
pub trait UnaryModule: Module {
    fn forward_unary(&mut self, input: &Variable) -> Result<Variable, ModuleError>;
}

/// 供 `UnaryModule` 实现 `Module::forward` 时使用：校验恰好一个输入
pub fn unary_forward<M>(module: &mut M, inputs: &[Variable]) -> Result<Vec<Variable>, ModuleError>
where
    M: UnaryModule + ?Sized,
{
    match inputs {
        [input] => Ok(vec![module.forward_unary(input)?]),
        _ => Err(ModuleError::InvalidArgument(format!(
            "UnaryModule 只接受 1 个输入，实际收到 {} 个",
            inputs.len()
        ))),
    }
}

/// 模块的公共状态：有序参数列表 + 训练模式标志
#[derive(Debug, Clone)]
pub struct ModuleBase {
    params: Vec<Variable>,
    train: bool,
}

impl Default for ModuleBase {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ModuleBase {
    /// 新模块默认处于训练模式
    pub const fn new(params: Vec<Variable>) -> Self {
        Self {
            params,
            train: true,
        }
    }

    pub fn params(&self) -> &[Variable] {
        &self.params
    }

    pub fn param(&self, position: usize) -> Result<Variable, ModuleError> {
        self.params
            .get(position)
            .cloned()
            .ok_or(ModuleError::IndexOutOfRange {
                what: "参数",
                index: position,
                len: self.params.len(),
            })
    }

    pub fn set_params(&mut self, var: Variable, position: usize) -> Result<(), ModuleError> {
        let len = self.params.len();
        let slot = self
            .params
            .get_mut(position)
            .ok_or(ModuleError::IndexOutOfRange {
                what: "参数",
                index: position,
                len,
            })?;
        *slot = var;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub const fn is_train(&self) -> bool {
        self.train
    }

    pub fn train(&mut self) {
        self.set_mode(true);
    }

    pub fn eval(&mut self) {
        self.set_mode(false);
    }

    /// 深拷贝所有参数（对应各模块 `clone_module` 的参数部分）
    pub fn deep_copy(&self) -> Self {
        Self {
            params: self.params.iter().map(Variable::copy).collect(),
            train: self.train,
        }
    }

    fn set_mode(&mut self, train: bool) {
        self.train = train;
        for param in &self.params {
            param.set_calc_grad(train);
        }
    }

    // ========== 仅供 Container 使用 ==========

    pub(in crate::nn) fn push(&mut self, param: Variable) {
        self.params.push(param);
    }

    pub(in crate::nn) fn clear(&mut self) {
        self.params.clear();
    }

    /// 只改标志，不碰参数（参数的梯度开关由 Container 按归属分别处理）
    pub(in crate::nn) const fn set_train_flag(&mut self, train: bool) {
        self.train = train;
    }
}
