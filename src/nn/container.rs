/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Container - 持有一组子模块及整棵子树的扁平参数列表
 *
 * 扁平参数列表 `params` 的顺序完全由注册顺序决定：
 * - `add*` 追加子模块时，依次追加该子模块的全部参数，并为每个参数记录
 *   “扁平下标 -> (子模块下标, 子模块内下标)”
 * - `add_param` 追加的是 Container 自己直接持有的参数（孤儿参数），不进索引表
 * - 子模块顺序只能通过 `add*`（追加）与 `clear`（整体清空）改变，
 *   因此扁平列表与索引表总是一起更新
 *
 * 不变式：索引表中的每个扁平下标，其 Variable 与对应子模块自身的参数是同一个句柄。
 */

use super::{Module, ModuleBase, ModuleError, ModuleWrapper, SharedModule, Variable};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// 孤儿参数出现在任何子模块之前时使用的“前一个子模块下标”
pub const NO_PREVIOUS_MODULE: isize = -1;

/// 子模块容器
///
/// 本身不定义 `forward`：Sequential 等具体容器在其上实现计算逻辑。
///
/// # 使用示例
/// ```ignore
/// let mut container = Container::new();
/// container.add(Linear::new(4, 3, true));          // 独占
/// container.add_shared(share(embedding));          // 与外部共享
/// container.add_param(Variable::new(scale, true)); // 容器自己的参数
/// assert_eq!(container.params().len(), 2 + n + 1);
/// ```
#[derive(Debug, Default)]
pub struct Container {
    base: ModuleBase,
    modules: Vec<ModuleWrapper>,
    // 扁平参数下标 -> (子模块下标, 子模块内参数下标)
    child_param_idx: HashMap<usize, (usize, usize)>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 注册 ====================

    /// 以独占方式添加子模块
    pub fn add<M: Module + 'static>(&mut self, module: M) {
        self.add_boxed(Box::new(module));
    }

    pub fn add_boxed(&mut self, module: Box<dyn Module>) {
        let child_params = module.params();
        self.register(ModuleWrapper::Unique(module), child_params);
    }

    /// 以共享方式添加子模块，调用方仍可通过自己的句柄访问它
    pub fn add_shared(&mut self, module: SharedModule) {
        let child_params = module.borrow().params();
        self.register(ModuleWrapper::Shared(module), child_params);
    }

    /// 添加任意持有方式的子模块；空的 wrapper 会被拒绝
    pub fn add_wrapper(&mut self, module: ModuleWrapper) -> Result<(), ModuleError> {
        let child_params = module.get().map(|m| m.params()).ok_or_else(|| {
            ModuleError::InvalidArgument("不能向 Container 添加空模块".to_string())
        })?;
        self.register(module, child_params);
        Ok(())
    }

    /// 添加 Container 自己直接持有的参数（孤儿参数）
    pub fn add_param(&mut self, param: Variable) {
        trace!(index = self.base.len(), "Container 添加孤儿参数");
        self.base.push(param);
    }

    fn register(&mut self, module: ModuleWrapper, child_params: Vec<Variable>) {
        let module_idx = self.modules.len();
        debug!(
            module_idx,
            num_params = child_params.len(),
            shared = module.is_shared(),
            "Container 注册子模块"
        );
        for (local_idx, param) in child_params.into_iter().enumerate() {
            self.child_param_idx
                .insert(self.base.len(), (module_idx, local_idx));
            self.base.push(param);
        }
        self.modules.push(module);
    }

    /// 清空子模块、扁平参数与索引表
    pub fn clear(&mut self) {
        debug!(num_modules = self.modules.len(), "Container 清空");
        self.child_param_idx.clear();
        self.modules.clear();
        self.base.clear();
    }

    // ==================== 访问 ====================

    pub fn module(&self, index: usize) -> Result<&ModuleWrapper, ModuleError> {
        self.modules.get(index).ok_or(ModuleError::IndexOutOfRange {
            what: "子模块",
            index,
            len: self.modules.len(),
        })
    }

    /// 子模块列表的快照（按 wrapper 的 Clone 语义：独占的深拷贝，共享的取别名）
    pub fn modules(&self) -> Vec<ModuleWrapper> {
        self.modules.clone()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn child_param_idx(&self) -> &HashMap<usize, (usize, usize)> {
        &self.child_param_idx
    }

    pub fn base(&self) -> &ModuleBase {
        &self.base
    }

    pub(in crate::nn) fn base_mut(&mut self) -> &mut ModuleBase {
        &mut self.base
    }

    /// 整棵子树的扁平参数列表
    ///
    /// 属于子模块的下标直接从子模块读取，因此共享子模块被另一个容器改写参数后，
    /// 这里拿到的仍是子模块当前持有的那个 Variable。
    pub fn params(&self) -> Vec<Variable> {
        self.base
            .params()
            .iter()
            .enumerate()
            .map(|(i, cached)| self.child_param(i).unwrap_or_else(|| cached.clone()))
            .collect()
    }

    pub fn param(&self, position: usize) -> Result<Variable, ModuleError> {
        let cached = self.base.param(position)?;
        Ok(self.child_param(position).unwrap_or(cached))
    }

    // 扁平下标属于子模块且该子模块仍有此参数时，返回子模块当前的参数
    fn child_param(&self, position: usize) -> Option<Variable> {
        let &(module_idx, local_idx) = self.child_param_idx.get(&position)?;
        self.modules
            .get(module_idx)?
            .get()?
            .param(local_idx)
            .ok()
    }

    pub fn is_train(&self) -> bool {
        self.base.is_train()
    }

    // ==================== 模式与参数写入 ====================

    /// 切换到训练模式，见 `set_mode`
    pub fn train(&mut self) {
        self.set_mode(true);
    }

    /// 切换到评估模式，见 `set_mode`
    pub fn eval(&mut self) {
        self.set_mode(false);
    }

    /// 只改孤儿参数的梯度开关，子模块的参数由子模块自己处理；
    /// 每个子模块按注册顺序恰好调用一次
    fn set_mode(&mut self, train: bool) {
        debug!(train, num_modules = self.modules.len(), "Container 切换模式");
        self.base.set_train_flag(train);

        for (i, param) in self.base.params().iter().enumerate() {
            if !self.child_param_idx.contains_key(&i) {
                param.set_calc_grad(train);
            }
        }

        for module in &mut self.modules {
            if let Some(mut module) = module.get_mut() {
                if train {
                    module.train();
                } else {
                    module.eval();
                }
            }
        }
    }

    /// 替换扁平列表中`position`处的参数；若该位置属于某个子模块，同步写入该子模块
    ///
    /// 先写子模块、后写扁平列表：任何一步校验失败时两边都保持原样。
    pub fn set_params(&mut self, var: Variable, position: usize) -> Result<(), ModuleError> {
        if position >= self.base.len() {
            return Err(ModuleError::IndexOutOfRange {
                what: "参数",
                index: position,
                len: self.base.len(),
            });
        }

        if let Some(&(module_idx, local_idx)) = self.child_param_idx.get(&position) {
            trace!(position, module_idx, local_idx, "参数写入路由到子模块");
            let len = self.modules.len();
            let mut module = self
                .modules
                .get_mut(module_idx)
                .and_then(ModuleWrapper::get_mut)
                .ok_or(ModuleError::IndexOutOfRange {
                    what: "子模块",
                    index: module_idx,
                    len,
                })?;
            module.set_params(var.clone(), local_idx)?;
        }
        self.base.set_params(var, position)
    }

    pub fn zero_grad(&self) {
        for param in self.params() {
            param.zero_grad();
        }
    }

    // ==================== 前向 ====================

    /// 对第`index`个子模块执行 forward（供具体容器组合使用）
    pub fn forward_child(
        &mut self,
        index: usize,
        inputs: &[Variable],
    ) -> Result<Vec<Variable>, ModuleError> {
        let len = self.modules.len();
        let mut module = self
            .modules
            .get_mut(index)
            .ok_or(ModuleError::IndexOutOfRange {
                what: "子模块",
                index,
                len,
            })?
            .get_mut()
            .ok_or_else(|| ModuleError::InvalidArgument(format!("第{index}个子模块为空")))?;
        module.forward(inputs)
    }

    // ==================== 孤儿参数 ====================

    /// 找出孤儿参数（不属于任何子模块的参数）
    ///
    /// 返回“前一个子模块下标 -> 孤儿参数扁平下标”的多重映射（同一键下按下标递增）。
    /// 出现在所有子模块之前的孤儿参数挂在 `NO_PREVIOUS_MODULE`（-1）下。
    ///
    /// 扫描时遇到索引表中的键就整段跳过该子模块的全部参数。
    pub fn get_orphaned_params_idx_map(&self) -> BTreeMap<isize, Vec<usize>> {
        let mut prev_module_idx = NO_PREVIOUS_MODULE;
        let mut orphaned: BTreeMap<isize, Vec<usize>> = BTreeMap::new();

        let mut i = 0;
        while i < self.base.len() {
            match self.child_param_idx.get(&i) {
                Some(&(module_idx, _)) => {
                    prev_module_idx = module_idx as isize;
                    // 至少前进一步，防止共享子模块事后参数变少导致死循环
                    i += self.child_num_params(module_idx).max(1);
                }
                None => {
                    orphaned.entry(prev_module_idx).or_default().push(i);
                    i += 1;
                }
            }
        }
        orphaned
    }

    fn child_num_params(&self, module_idx: usize) -> usize {
        self.modules
            .get(module_idx)
            .and_then(ModuleWrapper::get)
            .map_or(0, |module| module.num_params())
    }

    // ==================== 深拷贝 ====================

    /// 深拷贝整个容器
    ///
    /// 每个子模块（无论独占还是共享）都深拷贝为独占子模块并重新注册；
    /// 孤儿参数深拷贝后插回它原先所跟随的子模块之后，扁平顺序保持不变。
    pub fn copy(&self) -> Self {
        let orphaned = self.get_orphaned_params_idx_map();
        let mut copy = Self::new();
        copy.base.set_train_flag(self.is_train());

        for module_idx in NO_PREVIOUS_MODULE..self.modules.len() as isize {
            if module_idx >= 0 {
                if let Some(module) = self.modules[module_idx as usize].get() {
                    copy.add_boxed(module.clone_module());
                }
            }
            for &param_idx in orphaned.get(&module_idx).into_iter().flatten() {
                copy.add_param(self.base.params()[param_idx].copy());
            }
        }
        copy
    }

    // ==================== 描述 ====================

    /// ` [input -> (0) -> (1) -> output]` 后接每个子模块的描述
    pub fn pretty_string(&self) -> String {
        let mut layout = String::from(" [input");
        for i in 0..self.modules.len() {
            layout.push_str(&format!(" -> ({i})"));
        }
        layout.push_str(" -> output]");
        for (i, module) in self.modules.iter().enumerate() {
            let description = module
                .get()
                .map_or_else(|| "<null>".to_string(), |m| m.pretty_string());
            layout.push_str(&format!("\n\t({i}): {description}"));
        }
        layout
    }
}
