/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Variable - 可训练参数句柄（数值 + 是否计算梯度）
 *
 * Container 的扁平参数列表与子模块自身的参数列表必须是“同一个”参数，
 * 所以 Variable 的 Clone 只复制句柄（Rc），深拷贝请用 `copy()`。
 */

use super::ModuleError;
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

struct VariableData {
    tensor: Tensor,
    calc_grad: bool,
    grad: Option<Tensor>,
}

/// 参数句柄
///
/// # 设计原则
/// - 持有 `Rc<RefCell<..>>`，clone 后的句柄共享同一份数值与梯度开关
/// - 单线程使用（`!Send`/`!Sync`），跨线程共享须由调用方自行同步
/// - 梯度的求导不在本库范围内，这里只负责存放与清空
///
/// # 使用示例
/// ```ignore
/// let w = Variable::new(Tensor::zeros(&[3, 2]), true);
/// let alias = w.clone();          // 同一个参数
/// let detached = w.copy();        // 独立的新参数
/// alias.set_calc_grad(false);
/// assert!(!w.is_calc_grad());
/// ```
#[derive(Clone)]
pub struct Variable {
    data: Rc<RefCell<VariableData>>,
}

impl std::fmt::Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Variable")
            .field("shape", &data.tensor.shape())
            .field("calc_grad", &data.calc_grad)
            .finish()
    }
}

impl Variable {
    pub fn new(tensor: Tensor, calc_grad: bool) -> Self {
        Self {
            data: Rc::new(RefCell::new(VariableData {
                tensor,
                calc_grad,
                grad: None,
            })),
        }
    }

    /// 深拷贝：新的存储，数值与梯度开关相同，不携带梯度
    pub fn copy(&self) -> Self {
        let data = self.data.borrow();
        Self::new(data.tensor.clone(), data.calc_grad)
    }

    /// 两个句柄是否指向同一个参数
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    // ==================== 数值 ====================

    /// 获取数值（克隆的 Tensor）
    pub fn tensor(&self) -> Tensor {
        self.data.borrow().tensor.clone()
    }

    /// 原地替换数值，所有别名句柄都能看到
    pub fn set_tensor(&self, tensor: Tensor) {
        self.data.borrow_mut().tensor = tensor;
    }

    pub fn shape(&self) -> Vec<usize> {
        self.data.borrow().tensor.shape().to_vec()
    }

    // ==================== 梯度 ====================

    pub fn is_calc_grad(&self) -> bool {
        self.data.borrow().calc_grad
    }

    /// 设置是否计算梯度；关闭时顺带丢弃已累积的梯度
    pub fn set_calc_grad(&self, calc_grad: bool) {
        let mut data = self.data.borrow_mut();
        data.calc_grad = calc_grad;
        if !calc_grad {
            data.grad = None;
        }
    }

    pub fn grad(&self) -> Option<Tensor> {
        self.data.borrow().grad.clone()
    }

    /// 累加梯度（供外部的求导/分布式同步模块写入）
    pub fn add_grad(&self, grad: &Tensor) -> Result<(), ModuleError> {
        let mut data = self.data.borrow_mut();
        if !data.calc_grad {
            return Err(ModuleError::InvalidArgument(
                "不能向 calc_grad=false 的参数累加梯度".to_string(),
            ));
        }
        if grad.shape() != data.tensor.shape() {
            return Err(ModuleError::InvalidArgument(format!(
                "梯度形状{:?}与参数形状{:?}不一致",
                grad.shape(),
                data.tensor.shape()
            )));
        }
        data.grad = Some(match data.grad.take() {
            Some(acc) => acc.try_add(grad)?,
            None => grad.clone(),
        });
        Ok(())
    }

    pub fn zero_grad(&self) {
        self.data.borrow_mut().grad = None;
    }
}
