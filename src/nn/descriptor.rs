/*
 * @Author       : 老董
 * @Date         : 2025-12-27
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 模块描述符（Module Descriptor）
 *                 模块树的可序列化摘要，用于检查点、日志与调试输出
 */

use super::Module;
use serde::{Deserialize, Serialize};

/// 模块树的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// `pretty_string()` 的输出
    pub summary: String,
    /// 是否处于训练模式
    pub train: bool,
    /// 扁平参数列表的描述
    pub params: Vec<ParamDescriptor>,
    /// 参数文件路径（相对于 JSON 文件），仅在保存完整模型时使用
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params_file: Option<String>,
}

/// 单个参数的描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// 在扁平参数列表中的下标
    pub index: usize,
    pub shape: Vec<usize>,
    pub calc_grad: bool,
}

impl ModuleDescriptor {
    /// 描述任意模块（Container 描述的是整棵子树的扁平参数）
    pub fn describe(module: &dyn Module) -> Self {
        let params = module
            .params()
            .iter()
            .enumerate()
            .map(|(index, param)| ParamDescriptor {
                index,
                shape: param.shape(),
                calc_grad: param.is_calc_grad(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            summary: module.pretty_string(),
            train: module.is_train(),
            params,
            params_file: None,
        }
    }

    /// 获取总参数量（元素个数）
    pub fn total_params(&self) -> usize {
        self.params
            .iter()
            .map(|p| p.shape.iter().product::<usize>())
            .sum()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
