/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : Layer 模块 - 几个具体的 Module 实现，用于演示与测试模块树
 */

mod linear;
mod relu;

pub use linear::Linear;
pub use relu::ReLU;
