/*
 * @Description  : 检查点保存/加载测试
 */

use super::{Mock, scalar_param, value_of};
use crate::assert_err;
use crate::nn::checkpoint::{load_model, load_params, save_model, save_params};
use crate::nn::{Linear, Module, ModuleDescriptor, ModuleError, ReLU, Sequential, Variable};
use crate::tensor::Tensor;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nn_container_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn mlp() -> Sequential {
    Sequential::new()
        .with(Linear::new(3, 4, true))
        .with(ReLU::new())
        .with(Linear::new(4, 2, false))
}

#[test]
fn test_save_load_params_round_trip() {
    let path = temp_path("round_trip.bin");
    let mut source = mlp();
    source.add_param(scalar_param(0.25));
    save_params(&source, &path).unwrap();

    let mut target = mlp();
    target.add_param(scalar_param(0.0));
    let target_linear_weight = target
        .container()
        .module(0)
        .unwrap()
        .get()
        .unwrap()
        .param(0)
        .unwrap();
    load_params(&target, &path).unwrap();

    for (s, t) in source.params().iter().zip(target.params()) {
        assert_eq!(s.tensor(), t.tensor());
    }
    assert_eq!(value_of(&target.params()[3]), 0.25);
    // 通过共享句柄原地写入，子模块自身也能看到新值
    assert_eq!(target_linear_weight.tensor(), source.params()[0].tensor());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_params_count_mismatch() {
    let path = temp_path("count_mismatch.bin");
    save_params(&mlp(), &path).unwrap();

    let target = Sequential::new().with(Linear::new(3, 4, true));
    let before = target.params()[0].tensor();
    assert_err!(
        load_params(&target, &path),
        ModuleError::Checkpoint(msg) if msg.contains("参数个数不一致")
    );
    assert_eq!(target.params()[0].tensor(), before);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_params_shape_mismatch_writes_nothing() {
    let path = temp_path("shape_mismatch.bin");
    let source = Sequential::new()
        .with(Mock::new("a", 1))
        .with(Linear::new(3, 4, false));
    save_params(&source, &path).unwrap();

    let target = Sequential::new()
        .with(Mock::with_base_value("a", 1, -5.0))
        .with(Linear::new(4, 3, false));
    assert_err!(
        load_params(&target, &path),
        ModuleError::Checkpoint(msg) if msg.contains("形状不一致")
    );
    // 第 0 个参数形状一致，但也不会被写入
    assert_eq!(value_of(&target.params()[0]), -5.0);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_params_bad_magic() {
    let path = temp_path("bad_magic.bin");
    std::fs::write(&path, b"XXXX\x01\x00\x00\x00").unwrap();

    assert_err!(
        load_params(&mlp(), &path),
        ModuleError::Checkpoint("无效的参数文件：请确保使用 save_params() 保存的文件")
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_params_missing_file() {
    let path = temp_path("does_not_exist.bin");
    assert_err!(load_params(&mlp(), &path), ModuleError::Checkpoint(_));
}

#[test]
fn test_save_load_model() {
    let path = temp_path("model");
    let mut source = mlp();
    source.eval();
    save_model(&source, &path).unwrap();

    let json = std::fs::read_to_string(path.with_extension("json")).unwrap();
    let saved = ModuleDescriptor::from_json(&json).unwrap();
    assert_eq!(saved.params_file.as_deref(), Some("model.bin"));
    assert!(!saved.train);
    assert_eq!(saved.summary, source.pretty_string());

    let target = mlp();
    let descriptor = load_model(&target, &path).unwrap();
    assert_eq!(descriptor, saved);
    for (s, t) in source.params().iter().zip(target.params()) {
        assert_eq!(s.tensor(), t.tensor());
    }
    // 只恢复数值，不恢复梯度开关
    assert!(target.params().iter().all(Variable::is_calc_grad));

    std::fs::remove_file(path.with_extension("json")).ok();
    std::fs::remove_file(path.with_extension("bin")).ok();
}

#[test]
fn test_descriptor() {
    let mut model = mlp();
    model.add_param(Variable::new(Tensor::zeros(&[2, 2]), false));
    let descriptor = ModuleDescriptor::describe(&model);

    let shapes: Vec<Vec<usize>> = descriptor.params.iter().map(|p| p.shape.clone()).collect();
    assert_eq!(
        shapes,
        vec![vec![3, 4], vec![1, 4], vec![4, 2], vec![2, 2]]
    );
    assert_eq!(descriptor.total_params(), 12 + 4 + 8 + 4);
    assert!(!descriptor.params[3].calc_grad);
    assert_eq!(descriptor.params[3].index, 3);
    assert!(descriptor.params_file.is_none());

    let json = descriptor.to_json().unwrap();
    assert!(!json.contains("params_file"));
    assert_eq!(ModuleDescriptor::from_json(&json).unwrap(), descriptor);
}
