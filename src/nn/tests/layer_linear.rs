use crate::assert_err;
use crate::nn::{Linear, Module, ModuleError, ReLU, Variable};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_linear_new_shapes() {
    let linear = Linear::new(4, 3, true);
    assert_eq!(linear.in_features(), 4);
    assert_eq!(linear.out_features(), 3);
    assert!(linear.has_bias());

    let params = linear.params();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].shape(), vec![4, 3]);
    assert_eq!(params[1].shape(), vec![1, 3]);
    assert!(params[1].tensor().to_vec().iter().all(|&b| b == 0.));

    let no_bias = Linear::new(4, 3, false);
    assert_eq!(no_bias.num_params(), 1);
    assert_eq!(no_bias.pretty_string(), "Linear (4->3) (without bias)");
}

#[test]
fn test_linear_forward() {
    let weights = Tensor::new(&[0.5, -1., 1., 2., 0., 0.25], &[3, 2]);
    let bias = Tensor::new(&[0.1, 0.2], &[1, 2]);
    let mut linear = Linear::from_tensors(weights, Some(bias)).unwrap();

    let x = Variable::new(Tensor::new(&[1., 2., 4., -1., 0., 2.], &[2, 3]), false);
    let y = linear.forward(&[x]).unwrap();
    assert_eq!(y.len(), 1);
    assert_eq!(y[0].shape(), vec![2, 2]);

    // [1, 2, 4] @ W = [2.5, 4.0]；[-1, 0, 2] @ W = [-0.5, 1.5]
    let expected = [2.6_f32, 4.2, -0.4, 1.7];
    for (actual, expected) in y[0].tensor().to_vec().iter().zip(expected) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-6);
    }
}

#[test]
fn test_linear_rejects_wrong_arity() {
    let mut linear = Linear::new(2, 2, true);
    assert_err!(
        linear.forward(&[]),
        ModuleError::InvalidArgument("UnaryModule 只接受 1 个输入，实际收到 0 个")
    );

    let x = Variable::new(Tensor::zeros(&[1, 2]), false);
    assert_err!(
        linear.forward(&[x.clone(), x]),
        ModuleError::InvalidArgument("UnaryModule 只接受 1 个输入，实际收到 2 个")
    );
}

#[test]
fn test_linear_shape_mismatch_is_tensor_error() {
    let mut linear = Linear::new(3, 2, false);
    let x = Variable::new(Tensor::zeros(&[1, 2]), false);
    assert_err!(linear.forward(&[x]), ModuleError::Tensor(_));
}

#[test]
fn test_linear_from_tensors_validates() {
    assert_err!(
        Linear::from_tensors(Tensor::zeros(&[2, 2, 2]), None),
        ModuleError::InvalidArgument(_)
    );
    assert_err!(
        Linear::from_tensors(Tensor::zeros(&[2, 3]), Some(Tensor::zeros(&[1, 2]))),
        ModuleError::InvalidArgument(_)
    );
}

#[test]
fn test_linear_eval_and_clone() {
    let mut linear = Linear::new(2, 2, true);
    linear.eval();
    assert!(linear.params().iter().all(|p| !p.is_calc_grad()));

    let cloned = linear.clone_module();
    assert!(!cloned.is_train());
    assert!(!cloned.params()[0].ptr_eq(&linear.params()[0]));
    assert_eq!(cloned.params()[0].tensor(), linear.params()[0].tensor());
}

#[test]
fn test_relu() {
    let mut relu = ReLU::new();
    assert_eq!(relu.num_params(), 0);

    let x = Variable::new(Tensor::new(&[-1., 0., 2.], &[3]), true);
    let y = relu.forward(&[x]).unwrap();
    assert_eq!(y[0].tensor().to_vec(), vec![0., 0., 2.]);
    assert!(y[0].is_calc_grad());
}
