use crate::tensor::Tensor;

#[test]
fn test_compare_shapes() {
    let tensor1 = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    let tensor2 = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    assert!(tensor1.is_same_shape(&tensor2));

    let tensor3 = Tensor::new(&[1., 2., 3., 4.], &[4]);
    assert!(!tensor1.is_same_shape(&tensor3));
}

#[test]
fn test_dimension_and_size() {
    let tensor = Tensor::new(&[1.], &[]);
    assert_eq!(tensor.dimension(), 0);
    assert_eq!(tensor.size(), 1);

    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.size(), 6);
}

#[test]
fn test_is_scalar_and_number() {
    let scalar = Tensor::new(&[3.5], &[1, 1]);
    assert!(scalar.is_scalar());
    assert_eq!(scalar.number(), Some(3.5));
    assert_eq!(scalar, 3.5_f32);

    let vector = Tensor::new(&[1., 2.], &[2]);
    assert!(!vector.is_scalar());
    assert_eq!(vector.number(), None);
    assert_ne!(vector, 1.0_f32);
}

#[test]
fn test_can_broadcast_with() {
    let matrix = Tensor::zeros(&[4, 3]);
    assert!(matrix.can_broadcast_with(&Tensor::zeros(&[1, 3])));
    assert!(matrix.can_broadcast_with(&Tensor::zeros(&[3])));
    assert!(!matrix.can_broadcast_with(&Tensor::zeros(&[1, 2])));
}
