use std::cmp::PartialEq;

use crate::tensor::Tensor;

impl PartialEq<f32> for Tensor {
    fn eq(&self, other: &f32) -> bool {
        self.number().is_some_and(|x| x == *other)
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
