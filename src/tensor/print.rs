use crate::tensor::Tensor;
use std::fmt;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape = self.shape();
        if shape.len() > 2 && !self.is_scalar() {
            return write!(f, "<对于阶数大于二（rank>2）的张量（形状：{shape:?}）无法展示具体数据>");
        }

        let cols = shape.last().copied().unwrap_or(1).max(1);
        write!(f, "[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", if i % cols == 0 { ",\n " } else { ", " })?;
            }
            write!(f, "{value:8.4}")?;
        }
        write!(f, "]\n形状: {shape:?}")
    }
}
