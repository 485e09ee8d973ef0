/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 宿主张量：算子的输入、输出均以本结构体表示，底层存储为连续的ndarray数组
 */

use ndarray::{Array, IxDyn};
use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;

use crate::errors::TensorError;

mod property;


/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：形状为`[]`的张量是含1个元素的标量；形状为`[0]`的张量不含任何元素，
/// 算子用它作为占位输出（如非LSTM模型的`output_c`、推理模式下的`reserve_space`）。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，`data`的长度必须和`shape`中所有元素的乘积相等，否则返回错误
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .map(|data| Tensor { data })
            .map_err(|_| TensorError::IncompatibleShape {
                data_len: data.len(),
                shape: shape.to_vec(),
            })
    }

    /// 同`try_new`，但长度不一致时直接panic（便于测试和常量构造）
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{}", e),
        }
    }

    /// 创建一个所有元素为0的张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 不含任何元素的占位张量，形状为`[0]`
    pub fn empty() -> Tensor {
        Self::zeros(&[0])
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间。
    /// 相同的`seed`总是得到相同的张量。
    pub fn new_random_seeded(min: f32, max: f32, shape: &[usize], seed: u64) -> Tensor {
        let mut rng = StdRng::seed_from_u64(seed);
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(&mut rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }
}
