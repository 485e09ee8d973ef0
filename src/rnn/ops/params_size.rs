/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 参数尺寸查询算子：由num_layers/num_units/input_size三个int32标量得到参数缓冲区长度
 */

use ndarray::{ArrayD, IxDyn};

use super::RnnKernelCommon;
use crate::errors::{RnnError, TensorRole};
use crate::rnn::attrs::RnnAttrs;
use crate::tensor::Tensor;

/// 返回RNN模型所需参数缓冲区的长度，之后的权重分配与初始化都应使用该长度。
/// 该长度描述的是外部原语的不透明布局，不应用于保存与恢复。
#[derive(Debug, Clone)]
pub struct RnnParamsSize {
    common: RnnKernelCommon,
}

impl RnnParamsSize {
    pub fn new(attrs: RnnAttrs) -> Self {
        Self {
            common: RnnKernelCommon::new(attrs),
        }
    }

    /// 输入均须为0阶int32张量；输出为形状`[1]`的int64张量
    pub fn compute(
        &self,
        num_layers: &ArrayD<i32>,
        num_units: &ArrayD<i32>,
        input_size: &ArrayD<i32>,
    ) -> Result<ArrayD<i64>, RnnError> {
        let num_layers = read_scalar(num_layers, TensorRole::NumLayers)?;
        let num_units = read_scalar(num_units, TensorRole::NumUnits)?;
        let input_size = read_scalar(input_size, TensorRole::InputSize)?;

        let size = self.params_size(num_layers, num_units, input_size)?;
        let size = i64::try_from(size).map_err(|_| {
            RnnError::InvalidArgument(format!("参数缓冲区长度{size}超出int64范围"))
        })?;
        Ok(ArrayD::from_elem(IxDyn(&[1]), size))
    }

    /// 按本算子的循环单元类型与方向计算参数缓冲区长度
    pub fn params_size(
        &self,
        num_layers: usize,
        num_units: usize,
        input_size: usize,
    ) -> Result<usize, RnnError> {
        self.common.params_len(num_layers, num_units, input_size)
    }

    /// 分配并初始化参数缓冲区：一维，长度恰为`params_size(...)`，
    /// 元素均匀取自`[-1/sqrt(num_units), 1/sqrt(num_units)]`，由`seed`/`seed2`决定
    pub fn init_params(
        &self,
        num_layers: usize,
        num_units: usize,
        input_size: usize,
    ) -> Result<Tensor, RnnError> {
        let len = self.params_size(num_layers, num_units, input_size)?;
        if len == 0 {
            return Ok(Tensor::empty());
        }
        let bound = 1. / (num_units as f32).sqrt();
        Ok(Tensor::new_random_seeded(
            -bound,
            bound,
            &[len],
            self.common.attrs().combined_seed(),
        ))
    }
}

fn read_scalar(tensor: &ArrayD<i32>, role: TensorRole) -> Result<usize, RnnError> {
    if tensor.ndim() != 0 {
        return Err(RnnError::InvalidArgument(format!(
            "{role}须为标量，实际形状为{:?}",
            tensor.shape()
        )));
    }
    let value = tensor.iter().next().copied().ok_or_else(|| {
        RnnError::InvalidArgument(format!("{role}须为标量，实际形状为{:?}", tensor.shape()))
    })?;
    usize::try_from(value)
        .map_err(|_| RnnError::InvalidArgument(format!("{role}不能为负数，实际为{value}")))
}
