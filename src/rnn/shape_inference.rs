/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 三个算子的形状推导：无需执行算子即可查询输出形状
 */

use super::attrs::RnnAttrs;
use super::shape::{Dim, DynamicShape};
use crate::errors::{RnnError, TensorRole};

/// 前向算子的输出形状
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardShapes {
    pub output: DynamicShape,
    pub output_h: DynamicShape,
    /// LSTM时与input_h同形，否则为占位形状`[0]`
    pub output_c: DynamicShape,
    /// 由外部原语决定，执行前未知（None）
    pub reserve_space: Option<DynamicShape>,
}

/// 反向算子的输出形状，与前向的各个输入一一对应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackwardShapes {
    pub input_backprop: DynamicShape,
    pub input_h_backprop: DynamicShape,
    pub input_c_backprop: DynamicShape,
    pub params_backprop: DynamicShape,
}

/// 尺寸查询算子的输出形状：长度为1的向量
pub fn infer_params_size_shape() -> DynamicShape {
    DynamicShape::fixed(&[1])
}

/// 推导前向输出形状
///
/// - 3维input → `[seq_length, batch_size, dir_count * num_units]`
/// - 2维input → `[batch_size, dir_count * num_units]`
/// - `output_h`与input_h同形；`output_c`仅LSTM时与input_h同形
pub fn infer_forward_shapes(
    attrs: &RnnAttrs,
    input: &DynamicShape,
    input_h: &DynamicShape,
) -> Result<ForwardShapes, RnnError> {
    if !matches!(input_h.ndim(), 2 | 3) {
        return Err(RnnError::InvalidArgument(format!(
            "{}须为2维或3维张量，实际形状为{}",
            TensorRole::InputH,
            input_h
        )));
    }
    let dir_count = attrs.direction.dir_count();
    // 2维与3维的input_h，num_units都在最后一维
    let output_size: Dim = input_h.last_dim().map(|num_units| num_units * dir_count);

    let output = match input.ndim() {
        3 => DynamicShape::new(&[input.dim(0), input.dim(1), output_size]),
        2 => DynamicShape::new(&[input.dim(0), output_size]),
        _ => {
            return Err(RnnError::InvalidArgument(format!(
                "{}须为2维或3维张量，实际形状为{}",
                TensorRole::Input,
                input
            )));
        }
    };

    let output_h = input_h.clone();
    let output_c = if attrs.model_types().has_cell_state() {
        input_h.clone()
    } else {
        DynamicShape::fixed(&[0])
    };

    Ok(ForwardShapes {
        output,
        output_h,
        output_c,
        reserve_space: None,
    })
}

/// 推导反向输出形状：各梯度与前向对应输入同形，非LSTM的`input_c_backprop`为占位形状`[0]`
pub fn infer_backward_shapes(
    attrs: &RnnAttrs,
    input: &DynamicShape,
    input_h: &DynamicShape,
    input_c: &DynamicShape,
    params: &DynamicShape,
) -> BackwardShapes {
    let input_c_backprop = if attrs.model_types().has_cell_state() {
        input_c.clone()
    } else {
        DynamicShape::fixed(&[0])
    };
    BackwardShapes {
        input_backprop: input.clone(),
        input_h_backprop: input_h.clone(),
        input_c_backprop,
        params_backprop: params.clone(),
    }
}
