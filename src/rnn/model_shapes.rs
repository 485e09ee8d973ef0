/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 由input/input_h（及input_c）的形状推导RNN模型的全部形状，前向与反向共用
 *
 * 布局约定:
 *   input:  [seq_length, batch_size, input_size]，或省略序列轴的 [batch_size, input_size]
 *   input_h: [num_layers * dir_count, batch_size, num_units]，或单层的 [batch_size, num_units]
 *   output: [seq_length, batch_size, dir_count * num_units]，阶数随input
 */

use serde::Serialize;

use super::model_types::{ModelTypes, RnnInputMode};
use crate::errors::{RnnError, TensorRole};

/// 描述一次调用的RNN模型形状，每次调用重新推导，不跨调用缓存
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelShapes {
    pub num_layers: usize,
    pub input_size: usize,
    pub num_units: usize,
    pub seq_length: usize,
    pub batch_size: usize,
    pub dir_count: usize,
    /// 概念上的3维输入形状（2维输入时补上长度为1的序列轴）
    pub input_shape: Vec<usize>,
    pub output_shape: Vec<usize>,
    pub hidden_state_shape: Vec<usize>,
}

impl ModelShapes {
    /// 推导并校验模型形状
    ///
    /// `cell_shape`为input_c的形状；仅当模型有细胞状态（LSTM）时才检查，此时它必须与input_h完全一致。
    pub fn resolve(
        model_types: &ModelTypes,
        input_shape: &[usize],
        hidden_shape: &[usize],
        cell_shape: Option<&[usize]>,
    ) -> Result<Self, RnnError> {
        // 1. input: T x N x F
        let (seq_length, batch_size, input_size) = match *input_shape {
            [batch_size, input_size] => (1, batch_size, input_size),
            [seq_length, batch_size, input_size] => (seq_length, batch_size, input_size),
            _ => {
                return Err(RnnError::InvalidArgument(format!(
                    "{}须为2维或3维张量，实际形状为{:?}",
                    TensorRole::Input,
                    input_shape
                )));
            }
        };

        let dir_count = model_types.dir_count();

        // 2. input_h: (L * dir_count) x N x num_units
        let (num_layers, num_units, hidden_state_shape) = match *hidden_shape {
            [_, num_units] => (1, num_units, vec![batch_size, num_units]),
            [layers_x_dirs, _, num_units] => {
                if layers_x_dirs % dir_count != 0 {
                    return Err(RnnError::InvalidArgument(format!(
                        "{}的首维{}不能被方向数{}整除，实际形状为{:?}",
                        TensorRole::InputH,
                        layers_x_dirs,
                        dir_count,
                        hidden_shape
                    )));
                }
                let num_layers = layers_x_dirs / dir_count;
                (
                    num_layers,
                    num_units,
                    vec![dir_count * num_layers, batch_size, num_units],
                )
            }
            _ => {
                return Err(RnnError::InvalidArgument(format!(
                    "{}须为2维或3维张量，实际形状为{:?}",
                    TensorRole::InputH,
                    hidden_shape
                )));
            }
        };
        if num_layers == 0 {
            return Err(RnnError::InvalidArgument(format!(
                "{}推导出的层数为0，实际形状为{:?}",
                TensorRole::InputH,
                hidden_shape
            )));
        }
        // batch_size 取自input，input_h须与之一致
        if hidden_shape != hidden_state_shape.as_slice() {
            return Err(RnnError::shape_mismatch(
                TensorRole::InputH,
                &hidden_state_shape,
                hidden_shape,
            ));
        }

        // 3. input_c: 与input_h同形
        if model_types.has_cell_state() {
            let cell_shape = cell_shape.unwrap_or(&[]);
            if cell_shape != hidden_shape {
                return Err(RnnError::shape_mismatch(
                    TensorRole::InputC,
                    hidden_shape,
                    cell_shape,
                ));
            }
        }

        if model_types.input_mode() == RnnInputMode::SkipInput && input_size != num_units {
            return Err(RnnError::InvalidArgument(format!(
                "skip_input 要求 input_size == num_units，实际为 {input_size} != {num_units}"
            )));
        }

        // 4. output: T x N x (dir_count * num_units)
        let output_shape = if input_shape.len() == 2 {
            vec![batch_size, dir_count * num_units]
        } else {
            vec![seq_length, batch_size, dir_count * num_units]
        };

        let shapes = Self {
            num_layers,
            input_size,
            num_units,
            seq_length,
            batch_size,
            dir_count,
            input_shape: vec![seq_length, batch_size, input_size],
            output_shape,
            hidden_state_shape,
        };
        tracing::debug!(
            desc = %shapes.rnn_desc_debug_string(),
            seq_length,
            batch_size,
            "RNN模型形状推导完成"
        );
        Ok(shapes)
    }

    /// 隐藏状态的“层×方向”数：3维input_h为其首维，2维input_h隐含为1
    pub fn state_layers(&self) -> usize {
        match self.hidden_state_shape.as_slice() {
            [layers_x_dirs, _, _] => *layers_x_dirs,
            _ => 1,
        }
    }

    /// 两者能否复用同一个原语描述符：只比较层数、输入维度、隐藏维度和方向数，
    /// `seq_length`与`batch_size`可以不同
    pub fn is_compatible_with(&self, rhs: &ModelShapes) -> bool {
        self.num_layers == rhs.num_layers
            && self.input_size == rhs.input_size
            && self.num_units == rhs.num_units
            && self.dir_count == rhs.dir_count
    }

    pub fn rnn_desc_debug_string(&self) -> String {
        format!(
            "[num_layers, input_size, num_units, dir_count]: [{}, {}, {}, {}]",
            self.num_layers, self.input_size, self.num_units, self.dir_count
        )
    }
}
