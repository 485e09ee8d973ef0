/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 交给外部原语的描述符：张量内存布局描述符与RNN原语描述符
 *                 两者都可序列化为JSON，便于调试输出
 */

use serde::{Deserialize, Serialize};

use super::model_shapes::ModelShapes;
use super::model_types::{DirectionMode, RnnInputMode, RnnMode};

/// 元素类型（目前只有f32）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    F32,
}

impl DataType {
    pub const fn size_in_bytes(&self) -> usize {
        match self {
            Self::F32 => std::mem::size_of::<f32>(),
        }
    }
}

/// 内存排布
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryFormat {
    /// 序列 × 批 × 特征（行优先）
    Rnx,
    /// 一维扁平缓冲区
    X,
}

/// 张量内存布局描述符：维度、元素类型与排布
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub dims: Vec<usize>,
    pub data_type: DataType,
    pub format: MemoryFormat,
}

impl LayoutDescriptor {
    pub fn rnx(dims: [usize; 3]) -> Self {
        Self {
            dims: dims.to_vec(),
            data_type: DataType::F32,
            format: MemoryFormat::Rnx,
        }
    }

    pub fn flat(len: usize) -> Self {
        Self {
            dims: vec![len],
            data_type: DataType::F32,
            format: MemoryFormat::X,
        }
    }

    /// 描述的元素个数
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn byte_size(&self) -> usize {
        self.num_elements() * self.data_type.size_in_bytes()
    }
}

/// 一次调用的四个布局描述符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RnnLayouts {
    /// input: [seq_length, batch_size, input_size]
    pub x: LayoutDescriptor,
    /// input_h/input_c/output_h/output_c: [state_layers, batch_size, num_units]
    pub hx: LayoutDescriptor,
    /// output: [seq_length, batch_size, dir_count * num_units]
    pub y: LayoutDescriptor,
    /// params: [params_len]
    pub weights: LayoutDescriptor,
}

impl RnnLayouts {
    pub fn from_shapes(shapes: &ModelShapes, params_len: usize) -> Self {
        Self {
            x: LayoutDescriptor::rnx([shapes.seq_length, shapes.batch_size, shapes.input_size]),
            hx: LayoutDescriptor::rnx([
                shapes.state_layers(),
                shapes.batch_size,
                shapes.num_units,
            ]),
            y: LayoutDescriptor::rnx([
                shapes.seq_length,
                shapes.batch_size,
                shapes.dir_count * shapes.num_units,
            ]),
            weights: LayoutDescriptor::flat(params_len),
        }
    }
}

/// 传播类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    ForwardTraining,
    ForwardInference,
    Backward,
}

/// RNN原语描述符：外部原语据此创建前向或反向原语
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RnnDesc {
    pub prop_kind: PropKind,
    pub rnn_mode: RnnMode,
    pub direction: DirectionMode,
    pub input_mode: RnnInputMode,
    pub num_units: usize,
    pub num_layers: usize,
    pub seq_length: usize,
    pub state_outputs: usize,
    /// 透传配置，本库不解释
    pub dropout: f32,
    pub seed: u64,
    pub layouts: RnnLayouts,
}

impl RnnDesc {
    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
