/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 融合多层RNN算子（rnn_relu/rnn_tanh/lstm/gru，单向/双向）：
 *                 参数尺寸计算、形状推导、前向/反向执行，循环计算本身委托给外部原语
 */

mod attrs;
mod backend;
pub(crate) mod context;
mod descriptor;
mod model_shapes;
mod model_types;
mod ops;
mod params_size;
mod shape;
mod shape_inference;

pub use attrs::RnnAttrs;
pub use backend::{BackwardArgs, ForwardArgs, MemoryView, MemoryViewMut, RnnBackend};
pub use descriptor::{DataType, LayoutDescriptor, MemoryFormat, PropKind, RnnDesc, RnnLayouts};
pub use model_shapes::ModelShapes;
pub use model_types::{DirectionMode, InputModeSetting, ModelTypes, RnnInputMode, RnnMode};
pub use ops::{
    BackwardInputs, BackwardOutputs, ForwardInputs, ForwardOutputs, RnnBackward, RnnForward,
    RnnParamsSize,
};
pub use params_size::{gate_multiplier, params_size};
pub use shape::{Dim, DynamicShape};
pub use shape_inference::{
    BackwardShapes, ForwardShapes, infer_backward_shapes, infer_forward_shapes,
    infer_params_size_shape,
};

#[cfg(test)]
mod tests;
