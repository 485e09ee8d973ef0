/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 三个算子：参数尺寸查询、前向、反向，以及它们共用的属性解析与形状校验
 */

mod backward;
mod forward;
mod params_size;

pub use backward::{BackwardInputs, BackwardOutputs, RnnBackward};
pub use forward::{ForwardInputs, ForwardOutputs, RnnForward};
pub use params_size::RnnParamsSize;

use super::attrs::RnnAttrs;
use super::descriptor::{PropKind, RnnDesc, RnnLayouts};
use super::model_shapes::ModelShapes;
use super::model_types::{InputModeSetting, ModelTypes};
use super::params_size::params_size;
use crate::errors::{RnnError, TensorRole};
use crate::tensor::Tensor;

/// 三个算子共用的部分：持有属性与解析后的模型类型（构造后只读）
#[derive(Debug, Clone)]
pub(crate) struct RnnKernelCommon {
    attrs: RnnAttrs,
    model_types: ModelTypes,
}

impl RnnKernelCommon {
    pub(crate) fn new(attrs: RnnAttrs) -> Self {
        if attrs.input_mode == InputModeSetting::AutoSelect {
            tracing::warn!(
                "input_mode=auto_select 被解析为 linear_input（即使 input_size == num_units 也不会选择 skip_input）"
            );
        }
        let model_types = attrs.model_types();
        Self { attrs, model_types }
    }

    pub(crate) fn attrs(&self) -> &RnnAttrs {
        &self.attrs
    }

    pub(crate) fn has_input_c(&self) -> bool {
        self.model_types.has_cell_state()
    }

    /// 参数缓冲区长度；`num_layers`为0或结果超出`usize`范围时返回`InvalidArgument`
    pub(crate) fn params_len(
        &self,
        num_layers: usize,
        num_units: usize,
        input_size: usize,
    ) -> Result<usize, RnnError> {
        if num_layers == 0 {
            return Err(RnnError::InvalidArgument(format!(
                "{}须≥1",
                TensorRole::NumLayers
            )));
        }
        params_size(
            self.model_types.rnn_mode(),
            self.model_types.dir_count(),
            input_size,
            num_units,
            num_layers,
        )
        .ok_or_else(|| {
            RnnError::InvalidArgument(format!(
                "参数缓冲区长度溢出：num_layers={num_layers}, num_units={num_units}, input_size={input_size}"
            ))
        })
    }

    /// 推导形状并校验参数缓冲区长度，返回形状与参数元素个数
    pub(crate) fn resolve(
        &self,
        input: &Tensor,
        input_h: &Tensor,
        input_c: &Tensor,
        params: &Tensor,
    ) -> Result<(ModelShapes, usize), RnnError> {
        let cell_shape = self.has_input_c().then(|| input_c.shape());
        let shapes =
            ModelShapes::resolve(&self.model_types, input.shape(), input_h.shape(), cell_shape)?;

        let params_len = self.params_len(shapes.num_layers, shapes.num_units, shapes.input_size)?;
        if params.size() != params_len {
            return Err(RnnError::shape_mismatch(
                TensorRole::Params,
                &[params_len],
                params.shape(),
            ));
        }
        Ok((shapes, params_len))
    }

    pub(crate) fn rnn_desc(
        &self,
        prop_kind: PropKind,
        shapes: &ModelShapes,
        params_len: usize,
    ) -> RnnDesc {
        RnnDesc {
            prop_kind,
            rnn_mode: self.model_types.rnn_mode(),
            direction: self.model_types.direction(),
            input_mode: self.model_types.input_mode(),
            num_units: shapes.num_units,
            num_layers: shapes.num_layers,
            seq_length: shapes.seq_length,
            state_outputs: 1,
            dropout: self.attrs.dropout,
            seed: self.attrs.combined_seed(),
            layouts: RnnLayouts::from_shapes(shapes, params_len),
        }
    }
}
