/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 前向算子：由输入和初始状态，按参数缓冲区计算多层多步RNN
 *
 * 与多数算子一样分训练、推理两种：训练时额外产出reserve space供反向使用，故有一定性能开销。
 *
 * 流程：推导形状 → 分配输出 → 构建描述符 → 调用原语 → 释放本次调用的临时资源
 */

use super::RnnKernelCommon;
use crate::errors::{RnnError, TensorRole};
use crate::rnn::attrs::RnnAttrs;
use crate::rnn::backend::{ForwardArgs, MemoryView, MemoryViewMut, RnnBackend};
use crate::rnn::context::CallContext;
use crate::rnn::descriptor::{LayoutDescriptor, PropKind};
use crate::tensor::Tensor;

/// 前向算子的输入。`input_c`仅LSTM使用，其余模型忽略之
#[derive(Debug, Clone, Copy)]
pub struct ForwardInputs<'a> {
    pub input: &'a Tensor,
    pub input_h: &'a Tensor,
    pub input_c: &'a Tensor,
    pub params: &'a Tensor,
}

/// 前向算子的输出，个数固定为4
#[derive(Debug, Clone)]
pub struct ForwardOutputs {
    /// [seq_length, batch_size, dir_count * num_units]（2维输入时无序列轴）
    pub output: Tensor,
    /// 与input_h同形
    pub output_h: Tensor,
    /// LSTM时与input_h同形，否则为占位张量
    pub output_c: Tensor,
    /// 仅训练模式下非空，须原样交给配对的反向调用
    pub reserve_space: Tensor,
}

pub struct RnnForward<B: RnnBackend> {
    common: RnnKernelCommon,
    is_training: bool,
    backend: B,
}

impl<B: RnnBackend> RnnForward<B> {
    pub fn new(attrs: RnnAttrs, backend: B) -> Self {
        let is_training = attrs.is_training;
        Self {
            common: RnnKernelCommon::new(attrs),
            is_training,
            backend,
        }
    }

    pub fn is_training(&self) -> bool {
        self.is_training
    }

    pub fn compute(&self, inputs: ForwardInputs<'_>) -> Result<ForwardOutputs, RnnError> {
        let ForwardInputs {
            input,
            input_h,
            input_c,
            params,
        } = inputs;
        let has_input_c = self.common.has_input_c();

        // 1. 推导形状
        let (shapes, params_len) = self.common.resolve(input, input_h, input_c, params)?;

        // 2. 分配输出
        let mut output = Tensor::zeros(&shapes.output_shape);
        let mut output_h = Tensor::zeros(&shapes.hidden_state_shape);
        // 只有LSTM用到input_c与output_c，其他模型只给一个占位输出
        let mut output_c = if has_input_c {
            Tensor::zeros(&shapes.hidden_state_shape)
        } else {
            Tensor::empty()
        };

        // 3. 构建描述符
        let prop_kind = if self.is_training {
            PropKind::ForwardTraining
        } else {
            PropKind::ForwardInference
        };
        let desc = self.common.rnn_desc(prop_kind, &shapes, params_len);
        let layouts = &desc.layouts;

        let mut ctx = CallContext::acquire(&self.backend)?;
        ctx.build_forward(&desc)?;

        // 4. 训练时按原语给出的大小分配reserve space
        let (workspace_desc, mut reserve_space) = if self.is_training {
            let workspace_len = ctx.workspace_len()?;
            tracing::debug!(workspace_len, "RNN前向：分配reserve space");
            (
                Some(LayoutDescriptor::flat(workspace_len)),
                Tensor::zeros(&[workspace_len]),
            )
        } else {
            (None, Tensor::empty())
        };

        let cx = if has_input_c {
            Some(MemoryView::new(&layouts.hx, input_c, TensorRole::InputC)?)
        } else {
            None
        };
        let cy = if has_input_c {
            Some(MemoryViewMut::new(&layouts.hx, &mut output_c, TensorRole::OutputC)?)
        } else {
            None
        };
        let workspace = match &workspace_desc {
            Some(workspace_desc) => Some(MemoryViewMut::new(
                workspace_desc,
                &mut reserve_space,
                TensorRole::ReserveSpace,
            )?),
            None => None,
        };
        let args = ForwardArgs {
            x: MemoryView::new(&layouts.x, input, TensorRole::Input)?,
            hx: MemoryView::new(&layouts.hx, input_h, TensorRole::InputH)?,
            cx,
            weights: MemoryView::new(&layouts.weights, params, TensorRole::Params)?,
            y: MemoryViewMut::new(&layouts.y, &mut output, TensorRole::Output)?,
            hy: MemoryViewMut::new(&layouts.hx, &mut output_h, TensorRole::OutputH)?,
            cy,
            workspace,
        };
        ctx.execute_forward(args)?;

        // 5. 释放引擎与原语描述符
        drop(ctx);

        Ok(ForwardOutputs {
            output,
            output_h,
            output_c,
            reserve_space,
        })
    }
}
