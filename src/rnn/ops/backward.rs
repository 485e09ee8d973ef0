/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 反向算子：计算RNN对输入、初始状态与参数缓冲区的梯度
 *
 * 形状推导与前向完全一致，以保证各梯度与前向对应张量对齐；
 * reserve space必须是配对的训练前向调用产出的那一份。
 */

use super::RnnKernelCommon;
use crate::errors::{RnnError, TensorRole};
use crate::rnn::attrs::RnnAttrs;
use crate::rnn::backend::{BackwardArgs, MemoryView, MemoryViewMut, RnnBackend};
use crate::rnn::context::CallContext;
use crate::rnn::descriptor::{LayoutDescriptor, PropKind};
use crate::tensor::Tensor;

/// 反向算子的输入
#[derive(Debug, Clone, Copy)]
pub struct BackwardInputs<'a> {
    pub input: &'a Tensor,
    pub input_h: &'a Tensor,
    pub input_c: &'a Tensor,
    pub params: &'a Tensor,
    /// 与前向的output同形
    pub output_backprop: &'a Tensor,
    /// 与前向的output_h同形
    pub output_h_backprop: &'a Tensor,
    /// LSTM时与前向的output_c同形，其余模型忽略
    pub output_c_backprop: &'a Tensor,
    pub reserve_space: &'a Tensor,
}

/// 反向算子的输出，各自与前向的对应输入同形
#[derive(Debug, Clone)]
pub struct BackwardOutputs {
    pub input_backprop: Tensor,
    pub input_h_backprop: Tensor,
    /// 非LSTM模型为占位张量
    pub input_c_backprop: Tensor,
    pub params_backprop: Tensor,
}

pub struct RnnBackward<B: RnnBackend> {
    common: RnnKernelCommon,
    backend: B,
}

impl<B: RnnBackend> RnnBackward<B> {
    /// `attrs.is_training`被忽略：反向总是训练配置
    pub fn new(attrs: RnnAttrs, backend: B) -> Self {
        Self {
            common: RnnKernelCommon::new(attrs),
            backend,
        }
    }

    pub fn compute(&self, inputs: BackwardInputs<'_>) -> Result<BackwardOutputs, RnnError> {
        let BackwardInputs {
            input,
            input_h,
            input_c,
            params,
            output_backprop,
            output_h_backprop,
            output_c_backprop,
            reserve_space,
        } = inputs;
        let has_input_c = self.common.has_input_c();

        // 1. 推导形状（与前向相同）
        let (shapes, params_len) = self.common.resolve(input, input_h, input_c, params)?;

        // 2. 校验梯度形状
        check_shape(
            output_backprop,
            &shapes.output_shape,
            TensorRole::OutputBackprop,
        )?;
        check_shape(
            output_h_backprop,
            &shapes.hidden_state_shape,
            TensorRole::OutputHBackprop,
        )?;
        if has_input_c {
            check_shape(
                output_c_backprop,
                &shapes.hidden_state_shape,
                TensorRole::OutputCBackprop,
            )?;
        }

        // 3. 分配输出梯度；params_backprop 清零，原语在其上累加
        let mut input_backprop = Tensor::zeros(input.shape());
        let mut input_h_backprop = Tensor::zeros(input_h.shape());
        let mut input_c_backprop = if has_input_c {
            Tensor::zeros(input_c.shape())
        } else {
            Tensor::empty()
        };
        let mut params_backprop = Tensor::zeros(params.shape());

        // 4. 前向原语描述符（训练配置，用于描述reserve space）+ 由其派生的反向原语描述符
        let forward_desc = self
            .common
            .rnn_desc(PropKind::ForwardTraining, &shapes, params_len);
        let backward_desc = self
            .common
            .rnn_desc(PropKind::Backward, &shapes, params_len);
        let layouts = &backward_desc.layouts;

        let mut ctx = CallContext::acquire(&self.backend)?;
        ctx.build_forward(&forward_desc)?;
        ctx.build_backward(&backward_desc)?;

        let workspace_desc = LayoutDescriptor::flat(ctx.workspace_len()?);

        // 5. 调用反向原语
        let (cx, diff_cy) = if has_input_c {
            (
                Some(MemoryView::new(&layouts.hx, input_c, TensorRole::InputC)?),
                Some(MemoryView::new(
                    &layouts.hx,
                    output_c_backprop,
                    TensorRole::OutputCBackprop,
                )?),
            )
        } else {
            (None, None)
        };
        let diff_cx = if has_input_c {
            Some(MemoryViewMut::new(
                &layouts.hx,
                &mut input_c_backprop,
                TensorRole::InputCBackprop,
            )?)
        } else {
            None
        };
        let args = BackwardArgs {
            x: MemoryView::new(&layouts.x, input, TensorRole::Input)?,
            hx: MemoryView::new(&layouts.hx, input_h, TensorRole::InputH)?,
            cx,
            diff_y: MemoryView::new(&layouts.y, output_backprop, TensorRole::OutputBackprop)?,
            diff_hy: MemoryView::new(&layouts.hx, output_h_backprop, TensorRole::OutputHBackprop)?,
            diff_cy,
            weights: MemoryView::new(&layouts.weights, params, TensorRole::Params)?,
            // 来自不匹配前向调用的reserve space在此因长度不符被拒绝
            workspace: MemoryView::new(&workspace_desc, reserve_space, TensorRole::ReserveSpace)?,
            diff_x: MemoryViewMut::new(&layouts.x, &mut input_backprop, TensorRole::InputBackprop)?,
            diff_hx: MemoryViewMut::new(
                &layouts.hx,
                &mut input_h_backprop,
                TensorRole::InputHBackprop,
            )?,
            diff_cx,
            diff_weights: MemoryViewMut::new(
                &layouts.weights,
                &mut params_backprop,
                TensorRole::ParamsBackprop,
            )?,
        };
        ctx.execute_backward(args)?;

        // 6. 释放引擎与原语描述符
        drop(ctx);

        Ok(BackwardOutputs {
            input_backprop,
            input_h_backprop,
            input_c_backprop,
            params_backprop,
        })
    }
}

fn check_shape(tensor: &Tensor, expected: &[usize], role: TensorRole) -> Result<(), RnnError> {
    if tensor.shape() != expected {
        return Err(RnnError::shape_mismatch(role, expected, tensor.shape()));
    }
    Ok(())
}
