/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 外部RNN原语的接入点
 *
 * 循环计算本身（门控、激活、梯度公式）由外部原语库实现，本库只负责：
 * - 按布局描述符创建原语描述符；
 * - 以不拥有数据的内存视图把宿主张量交给原语；
 * - 查询训练前向所需的reserve space字节数。
 *
 * 引擎与原语描述符等句柄的释放由各句柄类型的`Drop`负责。
 */

use super::descriptor::{LayoutDescriptor, RnnDesc};
use crate::errors::{RnnError, TensorRole};
use crate::tensor::Tensor;

/// 只读内存视图：描述符 + 借用的张量存储，不能比张量活得更久
#[derive(Debug, Clone, Copy)]
pub struct MemoryView<'a> {
    desc: &'a LayoutDescriptor,
    data: &'a [f32],
}

impl<'a> MemoryView<'a> {
    /// 张量的元素个数必须与描述符一致，否则返回`ShapeMismatch`
    pub fn new(
        desc: &'a LayoutDescriptor,
        tensor: &'a Tensor,
        role: TensorRole,
    ) -> Result<Self, RnnError> {
        if tensor.size() != desc.num_elements() {
            return Err(RnnError::shape_mismatch(role, &desc.dims, tensor.shape()));
        }
        Ok(Self {
            desc,
            data: tensor.data_as_slice()?,
        })
    }

    pub fn desc(&self) -> &LayoutDescriptor {
        self.desc
    }

    pub fn data(&self) -> &[f32] {
        self.data
    }
}

/// 可写内存视图，原语将结果直接写入宿主分配的输出张量
#[derive(Debug)]
pub struct MemoryViewMut<'a> {
    desc: &'a LayoutDescriptor,
    data: &'a mut [f32],
}

impl<'a> MemoryViewMut<'a> {
    pub fn new(
        desc: &'a LayoutDescriptor,
        tensor: &'a mut Tensor,
        role: TensorRole,
    ) -> Result<Self, RnnError> {
        if tensor.size() != desc.num_elements() {
            return Err(RnnError::shape_mismatch(role, &desc.dims, tensor.shape()));
        }
        Ok(Self {
            desc,
            data: tensor.data_as_slice_mut()?,
        })
    }

    pub fn desc(&self) -> &LayoutDescriptor {
        self.desc
    }

    pub fn data(&self) -> &[f32] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut *self.data
    }
}

/// 前向原语的参数。`cx`/`cy`仅LSTM有；`workspace`仅训练模式有
#[derive(Debug)]
pub struct ForwardArgs<'a> {
    pub x: MemoryView<'a>,
    pub hx: MemoryView<'a>,
    pub cx: Option<MemoryView<'a>>,
    pub weights: MemoryView<'a>,
    pub y: MemoryViewMut<'a>,
    pub hy: MemoryViewMut<'a>,
    pub cy: Option<MemoryViewMut<'a>>,
    pub workspace: Option<MemoryViewMut<'a>>,
}

/// 反向原语的参数。`diff_weights`须在调用前清零，原语在其上累加
#[derive(Debug)]
pub struct BackwardArgs<'a> {
    pub x: MemoryView<'a>,
    pub hx: MemoryView<'a>,
    pub cx: Option<MemoryView<'a>>,
    pub diff_y: MemoryView<'a>,
    pub diff_hy: MemoryView<'a>,
    pub diff_cy: Option<MemoryView<'a>>,
    pub weights: MemoryView<'a>,
    pub workspace: MemoryView<'a>,
    pub diff_x: MemoryViewMut<'a>,
    pub diff_hx: MemoryViewMut<'a>,
    pub diff_cx: Option<MemoryViewMut<'a>>,
    pub diff_weights: MemoryViewMut<'a>,
}

/// 外部RNN原语库
///
/// 每次调用：`create_engine` → `forward_primitive_desc`（反向再加`backward_primitive_desc`）
/// → `execute_*`，之后所有句柄按获取的逆序丢弃。
/// 原语调用是阻塞的；失败直接以`RnnError::Primitive`返回，本库不重试。
pub trait RnnBackend {
    type Engine;
    type ForwardPd;
    type BackwardPd;

    fn create_engine(&self) -> Result<Self::Engine, RnnError>;

    fn forward_primitive_desc(
        &self,
        engine: &Self::Engine,
        desc: &RnnDesc,
    ) -> Result<Self::ForwardPd, RnnError>;

    /// 反向原语描述符由训练配置的前向原语描述符派生
    fn backward_primitive_desc(
        &self,
        engine: &Self::Engine,
        desc: &RnnDesc,
        forward_hint: &Self::ForwardPd,
    ) -> Result<Self::BackwardPd, RnnError>;

    /// 训练前向所需的reserve space字节数，以此为准，本库不自行计算
    fn workspace_size(&self, forward_pd: &Self::ForwardPd) -> usize;

    fn execute_forward(
        &self,
        engine: &Self::Engine,
        forward_pd: &Self::ForwardPd,
        args: ForwardArgs<'_>,
    ) -> Result<(), RnnError>;

    fn execute_backward(
        &self,
        engine: &Self::Engine,
        backward_pd: &Self::BackwardPd,
        args: BackwardArgs<'_>,
    ) -> Result<(), RnnError>;
}

impl<B: RnnBackend + ?Sized> RnnBackend for &B {
    type Engine = B::Engine;
    type ForwardPd = B::ForwardPd;
    type BackwardPd = B::BackwardPd;

    fn create_engine(&self) -> Result<Self::Engine, RnnError> {
        (**self).create_engine()
    }

    fn forward_primitive_desc(
        &self,
        engine: &Self::Engine,
        desc: &RnnDesc,
    ) -> Result<Self::ForwardPd, RnnError> {
        (**self).forward_primitive_desc(engine, desc)
    }

    fn backward_primitive_desc(
        &self,
        engine: &Self::Engine,
        desc: &RnnDesc,
        forward_hint: &Self::ForwardPd,
    ) -> Result<Self::BackwardPd, RnnError> {
        (**self).backward_primitive_desc(engine, desc, forward_hint)
    }

    fn workspace_size(&self, forward_pd: &Self::ForwardPd) -> usize {
        (**self).workspace_size(forward_pd)
    }

    fn execute_forward(
        &self,
        engine: &Self::Engine,
        forward_pd: &Self::ForwardPd,
        args: ForwardArgs<'_>,
    ) -> Result<(), RnnError> {
        (**self).execute_forward(engine, forward_pd, args)
    }

    fn execute_backward(
        &self,
        engine: &Self::Engine,
        backward_pd: &Self::BackwardPd,
        args: BackwardArgs<'_>,
    ) -> Result<(), RnnError> {
        (**self).execute_backward(engine, backward_pd, args)
    }
}
