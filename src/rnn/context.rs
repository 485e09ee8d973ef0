/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 单次调用的资源上下文：持有引擎与原语描述符，
 *                 无论成功还是中途出错，离开作用域时都按获取的逆序释放
 */

use super::backend::{BackwardArgs, ForwardArgs, RnnBackend};
use super::descriptor::{DataType, RnnDesc};
use crate::errors::RnnError;

pub(crate) struct CallContext<'b, B: RnnBackend> {
    backend: &'b B,
    backward_pd: Option<B::BackwardPd>,
    forward_pd: Option<B::ForwardPd>,
    engine: B::Engine,
}

impl<'b, B: RnnBackend> CallContext<'b, B> {
    pub(crate) fn acquire(backend: &'b B) -> Result<Self, RnnError> {
        let engine = backend.create_engine()?;
        tracing::trace!("RNN调用：已获取引擎");
        Ok(Self {
            backend,
            backward_pd: None,
            forward_pd: None,
            engine,
        })
    }

    pub(crate) fn build_forward(&mut self, desc: &RnnDesc) -> Result<(), RnnError> {
        tracing::debug!(prop_kind = ?desc.prop_kind, "RNN调用：构建前向原语描述符");
        self.forward_pd = Some(self.backend.forward_primitive_desc(&self.engine, desc)?);
        Ok(())
    }

    /// 须先以训练配置调用`build_forward`
    pub(crate) fn build_backward(&mut self, desc: &RnnDesc) -> Result<(), RnnError> {
        tracing::debug!("RNN调用：构建反向原语描述符");
        let forward_pd = self.forward_pd()?;
        let backward_pd = self
            .backend
            .backward_primitive_desc(&self.engine, desc, forward_pd)?;
        self.backward_pd = Some(backward_pd);
        Ok(())
    }

    /// reserve space的f32元素个数。字节数由前向原语描述符给出，不是4的倍数时向上取整
    pub(crate) fn workspace_len(&self) -> Result<usize, RnnError> {
        let workspace_size = self.backend.workspace_size(self.forward_pd()?);
        Ok(workspace_size.div_ceil(DataType::F32.size_in_bytes()))
    }

    pub(crate) fn execute_forward(&self, args: ForwardArgs<'_>) -> Result<(), RnnError> {
        self.backend
            .execute_forward(&self.engine, self.forward_pd()?, args)
    }

    pub(crate) fn execute_backward(&self, args: BackwardArgs<'_>) -> Result<(), RnnError> {
        let backward_pd = self.backward_pd.as_ref().ok_or_else(|| {
            RnnError::Primitive("反向原语描述符尚未构建。不该触及本错误，否则说明crate代码有问题".to_string())
        })?;
        self.backend
            .execute_backward(&self.engine, backward_pd, args)
    }

    fn forward_pd(&self) -> Result<&B::ForwardPd, RnnError> {
        self.forward_pd.as_ref().ok_or_else(|| {
            RnnError::Primitive("前向原语描述符尚未构建。不该触及本错误，否则说明crate代码有问题".to_string())
        })
    }
}

impl<B: RnnBackend> Drop for CallContext<'_, B> {
    fn drop(&mut self) {
        // 逆序释放：反向原语描述符 → 前向原语描述符 → 引擎（字段析构）
        if self.backward_pd.take().is_some() {
            tracing::trace!("RNN调用：已释放反向原语描述符");
        }
        if self.forward_pd.take().is_some() {
            tracing::trace!("RNN调用：已释放前向原语描述符");
        }
        tracing::trace!("RNN调用：释放引擎");
    }
}
