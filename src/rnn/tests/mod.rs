/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : RNN算子的单元测试，以及测试用的记录型外部原语：
 *                 按调用顺序记下创建/释放/执行事件，可在任一步注入失败，并以固定值填充输出
 */

mod forward;

use std::sync::{Arc, Mutex};

use super::{
    BackwardArgs, ForwardArgs, ForwardInputs, PropKind, RnnAttrs, RnnBackend, RnnDesc, RnnMode,
    RnnParamsSize,
};
use crate::errors::RnnError;
use crate::tensor::Tensor;

/// 注入失败的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FailPoint {
    Engine,
    ForwardPd,
    BackwardPd,
    ExecuteForward,
    ExecuteBackward,
}

pub(super) type EventLog = Arc<Mutex<Vec<String>>>;

/// 丢弃时记录一条释放事件的句柄
#[derive(Debug)]
pub(super) struct Handle {
    name: &'static str,
    events: EventLog,
}

impl Handle {
    fn new(name: &'static str, events: &EventLog) -> Self {
        events.lock().unwrap().push(format!("create {name}"));
        Self {
            name,
            events: Arc::clone(events),
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.events
            .lock()
            .unwrap()
            .push(format!("release {}", self.name));
    }
}

#[derive(Debug)]
pub(super) struct RecordedPd {
    _handle: Handle,
    desc: RnnDesc,
}

/// 记录型外部原语
///
/// - 前向：y全填1.0，hy/cy拷贝hx/cx，workspace全填7.0
/// - 反向：diff_x全填0.5，diff_hx/diff_cx拷贝diff_hy/diff_cy，diff_weights逐元素加1.0
#[derive(Debug, Default)]
pub(super) struct RecordingBackend {
    events: EventLog,
    descs: Arc<Mutex<Vec<RnnDesc>>>,
    workspace_bytes: usize,
    fail_at: Option<FailPoint>,
}

impl RecordingBackend {
    pub(super) fn new(workspace_bytes: usize) -> Self {
        Self {
            workspace_bytes,
            ..Self::default()
        }
    }

    pub(super) fn failing_at(mut self, fail_at: FailPoint) -> Self {
        self.fail_at = Some(fail_at);
        self
    }

    pub(super) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// 按创建顺序返回各原语描述符所用的RNN描述符
    pub(super) fn descs(&self) -> Vec<RnnDesc> {
        self.descs.lock().unwrap().clone()
    }

    fn check(&self, point: FailPoint) -> Result<(), RnnError> {
        if self.fail_at == Some(point) {
            self.events
                .lock()
                .unwrap()
                .push(format!("fail {point:?}"));
            return Err(RnnError::Primitive(format!("injected failure at {point:?}")));
        }
        Ok(())
    }

    fn record_pd(&self, name: &'static str, desc: &RnnDesc) -> RecordedPd {
        self.descs.lock().unwrap().push(desc.clone());
        RecordedPd {
            _handle: Handle::new(name, &self.events),
            desc: desc.clone(),
        }
    }
}

impl RnnBackend for RecordingBackend {
    type Engine = Handle;
    type ForwardPd = RecordedPd;
    type BackwardPd = RecordedPd;

    fn create_engine(&self) -> Result<Self::Engine, RnnError> {
        self.check(FailPoint::Engine)?;
        Ok(Handle::new("engine", &self.events))
    }

    fn forward_primitive_desc(
        &self,
        _engine: &Self::Engine,
        desc: &RnnDesc,
    ) -> Result<Self::ForwardPd, RnnError> {
        self.check(FailPoint::ForwardPd)?;
        Ok(self.record_pd("forward_pd", desc))
    }

    fn backward_primitive_desc(
        &self,
        _engine: &Self::Engine,
        desc: &RnnDesc,
        forward_hint: &Self::ForwardPd,
    ) -> Result<Self::BackwardPd, RnnError> {
        self.check(FailPoint::BackwardPd)?;
        assert_eq!(forward_hint.desc.prop_kind, PropKind::ForwardTraining);
        Ok(self.record_pd("backward_pd", desc))
    }

    fn workspace_size(&self, _forward_pd: &Self::ForwardPd) -> usize {
        self.workspace_bytes
    }

    fn execute_forward(
        &self,
        _engine: &Self::Engine,
        forward_pd: &Self::ForwardPd,
        mut args: ForwardArgs<'_>,
    ) -> Result<(), RnnError> {
        self.check(FailPoint::ExecuteForward)?;
        self.events.lock().unwrap().push(format!(
            "execute forward {:?} workspace={}",
            forward_pd.desc.prop_kind,
            args.workspace.is_some()
        ));
        args.y.data_mut().fill(1.);
        args.hy.data_mut().copy_from_slice(args.hx.data());
        if let (Some(cx), Some(cy)) = (&args.cx, &mut args.cy) {
            cy.data_mut().copy_from_slice(cx.data());
        }
        if let Some(workspace) = &mut args.workspace {
            workspace.data_mut().fill(7.);
        }
        Ok(())
    }

    fn execute_backward(
        &self,
        _engine: &Self::Engine,
        _backward_pd: &Self::BackwardPd,
        mut args: BackwardArgs<'_>,
    ) -> Result<(), RnnError> {
        self.check(FailPoint::ExecuteBackward)?;
        let zeroed = args.diff_weights.data().iter().all(|&w| w == 0.);
        self.events
            .lock()
            .unwrap()
            .push(format!("execute backward diff_weights_zeroed={zeroed}"));
        args.diff_x.data_mut().fill(0.5);
        args.diff_hx.data_mut().copy_from_slice(args.diff_hy.data());
        if let (Some(diff_cy), Some(diff_cx)) = (&args.diff_cy, &mut args.diff_cx) {
            diff_cx.data_mut().copy_from_slice(diff_cy.data());
        }
        for w in args.diff_weights.data_mut() {
            *w += 1.;
        }
        Ok(())
    }
}

/// 一组前向输入：由属性与模型超参数生成，参数缓冲区长度恰为`params_size(...)`
pub(super) struct Case {
    pub input: Tensor,
    pub input_h: Tensor,
    pub input_c: Tensor,
    pub params: Tensor,
}

impl Case {
    /// `seq_length`为None时生成2维input与2维input_h（单层）
    pub(super) fn new(
        attrs: &RnnAttrs,
        seq_length: Option<usize>,
        batch_size: usize,
        input_size: usize,
        num_units: usize,
        num_layers: usize,
    ) -> Self {
        let dir_count = attrs.direction.dir_count();
        let (input_shape, hidden_shape) = match seq_length {
            Some(seq_length) => (
                vec![seq_length, batch_size, input_size],
                vec![num_layers * dir_count, batch_size, num_units],
            ),
            None => (vec![batch_size, input_size], vec![batch_size, num_units]),
        };
        let input_c = if attrs.rnn_mode == RnnMode::Lstm {
            Tensor::new_random_seeded(-1., 1., &hidden_shape, 3)
        } else {
            Tensor::empty()
        };
        Self {
            input: Tensor::new_random_seeded(-1., 1., &input_shape, 1),
            input_h: Tensor::new_random_seeded(-1., 1., &hidden_shape, 2),
            input_c,
            params: RnnParamsSize::new(attrs.clone())
                .init_params(num_layers, num_units, input_size)
                .unwrap(),
        }
    }

    pub(super) fn forward_inputs(&self) -> ForwardInputs<'_> {
        ForwardInputs {
            input: &self.input,
            input_h: &self.input_h,
            input_c: &self.input_c,
            params: &self.params,
        }
    }
}
