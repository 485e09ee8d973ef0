use std::thread;

use super::{Case, FailPoint, RecordingBackend};
use crate::assert_err;
use crate::errors::{RnnError, TensorRole};
use crate::rnn::{
    DirectionMode, ForwardInputs, PropKind, RnnAttrs, RnnForward, RnnInputMode, RnnMode,
};
use crate::tensor::Tensor;

/// 40字节即10个f32
const WORKSPACE_BYTES: usize = 40;

/// 5步、批大小3、input_size 4、num_units 6、2层
fn lstm_case(attrs: &RnnAttrs) -> Case {
    Case::new(attrs, Some(5), 3, 4, 6, 2)
}

#[test]
fn test_forward_training() {
    let attrs = RnnAttrs::default().seeds(1, 2);
    let case = lstm_case(&attrs);
    assert_eq!(case.params.shape(), &[624]);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let op = RnnForward::new(attrs, &backend);
    assert!(op.is_training());

    let outputs = op.compute(case.forward_inputs()).unwrap();
    assert_eq!(outputs.output, Tensor::full(1., &[5, 3, 6]));
    assert_eq!(outputs.output_h, case.input_h);
    assert_eq!(outputs.output_c, case.input_c);
    assert_eq!(outputs.reserve_space, Tensor::full(7., &[10]));

    assert_eq!(
        backend.events(),
        [
            "create engine",
            "create forward_pd",
            "execute forward ForwardTraining workspace=true",
            "release forward_pd",
            "release engine",
        ]
    );

    let descs = backend.descs();
    assert_eq!(descs.len(), 1);
    let desc = &descs[0];
    assert_eq!(desc.prop_kind, PropKind::ForwardTraining);
    assert_eq!(desc.rnn_mode, RnnMode::Lstm);
    assert_eq!(desc.input_mode, RnnInputMode::LinearInput);
    assert_eq!(desc.direction, DirectionMode::Unidirectional);
    assert_eq!(desc.num_units, 6);
    assert_eq!(desc.num_layers, 2);
    assert_eq!(desc.seq_length, 5);
    assert_eq!(desc.state_outputs, 1);
    assert_eq!(desc.seed, (1 << 32) | 2);
    assert_eq!(desc.layouts.x.dims, [5, 3, 4]);
    assert_eq!(desc.layouts.hx.dims, [2, 3, 6]);
    assert_eq!(desc.layouts.y.dims, [5, 3, 6]);
    assert_eq!(desc.layouts.weights.dims, [624]);
    assert!(desc.to_json().unwrap().contains(r#""prop_kind": "forward_training""#));
}

#[test]
fn test_forward_reserve_space_rounds_up_to_whole_elements() {
    // 42字节不是4的整数倍，须分配11个元素（44字节）而不是10个
    let attrs = RnnAttrs::default();
    let case = lstm_case(&attrs);
    let backend = RecordingBackend::new(42);
    let outputs = RnnForward::new(attrs, &backend)
        .compute(case.forward_inputs())
        .unwrap();
    assert_eq!(outputs.reserve_space, Tensor::full(7., &[11]));
    assert!(outputs.reserve_space.size() * 4 >= 42);
}

#[test]
fn test_forward_inference_has_no_reserve_space() {
    let attrs = RnnAttrs::default().is_training(false);
    let case = lstm_case(&attrs);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let op = RnnForward::new(attrs, &backend);

    let outputs = op.compute(case.forward_inputs()).unwrap();
    assert!(outputs.reserve_space.is_empty());
    assert_eq!(outputs.reserve_space.shape(), &[0]);
    assert_eq!(outputs.output_c, case.input_c);
    assert!(
        backend
            .events()
            .contains(&"execute forward ForwardInference workspace=false".to_string())
    );
    assert_eq!(backend.descs()[0].prop_kind, PropKind::ForwardInference);
}

#[test]
fn test_forward_without_cell_state() {
    for rnn_mode in [RnnMode::RnnRelu, RnnMode::RnnTanh, RnnMode::Gru] {
        let attrs = RnnAttrs::default().rnn_mode(rnn_mode);
        let case = lstm_case(&attrs);
        // input_c被忽略，可以是任意形状
        assert!(case.input_c.is_empty());
        let backend = RecordingBackend::new(WORKSPACE_BYTES);
        let outputs = RnnForward::new(attrs, &backend)
            .compute(case.forward_inputs())
            .unwrap();
        assert_eq!(outputs.output.shape(), &[5, 3, 6]);
        assert_eq!(outputs.output_h, case.input_h);
        assert_eq!(outputs.output_c.shape(), &[0]);
        assert_eq!(outputs.reserve_space.size(), 10);
    }
}

#[test]
fn test_forward_bidirectional() {
    let attrs = RnnAttrs::default()
        .rnn_mode(RnnMode::Gru)
        .direction(DirectionMode::Bidirectional);
    let case = lstm_case(&attrs);
    assert_eq!(case.input_h.shape(), &[4, 3, 6]);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let outputs = RnnForward::new(attrs, &backend)
        .compute(case.forward_inputs())
        .unwrap();
    assert_eq!(outputs.output.shape(), &[5, 3, 12]);
    assert_eq!(outputs.output_h.shape(), &[4, 3, 6]);
    assert_eq!(backend.descs()[0].num_layers, 2);
}

#[test]
fn test_forward_rank_2_input() {
    let attrs = RnnAttrs::default();
    let case = Case::new(&attrs, None, 8, 6, 10, 1);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let outputs = RnnForward::new(attrs, &backend)
        .compute(case.forward_inputs())
        .unwrap();
    assert_eq!(outputs.output, Tensor::full(1., &[8, 10]));
    assert_eq!(outputs.output_h.shape(), &[8, 10]);
    assert_eq!(outputs.output_c.shape(), &[8, 10]);
    assert_eq!(backend.descs()[0].seq_length, 1);
}

#[test]
fn test_forward_rejects_wrong_params_length() {
    let attrs = RnnAttrs::default();
    let case = lstm_case(&attrs);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let op = RnnForward::new(attrs, &backend);

    for len in [623, 625] {
        let params = Tensor::zeros(&[len]);
        let result = op.compute(ForwardInputs {
            params: &params,
            ..case.forward_inputs()
        });
        assert_err!(result, RnnError::ShapeMismatch(TensorRole::Params, [624], [len]));
    }
    // 校验在获取引擎之前完成
    assert!(backend.events().is_empty());
}

#[test]
fn test_forward_rejects_cell_shape_mismatch() {
    let attrs = RnnAttrs::default();
    let case = lstm_case(&attrs);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let input_c = Tensor::zeros(&[2, 3, 7]);
    let result = RnnForward::new(attrs, &backend).compute(ForwardInputs {
        input_c: &input_c,
        ..case.forward_inputs()
    });
    assert_err!(
        result,
        RnnError::ShapeMismatch(TensorRole::InputC, [2, 3, 6], [2, 3, 7])
    );
    let err = result.unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err.to_string(),
        "input_c的形状不匹配：期望[2, 3, 6]，实际为[2, 3, 7]"
    );
}

#[test]
fn test_forward_releases_handles_on_failure() {
    let attrs = RnnAttrs::default();
    let case = lstm_case(&attrs);

    let backend = RecordingBackend::new(WORKSPACE_BYTES).failing_at(FailPoint::Engine);
    let result = RnnForward::new(attrs.clone(), &backend).compute(case.forward_inputs());
    assert_err!(result, RnnError::Primitive(msg) if msg.contains("Engine"));
    assert_eq!(backend.events(), ["fail Engine"]);

    let backend = RecordingBackend::new(WORKSPACE_BYTES).failing_at(FailPoint::ForwardPd);
    let result = RnnForward::new(attrs.clone(), &backend).compute(case.forward_inputs());
    assert_err!(result, RnnError::Primitive(_));
    assert_eq!(
        backend.events(),
        ["create engine", "fail ForwardPd", "release engine"]
    );

    let backend = RecordingBackend::new(WORKSPACE_BYTES).failing_at(FailPoint::ExecuteForward);
    let result = RnnForward::new(attrs, &backend).compute(case.forward_inputs());
    assert_err!(result, RnnError::Primitive(_));
    assert_eq!(
        backend.events(),
        [
            "create engine",
            "create forward_pd",
            "fail ExecuteForward",
            "release forward_pd",
            "release engine",
        ]
    );
}

#[test]
fn test_forward_concurrent_calls() {
    let attrs = RnnAttrs::default().rnn_mode(RnnMode::Gru);
    let backend = RecordingBackend::new(WORKSPACE_BYTES);
    let op = &RnnForward::new(attrs.clone(), &backend);
    let cases: Vec<Case> = (1..=4)
        .map(|batch_size| Case::new(&attrs, Some(5), batch_size, 4, 6, 2))
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = cases
            .iter()
            .map(|case| scope.spawn(move || op.compute(case.forward_inputs())))
            .collect();
        for (case, handle) in cases.iter().zip(handles) {
            let outputs = handle.join().unwrap().unwrap();
            let batch_size = case.input.shape()[1];
            assert_eq!(outputs.output.shape(), &[5, batch_size, 6]);
            assert_eq!(outputs.output_h, case.input_h);
        }
    });

    // 每次调用的引擎与原语描述符都已释放
    let events = backend.events();
    let count = |event: &str| events.iter().filter(|e| e.as_str() == event).count();
    assert_eq!(count("create engine"), 4);
    assert_eq!(count("release engine"), 4);
    assert_eq!(count("release forward_pd"), 4);
}
