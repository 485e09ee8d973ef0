//! # Fused RNN
//!
//! `fused_rnn`为多层循环神经网络（rnn_relu、rnn_tanh、lstm、gru，单向或双向）提供融合算子的外围逻辑：
//! 参数缓冲区尺寸计算、由输入形状推导模型形状、前向/反向调用时的形状校验、输出分配与资源管理。
//! 循环计算本身（门控、激活、梯度公式）由实现了[`rnn::RnnBackend`]的外部原语库完成。
//!

pub mod errors;
pub mod rnn;
pub mod tensor;
pub mod utils;
