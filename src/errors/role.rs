use std::fmt::{self, Display};

/// 算子输入/输出张量的名称，用于在错误信息中指明出错的张量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorRole {
    NumLayers,
    NumUnits,
    InputSize,
    Input,
    InputH,
    InputC,
    Params,
    Output,
    OutputH,
    OutputC,
    ReserveSpace,
    OutputBackprop,
    OutputHBackprop,
    OutputCBackprop,
    InputBackprop,
    InputHBackprop,
    InputCBackprop,
    ParamsBackprop,
}
impl Display for TensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tensor_name = match self {
            TensorRole::NumLayers => "num_layers",
            TensorRole::NumUnits => "num_units",
            TensorRole::InputSize => "input_size",
            TensorRole::Input => "input",
            TensorRole::InputH => "input_h",
            TensorRole::InputC => "input_c",
            TensorRole::Params => "params",
            TensorRole::Output => "output",
            TensorRole::OutputH => "output_h",
            TensorRole::OutputC => "output_c",
            TensorRole::ReserveSpace => "reserve_space",
            TensorRole::OutputBackprop => "output_backprop",
            TensorRole::OutputHBackprop => "output_h_backprop",
            TensorRole::OutputCBackprop => "output_c_backprop",
            TensorRole::InputBackprop => "input_backprop",
            TensorRole::InputHBackprop => "input_h_backprop",
            TensorRole::InputCBackprop => "input_c_backprop",
            TensorRole::ParamsBackprop => "params_backprop",
        };
        write!(f, "{}", tensor_name)
    }
}

/// 算子的类别型属性名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrName {
    RnnMode,
    InputMode,
    Direction,
}
impl Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr_name = match self {
            AttrName::RnnMode => "rnn_mode",
            AttrName::InputMode => "input_mode",
            AttrName::Direction => "direction",
        };
        write!(f, "{}", attr_name)
    }
}
