/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : RNN模型的三个类别型选择：循环单元类型、输入投影模式、方向
 */

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

use crate::errors::{AttrName, RnnError};

/// 循环单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum RnnMode {
    RnnRelu,
    RnnTanh,
    Lstm,
    Gru,
}

impl RnnMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RnnRelu => "rnn_relu",
            Self::RnnTanh => "rnn_tanh",
            Self::Lstm => "lstm",
            Self::Gru => "gru",
        }
    }
}

impl FromStr for RnnMode {
    type Err = RnnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rnn_relu" | "relu" => Ok(Self::RnnRelu),
            "rnn_tanh" | "tanh" => Ok(Self::RnnTanh),
            "lstm" => Ok(Self::Lstm),
            "gru" => Ok(Self::Gru),
            _ => Err(RnnError::InvalidConfiguration {
                attr: AttrName::RnnMode,
                value: s.to_string(),
            }),
        }
    }
}

/// 配置层面的输入模式，`AutoSelect`在构建`ModelTypes`时才被解析
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum InputModeSetting {
    LinearInput,
    SkipInput,
    AutoSelect,
}

impl InputModeSetting {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LinearInput => "linear_input",
            Self::SkipInput => "skip_input",
            Self::AutoSelect => "auto_select",
        }
    }

    /// `auto_select`始终解析为`linear_input`，与`input_size == num_units`与否无关
    pub fn resolve(&self) -> RnnInputMode {
        match self {
            Self::LinearInput | Self::AutoSelect => RnnInputMode::LinearInput,
            Self::SkipInput => RnnInputMode::SkipInput,
        }
    }
}

impl FromStr for InputModeSetting {
    type Err = RnnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear_input" | "linear" => Ok(Self::LinearInput),
            "skip_input" | "skip" => Ok(Self::SkipInput),
            "auto_select" | "auto" => Ok(Self::AutoSelect),
            _ => Err(RnnError::InvalidConfiguration {
                attr: AttrName::InputMode,
                value: s.to_string(),
            }),
        }
    }
}

/// 首层之前是否对输入做线性投影
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum RnnInputMode {
    LinearInput,
    SkipInput,
}

impl RnnInputMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LinearInput => "linear_input",
            Self::SkipInput => "skip_input",
        }
    }
}

/// 单向或双向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum DirectionMode {
    Unidirectional,
    Bidirectional,
}

impl DirectionMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unidirectional => "unidirectional",
            Self::Bidirectional => "bidirectional",
        }
    }

    /// 方向数：双向为2，否则为1
    pub const fn dir_count(&self) -> usize {
        match self {
            Self::Unidirectional => 1,
            Self::Bidirectional => 2,
        }
    }
}

impl FromStr for DirectionMode {
    type Err = RnnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unidirectional" | "uni" => Ok(Self::Unidirectional),
            "bidirectional" | "bi" => Ok(Self::Bidirectional),
            _ => Err(RnnError::InvalidConfiguration {
                attr: AttrName::Direction,
                value: s.to_string(),
            }),
        }
    }
}

macro_rules! impl_display_and_into_string {
    ($($ty:ty),+) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }
        )+
    };
}

impl_display_and_into_string!(RnnMode, InputModeSetting, RnnInputMode, DirectionMode);

/// 模型类型：每个算子实例构造一次，之后只读，前向与反向共享同一份语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModelTypes {
    rnn_mode: RnnMode,
    input_mode: RnnInputMode,
    direction: DirectionMode,
}

impl ModelTypes {
    pub fn new(rnn_mode: RnnMode, input_mode: InputModeSetting, direction: DirectionMode) -> Self {
        Self {
            rnn_mode,
            input_mode: input_mode.resolve(),
            direction,
        }
    }

    /// 从三个字符串属性解析；任何一个无法识别都返回`InvalidConfiguration`
    pub fn parse(rnn_mode: &str, input_mode: &str, direction: &str) -> Result<Self, RnnError> {
        Ok(Self::new(rnn_mode.parse()?, input_mode.parse()?, direction.parse()?))
    }

    /// 只有LSTM有细胞状态（input_c/output_c），其余模型只用隐藏状态
    pub fn has_cell_state(&self) -> bool {
        self.rnn_mode == RnnMode::Lstm
    }

    pub fn rnn_mode(&self) -> RnnMode {
        self.rnn_mode
    }

    pub fn input_mode(&self) -> RnnInputMode {
        self.input_mode
    }

    pub fn direction(&self) -> DirectionMode {
        self.direction
    }

    pub fn dir_count(&self) -> usize {
        self.direction.dir_count()
    }
}
