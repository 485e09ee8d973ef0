/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 算子属性（配置层）：三个算子共用的类别型/数值型属性，可从JSON加载
 */

use serde::{Deserialize, Serialize};

use super::model_types::{DirectionMode, InputModeSetting, ModelTypes, RnnMode};
use crate::errors::RnnError;

/// 三个算子共用的属性
///
/// `dropout`与`seed`/`seed2`对尺寸计算和形状推导没有影响，只原样透传给外部原语。
/// `is_training`仅对前向算子有意义，反向算子总是训练配置。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RnnAttrs {
    pub rnn_mode: RnnMode,
    pub input_mode: InputModeSetting,
    pub direction: DirectionMode,
    pub dropout: f32,
    pub seed: i32,
    pub seed2: i32,
    pub is_training: bool,
}

impl Default for RnnAttrs {
    fn default() -> Self {
        Self {
            rnn_mode: RnnMode::Lstm,
            input_mode: InputModeSetting::AutoSelect,
            direction: DirectionMode::Unidirectional,
            dropout: 0.,
            seed: 0,
            seed2: 0,
            is_training: true,
        }
    }
}

/// JSON中的原始属性，类别型属性先以字符串读入，再统一解析以得到`InvalidConfiguration`
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawRnnAttrs {
    rnn_mode: String,
    input_mode: String,
    direction: String,
    dropout: f32,
    seed: i32,
    seed2: i32,
    is_training: bool,
}

impl Default for RawRnnAttrs {
    fn default() -> Self {
        let defaults = RnnAttrs::default();
        Self {
            rnn_mode: defaults.rnn_mode.into(),
            input_mode: defaults.input_mode.into(),
            direction: defaults.direction.into(),
            dropout: defaults.dropout,
            seed: defaults.seed,
            seed2: defaults.seed2,
            is_training: defaults.is_training,
        }
    }
}

impl TryFrom<RawRnnAttrs> for RnnAttrs {
    type Error = RnnError;

    fn try_from(raw: RawRnnAttrs) -> Result<Self, Self::Error> {
        Ok(Self {
            rnn_mode: raw.rnn_mode.parse()?,
            input_mode: raw.input_mode.parse()?,
            direction: raw.direction.parse()?,
            dropout: raw.dropout,
            seed: raw.seed,
            seed2: raw.seed2,
            is_training: raw.is_training,
        })
    }
}

impl RnnAttrs {
    /// 从三个字符串属性创建，数值型属性取默认值
    pub fn from_strs(rnn_mode: &str, input_mode: &str, direction: &str) -> Result<Self, RnnError> {
        Ok(Self {
            rnn_mode: rnn_mode.parse()?,
            input_mode: input_mode.parse()?,
            direction: direction.parse()?,
            ..Self::default()
        })
    }

    /// 从JSON字符串加载，缺省的键取默认值
    ///
    /// # 示例
    /// ```
    /// use fused_rnn::rnn::{RnnAttrs, RnnMode};
    ///
    /// let attrs = RnnAttrs::from_json(r#"{"rnn_mode": "gru", "direction": "bi"}"#).unwrap();
    /// assert_eq!(attrs.rnn_mode, RnnMode::Gru);
    /// assert!(attrs.is_training);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RnnError> {
        let raw: RawRnnAttrs = serde_json::from_str(json)
            .map_err(|e| RnnError::InvalidArgument(format!("算子属性JSON解析失败：{e}")))?;
        raw.try_into()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn rnn_mode(mut self, rnn_mode: RnnMode) -> Self {
        self.rnn_mode = rnn_mode;
        self
    }

    pub fn input_mode(mut self, input_mode: InputModeSetting) -> Self {
        self.input_mode = input_mode;
        self
    }

    pub fn direction(mut self, direction: DirectionMode) -> Self {
        self.direction = direction;
        self
    }

    pub fn dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
        self
    }

    pub fn seeds(mut self, seed: i32, seed2: i32) -> Self {
        self.seed = seed;
        self.seed2 = seed2;
        self
    }

    pub fn is_training(mut self, is_training: bool) -> Self {
        self.is_training = is_training;
        self
    }

    /// 两段种子拼成一个64位种子：高32位为`seed`，低32位为`seed2`
    pub fn combined_seed(&self) -> u64 {
        ((self.seed as u32 as u64) << 32) | self.seed2 as u32 as u64
    }

    pub fn model_types(&self) -> ModelTypes {
        ModelTypes::new(self.rnn_mode, self.input_mode, self.direction)
    }
}
