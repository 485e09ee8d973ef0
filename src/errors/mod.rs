/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 错误类型：张量构造错误（TensorError）与RNN算子错误（RnnError）
 */

use thiserror::Error;
mod role;
pub use self::role::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}的元素个数不一致")]
    IncompatibleShape { data_len: usize, shape: Vec<usize> },
    #[error("张量内存不连续，无法构建内存视图")]
    NonContiguous,
}

/// RNN 算子（尺寸查询、前向、反向）的错误类型
///
/// 所有错误对本次调用都是致命的：不会重试，也不会降级为仅打日志。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RnnError {
    /// 类别型属性取值无法识别（须修正配置后再调用）
    #[error("无效的{attr}取值：`{value}`")]
    InvalidConfiguration { attr: AttrName, value: String },

    #[error("{0}")]
    InvalidArgument(String),

    /// 形状冲突，同时给出出错张量名、期望形状与实际形状
    #[error("{tensor}的形状不匹配：期望{expected:?}，实际为{got:?}")]
    ShapeMismatch {
        tensor: TensorRole,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 外部RNN原语报告的失败
    #[error("外部RNN原语执行失败：{0}")]
    Primitive(String),

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl RnnError {
    /// `ShapeMismatch` 是 `InvalidArgument` 的细分，二者都视为参数错误
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::ShapeMismatch { .. })
    }

    pub(crate) fn shape_mismatch(tensor: TensorRole, expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            tensor,
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
