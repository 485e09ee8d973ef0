/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : DynamicShape: 支持未知维度的形状，供执行前的形状推导使用
 *
 * 图在执行前往往只知道部分维度（如 seq_length、batch_size 未定），
 * 未知维度用 None 表示，显示为 `?`。
 *
 * # 示例
 * ```
 * use fused_rnn::rnn::DynamicShape;
 *
 * let shape = DynamicShape::new(&[None, Some(8), Some(10)]);
 * assert_eq!(shape.to_string(), "[?, 8, 10]");
 * ```
 */

use std::fmt;

/// 维度值：Some(n) 表示固定值 n，None 表示未知
pub type Dim = Option<usize>;

/// 动态形状：阶数已知，但某些维度可以是 None
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DynamicShape {
    dims: Vec<Dim>,
}

impl DynamicShape {
    pub fn new(dims: &[Dim]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    /// 从固定形状创建（所有维度都是确定的）
    pub fn fixed(dims: &[usize]) -> Self {
        Self {
            dims: dims.iter().map(|&d| Some(d)).collect(),
        }
    }

    /// 获取维度数量
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// 获取指定维度的值：Some(n) 如果维度固定，None 如果维度未知（或越界）
    pub fn dim(&self, index: usize) -> Dim {
        self.dims.get(index).copied().flatten()
    }

    /// 最后一维的值
    pub fn last_dim(&self) -> Dim {
        self.dims.last().copied().flatten()
    }

    /// 检查是否有任何未知维度
    pub fn has_dynamic_dims(&self) -> bool {
        self.dims.iter().any(|d| d.is_none())
    }
}

/// 未知维度显示为 `?`
impl fmt::Display for DynamicShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .dims
            .iter()
            .map(|d| match d {
                Some(n) => n.to_string(),
                None => "?".to_string(),
            })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
