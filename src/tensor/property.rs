/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 本类仅包含一些属性方法及连续内存的借用，不包含任何运算方法
 */

use super::Tensor;
use crate::errors::TensorError;

impl Tensor {
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 张量是否不含任何元素（如占位输出）
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓连续内存借用↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// 按行优先顺序借用张量的全部元素
    pub fn data_as_slice(&self) -> Result<&[f32], TensorError> {
        self.data.as_slice().ok_or(TensorError::NonContiguous)
    }

    pub fn data_as_slice_mut(&mut self) -> Result<&mut [f32], TensorError> {
        self.data.as_slice_mut().ok_or(TensorError::NonContiguous)
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑连续内存借用↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}
