/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 扁平参数缓冲区的元素个数
 *
 * 公式（G为每个循环单元的权重/偏置组数）:
 *   first_layer  = G * num_units * (input_size + num_units + 2)
 *   other_layers = G * (num_layers - 1) * num_units * (2 * num_units + 2)
 *   size         = (first_layer + other_layers) * dir_count
 *
 * 其中的`+ 2`是每个门的两组偏置：输入→隐藏、隐藏→隐藏各一组。
 * 缓冲区内部各层、各门的子布局由外部原语决定，这里只负责总长度。
 */

use super::model_types::RnnMode;

/// 每个循环单元的权重/偏置组数
pub const fn gate_multiplier(rnn_mode: RnnMode) -> usize {
    match rnn_mode {
        RnnMode::RnnRelu | RnnMode::RnnTanh => 1,
        RnnMode::Lstm => 4,
        RnnMode::Gru => 3,
    }
}

/// 参数缓冲区须分配的元素个数。分配与校验都只能使用本函数的结果。
///
/// 前提：`num_layers`至少为1（由调用方先行校验）。结果超出`usize`范围时返回None。
///
/// # 示例
/// ```
/// use fused_rnn::rnn::{RnnMode, params_size};
///
/// // 2层单向LSTM，num_units=4，input_size=3
/// assert_eq!(params_size(RnnMode::Lstm, 1, 3, 4, 2), Some(304));
/// assert_eq!(params_size(RnnMode::Lstm, 1, 3, usize::MAX, 2), None);
/// ```
pub fn params_size(
    rnn_mode: RnnMode,
    dir_count: usize,
    input_size: usize,
    num_units: usize,
    num_layers: usize,
) -> Option<usize> {
    debug_assert!(num_layers >= 1, "num_layers须≥1");
    let gates = gate_multiplier(rnn_mode);
    let first_layer = input_size
        .checked_add(num_units)?
        .checked_add(2)?
        .checked_mul(num_units)?
        .checked_mul(gates)?;
    let other_layers = num_units
        .checked_mul(2)?
        .checked_add(2)?
        .checked_mul(num_units)?
        .checked_mul(num_layers - 1)?
        .checked_mul(gates)?;
    first_layer.checked_add(other_layers)?.checked_mul(dir_count)
}
