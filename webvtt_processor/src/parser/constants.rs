//! WebVTT 解析器使用的常量。

/// 时间行中分隔开始与结束时间戳的箭头。
pub(super) const TIMING_ARROW: &str = "-->";

/// 注释块的关键字。
pub(super) const BLOCK_NOTE: &str = "NOTE";
/// 样式块的关键字。
pub(super) const BLOCK_STYLE: &str = "STYLE";
/// 区域定义块的关键字。
pub(super) const BLOCK_REGION: &str = "REGION";
