//! # cue 文本树构建过程的状态和数据结构

use caption_helper_core::{CueNode, CueTagKind};

/// 一个起始标签的种类：已知的格式化标签，或被透明展开的未知标签。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SpanTag {
    /// `<b>`、`<i>`、`<u>`、`<lang>`、`<v>` 之一。
    Known(CueTagKind),
    /// 未知标签（如 `<c>`、`<ruby>`），保留其内容但丢弃标签本身。
    Unknown(String),
}

impl SpanTag {
    /// 返回该标签在 cue 文本中的名称，用于匹配结束标签。
    pub(super) fn name(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Unknown(name) => name,
        }
    }
}

/// 树构建过程中一个尚未闭合的 span。
///
/// 子节点增量写入 `children`，闭合时再组装为 [`CueNode`]。
#[derive(Debug)]
pub(super) struct OpenSpan {
    pub(super) tag: SpanTag,
    pub(super) classes: Vec<String>,
    pub(super) annotation: Option<String>,
    pub(super) children: Vec<CueNode>,
}
