//! 结构化字幕文档模型：转换结果的写入目标。
//!
//! 条目按插入顺序存储，保证每个 cue 内的段落顺序
//! 和整个文件的 cue 顺序在文档中得到保留。

use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// 文档内容所属的层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContentLayer {
    /// 正文内容。
    #[default]
    Body,
    /// 页眉、页脚等非正文内容。
    Furniture,
}

/// 文档条目的标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemLabel {
    /// 普通文本条目。
    #[default]
    Text,
    /// 行内分组容器。
    InlineGroup,
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLabel::Text => write!(f, "text"),
            ItemLabel::InlineGroup => write!(f, "inline_group"),
        }
    }
}

/// 行内格式化标志。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    /// 加粗。
    #[serde(default)]
    pub bold: bool,
    /// 斜体。
    #[serde(default)]
    pub italic: bool,
    /// 下划线。
    #[serde(default)]
    pub underline: bool,
    /// 删除线。
    #[serde(default)]
    pub strikethrough: bool,
}

/// 附加在文本条目上的溯源信息，记录其来源 cue 的
/// 时间范围、标识符以及标注。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct ProvenanceTrack {
    /// 来源 cue 的开始时间（毫秒）。
    pub start_ms: u64,
    /// 来源 cue 的结束时间（毫秒）。
    pub end_ms: u64,
    /// 来源 cue 的标识符。
    #[serde(default)]
    pub identifier: Option<String>,
    /// 该文本段上生效的语言标注，缺失时为 `None`。
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    /// 渲染后的类名列表，每个标签种类一条，
    /// 形如 `"b.highlight.red"`；缺失时为 `None`。
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    /// 该文本段的说话人，缺失时为 `None`。
    #[serde(default)]
    pub voice: Option<String>,
}

/// 整个文档的来源信息。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOrigin {
    /// 来源文件名。
    pub filename: String,
    /// MIME 类型，例如 `"text/vtt"`。
    pub mimetype: String,
    /// 来源内容的 SHA-256 摘要（十六进制）。
    pub binary_hash: String,
}

/// 指向文档内条目的引用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef(pub usize);

/// 文档中的一个文本条目。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// 条目标签。
    pub label: ItemLabel,
    /// 文本内容。
    pub text: String,
    /// 所属内容层。
    pub content_layer: ContentLayer,
    /// 溯源信息。
    #[serde(default)]
    pub prov: Option<ProvenanceTrack>,
    /// 行内格式化标志。
    #[serde(default)]
    pub formatting: Option<Formatting>,
    /// 所属分组，顶层条目为 `None`。
    #[serde(default)]
    pub parent: Option<ItemRef>,
}

/// 文档中的一个分组容器条目。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    /// 分组名称。
    pub name: String,
    /// 条目标签。
    pub label: ItemLabel,
    /// 所属内容层。
    pub content_layer: ContentLayer,
    /// 子条目引用，按插入顺序。
    #[serde(default)]
    pub children: Vec<ItemRef>,
}

/// 文档中的一个条目。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocItem {
    /// 文本条目。
    Text(TextItem),
    /// 分组容器条目。
    Group(GroupItem),
}

/// 结构化字幕文档。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionDocument {
    /// 文档名称。
    pub name: String,
    /// 文档来源信息。
    #[serde(default)]
    pub origin: Option<DocumentOrigin>,
    /// 按插入顺序排列的条目。
    #[serde(default)]
    pub items: Vec<DocItem>,
}

impl CaptionDocument {
    /// 创建一个空文档。
    #[must_use]
    pub fn new(name: impl Into<String>, origin: Option<DocumentOrigin>) -> Self {
        Self {
            name: name.into(),
            origin,
            items: Vec::new(),
        }
    }

    /// 追加一个文本条目，可选地挂在某个分组之下。
    ///
    /// # Errors
    ///
    /// 当 `parent` 引用越界或指向的条目不是分组时，
    /// 返回 [`ConvertError::Sink`]。
    pub fn add_text(
        &mut self,
        label: ItemLabel,
        text: impl Into<String>,
        content_layer: ContentLayer,
        prov: Option<ProvenanceTrack>,
        formatting: Option<Formatting>,
        parent: Option<ItemRef>,
    ) -> Result<ItemRef, ConvertError> {
        if let Some(parent_ref) = parent {
            match self.items.get(parent_ref.0) {
                Some(DocItem::Group(_)) => {}
                Some(_) => {
                    return Err(ConvertError::Sink(format!(
                        "父条目 #{} 不是一个分组",
                        parent_ref.0
                    )));
                }
                None => {
                    return Err(ConvertError::Sink(format!(
                        "父条目引用 #{} 越界",
                        parent_ref.0
                    )));
                }
            }
        }

        let item_ref = ItemRef(self.items.len());
        self.items.push(DocItem::Text(TextItem {
            label,
            text: text.into(),
            content_layer,
            prov,
            formatting,
            parent,
        }));
        if let Some(parent_ref) = parent
            && let Some(DocItem::Group(group)) = self.items.get_mut(parent_ref.0)
        {
            group.children.push(item_ref);
        }
        Ok(item_ref)
    }

    /// 追加一个行内分组容器，返回可作为 `parent` 使用的引用。
    pub fn add_inline_group(
        &mut self,
        name: impl Into<String>,
        content_layer: ContentLayer,
    ) -> ItemRef {
        let item_ref = ItemRef(self.items.len());
        self.items.push(DocItem::Group(GroupItem {
            name: name.into(),
            label: ItemLabel::InlineGroup,
            content_layer,
            children: Vec::new(),
        }));
        item_ref
    }

    /// 按插入顺序迭代所有文本条目。
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.items.iter().filter_map(|item| match item {
            DocItem::Text(text) => Some(text),
            DocItem::Group(_) => None,
        })
    }

    /// 按插入顺序迭代所有分组条目。
    pub fn groups(&self) -> impl Iterator<Item = &GroupItem> {
        self.items.iter().filter_map(|item| match item {
            DocItem::Group(group) => Some(group),
            DocItem::Text(_) => None,
        })
    }

    /// 将正文层导出为纯文本：顶层文本条目各占一行，
    /// 行内分组的子条目拼接为一行。
    #[must_use]
    pub fn export_to_plaintext(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for item in &self.items {
            match item {
                DocItem::Text(text)
                    if text.content_layer == ContentLayer::Body && text.parent.is_none() =>
                {
                    lines.push(text.text.clone());
                }
                DocItem::Group(group) if group.content_layer == ContentLayer::Body => {
                    let line: String = group
                        .children
                        .iter()
                        .filter_map(|child| match self.items.get(child.0) {
                            Some(DocItem::Text(text)) => Some(text.text.as_str()),
                            _ => None,
                        })
                        .collect();
                    lines.push(line);
                }
                _ => {}
            }
        }
        lines.join("\n")
    }
}
