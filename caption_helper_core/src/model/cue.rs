//! WebVTT cue 的数据模型：带时间的 cue 块及其嵌套的标记负载树。

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// cue 标记中可携带 CSS 类名的标签种类。
///
/// 同时用作扁平化结果中类名桶的键，渲染溯源信息时以
/// [`Self::as_str`] 返回的标签名开头。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CueTagKind {
    /// `<b>` 加粗。
    #[strum(serialize = "b")]
    Bold,
    /// `<i>` 斜体。
    #[strum(serialize = "i")]
    Italic,
    /// `<u>` 下划线。
    #[strum(serialize = "u")]
    Underline,
    /// `<lang>` 语言标注。
    #[strum(serialize = "lang")]
    Language,
    /// `<v>` 说话人标注。
    #[strum(serialize = "v")]
    Voice,
}

impl CueTagKind {
    /// 返回该种类在 cue 文本中的标签名。
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Language => "lang",
            Self::Voice => "v",
        }
    }
}

/// cue 负载的内容组件。闭合的标签联合，新增标签种类时
/// 所有匹配处都会得到编译期检查。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueComponent {
    /// 纯文本叶子节点。
    Text {
        /// 字面文本。
        text: String,
    },
    /// `<b>` 加粗 span。
    Bold {
        /// 标签上的 CSS 类名，保持出现顺序。
        classes: Vec<String>,
        /// 嵌套的子节点序列。
        internal: Vec<CueNode>,
    },
    /// `<i>` 斜体 span。
    Italic {
        /// 标签上的 CSS 类名，保持出现顺序。
        classes: Vec<String>,
        /// 嵌套的子节点序列。
        internal: Vec<CueNode>,
    },
    /// `<u>` 下划线 span。
    Underline {
        /// 标签上的 CSS 类名，保持出现顺序。
        classes: Vec<String>,
        /// 嵌套的子节点序列。
        internal: Vec<CueNode>,
    },
    /// `<lang>` 语言 span。
    Language {
        /// 语言标注，例如 `"en-GB"`。
        annotation: String,
        /// 标签上的 CSS 类名，保持出现顺序。
        classes: Vec<String>,
        /// 嵌套的子节点序列。
        internal: Vec<CueNode>,
    },
    /// `<v>` 说话人 span。
    ///
    /// 语法上允许嵌套另一个说话人 span，语义上最内层的说话人获胜。
    Voice {
        /// 说话人标注，例如 `"Esme"`。
        annotation: String,
        /// 标签上的 CSS 类名，保持出现顺序。
        classes: Vec<String>,
        /// 嵌套的子节点序列。
        internal: Vec<CueNode>,
    },
}

impl CueComponent {
    /// 构造一个纯文本组件。
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// cue 负载中的一个节点：一个内容组件，以及可选的紧随其后的换行标记。
///
/// 换行标记出现在任意嵌套深度时都表示一个段落边界。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueNode {
    /// 内容组件。
    pub component: CueComponent,
    /// 该节点之后是否紧跟一个换行标记。
    #[serde(default)]
    pub terminator: bool,
}

impl CueNode {
    /// 构造一个不带换行标记的节点。
    #[must_use]
    pub const fn new(component: CueComponent) -> Self {
        Self {
            component,
            terminator: false,
        }
    }

    /// 构造一个带换行标记的节点。
    #[must_use]
    pub const fn with_terminator(component: CueComponent) -> Self {
        Self {
            component,
            terminator: true,
        }
    }
}

/// 一个带时间的 cue 块。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueBlock {
    /// 可选的 cue 标识符。
    pub identifier: Option<String>,
    /// cue 的开始时间（毫秒）。
    pub start_ms: u64,
    /// cue 的结束时间（毫秒），不早于开始时间。
    pub end_ms: u64,
    /// 顶层负载节点序列。
    #[serde(default)]
    pub payload: Vec<CueNode>,
}

/// 解析后的 WebVTT 文件。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebVTTFile {
    /// 按文件顺序排列的 cue 块。
    pub cues: Vec<CueBlock>,
    /// 解析过程中收集的非致命警告。
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl WebVTTFile {
    /// 校验内容是否以有效的 WEBVTT 签名开头。
    ///
    /// 允许一个可选的 UTF-8 BOM，之后必须是 `WEBVTT`，
    /// 再之后只能是行尾、空格或制表符。
    #[must_use]
    pub fn verify_signature(content: &str) -> bool {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let Some(rest) = content.strip_prefix("WEBVTT") else {
            return false;
        };
        matches!(rest.chars().next(), None | Some('\n' | '\r' | ' ' | '\t'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_signature() {
        assert!(WebVTTFile::verify_signature("WEBVTT"));
        assert!(WebVTTFile::verify_signature("WEBVTT\n"));
        assert!(WebVTTFile::verify_signature("WEBVTT\r\n00:00.000"));
        assert!(WebVTTFile::verify_signature("WEBVTT - This file has cues."));
        assert!(WebVTTFile::verify_signature("WEBVTT\tkind"));
        assert!(WebVTTFile::verify_signature("\u{feff}WEBVTT\n"));

        assert!(!WebVTTFile::verify_signature(""));
        assert!(!WebVTTFile::verify_signature("WEBVT"));
        assert!(!WebVTTFile::verify_signature("WEBVTTX"));
        assert!(!WebVTTFile::verify_signature(" WEBVTT"));
        assert!(!WebVTTFile::verify_signature("webvtt\n"));
    }

    #[test]
    fn test_cue_tag_kind_from_str() {
        use std::str::FromStr;

        assert_eq!(CueTagKind::from_str("b").unwrap(), CueTagKind::Bold);
        assert_eq!(CueTagKind::from_str("lang").unwrap(), CueTagKind::Language);
        assert_eq!(CueTagKind::from_str("v").unwrap(), CueTagKind::Voice);
        assert!(CueTagKind::from_str("c").is_err());
        assert!(CueTagKind::from_str("ruby").is_err());
    }
}
