use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// WebVTT 转换选项。
#[derive(Debug, Clone, Default, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct VttConversionOptions {
    /// 生成文档的名称。如果为 `None`，则从文件名推导。
    #[serde(default)]
    pub name: Option<String>,
    /// 来源文件名，写入 `DocumentOrigin`。如果为 `None`，则使用 `"file"`。
    #[serde(default)]
    pub filename: Option<String>,
}
