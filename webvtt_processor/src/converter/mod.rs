//! # WebVTT 到结构化文档的转换器
//!
//! 把解析器产出的 [`WebVTTFile`] 转换为 [`CaptionDocument`]：
//! 逐个 cue 扁平化其负载树，再把得到的段落写入文档。
//! cue 的来源顺序和每个 cue 内的段落顺序在文档中原样保留。

mod assemble;
mod flatten;
mod state;

use caption_helper_core::{CaptionDocument, ConvertError, DocumentOrigin, VttConversionOptions, WebVTTFile};
use sha2::{Digest, Sha256};
use tracing::debug;

pub use self::flatten::flatten_payload;
pub use self::state::{AnnotatedParagraph, AnnotatedText, ClassBucket};

/// WebVTT 内容的 MIME 类型。
const VTT_MIMETYPE: &str = "text/vtt";

/// 将一个已解析的 WebVTT 文件转换为结构化字幕文档。
///
/// `content` 是解析前的原始文件内容，用于计算文档来源的
/// 内容摘要。文档名和来源文件名取自 `options`，均未提供时
/// 回退到 `"file"`。
///
/// # Errors
///
/// 写入文档失败时返回 [`ConvertError::Sink`]。
pub fn convert_to_document(
    vtt: &WebVTTFile,
    content: &str,
    options: &VttConversionOptions,
) -> Result<CaptionDocument, ConvertError> {
    debug!("开始 WebVTT 转换，共 {} 个 cue", vtt.cues.len());

    let filename = options.filename.clone().unwrap_or_else(|| "file".to_string());
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| file_stem(&filename).to_string());
    let origin = DocumentOrigin {
        filename,
        mimetype: VTT_MIMETYPE.to_string(),
        binary_hash: content_hash(content),
    };
    let mut doc = CaptionDocument::new(name, Some(origin));

    for cue in &vtt.cues {
        let paragraphs = flatten_payload(&cue.payload);
        assemble::assemble_cue(&mut doc, cue, &paragraphs)?;
    }
    Ok(doc)
}

/// 原始内容的 SHA-256 摘要，十六进制小写。
fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// 去掉文件名最后一个 `.` 之后的扩展名。
fn file_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}
