use std::io;

use thiserror::Error;

/// 定义 WebVTT 转换和处理过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 内容开头不是有效的 WEBVTT 签名。
    #[error("无效的 WEBVTT 签名")]
    InvalidSignature,
    /// 无效的时间戳格式字符串。
    #[error("无效的时间格式: {0}")]
    InvalidTime(String),
    /// 无法解释的 cue 块（缺少时间行等），整个文档的转换随之中止。
    #[error("无效的 cue 块: {0}")]
    InvalidCue(String),
    /// 写入文档模型失败。
    #[error("写入文档失败: {0}")]
    Sink(String),
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
}

impl From<ConvertError> for std::io::Error {
    fn from(err: ConvertError) -> Self {
        std::io::Error::other(err)
    }
}
