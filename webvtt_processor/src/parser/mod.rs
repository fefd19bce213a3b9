//! # WebVTT 解析器
//!
//! 将 WebVTT 文件内容扫描为带时间的 cue 块序列，
//! 并把每个 cue 的负载文本解析为嵌套的标记节点树。
//! cue 的来源顺序被原样保留，不按时间重新排序。

mod constants;
mod cue_text;
mod state;
mod utils;

use std::path::Path;

use caption_helper_core::{ConvertError, CueBlock, WebVTTFile};
use tracing::{debug, error, warn};

use self::constants::{BLOCK_NOTE, BLOCK_REGION, BLOCK_STYLE, TIMING_ARROW};

/// 解析 WebVTT 格式的字幕文件内容。
///
/// # 参数
///
/// * `content` - WebVTT 文件内容字符串。
///
/// # 返回
///
/// * `Ok(WebVTTFile)` - 成功解析后，返回按文件顺序排列的 cue 块
///   以及解析过程中收集的非致命警告。
/// * `Err(ConvertError)` - 解析失败时，返回具体的错误信息。
///
/// # Errors
///
/// 此函数在以下情况下会返回错误：
///
/// * [`ConvertError::InvalidSignature`] - 内容开头不是有效的 WEBVTT 签名
/// * [`ConvertError::InvalidCue`] - 某个 cue 块缺少时间行或结束时间戳
/// * [`ConvertError::InvalidTime`] - 某个时间戳无效或无法解析
pub fn parse_webvtt(content: &str) -> Result<WebVTTFile, ConvertError> {
    if !WebVTTFile::verify_signature(content) {
        error!("内容开头不是有效的 WEBVTT 签名，无法解析");
        return Err(ConvertError::InvalidSignature);
    }
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let lines: Vec<&str> = content.lines().collect();
    let mut cues: Vec<CueBlock> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut idx = 0;

    // 跳过文件头块（签名行及其后的头部元数据）
    while idx < lines.len() && !lines[idx].trim().is_empty() {
        idx += 1;
    }

    loop {
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
        if idx >= lines.len() {
            break;
        }
        let block_start = idx;
        while idx < lines.len() && !lines[idx].trim().is_empty() {
            idx += 1;
        }
        parse_block(&lines[block_start..idx], &mut cues, &mut warnings)?;
    }

    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(WebVTTFile { cues, warnings })
}

/// 读取并解析一个 WebVTT 文件。
///
/// # Errors
///
/// 文件读取失败时返回 [`ConvertError::Io`]；
/// 内容解析失败时返回 [`parse_webvtt`] 的错误。
pub fn parse_webvtt_file(path: impl AsRef<Path>) -> Result<WebVTTFile, ConvertError> {
    let content = std::fs::read_to_string(path)?;
    parse_webvtt(&content)
}

/// 解释一个以空行分隔的块：注释、样式和区域块被跳过，
/// 其余块作为 cue 解析。
fn parse_block(
    block: &[&str],
    cues: &mut Vec<CueBlock>,
    warnings: &mut Vec<String>,
) -> Result<(), ConvertError> {
    let Some(&first) = block.first() else {
        return Ok(());
    };

    let keyword = first.trim();
    if keyword == BLOCK_STYLE
        || keyword == BLOCK_REGION
        || keyword == BLOCK_NOTE
        || keyword.starts_with("NOTE ")
        || keyword.starts_with("NOTE\t")
    {
        debug!("跳过 {} 块", keyword.split_whitespace().next().unwrap_or(""));
        return Ok(());
    }

    let (identifier, timing_idx) = if first.contains(TIMING_ARROW) {
        (None, 0)
    } else {
        (Some(first.trim().to_string()), 1)
    };
    let Some(timing_line) = block.get(timing_idx) else {
        return Err(ConvertError::InvalidCue(format!(
            "cue 块 '{keyword}' 缺少时间行"
        )));
    };
    if !timing_line.contains(TIMING_ARROW) {
        return Err(ConvertError::InvalidCue(format!(
            "cue 块 '{keyword}' 的第二行不是时间行"
        )));
    }

    let (start_ms, end_ms) = utils::parse_timing_line(timing_line, warnings)?;
    let payload_raw = block[timing_idx + 1..].join("\n");
    let payload = cue_text::parse_cue_text(&payload_raw, warnings);

    cues.push(CueBlock {
        identifier: identifier.filter(|id| !id.is_empty()),
        start_ms,
        end_ms,
        payload,
    });
    Ok(())
}
