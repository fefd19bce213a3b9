//! # WebVTT 解析器的工具函数
//!
//! 提供时间戳解析、时间行拆分和 HTML 字符引用解码。

use caption_helper_core::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::constants::TIMING_ARROW;

/// WebVTT 时间戳的正则。小时部分可选且可超过两位，毫秒固定三位。
static TIMESTAMP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})$").unwrap());

/// 解析 WebVTT 时间戳字符串到毫秒。
///
/// 支持 `HH:MM:SS.mmm`（小时可超过两位）和 `MM:SS.mmm` 两种形式。
///
/// # Errors
///
/// 当字符串不符合 WebVTT 时间戳格式、分钟或秒的数值超出
/// 范围（应 < 60），或换算后的毫秒数超出 `u64` 可表示的
/// 范围时，返回 [`ConvertError::InvalidTime`]。
pub(super) fn parse_timestamp_to_ms(time_str: &str) -> Result<u64, ConvertError> {
    let caps = TIMESTAMP_REGEX.captures(time_str).ok_or_else(|| {
        ConvertError::InvalidTime(format!("时间戳 '{time_str}' 不符合 WebVTT 格式"))
    })?;

    let hours = match caps.get(1) {
        Some(m) => parse_time_component(m.as_str(), time_str)?,
        None => 0,
    };
    let minutes = parse_time_component(&caps[2], time_str)?;
    let seconds = parse_time_component(&caps[3], time_str)?;
    let millis = parse_time_component(&caps[4], time_str)?;

    if minutes >= 60 {
        return Err(ConvertError::InvalidTime(format!(
            "分钟值 '{minutes}' (应 < 60) 在时间戳 '{time_str}' 中无效"
        )));
    }
    if seconds >= 60 {
        return Err(ConvertError::InvalidTime(format!(
            "秒值 '{seconds}' (应 < 60) 在时间戳 '{time_str}' 中无效"
        )));
    }

    // 小时位数不受限，换算必须防溢出
    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(|| {
            ConvertError::InvalidTime(format!("时间戳 '{time_str}' 超出可表示的毫秒范围"))
        })
}

/// 解析时间戳中的一个数字分量，数值超出 `u64` 时报错而不是中止。
fn parse_time_component(digits: &str, time_str: &str) -> Result<u64, ConvertError> {
    digits.parse().map_err(|_| {
        ConvertError::InvalidTime(format!("数值 '{digits}' 在时间戳 '{time_str}' 中超出范围"))
    })
}

/// 解析 cue 时间行，返回开始和结束时间（毫秒）。
///
/// 结束时间戳之后的 cue 设置会被忽略。开始时间晚于结束时间时
/// 不会丢弃 cue，而是记录警告并把结束时间钳制到开始时间。
///
/// # Errors
///
/// 时间行缺少箭头或结束时间戳时返回 [`ConvertError::InvalidCue`]；
/// 时间戳本身无效时返回 [`ConvertError::InvalidTime`]。
pub(super) fn parse_timing_line(
    line: &str,
    warnings: &mut Vec<String>,
) -> Result<(u64, u64), ConvertError> {
    let (start_part, rest) = line.split_once(TIMING_ARROW).ok_or_else(|| {
        ConvertError::InvalidCue(format!("时间行 '{line}' 缺少 '{TIMING_ARROW}'"))
    })?;
    let start_ms = parse_timestamp_to_ms(start_part.trim())?;

    let mut rest_iter = rest.split_whitespace();
    let end_str = rest_iter
        .next()
        .ok_or_else(|| ConvertError::InvalidCue(format!("时间行 '{line}' 缺少结束时间戳")))?;
    let end_ms = parse_timestamp_to_ms(end_str)?;

    let settings: Vec<&str> = rest_iter.collect();
    if !settings.is_empty() {
        debug!("忽略 cue 设置: {}", settings.join(" "));
    }

    if start_ms > end_ms {
        warnings.push(format!(
            "cue 时间范围无效 (start {start_ms}ms > end {end_ms}ms)，已将结束时间钳制到开始时间"
        ));
        return Ok((start_ms, start_ms));
    }
    Ok((start_ms, end_ms))
}

/// 解码 cue 文本中的一个 HTML 字符引用（不含 `&` 和 `;`）。
///
/// 支持常见命名引用和 `#` 开头的十进制、十六进制数字引用，
/// 无法识别时返回 `None`。
pub(super) fn decode_character_reference(name: &str) -> Option<char> {
    if let Some(num_str) = name.strip_prefix('#') {
        let (radix, digits) = num_str
            .strip_prefix(['x', 'X'])
            .map_or((10, num_str), |stripped| (16, stripped));
        return u32::from_str_radix(digits, radix).ok().and_then(char::from_u32);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "lrm" => Some('\u{200e}'),
        "rlm" => Some('\u{200f}'),
        _ => None,
    }
}
