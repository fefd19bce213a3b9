//! # cue 文本解析
//!
//! 将单个 cue 的原始负载文本解析为嵌套的标记节点树。
//! 起始标签名后以 `.` 分隔类名，`<v>` 和 `<lang>` 在空白之后
//! 携带注解；未知标签被透明展开（内容保留，标签丢弃）；
//! 换行标记附加在当前嵌套深度的前一个节点上。

use std::iter::Peekable;
use std::str::{Chars, FromStr};

use caption_helper_core::{CueComponent, CueNode, CueTagKind};

use super::state::{OpenSpan, SpanTag};
use super::utils::decode_character_reference;

/// 解析一个 cue 的负载文本，返回顶层节点序列。
///
/// 该函数是容忍式的：任何异常（未知标签、未匹配的结束标签、
/// 未闭合的标签、时间戳标签）都只产生警告，不会失败。
/// cue 结束时仍未闭合的 span（例如合法的无结束标签 `<v>`）
/// 会被自动闭合。
pub(super) fn parse_cue_text(payload: &str, warnings: &mut Vec<String>) -> Vec<CueNode> {
    let mut base: Vec<CueNode> = Vec::new();
    let mut stack: Vec<OpenSpan> = Vec::new();
    let mut text = String::new();
    let mut chars = payload.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush_text(&mut text, &mut base, &mut stack);
                mark_terminator(current_list(&mut base, &mut stack));
            }
            '&' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '#' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek() == Some(&';') {
                    chars.next();
                    if let Some(decoded) = decode_character_reference(&name) {
                        text.push(decoded);
                    } else {
                        warnings.push(format!("忽略了未知的字符引用 '&{name};'"));
                    }
                } else {
                    // 不是字符引用，按字面文本处理
                    text.push('&');
                    text.push_str(&name);
                }
            }
            '<' => {
                flush_text(&mut text, &mut base, &mut stack);
                handle_tag(&mut chars, &mut base, &mut stack, warnings);
            }
            _ => text.push(c),
        }
    }

    flush_text(&mut text, &mut base, &mut stack);
    while let Some(span) = stack.pop() {
        close_span(span, &mut base, &mut stack);
    }
    base
}

/// 返回当前应写入的节点列表：最内层未闭合 span 的子列表，或顶层列表。
fn current_list<'a>(
    base: &'a mut Vec<CueNode>,
    stack: &'a mut Vec<OpenSpan>,
) -> &'a mut Vec<CueNode> {
    match stack.last_mut() {
        Some(span) => &mut span.children,
        None => base,
    }
}

/// 将累积的文本作为一个文本节点写入当前列表。
fn flush_text(text: &mut String, base: &mut Vec<CueNode>, stack: &mut Vec<OpenSpan>) {
    if text.is_empty() {
        return;
    }
    current_list(base, stack).push(CueNode::new(CueComponent::text(std::mem::take(text))));
}

/// 将换行标记附加在列表的最后一个节点上；列表为空时
/// 补一个空文本节点来承载标记。
fn mark_terminator(list: &mut Vec<CueNode>) {
    match list.last_mut() {
        Some(node) => node.terminator = true,
        None => list.push(CueNode::with_terminator(CueComponent::text(""))),
    }
}

/// 处理 `<` 之后的标签内容（起始、结束或时间戳标签）。
fn handle_tag(
    chars: &mut Peekable<Chars<'_>>,
    base: &mut Vec<CueNode>,
    stack: &mut Vec<OpenSpan>,
    warnings: &mut Vec<String>,
) {
    let mut tag_buf = String::new();
    let mut tag_closed = false;
    for c in chars.by_ref() {
        if c == '>' {
            tag_closed = true;
            break;
        }
        tag_buf.push(c);
    }
    if !tag_closed {
        warnings.push(format!("cue 文本中的标签 '<{tag_buf}' 未闭合，已忽略"));
        return;
    }

    if let Some(name) = tag_buf.strip_prefix('/') {
        handle_end_tag(name.trim(), base, stack, warnings);
        return;
    }

    if tag_buf.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        warnings.push(format!("忽略了时间戳标签 <{tag_buf}>"));
        return;
    }

    // 起始标签：名称[.类名...] [注解]
    let (tag_part, annotation) = match tag_buf.split_once(char::is_whitespace) {
        Some((tag, rest)) => {
            let rest = rest.trim();
            (tag, (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (tag_buf.as_str(), None),
    };
    let mut pieces = tag_part.split('.');
    let name = pieces.next().unwrap_or("");
    let classes: Vec<String> = pieces
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();

    let tag = match CueTagKind::from_str(name) {
        Ok(kind) => SpanTag::Known(kind),
        Err(_) => {
            warnings.push(format!("未知的 cue 标签 <{name}>，保留其内容"));
            SpanTag::Unknown(name.to_string())
        }
    };
    if tag == SpanTag::Known(CueTagKind::Voice) && annotation.is_none() {
        warnings.push("说话人标签 <v> 缺少注解".to_string());
    }

    stack.push(OpenSpan {
        tag,
        classes,
        annotation,
        children: Vec::new(),
    });
}

/// 处理结束标签：与最内层未闭合 span 匹配时将其闭合，否则忽略。
fn handle_end_tag(
    name: &str,
    base: &mut Vec<CueNode>,
    stack: &mut Vec<OpenSpan>,
    warnings: &mut Vec<String>,
) {
    if stack
        .last()
        .is_some_and(|span| span.tag.name().eq_ignore_ascii_case(name))
    {
        if let Some(span) = stack.pop() {
            close_span(span, base, stack);
        }
    } else {
        warnings.push(format!("无法匹配的结束标签 </{name}>，已忽略"));
    }
}

/// 将一个已结束的 span 组装为节点并写入当前列表。
/// 未知标签不产生节点，其子节点被接入当前列表。
fn close_span(span: OpenSpan, base: &mut Vec<CueNode>, stack: &mut Vec<OpenSpan>) {
    let OpenSpan {
        tag,
        classes,
        annotation,
        children,
    } = span;
    let list = current_list(base, stack);
    let component = match tag {
        SpanTag::Unknown(_) => {
            list.extend(children);
            return;
        }
        SpanTag::Known(CueTagKind::Bold) => CueComponent::Bold {
            classes,
            internal: children,
        },
        SpanTag::Known(CueTagKind::Italic) => CueComponent::Italic {
            classes,
            internal: children,
        },
        SpanTag::Known(CueTagKind::Underline) => CueComponent::Underline {
            classes,
            internal: children,
        },
        SpanTag::Known(CueTagKind::Language) => CueComponent::Language {
            annotation: annotation.unwrap_or_default(),
            classes,
            internal: children,
        },
        SpanTag::Known(CueTagKind::Voice) => CueComponent::Voice {
            annotation: annotation.unwrap_or_default(),
            classes,
            internal: children,
        },
    };
    list.push(CueNode::new(component));
}
