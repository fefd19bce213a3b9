//! # cue 负载扁平化
//!
//! 将解析器产出的嵌套标记节点树压成段落的文本段序列。
//! 递归下降树的同时在 [`FlattenState`] 上累积文本和属性，
//! 每个 span 在进入前保存游标、离开后恢复，使属性只作用于
//! 其包裹的内容。

use caption_helper_core::{CueComponent, CueNode, CueTagKind};

use super::state::{AnnotatedParagraph, AnnotatedText, FlattenState};

/// 将一个 cue 的负载树扁平化为段落列表。
///
/// 输出中的段落与负载里的换行标记一一对应；不含任何文本段的
/// 段落（例如空负载或行尾换行产生的）会原样保留，由上层
/// 组装时丢弃。
#[must_use]
pub fn flatten_payload(payload: &[CueNode]) -> Vec<AnnotatedParagraph> {
    let mut state = FlattenState::default();
    flatten_into(&mut state, payload);
    state.into_paragraphs()
}

fn flatten_into(state: &mut FlattenState, nodes: &[CueNode]) {
    for node in nodes {
        match &node.component {
            CueComponent::Text { text } => {
                if !text.is_empty() {
                    state.writable_item().text.push_str(text);
                }
            }
            CueComponent::Bold { classes, internal } => {
                flatten_span(state, internal, |item| {
                    item.formatting_mut().bold = true;
                    item.add_classes(CueTagKind::Bold, classes);
                });
            }
            CueComponent::Italic { classes, internal } => {
                flatten_span(state, internal, |item| {
                    item.formatting_mut().italic = true;
                    item.add_classes(CueTagKind::Italic, classes);
                });
            }
            CueComponent::Underline { classes, internal } => {
                flatten_span(state, internal, |item| {
                    item.formatting_mut().underline = true;
                    item.add_classes(CueTagKind::Underline, classes);
                });
            }
            CueComponent::Language {
                annotation,
                classes,
                internal,
            } => {
                flatten_span(state, internal, |item| {
                    item.add_language(annotation);
                    item.add_classes(CueTagKind::Language, classes);
                });
            }
            CueComponent::Voice {
                annotation,
                classes,
                internal,
            } => {
                flatten_span(state, internal, |item| {
                    // 嵌套说话人相互覆盖，最内层获胜
                    item.voice = Some(annotation.clone());
                    item.add_classes(CueTagKind::Voice, classes);
                });
            }
        }
        if node.terminator {
            state.break_paragraph();
        }
    }
}

/// 处理一个 span：保存游标和属性上下文、应用 span 的属性、
/// 递归处理其内容，最后恢复保存的状态。
fn flatten_span(
    state: &mut FlattenState,
    internal: &[CueNode],
    configure: impl Fn(&mut AnnotatedText),
) {
    let saved = state.save_cursor();
    state.apply_attributes(&configure);
    flatten_into(state, internal);
    state.restore_cursor(saved);
}
