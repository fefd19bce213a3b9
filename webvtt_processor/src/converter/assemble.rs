//! # 文档组装
//!
//! 将扁平化得到的段落写入 [`CaptionDocument`]：每个段落按其
//! 非空文本段的数量决定直接写入单个文本条目，还是先创建一个
//! 行内分组再逐段挂入。每个文本条目都带有由 cue 时间范围和
//! 文本段标注组成的溯源记录。

use caption_helper_core::{
    CaptionDocument, ContentLayer, ConvertError, CueBlock, ItemLabel, ProvenanceTrack,
};

use super::state::{AnnotatedParagraph, AnnotatedText};

/// 行内分组的名称，标记其来源是一个 cue 的多段文本。
const CUE_SPAN_GROUP_NAME: &str = "WebVTT cue span";

/// 把一个 cue 的段落列表写入文档。
///
/// 没有任何非空文本段的段落被跳过，不产生条目。
///
/// # Errors
///
/// 写入文档失败时返回 [`ConvertError::Sink`]。
pub(super) fn assemble_cue(
    doc: &mut CaptionDocument,
    cue: &CueBlock,
    paragraphs: &[AnnotatedParagraph],
) -> Result<(), ConvertError> {
    for paragraph in paragraphs {
        let items: Vec<&AnnotatedText> = paragraph
            .items
            .iter()
            .filter(|item| !item.text.is_empty())
            .collect();
        match items.as_slice() {
            [] => {}
            [item] => {
                doc.add_text(
                    ItemLabel::Text,
                    item.text.clone(),
                    ContentLayer::Body,
                    Some(build_provenance(cue, item)),
                    item.formatting,
                    None,
                )?;
            }
            many => {
                let group = doc.add_inline_group(CUE_SPAN_GROUP_NAME, ContentLayer::Body);
                for item in many {
                    doc.add_text(
                        ItemLabel::Text,
                        item.text.clone(),
                        ContentLayer::Body,
                        Some(build_provenance(cue, item)),
                        item.formatting,
                        Some(group),
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// 由 cue 的时间范围和一个文本段的标注构建溯源记录。
///
/// 类名按标签种类渲染为 `"b.highlight.red"` 形式的字符串，
/// 每个种类一条。空的语言、类名集合和空说话人渲染为缺失。
fn build_provenance(cue: &CueBlock, item: &AnnotatedText) -> ProvenanceTrack {
    let languages = (!item.languages.is_empty()).then(|| item.languages.clone());
    let classes = (!item.classes.is_empty()).then(|| {
        item.classes
            .iter()
            .map(|bucket| {
                let mut rendered = bucket.kind.as_str().to_string();
                for name in &bucket.names {
                    rendered.push('.');
                    rendered.push_str(name);
                }
                rendered
            })
            .collect()
    });

    ProvenanceTrack {
        start_ms: cue.start_ms,
        end_ms: cue.end_ms,
        identifier: cue.identifier.clone(),
        languages,
        classes,
        voice: item.voice.clone().filter(|voice| !voice.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use caption_helper_core::{CueTagKind, DocItem};

    use super::super::state::ClassBucket;
    use super::*;

    fn cue() -> CueBlock {
        CueBlock {
            identifier: Some("intro".to_string()),
            start_ms: 1000,
            end_ms: 4000,
            payload: Vec::new(),
        }
    }

    fn item(text: &str) -> AnnotatedText {
        AnnotatedText {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_item_paragraph_emits_plain_text() {
        let mut doc = CaptionDocument::new("test", None);
        let paragraph = AnnotatedParagraph {
            items: vec![item("Hello world")],
        };
        assemble_cue(&mut doc, &cue(), &[paragraph]).unwrap();

        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.groups().count(), 0);
        let text = doc.texts().next().unwrap();
        assert_eq!(text.text, "Hello world");
        assert_eq!(text.parent, None);
        let prov = text.prov.as_ref().unwrap();
        assert_eq!(prov.start_ms, 1000);
        assert_eq!(prov.end_ms, 4000);
        assert_eq!(prov.identifier.as_deref(), Some("intro"));
        assert_eq!(prov.languages, None);
        assert_eq!(prov.classes, None);
        assert_eq!(prov.voice, None);
    }

    #[test]
    fn test_multi_item_paragraph_emits_group_with_children() {
        let mut doc = CaptionDocument::new("test", None);
        let paragraph = AnnotatedParagraph {
            items: vec![item("plain "), item("bold")],
        };
        assemble_cue(&mut doc, &cue(), &[paragraph]).unwrap();

        let groups: Vec<_> = doc.groups().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "WebVTT cue span");
        assert_eq!(groups[0].children.len(), 2);
        let texts: Vec<_> = doc.texts().collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.iter().all(|t| t.parent.is_some()));
    }

    #[test]
    fn test_empty_paragraphs_and_items_are_skipped() {
        let mut doc = CaptionDocument::new("test", None);
        let paragraphs = vec![
            AnnotatedParagraph::default(),
            AnnotatedParagraph {
                items: vec![item(""), item("kept")],
            },
        ];
        assemble_cue(&mut doc, &cue(), &paragraphs).unwrap();

        // 空文本段被过滤后只剩一个，直接写入而不分组
        assert_eq!(doc.items.len(), 1);
        assert!(matches!(&doc.items[0], DocItem::Text(t) if t.text == "kept"));
    }

    #[test]
    fn test_provenance_renders_classes_and_voice() {
        let mut doc = CaptionDocument::new("test", None);
        let annotated = AnnotatedText {
            text: "styled".to_string(),
            voice: Some("Esme".to_string()),
            languages: vec!["en".to_string()],
            classes: vec![
                ClassBucket {
                    kind: CueTagKind::Bold,
                    names: vec!["x".to_string(), "y".to_string()],
                },
                ClassBucket {
                    kind: CueTagKind::Voice,
                    names: vec!["loud".to_string()],
                },
            ],
            ..Default::default()
        };
        let paragraph = AnnotatedParagraph {
            items: vec![annotated],
        };
        assemble_cue(&mut doc, &cue(), &[paragraph]).unwrap();

        let prov = doc.texts().next().unwrap().prov.as_ref().unwrap();
        assert_eq!(
            prov.classes,
            Some(vec!["b.x.y".to_string(), "v.loud".to_string()])
        );
        assert_eq!(prov.languages, Some(vec!["en".to_string()]));
        assert_eq!(prov.voice.as_deref(), Some("Esme"));
    }

    #[test]
    fn test_empty_voice_is_rendered_absent() {
        let mut doc = CaptionDocument::new("test", None);
        let annotated = AnnotatedText {
            text: "anonymous".to_string(),
            voice: Some(String::new()),
            ..Default::default()
        };
        let paragraph = AnnotatedParagraph {
            items: vec![annotated],
        };
        assemble_cue(&mut doc, &cue(), &[paragraph]).unwrap();

        assert_eq!(doc.texts().next().unwrap().prov.as_ref().unwrap().voice, None);
    }
}
