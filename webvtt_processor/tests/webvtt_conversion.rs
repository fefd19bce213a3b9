//! 端到端转换测试：真实形态的 WebVTT 文件从解析到文档组装。

use caption_helper_core::{CaptionDocument, ConvertError, VttConversionOptions, VttConversionOptionsBuilder};
use webvtt_processor::{convert_webvtt, parse_webvtt};

const REAL_WORLD_VTT: &str = include_str!("test_data/real_world.vtt");

#[test]
fn converts_real_world_file() {
    let vtt = parse_webvtt(REAL_WORLD_VTT).expect("样本应能解析");
    assert_eq!(vtt.cues.len(), 6);
    assert!(vtt.warnings.is_empty(), "样本不应产生警告: {:?}", vtt.warnings);

    let options = VttConversionOptionsBuilder::default()
        .filename("town_hall.vtt")
        .build()
        .expect("选项应能构建");
    let doc = convert_webvtt(REAL_WORLD_VTT, &options).expect("样本应能转换");

    assert_eq!(doc.name, "town_hall");
    assert_eq!(doc.origin.as_ref().unwrap().mimetype, "text/vtt");

    // 多文本段的段落产生分组：cue 2、cue 3 的第一行和 cue 4
    assert_eq!(doc.groups().count(), 3);
    assert!(doc.groups().all(|g| g.name == "WebVTT cue span"));
    assert_eq!(doc.texts().count(), 14);

    assert_eq!(
        doc.export_to_plaintext(),
        "Good morning everyone.\n\
         Thanks, glad to be here.\n\
         Today we cover three topics:\n\
         budget, staffing & planning.\n\
         Guten Tag means good day.\n\
         Back in five minutes\n\
         Any questions so far?"
    );
}

#[test]
fn provenance_follows_cue_and_run() {
    let doc = convert_webvtt(REAL_WORLD_VTT, &VttConversionOptions::default()).unwrap();
    let texts: Vec<_> = doc.texts().collect();

    // cue 1：单个带说话人的文本段，直接写入
    let first = texts[0];
    assert_eq!(first.text, "Good morning everyone.");
    assert!(first.parent.is_none());
    let prov = first.prov.as_ref().unwrap();
    assert_eq!((prov.start_ms, prov.end_ms), (1000, 4000));
    assert_eq!(prov.identifier.as_deref(), Some("1"));
    assert_eq!(prov.voice.as_deref(), Some("Esme"));
    assert_eq!(prov.classes, None);

    // cue 2：说话人 span 的类名落到每个文本段上
    let thanks = texts.iter().find(|t| t.text == "Thanks, ").unwrap();
    assert!(thanks.parent.is_some());
    let prov = thanks.prov.as_ref().unwrap();
    assert_eq!(prov.voice.as_deref(), Some("Mary"));
    assert_eq!(prov.classes, Some(vec!["v.first.loud".to_string()]));

    let glad = texts.iter().find(|t| t.text == "glad").unwrap();
    assert!(glad.formatting.unwrap().italic);
    assert_eq!(glad.prov.as_ref().unwrap().voice.as_deref(), Some("Mary"));

    // cue 3：加粗 span 的类名渲染为 "b.highlight"
    let topics = texts.iter().find(|t| t.text == "three topics").unwrap();
    assert!(topics.formatting.unwrap().bold);
    assert_eq!(
        topics.prov.as_ref().unwrap().classes,
        Some(vec!["b.highlight".to_string()])
    );

    // cue 3 换行后的第二段单独成条目，不在分组里
    let budget = texts
        .iter()
        .find(|t| t.text == "budget, staffing & planning.")
        .unwrap();
    assert!(budget.parent.is_none());
    assert_eq!(budget.prov.as_ref().unwrap().identifier.as_deref(), Some("3"));

    // cue 4：语言标注只作用于 lang span 内的文本段
    let greeting = texts.iter().find(|t| t.text == "Guten Tag").unwrap();
    assert_eq!(
        greeting.prov.as_ref().unwrap().languages,
        Some(vec!["de".to_string()])
    );
    let means = texts.iter().find(|t| t.text == " means ").unwrap();
    assert_eq!(means.prov.as_ref().unwrap().languages, None);
    let good_day = texts.iter().find(|t| t.text == "good day").unwrap();
    let formatting = good_day.formatting.unwrap();
    assert!(formatting.bold && formatting.italic);

    // 未闭合的说话人 span 在文件末尾自动闭合
    let question = texts.iter().find(|t| t.text == "Any questions so far?").unwrap();
    assert_eq!(question.prov.as_ref().unwrap().voice.as_deref(), Some("Esme"));
}

#[test]
fn converted_document_round_trips_through_json() {
    let doc = convert_webvtt(REAL_WORLD_VTT, &VttConversionOptions::default()).unwrap();
    let json = serde_json::to_string(&doc).expect("文档应能序列化");
    let restored: CaptionDocument = serde_json::from_str(&json).expect("文档应能反序列化");
    assert_eq!(restored, doc);
}

#[test]
fn recoverable_defects_surface_as_warnings() {
    let content = "WEBVTT\n\
        \n\
        00:00:10.000 --> 00:00:05.000\n\
        reversed timing\n\
        \n\
        00:00:12.000 --> 00:00:13.000\n\
        unknown <c.yellow>tag</c> and <00:00:12.500>timestamp\n";
    let vtt = parse_webvtt(content).expect("可恢复缺陷不应导致解析失败");
    assert_eq!(vtt.cues.len(), 2);
    assert_eq!(vtt.warnings.len(), 3);

    // 钳制后的时间范围仍然有效
    assert_eq!(vtt.cues[0].start_ms, 10_000);
    assert_eq!(vtt.cues[0].end_ms, 10_000);

    // 未知标签透明展开，时间戳标签被丢弃
    let doc = convert_webvtt(content, &VttConversionOptions::default()).unwrap();
    assert_eq!(
        doc.export_to_plaintext(),
        "reversed timing\nunknown tag and timestamp"
    );
}

#[test]
fn invalid_signature_is_fatal() {
    assert!(matches!(
        convert_webvtt("Not a VTT file", &VttConversionOptions::default()),
        Err(ConvertError::InvalidSignature)
    ));
}
