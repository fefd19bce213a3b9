//! # WebVTT Processor: A Parser and Document Converter for WebVTT Captions
//!
//! This crate provides tools for handling WebVTT (`.vtt`) caption files as
//! described by the W3C WebVTT specification. It offers a parser that turns
//! file content into timed cue blocks with fully resolved payload markup, and
//! a converter that flattens each cue's markup tree into a structured
//! [`CaptionDocument`] from `caption_helper_core`.
//!
//! The two primary functions you will use are:
//! - [`parse_webvtt`]: Converts WebVTT content into a `WebVTTFile` of cue blocks.
//! - [`convert_webvtt`]: Parses WebVTT content and builds a `CaptionDocument`
//!   in one step.
//!
//! ## ⚠️ Important: Caption Text Only
//!
//! This library extracts cue text and its inline annotations (formatting,
//! voices, languages, CSS classes). Presentation concerns such as cue
//! settings, `STYLE` blocks and `REGION` definitions are recognized but
//! deliberately ignored.
//!
//! ## Examples
//!
//! ```rust
//! use webvtt_processor::convert_webvtt;
//! use caption_helper_core::VttConversionOptions;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let vtt_content = "WEBVTT\n\
//!         \n\
//!         intro\n\
//!         00:00:01.000 --> 00:00:04.000\n\
//!         Hello <b>world</b>\n";
//!
//!     let doc = convert_webvtt(vtt_content, &VttConversionOptions::default())?;
//!
//!     // "Hello " and "world" carry different formatting, so the cue
//!     // becomes an inline group with one text item per run.
//!     assert_eq!(doc.groups().count(), 1);
//!     let texts: Vec<_> = doc.texts().collect();
//!     assert_eq!(texts.len(), 2);
//!     assert_eq!(texts[0].text, "Hello ");
//!     assert!(texts[0].formatting.is_none());
//!     assert_eq!(texts[1].text, "world");
//!     assert!(texts[1].formatting.unwrap().bold);
//!
//!     let prov = texts[0].prov.as_ref().unwrap();
//!     assert_eq!(prov.start_ms, 1000);
//!     assert_eq!(prov.end_ms, 4000);
//!     assert_eq!(prov.identifier.as_deref(), Some("intro"));
//!
//!     assert_eq!(doc.export_to_plaintext(), "Hello world");
//!     Ok(())
//! }
//! ```

pub mod converter;
pub mod parser;

use caption_helper_core::{CaptionDocument, ConvertError, VttConversionOptions};

pub use converter::convert_to_document;
pub use parser::{parse_webvtt, parse_webvtt_file};

/// 解析 WebVTT 内容并一步转换为结构化字幕文档。
///
/// # Errors
///
/// 内容解析失败时返回 [`parse_webvtt`] 的错误；
/// 文档写入失败时返回 [`ConvertError::Sink`]。
pub fn convert_webvtt(
    content: &str,
    options: &VttConversionOptions,
) -> Result<CaptionDocument, ConvertError> {
    let vtt = parse_webvtt(content)?;
    convert_to_document(&vtt, content, options)
}
