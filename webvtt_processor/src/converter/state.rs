//! # 扁平化过程的状态和数据结构
//!
//! 扁平化的输出单元是 [`AnnotatedText`]：一段共享同一组
//! 格式化、说话人、语言和类名属性的文本。[`FlattenState`]
//! 持有单个 cue 的段落列表和活动文本段游标，在整个递归
//! 过程中被显式传递。

use caption_helper_core::{CueTagKind, Formatting};

/// 按标签种类归档的 CSS 类名，保持首次出现的顺序并去重。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBucket {
    /// 类名所属的标签种类。
    pub kind: CueTagKind,
    /// 类名列表，按首次出现的顺序。
    pub names: Vec<String>,
}

/// 扁平化输出的一个文本段。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedText {
    /// 累积的字面文本。
    pub text: String,
    /// 生效的说话人。嵌套的说话人 span 相互覆盖而不是并集，
    /// 最内层获胜。
    pub voice: Option<String>,
    /// 生效的格式化标志，未被任何格式化 span 包裹时为 `None`。
    pub formatting: Option<Formatting>,
    /// 按标签种类归档的类名桶，按种类首次出现的顺序。
    pub classes: Vec<ClassBucket>,
    /// 生效的语言标注，按首次出现的顺序去重。
    pub languages: Vec<String>,
}

impl AnnotatedText {
    /// 复制所有属性但不复制文本。
    pub(super) fn copy_meta(&self) -> Self {
        Self {
            text: String::new(),
            voice: self.voice.clone(),
            formatting: self.formatting,
            classes: self.classes.clone(),
            languages: self.languages.clone(),
        }
    }

    /// 返回可写的格式化标志，必要时先初始化。
    pub(super) fn formatting_mut(&mut self) -> &mut Formatting {
        self.formatting.get_or_insert_with(Formatting::default)
    }

    /// 将一组类名并入指定种类的桶，保持插入顺序并去重。
    pub(super) fn add_classes(&mut self, kind: CueTagKind, classes: &[String]) {
        if classes.is_empty() {
            return;
        }
        let bucket = match self.classes.iter_mut().position(|bucket| bucket.kind == kind) {
            Some(found) => &mut self.classes[found],
            None => {
                self.classes.push(ClassBucket {
                    kind,
                    names: Vec::new(),
                });
                // 刚插入，所以一定存在
                let last = self.classes.len() - 1;
                &mut self.classes[last]
            }
        };
        for class in classes {
            if !bucket.names.iter().any(|name| name == class) {
                bucket.names.push(class.clone());
            }
        }
    }

    /// 添加一个语言标注，重复的标注被忽略。
    pub(super) fn add_language(&mut self, language: &str) {
        if !self.languages.iter().any(|known| known == language) {
            self.languages.push(language.to_string());
        }
    }
}

/// 两个换行标记之间的一组文本段。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedParagraph {
    /// 文本段列表，按产生顺序。
    pub items: Vec<AnnotatedText>,
}

/// 活动文本段在段落列表中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    paragraph: usize,
    item: usize,
}

/// 进入 span 时保存的游标位置和属性上下文。
///
/// 连同保存时的段落切分计数一起记录：span 内部出现过
/// 换行标记时，恢复被放弃，切分造成的全局游标重置得以保留。
#[derive(Debug, Clone)]
pub(super) struct SavedCursor {
    cursor: Option<Cursor>,
    context: AnnotatedText,
    breaks: usize,
}

/// 单个 cue 扁平化过程中的可变状态。
///
/// 段落列表对该 cue 只增不减；游标指向后续文本和属性
/// 应当并入的活动文本段；属性上下文累积当前所有未退出
/// span 的属性，是播种和分支新文本段的模板。cue 处理
/// 结束后整个状态被丢弃，不存在跨 cue 的共享。
#[derive(Debug, Default)]
pub(super) struct FlattenState {
    paragraphs: Vec<AnnotatedParagraph>,
    cursor: Option<Cursor>,
    /// 文本始终为空，只承载属性。
    context: AnnotatedText,
    breaks: usize,
}

impl FlattenState {
    /// 返回可以写入新属性或文本的活动文本段。
    ///
    /// 活动段的文本为空时直接原地复用，让多个嵌套的零文本
    /// span 合并到同一个文本段上；文本非空时以当前属性上下文
    /// 的副本开出一个新的空文本段。分支从上下文而不是活动段
    /// 复制：活动段可能被已退出的内层 span 原地追加过属性，
    /// 那些属性不属于后续兄弟节点。
    pub(super) fn writable_item(&mut self) -> &mut AnnotatedText {
        let mut cursor = self.ensure_cursor();
        if !self.paragraphs[cursor.paragraph].items[cursor.item].text.is_empty() {
            let branched = self.context.copy_meta();
            let paragraph = &mut self.paragraphs[cursor.paragraph];
            paragraph.items.push(branched);
            cursor.item = paragraph.items.len() - 1;
            self.cursor = Some(cursor);
        }
        &mut self.paragraphs[cursor.paragraph].items[cursor.item]
    }

    /// 进入 span 时应用其属性：同时写入属性上下文和活动文本段。
    /// 重复应用同一属性是无害的，所有属性操作都是幂等的。
    pub(super) fn apply_attributes(&mut self, configure: &dyn Fn(&mut AnnotatedText)) {
        configure(&mut self.context);
        configure(self.writable_item());
    }

    /// 游标缺失时在最后一个段落中播种一个携带当前属性上下文
    /// 的空文本段。段落和文本段都是惰性创建的：空负载不会
    /// 产生任何文本段。
    fn ensure_cursor(&mut self) -> Cursor {
        if let Some(cursor) = self.cursor {
            return cursor;
        }
        if self.paragraphs.is_empty() {
            self.paragraphs.push(AnnotatedParagraph::default());
        }
        let paragraph = self.paragraphs.len() - 1;
        self.paragraphs[paragraph].items.push(self.context.copy_meta());
        let cursor = Cursor {
            paragraph,
            item: self.paragraphs[paragraph].items.len() - 1,
        };
        self.cursor = Some(cursor);
        cursor
    }

    /// 保存进入 span 前的游标位置和属性上下文。
    pub(super) fn save_cursor(&self) -> SavedCursor {
        SavedCursor {
            cursor: self.cursor,
            context: self.context.clone(),
            breaks: self.breaks,
        }
    }

    /// 离开 span 时恢复保存的游标位置和属性上下文，使后续兄弟
    /// 节点回到进入该 span 之前的状态。span 内部切分过段落时
    /// 不恢复：换行标记对整个 cue 全局生效，与嵌套深度无关。
    pub(super) fn restore_cursor(&mut self, saved: SavedCursor) {
        if saved.breaks == self.breaks {
            self.cursor = saved.cursor;
            self.context = saved.context;
        }
    }

    /// 结束当前段落：追加一个新的空段落，重置游标和属性上下文。
    /// 新段落的首个文本段不继承任何 span 的属性。
    pub(super) fn break_paragraph(&mut self) {
        if self.paragraphs.is_empty() {
            // 承载换行标记的空负载段落同样要进入输出
            self.paragraphs.push(AnnotatedParagraph::default());
        }
        self.paragraphs.push(AnnotatedParagraph::default());
        self.cursor = None;
        self.context = AnnotatedText::default();
        self.breaks += 1;
    }

    /// 交出该 cue 的全部段落。
    pub(super) fn into_paragraphs(self) -> Vec<AnnotatedParagraph> {
        self.paragraphs
    }
}
