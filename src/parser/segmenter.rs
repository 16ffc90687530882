//! Line-oriented block segmentation.

use std::borrow::Cow;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result, Warning};
use crate::model::{Block, Segmentation};

use super::{ErrorMode, ParseOptions};

/// Three backticks, optionally followed by an info string without backticks.
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"^```([^`]*)$").expect("fence pattern is valid"))
}

/// Segment raw text into blocks with default (lenient) options.
///
/// Never fails: an unterminated fence is reported through
/// [`Segmentation::warnings`].
pub fn segment(raw: &str) -> Segmentation {
    let mut segmenter = Segmenter::new();
    for line in raw.lines() {
        segmenter.push_line(line);
    }
    segmenter.finish()
}

/// Segment raw text with explicit options.
pub fn segment_with_options(raw: &str, options: &ParseOptions) -> Result<Segmentation> {
    let text: Cow<'_, str> = if options.normalize_unicode {
        Cow::Owned(raw.nfc().collect())
    } else {
        Cow::Borrowed(raw)
    };

    let segmentation = segment(&text);

    if options.error_mode == ErrorMode::Strict {
        if let Some(warning) = segmentation.warnings.first() {
            return Err(Error::Structure(warning.clone()));
        }
    }

    Ok(segmentation)
}

/// Incremental segmenter state.
///
/// Lines are fed one at a time with [`push_line`](Self::push_line); the
/// fence flag and the code buffer carry across calls.
#[derive(Debug, Default)]
pub struct Segmenter {
    blocks: Vec<Block>,
    warnings: Vec<Warning>,
    line_number: usize,
    fence: Option<OpenFence>,
}

#[derive(Debug)]
struct OpenFence {
    opened_at: usize,
    language: Option<String>,
    lines: Vec<String>,
}

impl Segmenter {
    /// Create a segmenter outside any fence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a fence is currently open.
    pub fn in_fence(&self) -> bool {
        self.fence.is_some()
    }

    /// Classify one raw line (without its line terminator).
    ///
    /// NUL characters are dropped before classification.
    pub fn push_line(&mut self, line: &str) {
        self.line_number += 1;

        let line: Cow<'_, str> = if line.contains('\0') {
            Cow::Owned(line.replace('\0', ""))
        } else {
            Cow::Borrowed(line)
        };
        let line: &str = &line;

        if let Some(caps) = fence_regex().captures(line.trim()) {
            match self.fence.take() {
                Some(open) => self.blocks.push(Block::CodeBlock {
                    lines: open.lines,
                    language: open.language,
                }),
                None => {
                    // The language is the first word of the info string.
                    let language = caps
                        .get(1)
                        .and_then(|m| m.as_str().split_whitespace().next())
                        .map(str::to_string);
                    self.fence = Some(OpenFence {
                        opened_at: self.line_number,
                        language,
                        lines: Vec::new(),
                    });
                }
            }
            return;
        }

        if let Some(open) = self.fence.as_mut() {
            open.lines.push(line.to_string());
            return;
        }

        if line.trim().is_empty() {
            self.blocks.push(Block::Spacer);
        } else if line.starts_with('#') {
            let run = line.len() - line.trim_start_matches('#').len();
            let level = u8::try_from(run).unwrap_or(u8::MAX);
            self.blocks.push(Block::Heading {
                level,
                text: line[run..].trim().to_string(),
            });
        } else {
            self.blocks.push(Block::paragraph(line.trim()));
        }
    }

    /// Close the segmenter, flushing an unterminated fence as code.
    pub fn finish(mut self) -> Segmentation {
        if let Some(open) = self.fence.take() {
            let warning = Warning::UnterminatedFence {
                line: open.opened_at,
                buffered_lines: open.lines.len(),
            };
            warn!("{}", warning);
            self.warnings.push(warning);
            self.blocks.push(Block::CodeBlock {
                lines: open.lines,
                language: open.language,
            });
        }

        debug!(
            "segmented {} lines into {} blocks",
            self.line_number,
            self.blocks.len()
        );

        Segmentation {
            blocks: self.blocks,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    #[test]
    fn test_end_to_end_sample() {
        let seg = segment("# Title\n\nHello world\n\n```\ncode line\n```");
        assert_eq!(
            seg.blocks,
            vec![
                Block::heading(1, "Title"),
                Block::Spacer,
                Block::paragraph("Hello world"),
                Block::Spacer,
                Block::code(["code line"]),
            ]
        );
        assert!(seg.warnings.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let seg = segment("");
        assert!(seg.is_empty());
        assert!(seg.warnings.is_empty());
    }

    #[test]
    fn test_heading_levels() {
        let seg = segment("# One\n## Two\n### Three\n###### Six\n#NoSpace\n#");
        assert_eq!(
            seg.blocks,
            vec![
                Block::heading(1, "One"),
                Block::heading(2, "Two"),
                Block::heading(3, "Three"),
                Block::heading(6, "Six"),
                Block::heading(1, "NoSpace"),
                Block::heading(1, ""),
            ]
        );
    }

    #[test]
    fn test_indented_hash_is_paragraph() {
        let seg = segment("  # not a heading");
        assert_eq!(seg.blocks, vec![Block::paragraph("# not a heading")]);
    }

    #[test]
    fn test_one_line_one_paragraph() {
        let seg = segment("first line\nsecond line");
        assert_eq!(seg.count(BlockKind::Paragraph), 2);
    }

    #[test]
    fn test_whitespace_only_line_is_spacer() {
        let seg = segment("a\n   \t\nb");
        assert_eq!(
            seg.blocks,
            vec![Block::paragraph("a"), Block::Spacer, Block::paragraph("b")]
        );
    }

    #[test]
    fn test_code_preserved_verbatim() {
        let seg = segment("```rust\n    indented\n\n# not heading\n```");
        assert_eq!(
            seg.blocks,
            vec![Block::CodeBlock {
                lines: vec![
                    "    indented".to_string(),
                    String::new(),
                    "# not heading".to_string()
                ],
                language: Some("rust".to_string()),
            }]
        );
    }

    #[test]
    fn test_indented_fence_toggles() {
        let seg = segment("  ```\nx\n  ```  ");
        assert_eq!(seg.blocks, vec![Block::code(["x"])]);
    }

    #[test]
    fn test_fence_with_multi_word_info_string() {
        let seg = segment("```python title=\"demo\"\nprint(1)\n```\n\n# After\ntext");
        assert_eq!(
            seg.blocks,
            vec![
                Block::CodeBlock {
                    lines: vec!["print(1)".into()],
                    language: Some("python".into()),
                },
                Block::Spacer,
                Block::heading(1, "After"),
                Block::paragraph("text"),
            ]
        );
        assert!(seg.warnings.is_empty());

        let seg = segment("```js {1,3}\nlet a;\n```");
        assert_eq!(
            seg.blocks,
            vec![Block::CodeBlock {
                lines: vec!["let a;".into()],
                language: Some("js".into()),
            }]
        );
    }

    #[test]
    fn test_strict_mode_accepts_info_string_fences() {
        let options = ParseOptions::new().strict();
        let seg = segment_with_options("```rust ignore\nfn x() {}\n```", &options).unwrap();
        assert_eq!(seg.count(BlockKind::CodeBlock), 1);
    }

    #[test]
    fn test_four_backticks_is_not_a_fence() {
        let seg = segment("````\nx");
        assert_eq!(seg.count(BlockKind::CodeBlock), 0);
        assert_eq!(seg.count(BlockKind::Paragraph), 2);
    }

    #[test]
    fn test_empty_code_block() {
        let seg = segment("```\n```");
        assert_eq!(seg.blocks, vec![Block::code(Vec::<String>::new())]);
    }

    #[test]
    fn test_unterminated_fence() {
        let seg = segment("intro\n```python\nprint(1)\n\nprint(2)");
        assert_eq!(seg.blocks.len(), 2);
        assert_eq!(
            seg.blocks[1],
            Block::CodeBlock {
                lines: vec!["print(1)".into(), String::new(), "print(2)".into()],
                language: Some("python".into()),
            }
        );
        assert_eq!(
            seg.warnings,
            vec![Warning::UnterminatedFence {
                line: 2,
                buffered_lines: 3
            }]
        );
    }

    #[test]
    fn test_strict_mode_rejects_unterminated_fence() {
        let options = ParseOptions::new().strict();
        let result = segment_with_options("```\nx", &options);
        assert!(matches!(result, Err(Error::Structure(_))));

        let ok = segment_with_options("```\nx\n```", &options).unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_normalization() {
        // "e" + combining acute accent
        let raw = "Cafe\u{0301}";
        let plain = segment_with_options(raw, &ParseOptions::new()).unwrap();
        assert_eq!(plain.blocks[0].text(), Some("Cafe\u{0301}"));

        let options = ParseOptions::new().with_normalization(true);
        let normalized = segment_with_options(raw, &options).unwrap();
        assert_eq!(normalized.blocks[0].text(), Some("Caf\u{00e9}"));
    }

    #[test]
    fn test_nul_characters_are_dropped() {
        let seg = segment("# Ti\0tle\n\0\n```\nco\0de\n```");
        assert_eq!(
            seg.blocks,
            vec![
                Block::heading(1, "Title"),
                Block::Spacer,
                Block::code(["code"]),
            ]
        );
    }

    #[test]
    fn test_crlf_input() {
        let seg = segment("# A\r\n\r\nbody\r\n");
        assert_eq!(
            seg.blocks,
            vec![Block::heading(1, "A"), Block::Spacer, Block::paragraph("body")]
        );
    }

    #[test]
    fn test_incremental_segmenter() {
        let mut segmenter = Segmenter::new();
        segmenter.push_line("```");
        assert!(segmenter.in_fence());
        segmenter.push_line("x");
        segmenter.push_line("```");
        assert!(!segmenter.in_fence());
        let seg = segmenter.finish();
        assert_eq!(seg.blocks, vec![Block::code(["x"])]);
    }
}
