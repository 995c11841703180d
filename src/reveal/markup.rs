//! Display blocks for a revealed prefix
//!
//! Replies are lightweight Markdown. A prefix cut mid-reveal may end inside
//! a list item or half a code fence; the parser closes whatever is open, so
//! every prefix yields some block list and the settled text yields the
//! final one.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// One rendered block of a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Heading { level: u8, text: String },
    BulletList(Vec<String>),
    OrderedList { start: u64, items: Vec<String> },
    Code(String),
}

/// What a view draws for the current reveal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    pub blocks: Vec<Block>,
    /// Show the typing cursor
    pub typing: bool,
}

#[derive(Default)]
struct ListBuilder {
    start: Option<u64>,
    items: Vec<String>,
    depth: usize,
}

impl ListBuilder {
    fn finish(self) -> Block {
        match self.start {
            Some(start) => Block::OrderedList {
                start,
                items: self.items,
            },
            None => Block::BulletList(self.items),
        }
    }
}

/// Build the frame for `prefix`
pub fn frame(prefix: &str, settled: bool) -> RevealFrame {
    RevealFrame {
        blocks: blocks(prefix),
        typing: !settled,
    }
}

/// Parse `text` into display blocks. Nested lists are flattened into their
/// outermost list.
pub fn blocks(text: &str) -> Vec<Block> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut list: Option<ListBuilder> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::List(start)) => match list.as_mut() {
                Some(builder) => {
                    push_item(builder, &mut buf);
                    builder.depth += 1;
                }
                None => {
                    list = Some(ListBuilder {
                        start,
                        items: Vec::new(),
                        depth: 1,
                    });
                }
            },
            Event::End(TagEnd::List(_)) => {
                if let Some(builder) = list.as_mut() {
                    builder.depth -= 1;
                    if builder.depth == 0 {
                        if let Some(done) = list.take() {
                            out.push(done.finish());
                        }
                    }
                }
            }
            Event::Start(Tag::Item) => {
                if let Some(builder) = list.as_mut() {
                    push_item(builder, &mut buf);
                }
            }
            Event::End(TagEnd::Item) => {
                if let Some(builder) = list.as_mut() {
                    push_item(builder, &mut buf);
                }
            }
            Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_)) => {
                if list.is_none() {
                    buf.clear();
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if list.is_some() {
                    buf.push(' ');
                } else {
                    out.push(Block::Paragraph(std::mem::take(&mut buf)));
                }
            }
            // Headings and code inside a list item fold into the item text
            Event::End(TagEnd::Heading(_) | TagEnd::CodeBlock) if list.is_some() => {
                let kept = buf.trim_end_matches('\n').len();
                buf.truncate(kept);
                buf.push(' ');
            }
            Event::End(TagEnd::Heading(level)) => {
                #[allow(clippy::cast_possible_truncation)]
                let level = level as u8;
                out.push(Block::Heading {
                    level,
                    text: std::mem::take(&mut buf),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = std::mem::take(&mut buf);
                out.push(Block::Code(code.trim_end_matches('\n').to_string()));
            }
            Event::Text(text) | Event::Code(text) => buf.push_str(&text),
            Event::SoftBreak => buf.push(' '),
            Event::HardBreak => buf.push('\n'),
            _ => {}
        }
    }

    out
}

fn push_item(builder: &mut ListBuilder, buf: &mut String) {
    let item = buf.trim();
    if !item.is_empty() {
        builder.items.push(item.to_string());
    }
    buf.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_lists() {
        let text = "Try these steps:\n\n1. Drink water\n2. Rest\n\nSee a doctor if it persists.";
        assert_eq!(
            blocks(text),
            vec![
                Block::Paragraph("Try these steps:".to_string()),
                Block::OrderedList {
                    start: 1,
                    items: vec!["Drink water".to_string(), "Rest".to_string()],
                },
                Block::Paragraph("See a doctor if it persists.".to_string()),
            ]
        );
    }

    #[test]
    fn test_partial_prefix_still_parses() {
        assert_eq!(
            blocks("- Drink wa"),
            vec![Block::BulletList(vec!["Drink wa".to_string()])]
        );
        assert_eq!(blocks("**Impor"), vec![Block::Paragraph("**Impor".to_string())]);
        assert!(blocks("").is_empty());
    }

    #[test]
    fn test_nested_list_flattens() {
        let text = "- outer\n  - inner\n- last";
        assert_eq!(
            blocks(text),
            vec![Block::BulletList(vec![
                "outer".to_string(),
                "inner".to_string(),
                "last".to_string(),
            ])]
        );
    }

    #[test]
    fn test_heading_and_code() {
        let text = "## Care\n\n```\nrest\n```";
        assert_eq!(
            blocks(text),
            vec![
                Block::Heading {
                    level: 2,
                    text: "Care".to_string(),
                },
                Block::Code("rest".to_string()),
            ]
        );
    }

    #[test]
    fn test_blocks_inside_list_items_keep_source_order() {
        let text = "- Rest\n\n  ```\n  sleep 8h\n  ```\n- ## Hydrate\n\nAfter.";
        assert_eq!(
            blocks(text),
            vec![
                Block::BulletList(vec!["Rest sleep 8h".to_string(), "Hydrate".to_string()]),
                Block::Paragraph("After.".to_string()),
            ]
        );
    }

    #[test]
    fn test_frame_typing_flag() {
        assert!(frame("a", false).typing);
        assert!(!frame("a", true).typing);
    }
}
