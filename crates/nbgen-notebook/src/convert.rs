//! Markdown to cell-sequence conversion.
//!
//! The conversion walks the markdown with `pulldown-cmark`'s offset
//! iterator so markdown cells are sliced verbatim from the source text:
//!
//! - fenced code blocks become [`Cell::Code`] with empty outputs;
//! - thematic breaks (`---`) split adjacent prose into separate markdown
//!   cells and are not emitted themselves;
//! - all remaining text between those boundaries becomes [`Cell::Markdown`].
//!
//! Cell order always matches the order of the corresponding blocks in the
//! source. Indented code blocks are left inside markdown cells; only
//! explicit fences are treated as executable.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::Cell;

/// Convert markdown text into an ordered cell sequence.
#[must_use]
pub fn markdown_to_cells(markdown: &str) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut prose_start = 0usize;
    let mut code: Option<String> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                // The Start event's range covers the whole fenced block,
                // delimiters included.
                flush_prose(markdown, prose_start..range.start, &mut cells);
                code = Some(String::new());
                prose_start = range.end;
            }
            Event::Text(text) => {
                if let Some(source) = code.as_mut() {
                    source.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(source) = code.take() {
                    cells.push(Cell::code(source.trim_end_matches('\n')));
                }
            }
            Event::Rule => {
                flush_prose(markdown, prose_start..range.start, &mut cells);
                prose_start = range.end;
            }
            _ => {}
        }
    }

    flush_prose(markdown, prose_start..markdown.len(), &mut cells);
    cells
}

/// Push the trimmed prose slice as a markdown cell, if non-empty.
fn flush_prose(markdown: &str, range: std::ops::Range<usize>, cells: &mut Vec<Cell>) {
    let text = markdown[range].trim();
    if !text.is_empty() {
        cells.push(Cell::markdown(text));
    }
}
