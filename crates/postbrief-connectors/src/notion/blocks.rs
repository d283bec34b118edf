//! Content chunking for Notion's per-block size limit.
//!
//! A paragraph block's rich text is capped at 2000 characters. Summaries
//! longer than that are split into multiple blocks on line boundaries,
//! so a paragraph is never cut mid-way unless it alone exceeds the limit.

use serde_json::{json, Value};

/// Notion's rich-text content limit per block.
pub const NOTION_MAX_BLOCK_LEN: usize = 2000;

/// Split `text` into chunks of at most `max_len` bytes.
///
/// Lines are accumulated into a chunk while the running length (with the
/// joining newlines counted) stays within the limit; a line that would
/// overflow closes the current chunk and starts the next one. A single
/// line longer than the limit is hard-split at the limit boundary and the
/// remainder carried into the next chunk.
///
/// Concatenating the chunks, reinserting a newline wherever the split
/// fell on a line boundary, reproduces the input exactly.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "chunk limit must be positive");

    let mut chunks = Vec::new();
    // None means no chunk is open; Some("") means an open chunk holding
    // one empty line. The distinction keeps leading newlines intact.
    let mut current: Option<String> = None;

    for line in text.split('\n') {
        let mut line = line;

        if line.len() > max_len {
            // Close whatever is open, then hard-split the oversized line.
            if let Some(chunk) = current.take() {
                chunks.push(chunk);
            }
            while line.len() > max_len {
                let (head, rest) = line.split_at(max_len);
                chunks.push(head.to_string());
                line = rest;
            }
            current = Some(line.to_string());
            continue;
        }

        match current {
            None => current = Some(line.to_string()),
            Some(ref mut chunk) if chunk.len() + 1 + line.len() <= max_len => {
                chunk.push('\n');
                chunk.push_str(line);
            }
            Some(_) => {
                if let Some(chunk) = current.take() {
                    chunks.push(chunk);
                }
                current = Some(line.to_string());
            }
        }
    }

    if let Some(chunk) = current {
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
    }

    chunks
}

/// Build Notion paragraph block objects from text chunks.
pub fn paragraph_blocks(chunks: &[String]) -> Vec<Value> {
    chunks
        .iter()
        .map(|content| {
            json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [
                        {"type": "text", "text": {"content": content}}
                    ]
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("Hello, world!", 2000);
        assert_eq!(chunks, vec!["Hello, world!"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 2000).is_empty());
    }

    #[test]
    fn splits_on_line_boundaries() {
        let a = "a".repeat(1200);
        let b = "b".repeat(1200);
        let text = format!("{a}\n{b}");
        let chunks = chunk_text(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], a);
        assert_eq!(chunks[1], b);
        // Rejoining with the newline restores the input.
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn keeps_lines_together_while_they_fit() {
        let text = "one\ntwo\nthree";
        let chunks = chunk_text(text, 2000);
        assert_eq!(chunks, vec!["one\ntwo\nthree"]);
    }

    #[test]
    fn joining_newlines_count_toward_the_limit() {
        // "aaaa\nbbbb" is 9 bytes; with a limit of 8 the lines must split.
        let chunks = chunk_text("aaaa\nbbbb", 8);
        assert_eq!(chunks, vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn two_long_lines_make_four_chunks_with_exact_boundaries() {
        let line1 = "x".repeat(2500);
        let line2 = "y".repeat(2500);
        let text = format!("{line1}\n{line2}");

        let chunks = chunk_text(&text, 2000);

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], line1[..2000]);
        assert_eq!(chunks[1], line1[2000..]);
        assert_eq!(chunks[2], line2[..2000]);
        assert_eq!(chunks[3], line2[2000..]);
        // Hard split within a line, newline between the lines.
        let rejoined = format!("{}{}\n{}{}", chunks[0], chunks[1], chunks[2], chunks[3]);
        assert_eq!(rejoined, text);
    }

    #[test]
    fn single_unbroken_line_is_hard_split() {
        let text = "z".repeat(4100);
        let chunks = chunk_text(&text, 2000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 2000);
        assert_eq!(chunks[1].len(), 2000);
        assert_eq!(chunks[2].len(), 100);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn remainder_of_hard_split_accepts_following_lines() {
        // 2100-char line splits into 2000 + 100; the following short line
        // joins the 100-char remainder chunk.
        let long = "a".repeat(2100);
        let text = format!("{long}\nshort");
        let chunks = chunk_text(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], long[..2000]);
        assert_eq!(chunks[1], format!("{}\nshort", &long[2000..]));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn blank_lines_are_preserved() {
        let text = "para one\n\npara two";
        let chunks = chunk_text(text, 2000);
        assert_eq!(chunks, vec!["para one\n\npara two"]);
    }

    #[test]
    fn leading_newline_is_preserved() {
        let chunks = chunk_text("\nbody", 2000);
        assert_eq!(chunks, vec!["\nbody"]);
    }

    #[test]
    fn no_chunk_exceeds_the_limit() {
        let text = format!(
            "{}\n{}\n{}",
            "a".repeat(1500),
            "b".repeat(900),
            "c".repeat(3000)
        );
        for chunk in chunk_text(&text, 2000) {
            assert!(chunk.len() <= 2000, "chunk of {} bytes", chunk.len());
        }
    }

    #[test]
    fn paragraph_blocks_shape() {
        let blocks = paragraph_blocks(&["first".to_string(), "second".to_string()]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["type"], "paragraph");
        assert_eq!(
            blocks[1]["paragraph"]["rich_text"][0]["text"]["content"],
            "second"
        );
    }
}
