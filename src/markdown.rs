//! Line-oriented parser for the markdown subset Gemini is instructed to
//! emit: headings 1-3, dash lists, pipe tables with a dash separator row,
//! `**bold**` spans and plain paragraphs.
//!
//! Both the terminal renderer and the HTML exporter consume the block
//! sequence produced here, so the two outputs cannot disagree on grammar
//! edge cases. Parsing never fails; anything unrecognized becomes a
//! paragraph.

/// A grouped block of the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    List { items: Vec<String> },
    Table {
        header: Option<Vec<String>>,
        rows: Vec<Vec<String>>,
    },
    Paragraph(String),
    /// Produced by a blank line; renders as vertical spacing.
    Spacer,
}

/// Inline run of text, plain or bold.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    Bold(String),
}

/// Split text into plain and `**bold**` runs. Unbalanced markers are left
/// in place as plain text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            spans.push(Span::Text(rest[..start].to_string()));
        }
        spans.push(Span::Bold(after[..end].to_string()));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        spans.push(Span::Text(rest.to_string()));
    }
    spans
}

/// True for the dash row that separates a table header from its body,
/// e.g. `| :--- | --- |`.
fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

struct Grouper {
    blocks: Vec<Block>,
    list: Vec<String>,
    table_header: Option<Vec<String>>,
    table_rows: Vec<Vec<String>>,
    table_open: bool,
}

impl Grouper {
    fn new() -> Self {
        Grouper {
            blocks: Vec::new(),
            list: Vec::new(),
            table_header: None,
            table_rows: Vec::new(),
            table_open: false,
        }
    }

    fn close_list(&mut self) {
        if !self.list.is_empty() {
            self.blocks.push(Block::List {
                items: std::mem::take(&mut self.list),
            });
        }
    }

    fn close_table(&mut self) {
        if self.table_open {
            self.blocks.push(Block::Table {
                header: self.table_header.take(),
                rows: std::mem::take(&mut self.table_rows),
            });
            self.table_open = false;
        }
    }

    fn close_all(&mut self) {
        self.close_list();
        self.close_table();
    }
}

/// Parse markdown into grouped blocks.
///
/// Grouping rule (applied uniformly, see DESIGN.md): a blank line closes
/// any open list or table run and emits a spacer; a list also closes at
/// the first non-dash line, a table at the first non-pipe line.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut g = Grouper::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            g.close_all();
            g.blocks.push(Block::Spacer);
            i += 1;
            continue;
        }

        if let Some(text) = line.strip_prefix("### ") {
            g.close_all();
            g.blocks.push(Block::Heading {
                level: 3,
                text: text.trim().to_string(),
            });
        } else if let Some(text) = line.strip_prefix("## ") {
            g.close_all();
            g.blocks.push(Block::Heading {
                level: 2,
                text: text.trim().to_string(),
            });
        } else if let Some(text) = line.strip_prefix("# ") {
            g.close_all();
            g.blocks.push(Block::Heading {
                level: 1,
                text: text.trim().to_string(),
            });
        } else if let Some(item) = trimmed.strip_prefix("- ") {
            g.close_table();
            g.list.push(item.trim().to_string());
        } else if trimmed.starts_with('|') {
            g.close_list();

            if is_separator_row(trimmed) {
                // Stray separator with no header row above it; skip.
                i += 1;
                continue;
            }

            let cells = split_cells(trimmed);
            let next_is_separator = lines
                .get(i + 1)
                .map(|l| is_separator_row(l))
                .unwrap_or(false);

            if next_is_separator {
                // Header row: attaches to the body rows that follow.
                if g.table_open && (g.table_header.is_some() || !g.table_rows.is_empty()) {
                    g.close_table();
                }
                g.table_open = true;
                g.table_header = Some(cells);
                i += 1; // consume the separator row too
            } else {
                g.table_open = true;
                g.table_rows.push(cells);
            }
        } else {
            g.close_all();
            g.blocks.push(Block::Paragraph(trimmed.to_string()));
        }

        i += 1;
    }

    g.close_all();
    g.blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_bold() {
        let spans = parse_inline("Brug **fed skrift** her");
        assert_eq!(
            spans,
            vec![
                Span::Text("Brug ".into()),
                Span::Bold("fed skrift".into()),
                Span::Text(" her".into()),
            ]
        );
    }

    #[test]
    fn test_inline_unbalanced_bold_is_plain_text() {
        let spans = parse_inline("halvt **fed uden slut");
        assert_eq!(spans, vec![Span::Text("halvt **fed uden slut".into())]);
    }

    #[test]
    fn test_known_document_shape() {
        // One heading, one 3-item list, one 2x2 table with separator.
        let md = "\
## Indkøbsliste
- Æg
- Laks
- Spinat

| Vare | Mængde |
| --- | --- |
| Æg | 12 stk |";

        let blocks = parse_blocks(md);
        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 2,
                text: "Indkøbsliste".into()
            }
        );
        match &blocks[1] {
            Block::List { items } => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
        assert_eq!(blocks[2], Block::Spacer);
        match &blocks[3] {
            Block::Table { header, rows } => {
                assert_eq!(header.as_deref(), Some(&["Vare".to_string(), "Mængde".to_string()][..]));
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0], vec!["Æg", "12 stk"]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_closes_list() {
        let md = "- a\n- b\n\n- c";
        let blocks = parse_blocks(md);
        assert_eq!(
            blocks,
            vec![
                Block::List {
                    items: vec!["a".into(), "b".into()]
                },
                Block::Spacer,
                Block::List {
                    items: vec!["c".into()]
                },
            ]
        );
    }

    #[test]
    fn test_paragraph_interrupts_table() {
        let md = "| a | b |\ntekst\n| c | d |";
        let blocks = parse_blocks(md);
        assert_eq!(blocks.len(), 3);
        match (&blocks[0], &blocks[2]) {
            (Block::Table { rows: r1, .. }, Block::Table { rows: r2, .. }) => {
                assert_eq!(r1.len(), 1);
                assert_eq!(r2.len(), 1);
            }
            other => panic!("expected two tables, got {:?}", other),
        }
        assert_eq!(blocks[1], Block::Paragraph("tekst".into()));
    }

    #[test]
    fn test_table_without_separator_has_no_header() {
        let md = "| a | b |\n| c | d |";
        let blocks = parse_blocks(md);
        match &blocks[0] {
            Block::Table { header, rows } => {
                assert!(header.is_none());
                assert_eq!(rows.len(), 2);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_stray_separator_row_is_skipped() {
        let md = "| --- | --- |\n| a | b |";
        let blocks = parse_blocks(md);
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Table { header, rows } => {
                assert!(header.is_none());
                assert_eq!(rows, &vec![vec!["a".to_string(), "b".to_string()]]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_aligned_separator_detection() {
        assert!(is_separator_row("| :--- | ---: |"));
        assert!(is_separator_row("|---|---|"));
        assert!(!is_separator_row("| a--- | b |"));
        assert!(!is_separator_row("almindelig tekst"));
    }

    #[test]
    fn test_heading_levels() {
        let blocks = parse_blocks("# En\n## To\n### Tre");
        let levels: Vec<u8> = blocks
            .iter()
            .map(|b| match b {
                Block::Heading { level, .. } => *level,
                _ => 0,
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_two_headers_split_tables() {
        let md = "\
| H1 | H2 |
| --- | --- |
| a | b |
| X1 | X2 |
| --- | --- |
| c | d |";
        let blocks = parse_blocks(md);
        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            match block {
                Block::Table { header, rows } => {
                    assert!(header.is_some());
                    assert_eq!(rows.len(), 1);
                }
                other => panic!("expected table, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_never_panics_on_malformed_input() {
        for md in ["|", "||", "**", "- ", "#", "| --- |", "\n\n\n", "|*|*|"] {
            let _ = parse_blocks(md);
        }
    }
}
