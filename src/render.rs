use colored::*;

use crate::markdown::{parse_blocks, parse_inline, Block, Span};

/// Render markdown for the terminal: colored headings, bullet lists and
/// width-aligned tables.
pub fn render(markdown: &str) -> String {
    render_blocks(&parse_blocks(markdown))
}

pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let styled = match level {
                    1 => render_spans(text).cyan().bold().to_string(),
                    2 => render_spans(text).green().bold().to_string(),
                    _ => render_spans(text).yellow().to_string(),
                };
                out.push_str(&styled);
                out.push('\n');
            }
            Block::List { items } => {
                for item in items {
                    out.push_str("  • ");
                    out.push_str(&render_spans(item));
                    out.push('\n');
                }
            }
            Block::Table { header, rows } => {
                out.push_str(&render_table(header.as_deref(), rows));
            }
            Block::Paragraph(text) => {
                out.push_str(&render_spans(text));
                out.push('\n');
            }
            Block::Spacer => out.push('\n'),
        }
    }

    out
}

/// Apply `**bold**` runs as terminal bold.
fn render_spans(text: &str) -> String {
    parse_inline(text)
        .into_iter()
        .map(|span| match span {
            Span::Text(t) => t,
            Span::Bold(t) => t.bold().to_string(),
        })
        .collect()
}

fn render_table(header: Option<&[String]>, rows: &[Vec<String>]) -> String {
    // Column widths from the raw cell text, before any styling.
    let mut widths: Vec<usize> = Vec::new();
    let all_rows = header.into_iter().chain(rows.iter().map(|r| r.as_slice()));
    for row in all_rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if i >= widths.len() {
                widths.push(len);
            } else if len > widths[i] {
                widths[i] = len;
            }
        }
    }

    let mut out = String::new();
    if let Some(cells) = header {
        out.push_str(&format_row(cells, &widths, true));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&format!("  {}\n", rule.join("-+-")));
    }
    for row in rows {
        out.push_str(&format_row(row, &widths, false));
    }
    out
}

fn format_row(cells: &[String], widths: &[usize], bold: bool) -> String {
    let padded: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(0);
            let pad = width.saturating_sub(cell.chars().count());
            let text = format!("{}{}", cell, " ".repeat(pad));
            if bold {
                text.bold().to_string()
            } else {
                text
            }
        })
        .collect();
    format!("  {}\n", padded.join(" | "))
}
