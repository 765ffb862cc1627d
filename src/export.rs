use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::markdown::{parse_blocks, parse_inline, Block, Span};

pub const EXPORT_MD_NAME: &str = "madplan.md";
pub const EXPORT_HTML_NAME: &str = "madplan.html";

const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%; border: 1px solid #ddd;";
const TH_STYLE: &str = "padding: 8px; border: 1px solid #ddd; text-align: left;";
const TD_STYLE: &str = "padding: 8px; border: 1px solid #ddd;";
const THEAD_STYLE: &str = "background-color: #f2f2f2;";

/// Convert the plan markdown to an HTML fragment with inline styles, so a
/// word processor picks up the table formatting when the file is imported.
pub fn to_html(markdown: &str) -> String {
    let mut html = String::new();

    for block in parse_blocks(markdown) {
        match block {
            Block::Heading { level, text } => {
                let tag = match level {
                    1 => "h1",
                    2 => "h2",
                    _ => "h3",
                };
                html.push_str(&format!("<{}>{}</{}>\n", tag, inline_html(&text), tag));
            }
            Block::List { items } => {
                html.push_str("<ul>\n");
                for item in items {
                    html.push_str(&format!("<li>{}</li>\n", inline_html(&item)));
                }
                html.push_str("</ul>\n");
            }
            Block::Table { header, rows } => {
                html.push_str(&format!("<table style=\"{}\">\n", TABLE_STYLE));
                if let Some(cells) = header {
                    html.push_str(&format!("<thead style=\"{}\"><tr>", THEAD_STYLE));
                    for cell in cells {
                        html.push_str(&format!(
                            "<th style=\"{}\">{}</th>",
                            TH_STYLE,
                            inline_html(&cell)
                        ));
                    }
                    html.push_str("</tr></thead>\n");
                }
                html.push_str("<tbody>\n");
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        html.push_str(&format!(
                            "<td style=\"{}\">{}</td>",
                            TD_STYLE,
                            inline_html(&cell)
                        ));
                    }
                    html.push_str("</tr>\n");
                }
                html.push_str("</tbody></table>\n");
            }
            Block::Paragraph(text) => {
                html.push_str(&format!("<p>{}</p>\n", inline_html(&text)));
            }
            // Word processors handle their own paragraph spacing.
            Block::Spacer => {}
        }
    }

    html
}

/// `**bold**` to `<strong>`, with the text itself escaped.
fn inline_html(text: &str) -> String {
    parse_inline(text)
        .into_iter()
        .map(|span| match span {
            Span::Text(t) => escape(&t),
            Span::Bold(t) => format!("<strong>{}</strong>", escape(&t)),
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write the plan as a markdown and an HTML file with fixed names,
/// returning the two paths.
pub fn write_exports(plan: &str, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(out_dir).context("Failed to create export directory")?;

    let md_path = out_dir.join(EXPORT_MD_NAME);
    std::fs::write(&md_path, plan).context("Failed to write markdown export")?;

    let html_path = out_dir.join(EXPORT_HTML_NAME);
    let document = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n{}</body>\n</html>\n",
        to_html(plan)
    );
    std::fs::write(&html_path, document).context("Failed to write HTML export")?;

    Ok((md_path, html_path))
}
