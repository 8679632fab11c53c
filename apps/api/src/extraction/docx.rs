//! DOCX body text extraction via `docx-rs`.
//!
//! Paragraphs become lines; tabs and breaks become whitespace. Runs nested in
//! hyperlinks and top-level table cells are included. Images and other embedded objects are skipped.

use docx_rs::{
    read_docx, DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild,
    TableRowChild,
};

use super::ExtractError;

pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut lines: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(&p.children)),
            DocumentChild::Table(t) => collect_table(&t.rows, &mut lines),
            _ => {}
        }
    }

    Ok(lines.join("\n").trim().to_string())
}

#[allow(irrefutable_let_patterns)]
fn collect_table(rows: &[TableChild], lines: &mut Vec<String>) {
    for row in rows {
        let TableChild::TableRow(row) = row else { continue };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else { continue };
            for content in &cell.children {
                if let TableCellContent::Paragraph(p) = content {
                    lines.push(paragraph_text(&p.children));
                }
            }
        }
    }
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    push_paragraph_children(children, &mut text);
    text
}

fn push_paragraph_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, text),
            _ => {}
        }
    }
}
