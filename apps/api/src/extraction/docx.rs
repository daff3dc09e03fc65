//! DOCX text extraction: walks paragraphs (including those nested in tables)
//! and concatenates their text runs, one paragraph per line.

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("DOCX parse error: {0}")]
pub struct DocxParseError(String);

pub fn extract_raw_text(bytes: &[u8]) -> Result<String, DocxParseError> {
    let docx = read_docx(bytes).map_err(|e| DocxParseError(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(paragraph, &mut lines),
            DocumentChild::Table(table) => push_table(table, &mut lines),
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

fn push_paragraph(paragraph: &Paragraph, lines: &mut Vec<String>) {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }

    if !text.trim().is_empty() {
        lines.push(text);
    }
}

// `TableChild` and `TableRowChild` are single-variant enums.
#[allow(irrefutable_let_patterns)]
fn push_table(table: &Table, lines: &mut Vec<String>) {
    for child in &table.rows {
        let TableChild::TableRow(row) = child else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(paragraph, lines),
                    TableCellContent::Table(nested) => push_table(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run, TableCell, TableRow};
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_paragraph_runs_are_concatenated() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Jane "))
                        .add_run(Run::new().add_text("Roe")),
                )
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("jane@example.com"))),
        );

        assert_eq!(extract_raw_text(&bytes).unwrap(), "Jane Roe\njane@example.com");
    }

    #[test]
    fn test_table_cells_are_included() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Skills"))),
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust, Go"))),
        ])]);
        let bytes = pack(Docx::new().add_table(table));

        let text = extract_raw_text(&bytes).unwrap();
        assert!(text.contains("Skills"));
        assert!(text.contains("Rust, Go"));
    }

    #[test]
    fn test_non_docx_bytes_fail() {
        assert!(extract_raw_text(b"plain text, not a zip archive").is_err());
    }
}
