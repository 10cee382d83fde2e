// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRange {
    CurrentPage,
    /// Every record that passes the current scope and query.
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPage {
    pub rows: Vec<Vec<String>>,
}

/// Printable report of a list, split into fixed-size pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub title: String,
    pub columns: Vec<String>,
    pub pages: Vec<ExportPage>,
}

impl ExportDocument {
    pub fn build<'a, R: Resource + 'a>(
        title: &str,
        records: impl IntoIterator<Item = &'a R>,
        rows_per_page: usize,
    ) -> Self {
        let rows = records
            .into_iter()
            .map(|record| record.cells())
            .collect::<Vec<_>>();
        let pages = rows
            .chunks(rows_per_page.max(1))
            .map(|chunk| ExportPage {
                rows: chunk.to_vec(),
            })
            .collect();
        Self {
            title: title.to_owned(),
            columns: R::columns().iter().map(|&column| column.to_owned()).collect(),
            pages,
        }
    }

    /// Prepends a running "No" column, counted across pages.
    pub fn with_row_numbers(mut self) -> Self {
        self.columns.insert(0, "No".to_owned());
        let mut number = 0usize;
        for page in &mut self.pages {
            for row in &mut page.rows {
                number += 1;
                row.insert(0, number.to_string());
            }
        }
        self
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|page| page.rows.len()).sum()
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n\n", self.title);
        if self.pages.is_empty() {
            out.push_str("(no rows)\n");
            return out;
        }

        let total = self.pages.len();
        for (index, page) in self.pages.iter().enumerate() {
            if total > 1 {
                if index > 0 {
                    out.push('\n');
                }
                out.push_str(&format!("Page {} of {total}\n", index + 1));
            }
            out.push_str(&self.columns.join(" | "));
            out.push('\n');
            for row in &page.rows {
                out.push_str(&row.join(" | "));
                out.push('\n');
            }
        }
        out
    }
}
