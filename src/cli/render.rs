//! Rendering of command outcomes: tables, raw JSON, confirmation lines

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::application::{LinkStatus, ListResponse, Lookup};
use crate::cli::output;
use crate::domain::{LinkListing, ShortId, ShortLink};

const COLUMN_GAP: &str = "  ";

/// Plain text table, columns padded to their widest cell by display width.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row; missing cells render blank, extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self, w: &mut dyn Write) -> io::Result<()> {
        let widths = self.widths();
        let separator: Vec<String> = widths.iter().map(|n| "-".repeat(*n)).collect();

        write_line(w, &self.headers, &widths)?;
        write_line(w, &separator, &widths)?;
        for row in &self.rows {
            write_line(w, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(w: &mut dyn Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    writeln!(w, "{}", line.trim_end())
}

/// Raw passthrough of the list response body.
pub fn list_json(w: &mut dyn Write, response: &ListResponse) -> io::Result<()> {
    w.write_all(response.body.as_bytes())?;
    if !response.body.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}

/// Two-column table of all links, or a notice when there are none.
pub fn list_table(w: &mut dyn Write, listing: &LinkListing) -> io::Result<()> {
    if listing.is_empty() {
        return output::info(w, "No links found.");
    }
    let mut table = Table::new(["Short ID", "Target URL"]);
    for (short_id, target_url) in listing.iter() {
        table.row([short_id, target_url]);
    }
    table.render(w)
}

/// Single-row table describing a lookup.
pub fn link_status(w: &mut dyn Write, lookup: &Lookup<LinkStatus>) -> io::Result<()> {
    let (status, message) = match lookup {
        Lookup::Found(status) => (status, "Found"),
        Lookup::Missing(status) => (status, "Not Found"),
    };
    let mut table = Table::new([
        "Short ID",
        "Request URL",
        "HTTP Status",
        "Message",
        "Location",
    ]);
    table.row([
        status.short_id.to_string(),
        status.request_url.clone(),
        status.status.to_string(),
        message.to_string(),
        status.location.clone().unwrap_or_default(),
    ]);
    table.render(w)
}

pub fn created(w: &mut dyn Write, link: &ShortLink) -> io::Result<()> {
    output::success(
        w,
        &format!("Link created: {} -> {}", link.short_id, link.target_url),
    )
}

pub fn deleted(w: &mut dyn Write, short_id: &ShortId) -> io::Result<()> {
    output::success(w, &format!("Short ID '{}' deleted.", short_id))
}
