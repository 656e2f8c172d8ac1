//! Line-oriented record parsing for page and link files.
//!
//! # Format
//!
//! One record per line, two fields separated by a single space, no quoting:
//!
//! ```text
//! pages_<name>.txt    <id> <title>      e.g. `5 Tokyo_Tower`
//! links_<name>.txt    <src> <dst>       e.g. `5 17`
//! ```
//!
//! Trailing whitespace (including `\r`) is ignored and blank lines are
//! skipped. Anything else that is not UTF-8, does not split into exactly two
//! fields, or whose ids are not non-negative integers, is a
//! [`IngestError::Malformed`] error carrying the 1-based line number.
//!
//! Parsing only produces records; integrity checks (duplicates, dangling
//! references) happen in [`Graph::build`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use tracing::{info, instrument};

use crate::error::ErrorCode;
use crate::graph::{Graph, Link, Page, PageId};

/// Errors raised while reading record files.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("read failed")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}: {content:?}")]
    Malformed {
        line: usize,
        content: String,
        reason: &'static str,
    },
}

impl IngestError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::DataFileUnreadable,
            Self::Malformed { .. } => ErrorCode::MalformedRecord,
        }
    }
}

fn malformed(line: usize, content: &str, reason: &'static str) -> IngestError {
    IngestError::Malformed {
        line,
        content: content.to_string(),
        reason,
    }
}

fn split_two(line: usize, text: &str) -> Result<Option<(&str, &str)>, IngestError> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let mut fields = trimmed.split(' ');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(b), None) if !a.is_empty() && !b.is_empty() => Ok(Some((a, b))),
        _ => Err(malformed(line, text, "expected two space-separated fields")),
    }
}

fn parse_id(line: usize, text: &str, field: &str) -> Result<PageId, IngestError> {
    field
        .parse::<PageId>()
        .map_err(|_| malformed(line, text, "id is not a non-negative integer"))
}

/// Parse one page line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// [`IngestError::Malformed`] if the line is not `<id> <title>`.
pub fn parse_page_line(line: usize, text: &str) -> Result<Option<Page>, IngestError> {
    let Some((id, title)) = split_two(line, text)? else {
        return Ok(None);
    };
    Ok(Some(Page::new(parse_id(line, text, id)?, title)))
}

/// Parse one link line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// [`IngestError::Malformed`] if the line is not `<src> <dst>`.
pub fn parse_link_line(line: usize, text: &str) -> Result<Option<Link>, IngestError> {
    let Some((src, dst)) = split_two(line, text)? else {
        return Ok(None);
    };
    Ok(Some(Link::new(
        parse_id(line, text, src)?,
        parse_id(line, text, dst)?,
    )))
}

/// Read every page record from `reader`.
///
/// # Errors
///
/// I/O failures and the first malformed line.
pub fn read_pages(reader: impl BufRead) -> Result<Vec<Page>, IngestError> {
    read_records(reader, parse_page_line)
}

/// Read every link record from `reader`.
///
/// # Errors
///
/// I/O failures and the first malformed line.
pub fn read_links(reader: impl BufRead) -> Result<Vec<Link>, IngestError> {
    read_records(reader, parse_link_line)
}

fn read_records<T>(
    reader: impl BufRead,
    parse: impl Fn(usize, &str) -> Result<Option<T>, IngestError>,
) -> Result<Vec<T>, IngestError> {
    let mut records = Vec::new();
    for (line_no, bytes) in reader.split(b'\n').enumerate() {
        let line = line_no + 1;
        let bytes = bytes?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| malformed(line, &String::from_utf8_lossy(&bytes), "invalid UTF-8"))?;
        if let Some(record) = parse(line, text)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Read both files and build the graph.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or parsed, or if the
/// records fail [`Graph::build`]'s integrity checks. The underlying
/// [`IngestError`] or [`crate::graph::LoadError`] is kept as the error
/// source.
#[instrument]
pub fn load_graph(pages_path: &Path, links_path: &Path) -> anyhow::Result<Graph> {
    let pages = read_pages(open(pages_path)?)
        .with_context(|| format!("read pages from {}", pages_path.display()))?;
    info!(count = pages.len(), path = %pages_path.display(), "finished reading pages");

    let links = read_links(open(links_path)?)
        .with_context(|| format!("read links from {}", links_path.display()))?;
    info!(count = links.len(), path = %links_path.display(), "finished reading links");

    Graph::build(pages, links).context("build graph")
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .map_err(IngestError::Io)
        .with_context(|| format!("open {}", path.display()))?;
    Ok(BufReader::new(file))
}
