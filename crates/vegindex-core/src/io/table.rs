//! Comma-delimited series files with a leading comment header.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, VegIndexError};
use crate::io::header::CommentHeader;

/// One data line of a table.
#[derive(Clone, Debug)]
pub struct Record {
    pub line: usize,
    fields: Vec<String>,
}

/// A parsed series file: header metadata, column names and data records.
#[derive(Clone, Debug)]
pub struct Table {
    pub path: PathBuf,
    pub header: CommentHeader,
    columns: HashMap<String, usize>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);

        let mut comments = Vec::new();
        let mut columns = None;
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                comments.push(line.to_string());
                continue;
            }
            let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
            if columns.is_none() {
                columns = Some(
                    fields
                        .into_iter()
                        .enumerate()
                        .map(|(i, name)| (name, i))
                        .collect::<HashMap<_, _>>(),
                );
            } else {
                records.push(Record {
                    line: idx + 1,
                    fields,
                });
            }
        }

        let columns = columns.ok_or_else(|| VegIndexError::MalformedSeries {
            path: path.to_path_buf(),
            line: 0,
            message: "missing column header line".into(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            header: CommentHeader::from_lines(comments.iter().map(String::as_str)),
            columns,
            records,
        })
    }

    /// Raw text of column `name` in `record`.
    pub fn field<'a>(&self, record: &'a Record, name: &str) -> Result<&'a str> {
        let idx = *self
            .columns
            .get(name)
            .ok_or_else(|| self.malformed(0, format!("missing column {name}")))?;
        record
            .fields
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| self.malformed(record.line, format!("no value for {name}")))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn malformed(&self, line: usize, message: impl Into<String>) -> VegIndexError {
        VegIndexError::MalformedSeries {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

/// Write a series file: header block, column line, then one line per row.
pub fn write_table<C, I>(
    path: &Path,
    title: &str,
    header: &CommentHeader,
    columns: &[C],
    lines: I,
) -> Result<usize>
where
    C: AsRef<str>,
    I: IntoIterator<Item = String>,
{
    let mut out = BufWriter::new(File::create(path)?);
    header.write_to(title, &mut out)?;
    let names: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    writeln!(out, "{}", names.join(","))?;
    let mut count = 0;
    for line in lines {
        writeln!(out, "{line}")?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
