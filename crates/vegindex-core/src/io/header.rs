use std::io::{self, Write};

/// Ordered `# Key: value` metadata block at the top of a series file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentHeader {
    fields: Vec<(String, String)>,
}

impl CommentHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse one comment line into a key/value pair. Bare `#` lines and
    /// titles without `": "` give `None`.
    pub fn parse_line(line: &str) -> Option<(String, String)> {
        let body = line.strip_prefix("# ")?;
        let (key, value) = body.split_once(": ")?;
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some((key.to_string(), value.trim_end().to_string()))
    }

    /// Build a header from every comment line of a file.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut header = Self::new();
        for line in lines {
            if let Some((k, v)) = Self::parse_line(line) {
                header.fields.push((k, v));
            }
        }
        header
    }

    /// Write the block, framed by bare `#` lines and led by a title.
    pub fn write_to<W: Write>(&self, title: &str, out: &mut W) -> io::Result<()> {
        writeln!(out, "#")?;
        writeln!(out, "# {title}")?;
        writeln!(out, "#")?;
        for (k, v) in &self.fields {
            writeln!(out, "# {k}: {v}")?;
        }
        writeln!(out, "#")
    }
}
