//! Line buffer and section locator for aws-nuke config documents
//!
//! The config is never parsed into a tree. It is held as an ordered list of
//! lines, sections are found by their `key:` header line, and new lines are
//! spliced in directly after a header. Every line that is not inserted stays
//! byte-for-byte identical, comments and formatting quirks included. The one
//! exception is an inline empty header (`key: []`, `key: {}`), which is
//! opened up to `key:` before anything is spliced under it.

use crate::error::DocumentError;
use std::path::Path;

/// Ordered, mutable sequence of config lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDocument {
    lines: Vec<String>,
}

impl LineDocument {
    /// Split text into lines. A trailing newline does not produce an empty
    /// last line, and `\r\n` endings are normalised.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Load a document from a file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Render the document, one `\n` after every line
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Overwrite `path` with the rendered document
    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.render()).map_err(|source| DocumentError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Leading whitespace width of the line at `index` (0 when out of range)
    pub fn indent_of(&self, index: usize) -> usize {
        self.line(index).map(indent_width).unwrap_or(0)
    }

    /// Splice `lines` in directly after `index`, returning how many were
    /// inserted. Existing lines keep their relative order.
    pub fn insert_after(&mut self, index: usize, lines: Vec<String>) -> usize {
        let at = (index + 1).min(self.lines.len());
        let count = lines.len();
        self.lines.splice(at..at, lines);
        count
    }

    /// Append lines at the end of the document
    pub fn append(&mut self, lines: Vec<String>) -> usize {
        let count = lines.len();
        self.lines.extend(lines);
        count
    }

    /// Flat lookup: index of the first section header for `key`. No nesting
    /// awareness, so `key` must be unique in the document.
    pub fn locate(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|line| header_key(line) == Some(key))
    }

    /// Nesting-aware lookup of a section by its full key path,
    /// e.g. `["resource-types", "excludes"]`.
    ///
    /// Tracks the chain of open section headers on an indentation stack, so a
    /// key that recurs at a different depth or under a different parent is
    /// not mistaken for the requested one.
    pub fn locate_path(&self, path: &[&str]) -> Option<usize> {
        if path.is_empty() {
            return None;
        }

        let mut stack: Vec<(usize, &str)> = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if is_blank_or_comment(line) {
                continue;
            }
            let indent = indent_width(line);
            let list_item = is_list_item(line);

            // A list item at the same depth as a header still belongs to it
            while let Some(&(top_indent, _)) = stack.last() {
                if top_indent > indent || (top_indent == indent && !list_item) {
                    stack.pop();
                } else {
                    break;
                }
            }

            if let Some(key) = header_key(line) {
                stack.push((indent, key));
                if stack.len() == path.len() && stack.iter().map(|(_, k)| *k).eq(path.iter().copied())
                {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Find the header `key:` among the direct children of the section
    /// whose header is at `parent`.
    pub fn locate_child(&self, parent: usize, key: &str) -> Option<usize> {
        let end = self.section_end(parent);
        let mut child_indent = None;
        for index in parent + 1..end {
            let line = &self.lines[index];
            if is_blank_or_comment(line) {
                continue;
            }
            let indent = indent_width(line);
            let depth = *child_indent.get_or_insert(indent);
            if indent == depth && header_key(line) == Some(key) {
                return Some(index);
            }
        }
        None
    }

    /// Flat lookup restricted to the lines nested under the section at
    /// `parent`, at any depth
    pub fn locate_descendant(&self, parent: usize, key: &str) -> Option<usize> {
        let end = self.section_end(parent);
        (parent + 1..end).find(|&index| header_key(&self.lines[index]) == Some(key))
    }

    /// First child section header of `parent`, if any
    pub fn first_child_section(&self, parent: usize) -> Option<usize> {
        let end = self.section_end(parent);
        (parent + 1..end)
            .find(|&index| !is_blank_or_comment(&self.lines[index]))
            .filter(|&index| header_key(&self.lines[index]).is_some())
    }

    /// Indentation of the first child line of the section at `index`.
    ///
    /// `None` when the section has no children yet. A list item at the
    /// header's own depth counts as a child.
    pub fn child_indent(&self, index: usize) -> Option<usize> {
        let end = self.section_end(index);
        self.lines
            .get(index + 1..end)?
            .iter()
            .find(|line| !is_blank_or_comment(line))
            .map(|line| indent_width(line))
    }

    /// Rewrite an inline empty header `key: []` or `key: {}` at `index` to
    /// `key:` so lines can be spliced under it. Returns whether the line
    /// changed.
    pub fn open_section(&mut self, index: usize) -> bool {
        let Some(line) = self.lines.get(index) else {
            return false;
        };
        if line.trim_end().ends_with(':') {
            return false;
        }
        let Some(key) = header_key(line) else {
            return false;
        };
        let opened = format!("{}{key}:", " ".repeat(indent_width(line)));
        self.lines[index] = opened;
        true
    }

    /// Index one past the last line belonging to the section at `index`.
    ///
    /// Trailing blank and comment lines are left outside the section.
    pub fn section_end(&self, index: usize) -> usize {
        let Some(header) = self.line(index) else {
            return self.lines.len();
        };
        let header_indent = indent_width(header);
        let header_is_item = is_list_item(header);

        let mut end = index + 1;
        for (offset, line) in self.lines[index + 1..].iter().enumerate() {
            if is_blank_or_comment(line) {
                continue;
            }
            let indent = indent_width(line);
            let belongs = indent > header_indent
                || (indent == header_indent && is_list_item(line) && !header_is_item);
            if !belongs {
                break;
            }
            end = index + 1 + offset + 1;
        }
        end
    }
}

/// Width of the leading whitespace of a line
pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// `key` if the trimmed line is a section header: `key:`, or an inline
/// empty `key: []` / `key: {}`
fn header_key(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') || trimmed.starts_with('-') {
        return None;
    }
    let key = match trimmed.strip_suffix(':') {
        Some(key) => key,
        None => {
            let (key, value) = trimmed.rsplit_once(':')?;
            if !matches!(value.trim(), "[]" | "{}") {
                return None;
            }
            key.trim_end()
        }
    };
    Some(key).filter(|key| !key.is_empty())
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn is_list_item(line: &str) -> bool {
    line.trim_start().starts_with('-')
}
