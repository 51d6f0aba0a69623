use std::ops::Range;

use thiserror::Error;

/// 文字文件操作錯誤。 / Error conditions raised by text document edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("offset {offset} is out of bounds for document of length {len}")]
    OutOfBounds { offset: usize, len: usize },
    #[error("offset {offset} does not fall on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// 以位元組偏移量定位的文字文件，並維護行首索引。 / Text document addressed by byte offsets with a line-start table.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    contents: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    /// 從給定文字建立文件。 / Creates a document holding the provided text.
    pub fn new(text: impl Into<String>) -> Self {
        let contents = text.into();
        let line_starts = compute_line_starts(&contents);
        Self {
            contents,
            line_starts,
        }
    }

    /// 取得完整內容。 / Returns the full document contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// 文件位元組長度。 / Length of the document in bytes.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// 行數；空文件仍有一行。 / Number of lines; an empty document still has one line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 行首偏移量。 / Byte offset at which the given line starts.
    pub fn line_start(&self, line: usize) -> usize {
        match self.line_starts.get(line) {
            Some(&start) => start,
            None => self.contents.len(),
        }
    }

    /// 行尾偏移量（不含換行字元）。 / Byte offset of the line end, excluding the line terminator.
    pub fn line_end(&self, line: usize) -> usize {
        let Some(&start) = self.line_starts.get(line) else {
            return self.contents.len();
        };
        let next = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.contents.len());
        let bytes = self.contents.as_bytes();
        let mut end = next;
        if end > start && bytes[end - 1] == b'\n' {
            end -= 1;
        }
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        end
    }

    /// 回傳偏移量所在的行。 / Returns the line containing the given offset.
    pub fn line_from_position(&self, position: usize) -> usize {
        match self.line_starts.binary_search(&position) {
            Ok(line) => line,
            Err(insert_at) => insert_at.saturating_sub(1),
        }
    }

    /// 行內容（不含換行）。 / Text of the line without its terminator.
    pub fn line_text(&self, line: usize) -> &str {
        let start = self.line_start(line);
        let end = self.line_end(line);
        self.contents.get(start..end).unwrap_or_default()
    }

    /// 依位元組範圍擷取文字，範圍會被夾限於文件內。 / Extracts the byte range, clamped to the document.
    pub fn text_range(&self, start: usize, end: usize) -> &str {
        let len = self.contents.len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.contents.get(start..end).unwrap_or_default()
    }

    /// 讀取單一位元組。 / Reads the byte at the given offset.
    pub fn byte_at(&self, position: usize) -> Option<u8> {
        self.contents.as_bytes().get(position).copied()
    }

    /// 在範圍內以大小寫敏感方式搜尋字串。 / Case-sensitive search for `needle` within `[start, end)`.
    pub fn find(&self, needle: &str, start: usize, end: usize) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        let len = self.contents.len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        let haystack = &self.contents.as_bytes()[start..end];
        let needle = needle.as_bytes();
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|idx| (start + idx)..(start + idx + needle.len()))
    }

    /// 插入文字並回傳新增的行數。 / Inserts text and returns the number of lines added.
    pub fn insert(&mut self, position: usize, text: &str) -> Result<usize, DocumentError> {
        self.check_offset(position)?;
        self.contents.insert_str(position, text);
        let before = self.line_starts.len();
        self.line_starts = compute_line_starts(&self.contents);
        Ok(self.line_starts.len() - before)
    }

    /// 刪除範圍並回傳移除的行數。 / Deletes the range and returns the number of lines removed.
    pub fn delete(&mut self, range: Range<usize>) -> Result<usize, DocumentError> {
        self.check_offset(range.start)?;
        self.check_offset(range.end)?;
        if range.start >= range.end {
            return Ok(0);
        }
        self.contents.replace_range(range, "");
        let before = self.line_starts.len();
        self.line_starts = compute_line_starts(&self.contents);
        Ok(before - self.line_starts.len())
    }

    fn check_offset(&self, offset: usize) -> Result<(), DocumentError> {
        let len = self.contents.len();
        if offset > len {
            return Err(DocumentError::OutOfBounds { offset, len });
        }
        if !self.contents.is_char_boundary(offset) {
            return Err(DocumentError::NotCharBoundary { offset });
        }
        Ok(())
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        text.bytes()
            .enumerate()
            .filter(|&(_, byte)| byte == b'\n')
            .map(|(idx, _)| idx + 1),
    );
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_bounds_exclude_terminators() {
        let doc = TextDocument::new("alpha\r\nbeta\ngamma");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_start(1), 7);
        assert_eq!(doc.line_end(0), 5);
        assert_eq!(doc.line_end(1), 11);
        assert_eq!(doc.line_text(2), "gamma");
        assert_eq!(doc.line_from_position(8), 1);
        assert_eq!(doc.line_from_position(12), 2);
    }

    #[test]
    fn find_is_case_sensitive_and_bounded() {
        let doc = TextDocument::new("Link link link");
        assert_eq!(doc.find("link", 0, doc.len()), Some(5..9));
        assert_eq!(doc.find("link", 6, doc.len()), Some(10..14));
        assert_eq!(doc.find("link", 6, 12), None);
        assert_eq!(doc.find("", 0, doc.len()), None);
    }

    #[test]
    fn edits_track_line_count() {
        let mut doc = TextDocument::new("one\ntwo");
        assert_eq!(doc.insert(3, "\nmid"), Ok(1));
        assert_eq!(doc.contents(), "one\nmid\ntwo");
        assert_eq!(doc.delete(3..7), Ok(1));
        assert_eq!(doc.contents(), "one\ntwo");
    }

    #[test]
    fn rejects_split_characters() {
        let mut doc = TextDocument::new("你好");
        assert_eq!(
            doc.insert(1, "x"),
            Err(DocumentError::NotCharBoundary { offset: 1 })
        );
        assert_eq!(
            doc.delete(0..9),
            Err(DocumentError::OutOfBounds { offset: 9, len: 6 })
        );
    }
}
