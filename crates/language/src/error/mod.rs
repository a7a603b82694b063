use thiserror::Error;

/// The only error the front end reports. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at {line}:{column}: {message}.")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Byte offsets of every line start, used to turn a token offset into a
/// 1-based line and column.
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { source, line_starts }
    }

    /// 1-based `(line, column)`; the column counts characters, not bytes.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert_at) => insert_at - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count() + 1;
        (line + 1, column)
    }

    pub fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        let (line, column) = self.locate(offset);
        SyntaxError { line, column, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_line() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.locate(0), (1, 1));
        assert_eq!(index.locate(2), (1, 3));
    }

    #[test]
    fn test_locate_line_boundaries() {
        let index = LineIndex::new("abc\ndef\n\nx");
        assert_eq!(index.locate(3), (1, 4));
        assert_eq!(index.locate(4), (2, 1));
        assert_eq!(index.locate(8), (3, 1));
        assert_eq!(index.locate(9), (4, 1));
        assert_eq!(index.locate(10), (4, 2));
    }

    #[test]
    fn test_column_counts_chars() {
        let index = LineIndex::new("\"é\" x");
        assert_eq!(index.locate(5), (1, 5));
    }

    #[test]
    fn test_error_format() {
        let index = LineIndex::new("let\n  x");
        let err = index.error(6, "expected `=`");
        assert_eq!(err.to_string(), "Syntax error at 2:3: expected `=`.");
    }
}
