//! Locating and replacing the generated region between marker comments

use std::path::Path;

use crate::error::{RegenError, RegenResult};

use super::config::RegenConfig;
use super::scan::find;

/// Byte range of the generated region and the line ending used around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First byte after the begin marker's line terminator
    pub start: usize,
    /// First byte of the end marker line
    pub end: usize,
    /// `"\n"` or `"\r\n"`, taken from the begin marker line
    pub newline: &'static str,
}

/// Finds the region between the begin and end marker lines.
///
/// Each marker must be followed by a line terminator. The first such
/// occurrence of each marker is used.
pub fn find_region(source: &[u8], config: &RegenConfig, path: &Path) -> RegenResult<Region> {
    let not_found = |marker: &str| RegenError::MarkerNotFound {
        path: path.to_path_buf(),
        marker: marker.to_string(),
    };

    let (begin, begin_newline) =
        find_marker_line(source, &config.begin_marker).ok_or_else(|| not_found(&config.begin_marker))?;
    let (end, _) =
        find_marker_line(source, &config.end_marker).ok_or_else(|| not_found(&config.end_marker))?;

    let start = begin + config.begin_marker.len() + begin_newline.len();
    if end < start {
        return Err(RegenError::MarkersOutOfOrder {
            path: path.to_path_buf(),
        });
    }

    Ok(Region {
        start,
        end,
        newline: begin_newline,
    })
}

/// Returns `source` with the region replaced by `generated`.
pub fn splice(source: &[u8], region: Region, generated: &str) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(source.len() - (region.end - region.start) + generated.len());
    out.extend_from_slice(&source[..region.start]);
    out.extend_from_slice(generated.as_bytes());
    out.extend_from_slice(&source[region.end..]);
    out
}

/// Position of the first `marker` followed by `\n` or `\r\n`
fn find_marker_line(source: &[u8], marker: &str) -> Option<(usize, &'static str)> {
    let needle = marker.as_bytes();
    let mut from = 0;

    while let Some(pos) = find(&source[from..], needle).map(|p| p + from) {
        let rest = &source[pos + needle.len()..];
        if rest.starts_with(b"\r\n") {
            return Some((pos, "\r\n"));
        }
        if rest.starts_with(b"\n") {
            return Some((pos, "\n"));
        }
        from = pos + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(source: &str) -> RegenResult<Region> {
        find_region(source.as_bytes(), &RegenConfig::default(), Path::new("test.cpp"))
    }

    #[test]
    fn test_find_region() {
        let source = "a\n// ${INSTRUCTION_DATA_BEGIN}\nold\n// ${INSTRUCTION_DATA_END}\nb\n";
        let r = region(source).expect("region");

        assert_eq!(&source[r.start..r.end], "old\n");
        assert_eq!(r.newline, "\n");
    }

    #[test]
    fn test_find_region_crlf() {
        let source = "// ${INSTRUCTION_DATA_BEGIN}\r\nold\r\n// ${INSTRUCTION_DATA_END}\r\n";
        let r = region(source).expect("region");

        assert_eq!(&source[r.start..r.end], "old\r\n");
        assert_eq!(r.newline, "\r\n");
    }

    #[test]
    fn test_adjacent_markers_give_empty_region() {
        let source = "// ${INSTRUCTION_DATA_BEGIN}\n// ${INSTRUCTION_DATA_END}\n";
        let r = region(source).expect("region");
        assert_eq!(r.start, r.end);
    }

    #[test]
    fn test_missing_markers() {
        match region("int x;\n") {
            Err(RegenError::MarkerNotFound { marker, .. }) => {
                assert_eq!(marker, "// ${INSTRUCTION_DATA_BEGIN}");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        match region("// ${INSTRUCTION_DATA_BEGIN}\n") {
            Err(RegenError::MarkerNotFound { marker, .. }) => {
                assert_eq!(marker, "// ${INSTRUCTION_DATA_END}");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_marker_without_line_end_is_ignored() {
        let source = "// ${INSTRUCTION_DATA_BEGIN}\n// ${INSTRUCTION_DATA_END}";
        assert!(matches!(region(source), Err(RegenError::MarkerNotFound { .. })));
    }

    #[test]
    fn test_markers_out_of_order() {
        let source = "// ${INSTRUCTION_DATA_END}\n// ${INSTRUCTION_DATA_BEGIN}\n";
        assert!(matches!(region(source), Err(RegenError::MarkersOutOfOrder { .. })));
    }

    #[test]
    fn test_splice() {
        let source = "head\n// ${INSTRUCTION_DATA_BEGIN}\nold\n// ${INSTRUCTION_DATA_END}\ntail\n";
        let r = region(source).expect("region");
        let out = splice(source.as_bytes(), r, "new\n");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "head\n// ${INSTRUCTION_DATA_BEGIN}\nnew\n// ${INSTRUCTION_DATA_END}\ntail\n"
        );
    }
}
