//! Lexical scanning of the instruction description table
//!
//! Finds the `<ident>[] = { ... }` initializer and pulls the quoted
//! instruction names out of it. String and character literals, escapes
//! and both comment styles are understood, so names inside comments or
//! braces inside literals do not confuse the scan.

/// Returns the body of the first `<ident>[] = {` table, up to the first `}`.
///
/// Whitespace is allowed around `=`; `[]` must follow the identifier
/// directly. The identifier must not be the tail of a longer identifier.
pub fn find_table<'a>(source: &'a [u8], ident: &str) -> Option<&'a [u8]> {
    let needle = ident.as_bytes();
    if needle.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(pos) = find(&source[from..], needle).map(|p| p + from) {
        from = pos + 1;

        if pos > 0 && is_ident_byte(source[pos - 1]) {
            continue;
        }

        let mut i = pos + needle.len();
        if !source[i..].starts_with(b"[]") {
            continue;
        }
        i = skip_whitespace(source, i + 2);
        if source.get(i) != Some(&b'=') {
            continue;
        }
        i = skip_whitespace(source, i + 1);
        if source.get(i) != Some(&b'{') {
            continue;
        }

        let body = &source[i + 1..];
        let len = body.iter().position(|&b| b == b'}')?;
        return Some(&body[..len]);
    }
    None
}

/// Collects instruction names from a table body, in source order.
///
/// A string literal is a name when it is non-empty and made only of ASCII
/// letters, digits, `_` and spaces. Duplicates are kept; the table
/// builder drops them.
pub fn extract_names(body: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut i = 0;

    while i < body.len() {
        match body[i] {
            b'/' if body.get(i + 1) == Some(&b'/') => {
                i = body[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(body.len(), |p| i + p + 1);
            }
            b'/' if body.get(i + 1) == Some(&b'*') => {
                i = find(&body[i + 2..], b"*/").map_or(body.len(), |p| i + 2 + p + 2);
            }
            quote @ (b'"' | b'\'') => match literal_end(body, i + 1, quote) {
                Some(end) => {
                    let content = &body[i + 1..end];
                    if quote == b'"' && is_name(content) {
                        names.push(String::from_utf8_lossy(content).into_owned());
                    }
                    i = end + 1;
                }
                // unterminated literal: nothing after it can be trusted
                None => break,
            },
            _ => i += 1,
        }
    }

    names
}

/// Index of the closing quote of a literal whose content starts at `start`
fn literal_end(body: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut j = start;
    while j < body.len() {
        match body[j] {
            b'\\' => j += 2,
            b'\n' => return None,
            b if b == quote => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn is_name(content: &[u8]) -> bool {
    !content.is_empty()
        && content
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b' ')
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_whitespace(source: &[u8], mut i: usize) -> usize {
    while source.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
extern const InstructionDescription instructionDescription[];

const InstructionDescription instructionDescription[] =
{
  // Instruction code (enum) | instruction name | group
  MAKE_INST(INST_ADC , "adc" , G(ALU) , F(LOCKABLE)),
  MAKE_INST(INST_ADD , "add" , G(ALU) , F(LOCKABLE)),
  MAKE_INST(INST_LOCK_ADD , "lock add" , G(ALU) , F(NONE)),
};

const char* other[] = { "outside" };
"#;

    #[test]
    fn test_find_table_skips_declaration() {
        let body = find_table(SOURCE.as_bytes(), "instructionDescription").expect("table");
        let text = String::from_utf8_lossy(body);
        assert!(text.contains("\"adc\""));
        assert!(!text.contains("outside"));
    }

    #[test]
    fn test_find_table_missing() {
        assert!(find_table(SOURCE.as_bytes(), "registerNames").is_none());
        assert!(find_table(b"instructionDescription[] = ", "instructionDescription").is_none());
        assert!(find_table(b"xinstructionDescription[] = { \"a\" }", "instructionDescription").is_none());
        assert!(find_table(SOURCE.as_bytes(), "").is_none());
    }

    #[test]
    fn test_find_table_whitespace_forms() {
        let body = find_table(b"instructionDescription[]={\"mov\"}", "instructionDescription");
        assert_eq!(body, Some(&b"\"mov\""[..]));

        let body = find_table(b"instructionDescription[]\n=\n\t{ \"mov\" }", "instructionDescription");
        assert_eq!(body, Some(&b" \"mov\" "[..]));
    }

    #[test]
    fn test_extract_names_in_order() {
        let body = find_table(SOURCE.as_bytes(), "instructionDescription").expect("table");
        assert_eq!(extract_names(body), vec!["adc", "add", "lock add"]);
    }

    #[test]
    fn test_extract_names_keeps_duplicates() {
        let names = extract_names(br#" "MOV", "MOV", "ADD" "#);
        assert_eq!(names, vec!["MOV", "MOV", "ADD"]);
    }

    #[test]
    fn test_extract_names_ignores_comments_and_other_literals() {
        let body = br#"
            // "commented"
            /* "blocked" */
            X('"', "mov"),
            X("", "not-a-name", "esc\"aped", "push")
        "#;
        assert_eq!(extract_names(body), vec!["mov", "push"]);
    }

    #[test]
    fn test_extract_names_stops_at_unterminated_literal() {
        assert_eq!(extract_names(b"\"mov\", \"add\n\"sub\""), vec!["mov"]);
    }
}
