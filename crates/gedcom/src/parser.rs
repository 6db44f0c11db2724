// GEDCOM line parser

use std::io::Read;
use std::path::Path;

use crate::error::GedcomError;
use crate::tags;
use crate::tree::{Element, ElementId, GedcomTree};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Reject malformed lines and level jumps instead of repairing them.
    pub strict: bool,
}

pub fn parse_file(path: &Path, options: ParseOptions) -> Result<GedcomTree, GedcomError> {
    let content = read_file_as_utf8(path)?;
    let tree = parse_with(&content, options)?;
    tracing::debug!(
        path = %path.display(),
        elements = tree.len(),
        records = tree.root_elements().len(),
        "parsed GEDCOM file"
    );
    Ok(tree)
}

/// Parse GEDCOM text leniently.
pub fn parse_str(content: &str) -> Result<GedcomTree, GedcomError> {
    parse_with(content, ParseOptions::default())
}

/// Read file and convert to UTF-8 if needed (ANSI exports are usually Windows-1252)
fn read_file_as_utf8(path: &Path) -> Result<String, GedcomError> {
    let io_err = |source| GedcomError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// One tokenized line: `LEVEL [@XREF@] TAG [VALUE]`.
struct Line<'a> {
    level: u32,
    xref: Option<&'a str>,
    tag: &'a str,
    value: &'a str,
}

fn tokenize(line: &str) -> Option<Line<'_>> {
    let (level, rest) = line.split_once(' ').unwrap_or((line, ""));
    let level: u32 = level.parse().ok()?;
    let rest = rest.trim_start();

    let (xref, rest) = if rest.starts_with('@') {
        let (xref, rest) = rest.split_once(' ')?;
        if xref.len() < 3 || !xref.ends_with('@') {
            return None;
        }
        (Some(xref), rest.trim_start())
    } else {
        (None, rest)
    };

    let (tag, value) = rest.split_once(' ').unwrap_or((rest, ""));
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some(Line {
        level,
        xref,
        tag,
        value,
    })
}

fn parse_with(content: &str, options: ParseOptions) -> Result<GedcomTree, GedcomError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    // Classic Mac exports terminate lines with a bare CR.
    let cr_only;
    let content = if !content.contains('\n') && content.contains('\r') {
        cr_only = content.replace('\r', "\n");
        cr_only.as_str()
    } else {
        content
    };
    let mut tree = GedcomTree::default();
    // Open ancestors of the next line: (level, id)
    let mut stack: Vec<(u32, ElementId)> = Vec::new();
    let mut last: Option<ElementId> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let raw = raw.trim_end();
        if raw.trim().is_empty() {
            continue;
        }

        let Some(line) = tokenize(raw.trim_start()) else {
            if options.strict {
                return Err(GedcomError::Syntax {
                    line: line_no,
                    message: format!("malformed line '{raw}'"),
                });
            }
            match last {
                Some(prev) => {
                    tracing::trace!(line = line_no, "folding malformed line into previous value");
                    tree.append_value(prev, raw);
                }
                None => {
                    tracing::warn!(line = line_no, "skipping malformed line before first record")
                }
            }
            continue;
        };

        while stack.last().is_some_and(|&(level, _)| level >= line.level) {
            stack.pop();
        }
        let parent = stack.last().copied();

        if line.level > 0 {
            let expected = parent.map(|(level, _)| level + 1).unwrap_or(0);
            if line.level != expected && options.strict {
                return Err(GedcomError::Syntax {
                    line: line_no,
                    message: format!("unexpected level {} (expected {expected})", line.level),
                });
            }
        }

        if line.tag == tags::CONTINUED || line.tag == tags::CONCATENATION {
            if let Some((_, parent_id)) = parent {
                if line.tag == tags::CONTINUED {
                    tree.append_value(parent_id, "\n");
                }
                tree.append_value(parent_id, line.value);
                continue;
            }
        }

        let id = tree.push(Element {
            level: line.level,
            xref: line.xref.map(str::to_string),
            tag: line.tag.to_string(),
            value: line.value.to_string(),
            parent: parent.map(|(_, id)| id),
            children: Vec::new(),
        });
        stack.push((line.level, id));
        last = Some(id);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_nesting() {
        let tree = parse_str(
            "\u{feff}0 HEAD\r\n1 CHAR UTF-8\r\n0 @I1@ INDI\r\n1 NAME Jane /Doe/\r\n\
            1 BIRT\r\n2 DATE 1 JAN 1980\r\n0 TRLR\r\n",
        )
        .unwrap();
        assert_eq!(tree.root_elements().len(), 3);

        let indi = tree.by_xref("@I1@").unwrap();
        let birth = tree.children(indi)[1];
        let date = tree.children(birth)[0];
        let date = tree.element(date).unwrap();
        assert_eq!(date.tag, "DATE");
        assert_eq!(date.value, "1 JAN 1980");
        assert_eq!(date.level, 2);
    }

    #[test]
    fn cont_and_conc_fold_into_parent() {
        let tree = parse_str("0 @N1@ NOTE First\n1 CONC  part\n1 CONT Second line\n").unwrap();
        let note = tree.by_xref("@N1@").unwrap();
        assert_eq!(tree.element(note).unwrap().value, "First part\nSecond line");
        assert!(tree.children(note).is_empty());
    }

    #[test]
    fn lenient_folds_malformed_line() {
        let tree = parse_str("0 @I1@ INDI\n1 NAME Jane\nstray text\n").unwrap();
        let indi = tree.by_xref("@I1@").unwrap();
        let name = tree.element(tree.children(indi)[0]).unwrap();
        assert_eq!(name.value, "Janestray text");
    }

    #[test]
    fn strict_rejects_malformed_line() {
        let err =
            parse_with("0 @I1@ INDI\nstray text\n", ParseOptions { strict: true }).unwrap_err();
        match err {
            GedcomError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn level_jump_lenient_and_strict() {
        let text = "0 @I1@ INDI\n2 DATE 1900\n";
        let tree = parse_str(text).unwrap();
        let indi = tree.by_xref("@I1@").unwrap();
        assert_eq!(tree.children(indi).len(), 1);

        assert!(parse_with(text, ParseOptions { strict: true }).is_err());
    }

    #[test]
    fn bare_cr_line_endings() {
        let tree = parse_str("0 @I1@ INDI\r1 SEX M\r0 TRLR\r").unwrap();
        assert_eq!(tree.root_elements().len(), 2);
        let indi = tree.by_xref("@I1@").unwrap();
        assert_eq!(tree.children(indi).len(), 1);
    }

    #[test]
    fn parse_file_decodes_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.ged");
        // "Zoë" with 0xEB as Windows-1252
        std::fs::write(&path, b"0 @I1@ INDI\n1 NAME Zo\xEB /Smith/\n").unwrap();

        let tree = parse_file(&path, ParseOptions::default()).unwrap();
        let indi = tree.individual(tree.by_xref("@I1@").unwrap()).unwrap();
        assert_eq!(indi.name(), ("Zoë".to_string(), "Smith".to_string()));
    }

    #[test]
    fn parse_file_missing_reports_path() {
        let err = parse_file(Path::new("/definitely/not/here.ged"), ParseOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("here.ged"));
    }
}
