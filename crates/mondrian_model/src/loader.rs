//! Loading of block/terminal and net description files.
//!
//! The block file carries an `Outline: <w> <h>` header, `NumBlocks:` and
//! `NumTerminals:` counts, then one `<name> <w> <h>` line per block and one
//! `<name> terminal <x> <y>` line per terminal. The net file carries a
//! `NumNets:` header, then per net a `NetDegree: <d>` line followed by `d`
//! member-name lines resolved against the already-loaded blocks and
//! terminals.
//!
//! Missing or garbled required headers abort the load. Malformed entity
//! lines and unresolved net member names are skipped with a warning, and
//! loading continues.

use crate::data::Floorplan;
use mondrian_common::{Outline, Point, WarningSink};
use std::path::Path;
use std::str::Lines;

/// Errors that abort loading an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// An I/O error occurred while reading the file.
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    /// A required header line never appeared.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// A header line appeared where a different one was required.
    #[error("expected {expected} header, found: {line}")]
    UnexpectedHeader {
        /// The header keyword that was required here.
        expected: &'static str,
        /// The offending line.
        line: String,
    },

    /// A terminal entry did not carry the `terminal` keyword.
    #[error("expected terminal entry, found: {0}")]
    BadTerminal(String),

    /// The file ended before all declared entities were read.
    #[error("unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),
}

/// Loads a block/terminal description file into a fresh [`Floorplan`].
pub fn load_blocks_file(path: &Path, sink: &WarningSink) -> Result<Floorplan, LoadError> {
    let content = std::fs::read_to_string(path)?;
    load_blocks_str(&content, sink)
}

/// Parses a block/terminal description from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_blocks_str(content: &str, sink: &WarningSink) -> Result<Floorplan, LoadError> {
    let mut lines = content.lines();

    let outline_dims = scan_header(&mut lines, "Outline:", 2, sink)?;
    let outline = Outline::new(outline_dims[0], outline_dims[1]);
    let num_blocks = scan_header(&mut lines, "NumBlocks:", 1, sink)?[0];
    let num_terminals = scan_header(&mut lines, "NumTerminals:", 1, sink)?[0];

    let mut plan = Floorplan::new(outline);

    for _ in 0..num_blocks {
        let (name, dims) = scan_block_entry(&mut lines, sink)?;
        plan.add_block(name, dims.0, dims.1);
    }

    for _ in 0..num_terminals {
        let (name, position) = scan_terminal_entry(&mut lines, sink)?;
        plan.add_terminal(name, position);
    }

    Ok(plan)
}

/// Loads a net description file into an already-populated [`Floorplan`].
pub fn load_nets_file(
    path: &Path,
    plan: &mut Floorplan,
    sink: &WarningSink,
) -> Result<(), LoadError> {
    let content = std::fs::read_to_string(path)?;
    load_nets_str(&content, plan, sink)
}

/// Parses a net description from a string into an already-populated
/// [`Floorplan`].
///
/// Member names that resolve to neither a block nor a terminal are skipped
/// with a warning; the net keeps its remaining members.
pub fn load_nets_str(
    content: &str,
    plan: &mut Floorplan,
    sink: &WarningSink,
) -> Result<(), LoadError> {
    let mut lines = content.lines();
    let num_nets = scan_header(&mut lines, "NumNets:", 1, sink)?[0];

    for _ in 0..num_nets {
        let degree = scan_header(&mut lines, "NetDegree:", 1, sink)?[0];
        let mut blocks = Vec::new();
        let mut terminals = Vec::new();

        for _ in 0..degree {
            let name = scan_member_name(&mut lines)?;
            if let Some(id) = plan.block_named(&name) {
                blocks.push(id);
            } else if let Some(id) = plan.terminal_named(&name) {
                terminals.push(id);
            } else {
                sink.warn(format!("net member '{name}' not found, skipped"));
            }
        }

        plan.add_net(blocks, terminals);
    }

    Ok(())
}

/// Scans forward to a `<keyword> <int>...` header line with `arity` integer
/// fields. Blank lines are skipped silently, other non-matching lines with a
/// warning; a parsable header with the wrong keyword is fatal.
fn scan_header(
    lines: &mut Lines,
    keyword: &'static str,
    arity: usize,
    sink: &WarningSink,
) -> Result<Vec<i64>, LoadError> {
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let values: Option<Vec<i64>> = tokens
            .get(1..1 + arity)
            .and_then(|ts| ts.iter().map(|t| t.parse().ok()).collect());
        match values {
            Some(values) => {
                if tokens[0] != keyword {
                    return Err(LoadError::UnexpectedHeader {
                        expected: keyword,
                        line: line.to_string(),
                    });
                }
                return Ok(values);
            }
            None => sink.warn(format!("skipping malformed line, expected {keyword}: {line}")),
        }
    }
    Err(LoadError::MissingHeader(keyword))
}

/// Scans forward to the next `<name> <w> <h>` block entry.
fn scan_block_entry(
    lines: &mut Lines,
    sink: &WarningSink,
) -> Result<(String, (i64, i64)), LoadError> {
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let parsed = match tokens.as_slice() {
            [name, w, h, ..] => w
                .parse::<i64>()
                .and_then(|w| h.parse::<i64>().map(|h| (name.to_string(), (w, h))))
                .ok(),
            _ => None,
        };
        match parsed {
            Some(entry) => return Ok(entry),
            None => sink.warn(format!("skipping malformed block entry: {line}")),
        }
    }
    Err(LoadError::UnexpectedEof("block entries"))
}

/// Scans forward to the next `<name> terminal <x> <y>` terminal entry.
fn scan_terminal_entry(
    lines: &mut Lines,
    sink: &WarningSink,
) -> Result<(String, Point), LoadError> {
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if let [name, kind, x, y, ..] = tokens.as_slice() {
            if let (Ok(x), Ok(y)) = (x.parse::<i64>(), y.parse::<i64>()) {
                if *kind != "terminal" {
                    return Err(LoadError::BadTerminal(line.to_string()));
                }
                return Ok((name.to_string(), Point::new(x, y)));
            }
        }
        sink.warn(format!("skipping malformed terminal entry: {line}"));
    }
    Err(LoadError::UnexpectedEof("terminal entries"))
}

/// Scans forward to the next non-blank line and returns its first token.
fn scan_member_name(lines: &mut Lines) -> Result<String, LoadError> {
    for line in lines {
        if let Some(name) = line.split_whitespace().next() {
            return Ok(name.to_string());
        }
    }
    Err(LoadError::UnexpectedEof("net members"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BLOCKS: &str = "\
Outline: 40 50
NumBlocks: 3
NumTerminals: 2
bk1 10 20
bk2 15 15
bk3 5 5
VDD terminal 0 50
GND terminal 40 0
";

    const NETS: &str = "\
NumNets: 2
NetDegree: 2
bk1
bk2
NetDegree: 3
bk2
bk3
VDD
";

    #[test]
    fn load_blocks_basic() {
        let sink = WarningSink::new();
        let plan = load_blocks_str(BLOCKS, &sink).unwrap();
        assert_eq!(plan.outline, Outline::new(40, 50));
        assert_eq!(plan.block_count(), 3);
        assert_eq!(plan.terminal_count(), 2);
        let bk2 = plan.block_named("bk2").unwrap();
        assert_eq!(plan.block(bk2).width(), 15);
        let vdd = plan.terminal_named("VDD").unwrap();
        assert_eq!(plan.terminal(vdd).position, Point::new(0, 50));
        assert!(sink.is_empty());
    }

    #[test]
    fn load_nets_basic() {
        let sink = WarningSink::new();
        let mut plan = load_blocks_str(BLOCKS, &sink).unwrap();
        load_nets_str(NETS, &mut plan, &sink).unwrap();
        assert_eq!(plan.net_count(), 2);
        assert_eq!(plan.nets[0].blocks.len(), 2);
        assert_eq!(plan.nets[0].terminals.len(), 0);
        assert_eq!(plan.nets[1].blocks.len(), 2);
        assert_eq!(plan.nets[1].terminals.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn unresolved_member_warns_and_skips() {
        let sink = WarningSink::new();
        let mut plan = load_blocks_str(BLOCKS, &sink).unwrap();
        let nets = "NumNets: 1\nNetDegree: 2\nbk1\nnosuch\n";
        load_nets_str(nets, &mut plan, &sink).unwrap();
        assert_eq!(plan.net_count(), 1);
        assert_eq!(plan.nets[0].blocks.len(), 1);
        assert_eq!(sink.len(), 1);
        assert!(sink.take_all()[0].contains("nosuch"));
    }

    #[test]
    fn missing_outline_errors() {
        let sink = WarningSink::new();
        let err = load_blocks_str("NumBlocks: 1\nbk1 2 2\n", &sink).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnexpectedHeader {
                expected: "Outline:",
                ..
            }
        ));
    }

    #[test]
    fn empty_input_errors() {
        let sink = WarningSink::new();
        let err = load_blocks_str("", &sink).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader("Outline:")));
    }

    #[test]
    fn truncated_blocks_errors() {
        let sink = WarningSink::new();
        let input = "Outline: 10 10\nNumBlocks: 2\nNumTerminals: 0\nbk1 2 2\n";
        let err = load_blocks_str(input, &sink).unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedEof("block entries")));
    }

    #[test]
    fn malformed_block_line_warns_and_continues() {
        let sink = WarningSink::new();
        let input = "Outline: 10 10\nNumBlocks: 1\nNumTerminals: 0\ngarbage\nbk1 2 2\n";
        let plan = load_blocks_str(input, &sink).unwrap();
        assert_eq!(plan.block_count(), 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn wrong_terminal_keyword_errors() {
        let sink = WarningSink::new();
        let input = "Outline: 10 10\nNumBlocks: 0\nNumTerminals: 1\nVDD pad 0 0\n";
        let err = load_blocks_str(input, &sink).unwrap_err();
        assert!(matches!(err, LoadError::BadTerminal(_)));
    }

    #[test]
    fn blank_lines_skipped_silently() {
        let sink = WarningSink::new();
        let input = "\n\nOutline: 10 10\n\nNumBlocks: 1\nNumTerminals: 0\n\nbk1 2 2\n";
        let plan = load_blocks_str(input, &sink).unwrap();
        assert_eq!(plan.block_count(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn load_from_file() {
        let sink = WarningSink::new();
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{BLOCKS}").unwrap();
        tmp.flush().unwrap();
        let plan = load_blocks_file(tmp.path(), &sink).unwrap();
        assert_eq!(plan.block_count(), 3);
    }

    #[test]
    fn load_missing_file_errors() {
        let sink = WarningSink::new();
        let err = load_blocks_file(Path::new("/nonexistent/blocks.txt"), &sink).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
