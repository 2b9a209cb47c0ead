//! Bundle container header codec
//!
//! A bundle is a text header followed by a pack stream:
//!
//! ```text
//! # v2 git bundle
//! -<hex> <subject of prerequisite commit>
//! <hex> refs/heads/main
//!
//! PACK...
//! ```
//!
//! Prerequisite lines name commits the reader must already have; ref lines map
//! a ref name to the commit it points at. Version 3 headers are also read, as
//! long as their `@object-format` capability is SHA-1.

use git2::Oid;
use std::io::{BufRead, Write};

use crate::model::BranchRef;
use crate::repository::{ExchangeError, Result};

pub const V2_SIGNATURE: &str = "# v2 git bundle";
pub const V3_SIGNATURE: &str = "# v3 git bundle";
pub const PACK_SIGNATURE: &[u8; 4] = b"PACK";

const HEX_LEN: usize = 40;

/// A commit the bundle assumes is already present at the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    pub id: Oid,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleHeader {
    pub prerequisites: Vec<Prerequisite>,
    pub refs: Vec<BranchRef>,
}

impl BundleHeader {
    /// Write the header, including the terminating blank line
    pub fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{V2_SIGNATURE}")?;
        for prereq in &self.prerequisites {
            // Comments are single-line by construction
            let comment = prereq.comment.lines().next().unwrap_or("");
            if comment.is_empty() {
                writeln!(out, "-{}", prereq.id)?;
            } else {
                writeln!(out, "-{} {}", prereq.id, comment)?;
            }
        }
        for r in &self.refs {
            writeln!(out, "{} {}", r.target, r.name)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Read a header, leaving `input` positioned at the start of the pack stream
    pub fn read_from(input: &mut dyn BufRead) -> Result<Self> {
        let mut line = Vec::new();
        let signature = read_line(input, &mut line)?
            .ok_or_else(|| ExchangeError::InvalidBundle("empty file".to_string()))?;
        let is_v3 = match signature {
            V2_SIGNATURE => false,
            V3_SIGNATURE => true,
            other => {
                return Err(ExchangeError::InvalidBundle(format!(
                    "unrecognized signature '{}'",
                    truncate_for_message(other)
                )));
            }
        };

        let mut header = BundleHeader::default();
        loop {
            let Some(text) = read_line(input, &mut line)? else {
                return Err(ExchangeError::InvalidBundle(
                    "header is not terminated by a blank line".to_string(),
                ));
            };
            if text.is_empty() {
                break;
            }
            if let Some(capability) = text.strip_prefix('@') {
                if !is_v3 {
                    return Err(ExchangeError::InvalidBundle(
                        "capability line in a v2 header".to_string(),
                    ));
                }
                check_capability(capability)?;
            } else if let Some(rest) = text.strip_prefix('-') {
                let (hex, comment) = rest.split_once(' ').unwrap_or((rest, ""));
                header.prerequisites.push(Prerequisite {
                    id: parse_oid(hex)?,
                    comment: comment.to_string(),
                });
            } else {
                let (hex, name) = text.split_once(' ').ok_or_else(|| {
                    ExchangeError::InvalidBundle(format!(
                        "malformed ref line '{}'",
                        truncate_for_message(text)
                    ))
                })?;
                if name.is_empty() {
                    return Err(ExchangeError::InvalidBundle("ref line without a name".to_string()));
                }
                header.refs.push(BranchRef::new(name, parse_oid(hex)?));
            }
        }

        if header.refs.is_empty() {
            return Err(ExchangeError::InvalidBundle("bundle lists no refs".to_string()));
        }
        Ok(header)
    }
}

fn check_capability(capability: &str) -> Result<()> {
    match capability.split_once('=') {
        Some(("object-format", "sha1")) => Ok(()),
        Some(("object-format", other)) => Err(ExchangeError::InvalidBundle(format!(
            "unsupported object format '{other}'"
        ))),
        // Other capabilities (e.g. filter) only narrow the pack; reading the refs is unaffected
        _ => Ok(()),
    }
}

/// Read one `\n`-terminated line into `buf`, returning it without the terminator.
/// Returns `None` at end of input.
fn read_line<'a>(input: &mut dyn BufRead, buf: &'a mut Vec<u8>) -> Result<Option<&'a str>> {
    buf.clear();
    let n = input
        .read_until(b'\n', buf)
        .map_err(|e| crate::repository::io_err("reading bundle header", e))?;
    if n == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    std::str::from_utf8(buf)
        .map(Some)
        .map_err(|_| ExchangeError::InvalidBundle("header is not valid UTF-8".to_string()))
}

fn parse_oid(hex: &str) -> Result<Oid> {
    if hex.len() != HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ExchangeError::InvalidBundle(format!(
            "malformed object id '{}'",
            truncate_for_message(hex)
        )));
    }
    Oid::from_str(hex).map_err(|e| ExchangeError::InvalidBundle(e.message().to_string()))
}

fn truncate_for_message(s: &str) -> &str {
    match s.char_indices().nth(64) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
