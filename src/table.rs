//! Loading prefix tables from text.
//!
//! A table has one record per line with whitespace-separated fields. Blank lines and lines starting
//! with `#` are skipped. The first field of a record is a CIDR prefix and the optional second field
//! is its value, either decimal (`42`) or hexadecimal when followed by a semicolon (`2a;`). The
//! value `ffffffff;` (`4294967295`) is reserved and rejected.
//!
//! ```text
//! # prefix      value
//! 10.0.0.0/8    1
//! 10.1.0.0/16   2a;
//! 192.168.0.0/16
//! ```
//!
//! Sample files use the same layout with an address in the first field and the expected value in
//! the second, where a negative value means that no prefix is expected to match.

use std::io::BufRead;

use thiserror::Error;

use crate::{parse_cidr, parse_ipv4, LongestPrefixMatch, ParseError, PatriciaTrie, NULL};

/// Errors while reading a prefix table or a sample file.
#[derive(Error, Debug)]
pub enum TableError {
    /// Reading from the underlying reader failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The prefix of a record could not be parsed.
    #[error("parse error at line {line}: {source}")]
    Parse {
        /// Line number, starting at 1.
        line: usize,
        /// What was wrong with the prefix.
        source: ParseError,
    },

    /// The value of a record is not a valid number.
    #[error("invalid value {value:?} at line {line}")]
    InvalidValue {
        /// Line number, starting at 1.
        line: usize,
        /// The offending field.
        value: String,
    },
}

/// Call `f` with the line number and the fields of every record in `reader`, and return the number
/// of records. Stops at the first error returned by `f`.
pub fn for_each_record<R, F>(reader: R, mut f: F) -> Result<usize, TableError>
where
    R: BufRead,
    F: FnMut(usize, &[&str]) -> Result<(), TableError>,
{
    let mut records = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() || fields[0].starts_with('#') {
            continue;
        }
        f(i + 1, &fields)?;
        records += 1;
    }
    Ok(records)
}

/// Insert every record of `reader` into `trie` and return the number of records. Records without a
/// value get their zero-based position in the table as value.
pub fn load_into<L, R>(trie: &mut L, reader: R) -> Result<usize, TableError>
where
    L: LongestPrefixMatch + ?Sized,
    R: BufRead,
{
    let mut index: u32 = 0;
    let records = for_each_record(reader, |line, fields| {
        let prefix = parse_cidr(fields[0]).map_err(|source| TableError::Parse { line, source })?;
        let value = match fields.get(1) {
            Some(field) => parse_value(field).ok_or_else(|| TableError::InvalidValue {
                line,
                value: field.to_string(),
            })?,
            None => index,
        };
        trie.insert_value(prefix, value);
        index = index.wrapping_add(1);
        Ok(())
    })?;
    log::debug!("loaded {records} prefixes into {} nodes", trie.size());
    Ok(records)
}

/// Build a [`PatriciaTrie`] from a table.
///
/// ```
/// # use ipv4_patricia::{parse_ipv4, table};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let text = "1.1.0.0/16 1\n1.1.2.0/24 2\n";
/// let trie = table::load(text.as_bytes())?;
/// assert_eq!(trie.lookup(parse_ipv4("1.1.2.1")), Some(2));
/// assert_eq!(trie.lookup(parse_ipv4("1.1.9.1")), Some(1));
/// # Ok(())
/// # }
/// ```
pub fn load<R: BufRead>(reader: R) -> Result<PatriciaTrie, TableError> {
    let mut trie = PatriciaTrie::new();
    load_into(&mut trie, reader)?;
    Ok(trie)
}

/// Read a sample file into pairs of address and expected lookup result.
pub fn read_samples<R: BufRead>(reader: R) -> Result<Vec<(u32, Option<u32>)>, TableError> {
    let mut samples = Vec::new();
    for_each_record(reader, |line, fields| {
        let addr = parse_ipv4(fields[0]);
        let expected = match fields.get(1) {
            Some(field) if field.starts_with('-') => None,
            Some(field) => Some(parse_value(field).ok_or_else(|| TableError::InvalidValue {
                line,
                value: field.to_string(),
            })?),
            None => None,
        };
        samples.push((addr, expected));
        Ok(())
    })?;
    Ok(samples)
}

/// Parse a decimal value, or a hexadecimal one when followed by `;`. [`NULL`] is reserved for
/// "no value" and rejected, so that every trie stores the same set of values.
fn parse_value(s: &str) -> Option<u32> {
    match s.strip_suffix(';') {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
    .filter(|v| *v != NULL)
}
