//! Single-record FASTA reading
//!
//! The alignment boundary format is deliberately small: one `>` header line,
//! then sequence lines that are whitespace-stripped, upper-cased and
//! concatenated. A second header line ends the record and is not an error.

use nom::{
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use std::fs;
use std::path::Path;
use tracing::trace;

use crate::error::{GlobalignError, GlobalignResult};
use crate::sequence::Sequence;

/// File extensions accepted as FASTA input.
const FASTA_EXTENSIONS: &[&str] = &["fa", "fasta", "faa", "fna"];

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        take_while1(|c: u8| c == b' ' || c == b'\t'),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, (id, description)))
}

/// Consume sequence lines until the next header or EOF.
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        if rest.len() == remaining.len() {
            // Lone carriage return; nothing consumed, stop rather than spin.
            break;
        }
        remaining = rest;
    }

    Ok((remaining, sequence))
}

fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;

    let mut record = Sequence::new(id.to_string(), sequence);
    if let Some(desc) = description {
        let desc = desc.trim();
        if !desc.is_empty() {
            record = record.with_description(desc.to_string());
        }
    }
    Ok((input, record))
}

/// Parse the first FASTA record from raw bytes.
///
/// Fails with `MalformedSequence` if the input does not start with a `>`
/// header. Anything after a second header is ignored.
pub fn parse_fasta(data: &[u8]) -> GlobalignResult<Sequence> {
    let data = trim_leading_whitespace(data);
    if !data.starts_with(b">") {
        return Err(GlobalignError::MalformedSequence(
            "first line must begin with '>'".to_string(),
        ));
    }

    match parse_record(data) {
        Ok((_, record)) => {
            trace!(id = %record.id, residues = record.len(), "parsed FASTA record");
            Ok(record)
        }
        Err(_) => Err(GlobalignError::MalformedSequence(
            "invalid FASTA record".to_string(),
        )),
    }
}

/// Read the first FASTA record from a file.
///
/// The path must carry a FASTA extension (.fa, .fasta, .faa, .fna).
pub fn read_fasta<P: AsRef<Path>>(path: P) -> GlobalignResult<Sequence> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !FASTA_EXTENSIONS.contains(&extension.as_str()) {
        return Err(GlobalignError::MalformedSequence(format!(
            "'{}' does not have a FASTA extension",
            path.display()
        )));
    }

    let data = fs::read(path)?;
    parse_fasta(&data)
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}
