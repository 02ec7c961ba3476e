use std::io::BufRead;

use crate::errors::ReferenceLoadError;

/// A single FASTA record with its bases upper-cased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Record ID from a FASTA header (without the leading '>'), dropping any description.
pub fn parse_fasta_header(header: &str) -> String {
    let header = header.trim();
    match header.split_once(char::is_whitespace) {
        Some((id, _)) => id.to_string(),
        None => header.to_string(),
    }
}

///
/// Read every record of a FASTA stream whose ID passes `keep`.
///
/// Sequence lines of records that are not kept are skipped without being
/// buffered, so large unplaced contigs don't cost memory.
///
/// # Arguments
///
/// - reader: the FASTA stream
/// - source: name of the stream, used in error messages
/// - keep: predicate on the record ID
///
pub fn read_fasta<R, F>(
    mut reader: R,
    source: &str,
    keep: F,
) -> Result<Vec<FastaRecord>, ReferenceLoadError>
where
    R: BufRead,
    F: Fn(&str) -> bool,
{
    let mut records = Vec::new();
    let mut line = String::new();
    let mut line_number = 0;

    let mut current: Option<FastaRecord> = None;
    let mut seen_header = false;

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            // EOF - finalize the last record if any
            if let Some(record) = current.take() {
                records.push(record);
            }
            break;
        }
        line_number += 1;

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            seen_header = true;

            let name = parse_fasta_header(header);
            if keep(&name) {
                current = Some(FastaRecord {
                    name,
                    sequence: Vec::new(),
                });
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen_header {
            return Err(ReferenceLoadError::SequenceBeforeHeader {
                path: source.to_string(),
                line: line_number,
            });
        }
        if let Some(record) = current.as_mut() {
            record
                .sequence
                .extend(trimmed.bytes().map(|b| b.to_ascii_uppercase()));
        }
    }

    Ok(records)
}
