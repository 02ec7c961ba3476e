//! Reading the variant request CSV.
//!
//! Every row is normalized into a [`RequestSpec`] here, so nothing downstream
//! ever sees a missing or blank field. Two layouts are accepted:
//!
//! - gene mode, with columns `gene` and `number`
//! - site mode, with columns `chr` and `position` (plus an optional `end`)
//!
//! Both layouts take optional `variant_type` and `length` columns.

use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use simvcf_core::consts::{DEFAULT_VARIANT_LENGTH, MAX_CHROMOSOME_LENGTH};
use simvcf_core::errors::{ConfigurationError, InputFormatError};
use simvcf_core::models::{
    Interval, RequestOrigin, RequestSpec, RequestTarget, VariantRequest, VariantType,
};
use simvcf_core::utils::get_dynamic_reader;

use crate::annotation::{AnnotationError, GeneAnnotation};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Variant CSV line {line}: {source}")]
    Annotation {
        line: usize,
        #[source]
        source: AnnotationError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Gene,
    Site,
}

/// Column positions found in the header row.
#[derive(Debug, Default)]
struct Columns {
    gene: Option<usize>,
    number: Option<usize>,
    chr: Option<usize>,
    position: Option<usize>,
    end: Option<usize>,
    variant_type: Option<usize>,
    length: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Columns {
            gene: find("gene"),
            number: find("number"),
            chr: find("chr"),
            position: find("position"),
            end: find("end"),
            variant_type: find("variant_type"),
            length: find("length"),
        }
    }

    fn layout(&self) -> Option<Layout> {
        if self.gene.is_some() && self.number.is_some() {
            Some(Layout::Gene)
        } else if self.chr.is_some() && self.position.is_some() {
            Some(Layout::Site)
        } else {
            None
        }
    }
}

/// One data row together with its line number, for error messages.
struct Row<'a> {
    line: usize,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    /// The trimmed value of a column, or `None` if the column is absent or blank.
    fn get(&self, column: Option<usize>) -> Option<&str> {
        column
            .and_then(|idx| self.record.get(idx))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn invalid(&self, column: &str, value: &str, reason: &str) -> InputFormatError {
        InputFormatError::InvalidValue {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn required<'b>(&'b self, idx: Option<usize>, column: &str) -> Result<&'b str, InputFormatError> {
        self.get(idx)
            .ok_or_else(|| self.invalid(column, "", "value is required"))
    }

    fn positive(&self, idx: Option<usize>, column: &str) -> Result<Option<u64>, InputFormatError> {
        match self.get(idx) {
            None => Ok(None),
            Some(value) => parse_positive(value)
                .map(Some)
                .ok_or_else(|| self.invalid(column, value, "expected a positive whole number")),
        }
    }

    fn coordinate(&self, idx: Option<usize>, column: &str) -> Result<Option<u64>, InputFormatError> {
        match self.positive(idx, column)? {
            Some(v) if v > MAX_CHROMOSOME_LENGTH => Err(InputFormatError::PositionOutOfRange {
                line: self.line,
                column: column.to_string(),
                value: v,
                max: MAX_CHROMOSOME_LENGTH,
            }),
            value => Ok(value),
        }
    }

    fn count(&self, idx: Option<usize>, column: &str) -> Result<Option<u32>, InputFormatError> {
        match self.positive(idx, column)? {
            None => Ok(None),
            Some(v) => u32::try_from(v)
                .map(Some)
                .map_err(|_| self.invalid(column, &v.to_string(), "value is too large")),
        }
    }
}

///
/// Parse a positive whole number. Spreadsheet exports often write integers
/// as `3.0`, so those are accepted too.
///
fn parse_positive(value: &str) -> Option<u64> {
    if let Ok(v) = value.parse::<u64>() {
        return (v > 0).then_some(v);
    }
    let v = value.parse::<f64>().ok()?;
    (v.is_finite() && v >= 1.0 && v.fract() == 0.0 && v < u64::MAX as f64).then_some(v as u64)
}

///
/// Read and normalize a variant request CSV (plain or gzipped).
///
pub fn read_variant_requests<P: AsRef<Path>>(path: P) -> Result<Vec<RequestSpec>, InputFormatError> {
    let path = path.as_ref();
    let reader = get_dynamic_reader(path)
        .map_err(|e| InputFormatError::FileReadError(format!("{:#}", e)))?;
    parse_variant_requests(reader, &path.display().to_string())
}

///
/// Normalize the rows of a variant request CSV.
///
/// # Arguments
///
/// - reader: the CSV stream, header row first
/// - source: name of the stream, used in error messages
///
pub fn parse_variant_requests<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<RequestSpec>, InputFormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| InputFormatError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let columns = Columns::from_headers(&headers);
    let layout = columns
        .layout()
        .ok_or_else(|| InputFormatError::MissingColumns(headers.join(", ")))?;

    debug!("Reading {} in {:?} mode", source, layout);

    let mut specs = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| InputFormatError::Csv(e.to_string()))?;
        let row = Row {
            line: record.position().map_or(index + 2, |p| p.line() as usize),
            record: &record,
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        specs.push(normalize_row(&row, &columns, layout)?);
    }

    if specs.is_empty() {
        return Err(InputFormatError::Empty(source.to_string()));
    }

    Ok(specs)
}

fn normalize_row(row: &Row, columns: &Columns, layout: Layout) -> Result<RequestSpec, InputFormatError> {
    let variant_type = match row.get(columns.variant_type) {
        None => VariantType::Snp,
        Some(label) => label
            .parse::<VariantType>()
            .map_err(|_| InputFormatError::InvalidVariantType {
                line: row.line,
                value: label.to_string(),
            })?,
    };

    let mut length = row
        .count(columns.length, "length")?
        .unwrap_or(DEFAULT_VARIANT_LENGTH);
    if variant_type.is_point() && length != 1 {
        warn!(
            "Line {}: SNPs always have length 1, ignoring length {}",
            row.line, length
        );
        length = 1;
    }

    let (target, count) = match layout {
        Layout::Gene => {
            let name = row.required(columns.gene, "gene")?.to_string();
            let count = row
                .count(columns.number, "number")?
                .ok_or_else(|| row.invalid("number", "", "value is required"))?;
            (RequestTarget::Gene { name }, count)
        }
        Layout::Site => {
            let chrom = row.required(columns.chr, "chr")?.to_string();
            let position = row
                .coordinate(columns.position, "position")?
                .ok_or_else(|| row.invalid("position", "", "value is required"))?;

            match row.coordinate(columns.end, "end")? {
                Some(end) => {
                    if end < position {
                        return Err(row.invalid(
                            "end",
                            &end.to_string(),
                            "end must not be before position",
                        ));
                    }
                    let count = row.count(columns.number, "number")?.unwrap_or(1);
                    let interval = Interval::new(position, end);
                    (RequestTarget::Range { chrom, interval }, count)
                }
                None => {
                    match row.count(columns.number, "number")? {
                        Some(count) if count != 1 => {
                            return Err(row.invalid(
                                "number",
                                &count.to_string(),
                                "a row without 'end' places exactly one variant",
                            ));
                        }
                        _ => {}
                    }
                    (RequestTarget::Site { chrom, position }, 1)
                }
            }
        }
    };

    Ok(RequestSpec {
        line: row.line,
        target,
        variant_type,
        count,
        length,
    })
}

///
/// Turn normalized rows into requests on concrete intervals, looking gene
/// names up in `annotation`.
///
/// Fails with [`ConfigurationError::AnnotationRequired`] when a row names a
/// gene and no annotation was loaded.
///
pub fn resolve_requests(
    specs: &[RequestSpec],
    annotation: Option<&GeneAnnotation>,
) -> Result<Vec<VariantRequest>, ResolveError> {
    specs
        .iter()
        .map(|spec| match &spec.target {
            RequestTarget::Gene { name } => {
                let annotation = annotation.ok_or(ConfigurationError::AnnotationRequired)?;
                let gene = annotation
                    .resolve(name)
                    .map_err(|source| ResolveError::Annotation {
                        line: spec.line,
                        source,
                    })?;
                Ok(VariantRequest::new(
                    gene.chrom.clone(),
                    gene.interval(),
                    spec.variant_type,
                    spec.count,
                    spec.length,
                    RequestOrigin::Gene(name.clone()),
                ))
            }
            RequestTarget::Site { chrom, position } => Ok(VariantRequest::pinned(
                chrom.clone(),
                *position,
                spec.variant_type,
                spec.length,
            )),
            RequestTarget::Range { chrom, interval } => Ok(VariantRequest::new(
                chrom.clone(),
                *interval,
                spec.variant_type,
                spec.count,
                spec.length,
                RequestOrigin::SiteRange,
            )),
        })
        .collect()
}

/// Whether any row needs the gene annotation.
pub fn needs_annotation(specs: &[RequestSpec]) -> bool {
    specs
        .iter()
        .any(|spec| matches!(spec.target, RequestTarget::Gene { .. }))
}
