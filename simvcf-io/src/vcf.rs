//! VCF output.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use log::info;

use simvcf_core::consts::{PKG_NAME, VCF_FILEFORMAT, VERSION};
use simvcf_core::models::{AlleleCall, VcfRecord};
use simvcf_core::utils::compare_chromosomes;

const COLUMN_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";

const SYMBOLIC_META_LINES: [&str; 6] = [
    "##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">",
    "##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position of the variant described in this record\">",
    "##INFO=<ID=SVLEN,Number=.,Type=Integer,Description=\"Difference in length between REF and ALT alleles\">",
    "##ALT=<ID=CNV,Description=\"Copy number variable region\">",
    "##ALT=<ID=DEL:ME,Description=\"Deletion of mobile element relative to the reference\">",
    "##ALT=<ID=INS:ME,Description=\"Insertion of a mobile element\">",
];

///
/// Meta-information lines written above the column header.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfHeader {
    pub file_date: NaiveDate,
    pub source: String,
    pub reference: String,
    /// Declare the INFO and ALT entries used by symbolic alleles.
    pub symbolic_alleles: bool,
}

impl VcfHeader {
    pub fn new(reference: impl Into<String>) -> Self {
        VcfHeader {
            file_date: Local::now().date_naive(),
            source: format!("{}-{}", PKG_NAME, VERSION),
            reference: reference.into(),
            symbolic_alleles: false,
        }
    }

    pub fn with_file_date(mut self, file_date: NaiveDate) -> Self {
        self.file_date = file_date;
        self
    }

    pub fn with_symbolic_alleles(mut self, symbolic_alleles: bool) -> Self {
        self.symbolic_alleles = symbolic_alleles;
        self
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("##fileformat={}", VCF_FILEFORMAT),
            format!("##fileDate={}", self.file_date.format("%Y%m%d")),
            format!("##source={}", self.source),
            format!("##reference={}", self.reference),
        ];
        if self.symbolic_alleles {
            lines.extend(SYMBOLIC_META_LINES.iter().map(|l| l.to_string()));
        }
        lines.push(COLUMN_HEADER.to_string());
        lines
    }
}

///
/// Order allele calls for output: chromosomes in karyotypic order, then
/// ascending position. Calls at the same position keep their input order.
///
pub fn assemble_records<I>(calls: I) -> Vec<VcfRecord>
where
    I: IntoIterator<Item = AlleleCall>,
{
    let mut by_chrom: BTreeMap<String, Vec<AlleleCall>> = BTreeMap::new();
    for call in calls {
        by_chrom.entry(call.chrom.clone()).or_default().push(call);
    }

    let mut groups: Vec<(String, Vec<AlleleCall>)> = by_chrom.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| compare_chromosomes(a, b));

    groups
        .into_iter()
        .flat_map(|(_, mut calls)| {
            calls.sort_by_key(|call| call.position);
            calls.into_iter().map(VcfRecord::from)
        })
        .collect()
}

///
/// Streams a VCF to any writer. Records are written as given, callers
/// are expected to order them with [`assemble_records`] first.
///
pub struct VcfWriter<W: Write> {
    inner: W,
    records_written: usize,
}

impl VcfWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> VcfWriter<W> {
    pub fn new(inner: W) -> Self {
        VcfWriter {
            inner,
            records_written: 0,
        }
    }

    pub fn write_header(&mut self, header: &VcfHeader) -> io::Result<()> {
        for line in header.lines() {
            writeln!(self.inner, "{}", line)?;
        }
        Ok(())
    }

    pub fn write_record(&mut self, record: &VcfRecord) -> io::Result<()> {
        writeln!(self.inner, "{}", record.as_string())?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

///
/// Write a complete VCF file, replacing whatever was at `path`.
///
pub fn write_vcf<P: AsRef<Path>>(
    path: P,
    header: &VcfHeader,
    records: &[VcfRecord],
) -> io::Result<()> {
    let path = path.as_ref();
    let mut writer = VcfWriter::create(path)?;
    writer.write_header(header)?;
    for record in records {
        writer.write_record(record)?;
    }
    let written = writer.records_written();
    writer.finish()?;

    info!("Wrote {} records to {}", written, path.display());
    Ok(())
}
