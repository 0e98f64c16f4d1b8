use std::fs::File;
use std::io::{self, BufReader, Read};

use log::debug;
use noodles::bam;
use noodles::bgzf;
use noodles::sam;

use bamstats_core::consts::{MAPQ_UNAVAILABLE, PHRED_OFFSET, QUALITIES_UNAVAILABLE};
use bamstats_core::models::{AlignmentRecord, ReferenceTable};

use crate::errors::{BamReadError, Result};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

// BAM fills the quality field with 0xFF when a read has no qualities
const MISSING_QUALITY_SCORE: u8 = 0xFF;

///
/// Streaming BAM reader that yields one [`AlignmentRecord`] at a time.
///
/// The header is read on construction, so a reader that exists always has a [`ReferenceTable`].
/// A single `bam::Record` buffer is reused across reads.
///
pub struct AlignmentReader<R> {
    reader: bam::io::Reader<bgzf::Reader<R>>,
    header: sam::Header,
    refs: ReferenceTable,
    record: bam::Record,
    records_read: u64,
}

impl<R: Read> AlignmentReader<R> {
    ///
    /// Wrap a BGZF-compressed BAM stream and read its header.
    ///
    pub fn new(inner: R) -> Result<Self> {
        let mut reader = bam::io::reader::Builder::default().build_from_reader(inner);
        let header = reader.read_header().map_err(BamReadError::Header)?;
        let refs = reference_table(&header);

        debug!("Read BAM header with {} reference sequences", refs.len());

        Ok(AlignmentReader {
            reader,
            header,
            refs,
            record: bam::Record::default(),
            records_read: 0,
        })
    }

    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    pub fn references(&self) -> &ReferenceTable {
        &self.refs
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    ///
    /// Read the next record, or `None` at end of input.
    ///
    pub fn read_next(&mut self) -> Result<Option<AlignmentRecord>> {
        let index = self.records_read + 1;

        match self.reader.read_record(&mut self.record) {
            Ok(0) => Ok(None),
            Ok(_) => {
                self.records_read = index;
                to_alignment_record(&self.record)
                    .map(Some)
                    .map_err(|source| BamReadError::Record { index, source })
            }
            Err(source) => Err(BamReadError::Record { index, source }),
        }
    }
}

impl<R: Read> Iterator for AlignmentReader<R> {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

///
/// Open a BAM file for streaming, or standard input when `path` is [`STDIN_PATH`].
///
pub fn open_alignments(path: &str) -> Result<AlignmentReader<Box<dyn Read>>> {
    let source: Box<dyn Read> = if path == STDIN_PATH {
        debug!("Reading alignments from stdin");
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(path).map_err(|source| BamReadError::Open {
            path: path.to_string(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };

    AlignmentReader::new(source)
}

///
/// Reference names in header order, so that a record's `ref_id` indexes straight into the table.
///
pub fn reference_table(header: &sam::Header) -> ReferenceTable {
    header
        .reference_sequences()
        .keys()
        .map(|name| name.to_string())
        .collect()
}

///
/// Convert a raw BAM record into the collectors' view of it.
///
/// Positions become 0-based, with -1 standing in for an absent position. An absent mapping
/// quality becomes 255 and an absent quality string becomes `"*"`.
///
pub fn to_alignment_record(record: &bam::Record) -> io::Result<AlignmentRecord> {
    let flags = record.flags();

    let ref_id = record.reference_sequence_id().transpose()?;
    let position = match record.alignment_start().transpose()? {
        Some(start) => usize::from(start) as i64 - 1,
        None => -1,
    };

    let mate_ref_id = record.mate_reference_sequence_id().transpose()?;
    let mate_position = match record.mate_alignment_start().transpose()? {
        Some(start) => usize::from(start) as i64 - 1,
        None => -1,
    };

    let mapping_quality = record
        .mapping_quality()
        .map_or(MAPQ_UNAVAILABLE, |mapq| mapq.get());

    let scores = record.quality_scores();
    let raw_scores: &[u8] = scores.as_ref();
    let qualities = if raw_scores
        .first()
        .is_none_or(|score| *score == MISSING_QUALITY_SCORE)
    {
        QUALITIES_UNAVAILABLE.to_vec()
    } else {
        raw_scores
            .iter()
            .map(|score| score.saturating_add(PHRED_OFFSET))
            .collect()
    };

    Ok(AlignmentRecord {
        ref_id,
        position,
        length: record.sequence().len() as u32,
        mapping_quality,
        qualities,
        mate_ref_id,
        mate_position,
        insert_size: record.template_length(),
        is_paired: flags.is_segmented(),
        is_proper_pair: flags.is_properly_segmented(),
        is_mapped: !flags.is_unmapped(),
        is_mate_mapped: !flags.is_mate_unmapped(),
        is_reverse_strand: flags.is_reverse_complemented(),
        is_first_mate: flags.is_first_segment(),
        is_second_mate: flags.is_last_segment(),
        is_failed_qc: flags.is_qc_fail(),
        is_duplicate: flags.is_duplicate(),
    })
}
