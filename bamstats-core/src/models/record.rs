use crate::consts::{PHRED_OFFSET, QUALITIES_UNAVAILABLE};

///
/// A single alignment as seen by the statistics collectors.
///
/// Positions are 0-based. `qualities` holds the Phred+33 encoded quality string,
/// or [`QUALITIES_UNAVAILABLE`] when the read carries none.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentRecord {
    pub ref_id: Option<usize>,
    pub position: i64,
    pub length: u32,
    pub mapping_quality: u8,
    pub qualities: Vec<u8>,

    pub mate_ref_id: Option<usize>,
    pub mate_position: i64,
    pub insert_size: i32,

    pub is_paired: bool,
    pub is_proper_pair: bool,
    pub is_mapped: bool,
    pub is_mate_mapped: bool,
    pub is_reverse_strand: bool,
    pub is_first_mate: bool,
    pub is_second_mate: bool,
    pub is_failed_qc: bool,
    pub is_duplicate: bool,
}

impl AlignmentRecord {
    ///
    /// Last reference position covered by the read (inclusive), if it covers any.
    ///
    pub fn end_position(&self) -> Option<i64> {
        if self.length == 0 {
            None
        } else {
            Some(self.position + self.length as i64 - 1)
        }
    }

    ///
    /// Whether the record carries a usable quality string.
    ///
    pub fn has_qualities(&self) -> bool {
        !self.qualities.is_empty() && self.qualities != QUALITIES_UNAVAILABLE
    }

    ///
    /// Iterate the decoded Phred scores. Yields nothing when qualities are unavailable.
    ///
    pub fn phred_scores(&self) -> impl Iterator<Item = u8> + '_ {
        let qualities: &[u8] = if self.has_qualities() {
            &self.qualities
        } else {
            &[]
        };

        qualities.iter().map(|q| q.saturating_sub(PHRED_OFFSET))
    }

    ///
    /// Whether the mate sits on the same reference, strictly downstream of this read.
    ///
    pub fn mate_is_downstream(&self) -> bool {
        self.ref_id.is_some()
            && self.ref_id == self.mate_ref_id
            && self.mate_position > self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(100))]
    #[case(76, Some(175))]
    fn test_end_position(#[case] length: u32, #[case] expected: Option<i64>) {
        let record = AlignmentRecord {
            position: 100,
            length,
            ..Default::default()
        };
        assert_eq!(record.end_position(), expected);
    }

    #[rstest]
    fn test_phred_scores_decoded() {
        let record = AlignmentRecord {
            qualities: b"!5I".to_vec(),
            ..Default::default()
        };
        assert_eq!(record.phred_scores().collect::<Vec<_>>(), vec![0, 20, 40]);
    }

    #[rstest]
    #[case(b"*".to_vec())]
    #[case(Vec::new())]
    fn test_unavailable_qualities_yield_nothing(#[case] qualities: Vec<u8>) {
        let record = AlignmentRecord {
            qualities,
            ..Default::default()
        };
        assert_eq!(record.has_qualities(), false);
        assert_eq!(record.phred_scores().count(), 0);
    }

    #[rstest]
    #[case(Some(0), Some(0), 500, true)]
    #[case(Some(0), Some(0), 100, false)]
    #[case(Some(0), Some(0), 50, false)]
    #[case(Some(0), Some(1), 500, false)]
    #[case(None, None, 500, false)]
    fn test_mate_is_downstream(
        #[case] ref_id: Option<usize>,
        #[case] mate_ref_id: Option<usize>,
        #[case] mate_position: i64,
        #[case] expected: bool,
    ) {
        let record = AlignmentRecord {
            ref_id,
            mate_ref_id,
            position: 100,
            mate_position,
            ..Default::default()
        };
        assert_eq!(record.mate_is_downstream(), expected);
    }
}
