/// Offset between a Phred score and its printable ASCII encoding.
pub const PHRED_OFFSET: u8 = 33;

/// Quality string used when per-base qualities are unavailable (SAM `*`).
pub const QUALITIES_UNAVAILABLE: &[u8] = b"*";

/// Mapping quality reported when the aligner did not provide one.
pub const MAPQ_UNAVAILABLE: u8 = 255;
