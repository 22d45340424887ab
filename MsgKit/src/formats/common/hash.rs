//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Hash-bucket label index shared by LBL1 (MSBT) and FEN1 (MSBF)
//!
//! Layout of the index as stored in the section data:
//!
//! ```text
//! bucket_count: u32
//! bucket_count × (entry_count: u32, offset: u32)   offsets relative to the table base
//! per bucket, contiguous: len: u8, label bytes, target: u32
//! ```

use serde::{Deserialize, Serialize};

use super::cursor::{ByteView, ByteWriter};
use crate::error::{Error, Result};

/// Multiplier and default bucket count for one container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub multiplier: u32,
    pub buckets: u32,
}

/// Parameters for MSBT labels (LBL1)
pub const TEXT_HASH: HashParams = HashParams {
    multiplier: 0x492,
    buckets: 101,
};

/// Parameters for MSBF flow labels (FEN1)
pub const FLOW_HASH: HashParams = HashParams {
    multiplier: 0x492,
    buckets: 59,
};

/// Order of labels inside one bucket on encode.
///
/// MSBT sorts ascending and MSBF descending; the engine expects both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOrder {
    Ascending,
    Descending,
}

/// A label and the message or node index it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub index: u32,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>, index: u32) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }
}

/// Bucket number for `text`: `h = h * multiplier + byte` over every byte,
/// wrapping at 32 bits, then `h % modulus`.
///
/// The accumulator is unsigned, so the result is always in `0..modulus`.
#[must_use]
pub fn label_hash(text: &str, multiplier: u32, modulus: u32) -> u32 {
    let hash = text
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(multiplier).wrapping_add(u32::from(b)));
    hash % modulus.max(1)
}

/// Labels are stored behind a one-byte length
///
/// # Errors
/// Returns [`Error::LabelTooLong`] past 255 bytes.
pub fn check_label_len(label: &str) -> Result<()> {
    if label.len() > usize::from(u8::MAX) {
        return Err(Error::LabelTooLong {
            label: label.to_string(),
            len: label.len(),
        });
    }
    Ok(())
}

/// Read a bucket table positioned at its base.
///
/// Returns the bucket count found in the file and every label, in bucket
/// order. The view is left just past the bucket table header.
pub fn read_label_table(view: &mut ByteView<'_>) -> Result<(u32, Vec<Label>)> {
    let base = view.position();
    let bucket_count = view.read_u32()?;

    let mut labels = Vec::new();
    for _ in 0..bucket_count {
        let entry_count = view.read_u32()?;
        let offset = view.read_u32()? as usize;
        let resume = view.position();

        view.seek(base + offset)?;
        for _ in 0..entry_count {
            let text = String::from_utf8(view.read_length_prefixed_bytes()?.to_vec())?;
            let index = view.read_u32()?;
            labels.push(Label { text, index });
        }
        view.seek(resume)?;
    }

    tracing::debug!("Read {} labels from {} buckets", labels.len(), bucket_count);
    Ok((bucket_count, labels))
}

/// Write a bucket table at the writer's current position.
///
/// Labels are partitioned by [`label_hash`], sorted per bucket, written
/// contiguously, and the bucket headers are backfilled with counts and
/// offsets.
pub fn write_label_table(
    writer: &mut ByteWriter,
    labels: &[Label],
    multiplier: u32,
    bucket_count: u32,
    order: BucketOrder,
) -> Result<()> {
    let buckets = partition(labels, multiplier, bucket_count, order)?;

    let base = writer.position();
    writer.write_u32(bucket_count);
    for _ in 0..bucket_count {
        writer.write_u32(0);
        writer.write_u32(0);
    }

    for (i, bucket) in buckets.iter().enumerate() {
        let slot = base + 4 + i * 8;
        let offset = writer.position() - base;
        writer.patch_u32(slot, bucket.len() as u32)?;
        writer.patch_u32(slot + 4, offset as u32)?;

        for label in bucket {
            writer.write_u8(label.text.len() as u8);
            writer.write_bytes(label.text.as_bytes());
            writer.write_u32(label.index);
        }
    }

    Ok(())
}

/// Group labels into buckets in the order the encoder writes them.
pub fn partition<'a>(
    labels: &'a [Label],
    multiplier: u32,
    bucket_count: u32,
    order: BucketOrder,
) -> Result<Vec<Vec<&'a Label>>> {
    let mut buckets: Vec<Vec<&Label>> = vec![Vec::new(); bucket_count as usize];
    if bucket_count == 0 && !labels.is_empty() {
        return Err(Error::InconsistentModel(
            "label table has no buckets but labels to store".to_string(),
        ));
    }

    for label in labels {
        check_label_len(&label.text)?;
        let bucket = label_hash(&label.text, multiplier, bucket_count);
        buckets[bucket as usize].push(label);
    }

    for bucket in &mut buckets {
        match order {
            BucketOrder::Ascending => bucket.sort_by(|a, b| a.text.cmp(&b.text)),
            BucketOrder::Descending => bucket.sort_by(|a, b| b.text.cmp(&a.text)),
        }
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endian;

    #[test]
    fn test_hash_is_deterministic() {
        let first = label_hash("Msg_Intro_000", TEXT_HASH.multiplier, TEXT_HASH.buckets);
        for _ in 0..10 {
            assert_eq!(
                label_hash("Msg_Intro_000", TEXT_HASH.multiplier, TEXT_HASH.buckets),
                first
            );
        }
        assert!(first < TEXT_HASH.buckets);
    }

    #[test]
    fn test_hash_known_values() {
        assert_eq!(label_hash("", 0x492, 101), 0);
        // 'A' = 65
        assert_eq!(label_hash("A", 0x492, 101), 65);
        // (65 * 0x492 + 66) % 101 = 76116 % 101
        assert_eq!(label_hash("AB", 0x492, 101), 76116 % 101);
    }

    #[test]
    fn test_long_labels_stay_in_range() {
        // Long enough that the accumulator wraps past the sign bit
        let label = "Zz".repeat(40);
        assert!(label_hash(&label, TEXT_HASH.multiplier, TEXT_HASH.buckets) < TEXT_HASH.buckets);
        assert!(label_hash(&label, FLOW_HASH.multiplier, FLOW_HASH.buckets) < FLOW_HASH.buckets);
    }

    #[test]
    fn test_table_round_trip() {
        let labels = vec![
            Label::new("Beta", 1),
            Label::new("Alpha", 0),
            Label::new("Gamma", 2),
        ];
        let mut writer = ByteWriter::new(Endian::Big);
        write_label_table(&mut writer, &labels, 0x492, 3, BucketOrder::Ascending).unwrap();
        let bytes = writer.into_inner();

        let mut view = ByteView::new(&bytes, Endian::Big);
        let (bucket_count, mut read) = read_label_table(&mut view).unwrap();
        assert_eq!(bucket_count, 3);
        read.sort_by_key(|l| l.index);
        assert_eq!(read, vec![
            Label::new("Alpha", 0),
            Label::new("Beta", 1),
            Label::new("Gamma", 2),
        ]);
    }

    #[test]
    fn test_bucket_sort_order() {
        // A single bucket forces every label into the same list
        let labels = vec![Label::new("b", 0), Label::new("c", 1), Label::new("a", 2)];

        let ascending = partition(&labels, 0x492, 1, BucketOrder::Ascending).unwrap();
        let texts: Vec<_> = ascending[0].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);

        let descending = partition(&labels, 0x492, 1, BucketOrder::Descending).unwrap();
        let texts: Vec<_> = descending[0].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["c", "b", "a"]);
    }

    #[test]
    fn test_label_too_long() {
        let labels = vec![Label::new("x".repeat(256), 0)];
        let err = partition(&labels, 0x492, 101, BucketOrder::Ascending).unwrap_err();
        assert!(matches!(err, Error::LabelTooLong { len: 256, .. }));
    }

    #[test]
    fn test_truncated_bucket_entry() {
        // One bucket claiming one entry at offset 12, with nothing there
        let mut writer = ByteWriter::new(Endian::Big);
        writer.write_u32(1);
        writer.write_u32(1);
        writer.write_u32(12);
        let bytes = writer.into_inner();
        let err = read_label_table(&mut ByteView::new(&bytes, Endian::Big)).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { .. }));
    }
}
