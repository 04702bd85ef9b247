//! Versioned binary persistence for a built [`SizingTable`] (§6's "Persisted
//! state layout"): header followed by a row-major cell array. The engine
//! verifies the header and rebuilds from scratch on any mismatch.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bucket::LogBuckets,
    table::{SizingTable, TableCell}
};

const MAGIC: u32 = 0x5641_4E47; // "VANG"
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("header mismatch: expected magic {expected_magic:#x}/version {expected_version}, got {got_magic:#x}/{got_version}")]
    HeaderMismatch { expected_magic: u32, expected_version: u32, got_magic: u32, got_version: u32 },
    #[error("io error: {0}")]
    Io(String),
    #[error("encoding error: {0}")]
    Encoding(String)
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    magic: u32,
    version: u32,
    fee_tiers: usize,
    victim_bins: usize,
    liquidity_bins: usize
}

#[derive(Serialize, Deserialize)]
struct CellRecord {
    front_run_amount: u128,
    expected_profit: u128
}

/// Writes `table` to `writer` as `{header}{cells}`.
pub fn write_table(table: &SizingTable, mut writer: impl Write) -> Result<(), PersistError> {
    let header = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
        fee_tiers: table.fee_tiers.len(),
        victim_bins: table.victim_buckets.len(),
        liquidity_bins: table.liquidity_buckets.len()
    };
    bincode::serialize_into(&mut writer, &header).map_err(|e| PersistError::Encoding(e.to_string()))?;

    for cell in table.cells() {
        let record = CellRecord { front_run_amount: cell.front_run_amount, expected_profit: cell.expected_profit };
        bincode::serialize_into(&mut writer, &record).map_err(|e| PersistError::Encoding(e.to_string()))?;
    }
    Ok(())
}

/// Reads a table back, provided the caller supplies the same bucket edges
/// the table was built with (buckets themselves aren't re-derivable from the
/// header alone — only their cardinality is verified).
///
/// Returns [`PersistError::HeaderMismatch`] if the stored dimensions don't
/// match `victim_buckets`/`liquidity_buckets`/`fee_tiers`, signaling the
/// caller should rebuild with [`SizingTable::build`] instead.
pub fn read_table(
    mut reader: impl Read,
    victim_buckets: LogBuckets,
    liquidity_buckets: LogBuckets,
    fee_tiers: Vec<u16>
) -> Result<SizingTable, PersistError> {
    let header: Header =
        bincode::deserialize_from(&mut reader).map_err(|e| PersistError::Encoding(e.to_string()))?;

    let expected = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
        fee_tiers: fee_tiers.len(),
        victim_bins: victim_buckets.len(),
        liquidity_bins: liquidity_buckets.len()
    };
    if header.magic != expected.magic
        || header.version != expected.version
        || header.fee_tiers != expected.fee_tiers
        || header.victim_bins != expected.victim_bins
        || header.liquidity_bins != expected.liquidity_bins
    {
        return Err(PersistError::HeaderMismatch {
            expected_magic: expected.magic,
            expected_version: expected.version,
            got_magic: header.magic,
            got_version: header.version
        });
    }

    let total_cells = header.victim_bins * header.liquidity_bins * header.fee_tiers;
    let mut cells = Vec::with_capacity(total_cells);
    for _ in 0..total_cells {
        let record: CellRecord =
            bincode::deserialize_from(&mut reader).map_err(|e| PersistError::Encoding(e.to_string()))?;
        cells.push(TableCell { front_run_amount: record.front_run_amount, expected_profit: record.expected_profit });
    }

    Ok(SizingTable::from_parts(victim_buckets, liquidity_buckets, fee_tiers, cells))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sample_table() -> SizingTable {
        SizingTable::build(
            LogBuckets::new(1_000, 1_000_000, 3),
            LogBuckets::new(100_000, 10_000_000, 3),
            vec![30]
        )
    }

    #[test]
    fn round_trips_through_memory_buffer() {
        let table = sample_table();
        let mut buf = Vec::new();
        write_table(&table, &mut buf).unwrap();

        let restored = read_table(
            Cursor::new(buf),
            LogBuckets::new(1_000, 1_000_000, 3),
            LogBuckets::new(100_000, 10_000_000, 3),
            vec![30]
        )
        .unwrap();

        assert_eq!(table.cell_count(), restored.cell_count());
        for (a, b) in table.cells().iter().zip(restored.cells().iter()) {
            assert_eq!(a.front_run_amount, b.front_run_amount);
            assert_eq!(a.expected_profit, b.expected_profit);
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let table = sample_table();
        let mut buf = Vec::new();
        write_table(&table, &mut buf).unwrap();

        let err = read_table(
            Cursor::new(buf),
            LogBuckets::new(1_000, 1_000_000, 5), // different victim bin count
            LogBuckets::new(100_000, 10_000_000, 3),
            vec![30]
        )
        .unwrap_err();
        assert!(matches!(err, PersistError::HeaderMismatch { .. }));
    }
}
