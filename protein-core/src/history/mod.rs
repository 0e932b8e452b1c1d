//! History policy shared by every [`HistoryStore`](crate::db::HistoryStore)
//! backend, and the JSON format used for export and import.

mod policy;
mod transfer;

pub use policy::{ImportSummary, calculation_statistics, cap_history, merge_history, sort_newest_first};
pub use transfer::{HistoryTransferError, decode_history, encode_history};

/// Most records a history keeps. Older records are dropped first.
pub const MAX_HISTORY_RECORDS: usize = 100;
