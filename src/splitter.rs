//! Splitting of multi-line records into one record per line.

use crate::log_record::FemtoLogRecord;

/// Yield one copy of `record` per non-empty line of its message, in order.
///
/// Lines are separated by `\n`; empty segments produced by consecutive,
/// leading or trailing separators are skipped. The source record is left
/// untouched.
pub fn split_lines(record: &FemtoLogRecord) -> impl Iterator<Item = FemtoLogRecord> + '_ {
    record
        .message
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| record.with_message(line))
}
