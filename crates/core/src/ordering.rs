use crate::metadata::MediaRecord;

// Stable: equal instants keep discovery (file name) order.
pub fn order_records(mut records: Vec<MediaRecord>) -> Vec<MediaRecord> {
    records.sort_by_key(|record| record.instant_ms);
    records
}
