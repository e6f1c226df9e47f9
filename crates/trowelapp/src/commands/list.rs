use crate::error::Result;
use crate::model::Find;
use crate::store::RecordStore;

/// All finds, newest first. Degrades to empty on absent/corrupt storage,
/// per the record-store contract.
pub fn run<R: RecordStore>(records: &R) -> Result<Vec<Find>> {
    records.list()
}
