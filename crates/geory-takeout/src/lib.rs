pub mod error;
pub mod mapper;
pub mod merge;
pub mod source;
pub mod types;

pub use error::TakeoutError;
pub use mapper::{map_location_record, map_visit_record, LocationMapper, VisitMapper};
pub use merge::{merge, IdentifierIndex, MergeStats, RecordMapper};
pub use source::{read_location_records, VisitSource, RECORDS_PATH, SEMANTIC_HISTORY_PATH};
