mod record;
mod summary;
mod time;

pub use record::{GroupKey, LineageRecord};
pub use summary::{BucketKey, CalendarSummary, GroupSummary, IntervalRow, IntervalStats};
pub use time::{ReferenceDate, TimeValue};
