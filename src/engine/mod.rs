pub mod aggregate;
pub mod derive;
pub mod filter;
pub mod join;
pub mod value;
pub mod window;

pub use aggregate::{aggregate, order_by, Aggregation, Reducer, SortKey};
pub use derive::{date_part, ratio, DatePart};
pub use filter::{countries_only, LikePattern};
pub use join::join;
pub use value::{Record, ReportRow, Value};
pub use window::{running_sum, RunningTotal};
