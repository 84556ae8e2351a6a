pub mod batch;
pub mod service;

pub use batch::{BatchReport, BatchRunner};
pub use service::{CheckOutcome, CheckService};
