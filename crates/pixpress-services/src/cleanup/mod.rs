mod service;

pub use service::{ExpirySweeper, SweepSummary};
