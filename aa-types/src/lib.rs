pub mod userop;

pub use userop::{UserOperation, compute_request_id};
