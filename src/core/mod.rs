/// Calendar arithmetic: period starts, day and month stepping
pub mod calendar;
/// Idempotent materialization of one occurrence
pub mod materializer;
/// Generation driver: catch-up and explicit-month passes
pub mod recurring;
/// Occurrence scheduling for recurring templates
pub mod scheduler;
/// Persistence seam consumed by the recurring engine
pub mod store;
/// Bookkeeping such as the last generation run
pub mod system_state;
/// Logging transactions and marking them recurring
pub mod transaction;
