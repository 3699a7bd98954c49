pub mod api;
pub mod tasks;

pub use api::{ApiResult, RestSupplierApi, SupplierApi};
pub use tasks::{Operation, OperationTracker, Ticket};
