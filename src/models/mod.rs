mod response;
mod supplier;

pub use response::ErrorBody;
pub use supplier::{Supplier, SupplierPayload};
