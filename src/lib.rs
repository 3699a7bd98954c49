pub mod clients;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod form;
pub mod models;
pub mod render;
pub mod services;
pub mod utils;

pub use clients::HttpClient;
pub use config::Settings;
pub use controller::{FormController, Outcome, Page, PageUpdate};
pub use error::{Error, Failure, FailureKind, Result};
pub use form::{FormField, FormState};
pub use models::{Supplier, SupplierPayload};
pub use services::{Operation, RestSupplierApi, SupplierApi};
