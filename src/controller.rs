use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Failure, Result};
use crate::form::FormState;
use crate::models::Supplier;
use crate::render;
use crate::services::{ApiResult, Operation, OperationTracker, SupplierApi, Ticket};

pub const SUCCESS_MESSAGE: &str = "Success";
pub const DELETED_MESSAGE: &str = "Supplier has been Deleted!";

/// What one finished operation writes to the page.
///
/// `flash` and `results` are `None` when the operation leaves that region
/// alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PageUpdate {
    pub operation: Option<Operation>,
    pub form: FormState,
    pub flash: Option<String>,
    pub results: Option<Vec<Supplier>>,
    pub failure: Option<Failure>,
}

impl PageUpdate {
    fn filled(operation: Operation, supplier: &Supplier) -> Self {
        Self {
            operation: Some(operation),
            form: FormState::from_supplier(supplier),
            flash: Some(SUCCESS_MESSAGE.to_string()),
            results: None,
            failure: None,
        }
    }

    fn failed(operation: Operation, form: FormState, failure: Failure) -> Self {
        Self {
            operation: Some(operation),
            form,
            flash: Some(failure.message.clone()),
            results: None,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied(PageUpdate),
    /// A newer request of the same kind was issued while this one was in
    /// flight; its result was dropped.
    Superseded(Ticket),
}

impl Outcome {
    pub fn update(&self) -> Option<&PageUpdate> {
        match self {
            Outcome::Applied(update) => Some(update),
            Outcome::Superseded(_) => None,
        }
    }
}

/// Everything the supplier page shows: the form, the flash region and the
/// last search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub form: FormState,
    pub flash: Option<String>,
    pub results: Option<Vec<Supplier>>,
}

impl Page {
    /// The page after `outcome`. Superseded outcomes change nothing.
    pub fn apply(&self, outcome: &Outcome) -> Page {
        let Some(update) = outcome.update() else {
            return self.clone();
        };

        Page {
            form: update.form.clone(),
            flash: update.flash.clone().or_else(|| self.flash.clone()),
            results: update.results.clone().or_else(|| self.results.clone()),
        }
    }

    pub fn results_html(&self) -> Option<String> {
        self.results.as_deref().map(render::results_table_html)
    }
}

/// Binds the supplier form to a [`SupplierApi`]. Each handler takes the
/// current form snapshot and returns what the page should show next.
pub struct FormController {
    api: Arc<dyn SupplierApi>,
    tracker: OperationTracker,
}

impl FormController {
    pub fn new(api: Arc<dyn SupplierApi>) -> Self {
        Self {
            api,
            tracker: OperationTracker::new(),
        }
    }

    /// Starts a request of `operation`, superseding any still in flight.
    pub fn begin(&self, operation: Operation) -> Ticket {
        let ticket = self.tracker.begin(operation);
        debug!(
            operation = %operation,
            generation = ticket.generation,
            "Request issued"
        );
        ticket
    }

    fn settle<T>(
        &self,
        ticket: Ticket,
        result: ApiResult<T>,
        on_success: impl FnOnce(T) -> PageUpdate,
        on_failure: impl FnOnce(Failure) -> PageUpdate,
    ) -> Outcome {
        if !self.tracker.is_current(&ticket) {
            info!(
                operation = %ticket.operation,
                generation = ticket.generation,
                "Dropping superseded completion"
            );
            return Outcome::Superseded(ticket);
        }

        match result {
            Ok(value) => {
                info!(operation = %ticket.operation, "Operation succeeded");
                Outcome::Applied(on_success(value))
            }
            Err(failure) => {
                warn!(
                    operation = %ticket.operation,
                    failure = %failure,
                    "Operation failed"
                );
                Outcome::Applied(on_failure(failure))
            }
        }
    }

    /// Posts the form as a new supplier. A product list that is not a JSON
    /// array fails here and nothing is sent.
    pub async fn create(&self, form: &FormState) -> Result<Outcome> {
        let payload = form.to_payload()?;
        let ticket = self.begin(Operation::Create);
        let result = self.api.create(&payload).await;

        Ok(self.settle(
            ticket,
            result,
            |supplier| PageUpdate::filled(Operation::Create, &supplier),
            |failure| PageUpdate::failed(Operation::Create, form.clone(), failure),
        ))
    }

    pub async fn update(&self, form: &FormState) -> Result<Outcome> {
        let payload = form.to_payload()?;
        let ticket = self.begin(Operation::Update);
        let result = self.api.update(&form.id, &payload).await;

        Ok(self.settle(
            ticket,
            result,
            |supplier| PageUpdate::filled(Operation::Update, &supplier),
            |failure| PageUpdate::failed(Operation::Update, form.clone(), failure),
        ))
    }

    /// Loads the supplier named by the id field. On failure every other field
    /// is emptied.
    pub async fn retrieve(&self, form: &FormState) -> Outcome {
        let ticket = self.begin(Operation::Retrieve);
        let result = self.api.retrieve(&form.id).await;

        self.settle(
            ticket,
            result,
            |supplier| PageUpdate::filled(Operation::Retrieve, &supplier),
            |failure| PageUpdate::failed(Operation::Retrieve, form.cleared(), failure),
        )
    }

    pub async fn delete(&self, form: &FormState) -> Outcome {
        let ticket = self.begin(Operation::Delete);
        let result = self.api.delete(&form.id).await;

        self.settle(
            ticket,
            result,
            |()| PageUpdate {
                operation: Some(Operation::Delete),
                form: form.cleared(),
                flash: Some(DELETED_MESSAGE.to_string()),
                results: None,
                failure: None,
            },
            |failure| PageUpdate::failed(Operation::Delete, form.clone(), failure),
        )
    }

    /// Empties the whole form, id included. Touches neither the flash region
    /// nor the network.
    pub fn clear(&self) -> Outcome {
        Outcome::Applied(PageUpdate {
            operation: None,
            form: FormState::reset(),
            flash: None,
            results: None,
            failure: None,
        })
    }

    /// Searches with the non-empty text fields and the availability flag.
    /// The first match, if any, is copied into the form.
    pub async fn search(&self, form: &FormState) -> Outcome {
        let query = form.search_query();
        let ticket = self.begin(Operation::Search);
        debug!(query = %query.encode(), "Searching suppliers");
        let result = self.api.search(&query).await;

        self.settle(
            ticket,
            result,
            |suppliers| {
                info!(count = suppliers.len(), "Search returned suppliers");
                PageUpdate {
                    operation: Some(Operation::Search),
                    form: suppliers
                        .first()
                        .map(FormState::from_supplier)
                        .unwrap_or_else(|| form.clone()),
                    flash: Some(SUCCESS_MESSAGE.to_string()),
                    results: Some(suppliers),
                    failure: None,
                }
            },
            |failure| PageUpdate::failed(Operation::Search, form.clone(), failure),
        )
    }

    pub async fn make_available(&self, form: &FormState) -> Outcome {
        let ticket = self.begin(Operation::MakeAvailable);
        let result = self.api.make_available(&form.id).await;

        self.settle(
            ticket,
            result,
            |supplier| PageUpdate::filled(Operation::MakeAvailable, &supplier),
            |failure| PageUpdate::failed(Operation::MakeAvailable, form.clone(), failure),
        )
    }
}
