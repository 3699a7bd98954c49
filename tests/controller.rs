//! Form controller behaviour against an in-memory supplier service.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Notify, oneshot};

use supplier_console::controller::{DELETED_MESSAGE, SUCCESS_MESSAGE};
use supplier_console::services::ApiResult;
use supplier_console::utils::SearchQuery;
use supplier_console::{
    Error, Failure, FailureKind, FormController, FormField, FormState, Outcome, Page, Supplier,
    SupplierApi, SupplierPayload,
};

/// Holds suppliers in memory and records every call it receives.
#[derive(Default)]
struct MemoryApi {
    suppliers: Mutex<BTreeMap<u64, Supplier>>,
    next_id: Mutex<u64>,
    calls: Mutex<Vec<String>>,
    create_failure: Mutex<Option<Failure>>,
    delete_failure: Mutex<Option<Failure>>,
    search_failure: Mutex<Option<Failure>>,
    search_gate: Mutex<Option<oneshot::Receiver<()>>>,
    search_entered: Notify,
}

impl MemoryApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn seed(&self, payload: SupplierPayload) -> Supplier {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let supplier = payload.into_supplier(next_id.to_string());
        self.suppliers.lock().unwrap().insert(*next_id, supplier.clone());
        supplier
    }

    fn not_found(id: &str) -> Failure {
        Failure {
            kind: FailureKind::NotFound,
            status: Some(404),
            message: format!("Supplier with id '{id}' was not found."),
        }
    }

    fn key(id: &str) -> ApiResult<u64> {
        id.parse().map_err(|_| Self::not_found(id))
    }
}

#[async_trait]
impl SupplierApi for MemoryApi {
    async fn create(&self, payload: &SupplierPayload) -> ApiResult<Supplier> {
        self.record("create".into());
        if let Some(failure) = self.create_failure.lock().unwrap().clone() {
            return Err(failure);
        }
        Ok(self.seed(payload.clone()))
    }

    async fn update(&self, id: &str, payload: &SupplierPayload) -> ApiResult<Supplier> {
        self.record(format!("update {id}"));
        let key = Self::key(id)?;
        let mut suppliers = self.suppliers.lock().unwrap();
        let slot = suppliers.get_mut(&key).ok_or_else(|| Self::not_found(id))?;
        *slot = payload.clone().into_supplier(id);
        Ok(slot.clone())
    }

    async fn retrieve(&self, id: &str) -> ApiResult<Supplier> {
        self.record(format!("retrieve {id}"));
        let key = Self::key(id)?;
        self.suppliers
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.record(format!("delete {id}"));
        if let Some(failure) = self.delete_failure.lock().unwrap().clone() {
            return Err(failure);
        }
        if let Ok(key) = id.parse::<u64>() {
            self.suppliers.lock().unwrap().remove(&key);
        }
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<Supplier>> {
        self.record(format!("search {}", query.encode()));

        let gate = self.search_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.search_entered.notify_one();
            let _ = gate.await;
        }

        if let Some(failure) = self.search_failure.lock().unwrap().clone() {
            return Err(failure);
        }

        let suppliers = self.suppliers.lock().unwrap();
        Ok(suppliers
            .values()
            .filter(|s| {
                query.pairs().iter().all(|(key, value)| match *key {
                    "name" => &s.name == value,
                    "phone" => &s.phone == value,
                    "address" => &s.address == value,
                    "rating" => &s.rating == value,
                    "available" => s.available,
                    _ => true,
                })
            })
            .cloned()
            .collect())
    }

    async fn make_available(&self, id: &str) -> ApiResult<Supplier> {
        self.record(format!("make-available {id}"));
        let key = Self::key(id)?;
        let mut suppliers = self.suppliers.lock().unwrap();
        let slot = suppliers.get_mut(&key).ok_or_else(|| Self::not_found(id))?;
        slot.available = true;
        Ok(slot.clone())
    }
}

fn payload(name: &str, available: bool) -> SupplierPayload {
    SupplierPayload {
        name: name.into(),
        address: "NY".into(),
        phone: "555-0100".into(),
        rating: "4.5".into(),
        available,
        product_list: vec![json!(1), json!(2)],
    }
}

fn bad_request(message: &str) -> Failure {
    Failure {
        kind: FailureKind::Client,
        status: Some(400),
        message: message.into(),
    }
}

fn acme_form() -> FormState {
    FormState::default()
        .with(FormField::Name, "Acme")
        .with(FormField::Phone, "555-0100")
        .with(FormField::Address, "NY")
        .with(FormField::Rating, "4.5")
        .with(FormField::Available, "true")
        .with(FormField::ProductList, "[1, 2, 3]")
}

fn setup() -> (Arc<MemoryApi>, FormController) {
    let api = Arc::new(MemoryApi::default());
    let controller = FormController::new(api.clone());
    (api, controller)
}

fn applied(outcome: Outcome) -> supplier_console::PageUpdate {
    match outcome {
        Outcome::Applied(update) => update,
        Outcome::Superseded(ticket) => panic!("unexpectedly superseded: {ticket:?}"),
    }
}

#[tokio::test]
async fn create_fills_form_with_server_copy() {
    let (_, controller) = setup();

    let update = applied(controller.create(&acme_form()).await.unwrap());

    assert!(update.is_success());
    assert_eq!(update.flash.as_deref(), Some(SUCCESS_MESSAGE));
    assert_eq!(update.form.id, "1");
    assert_eq!(update.form.name, "Acme");
    assert_eq!(update.form.available, "true");
    assert_eq!(update.form.product_list, "[1,2,3]");
}

#[tokio::test]
async fn create_failure_keeps_form_and_flashes_server_message() {
    let (api, controller) = setup();
    *api.create_failure.lock().unwrap() =
        Some(bad_request("Invalid supplier: missing name"));
    let before = Page {
        form: acme_form(),
        flash: Some(SUCCESS_MESSAGE.into()),
        results: None,
    };

    let outcome = controller.create(&before.form).await.unwrap();
    let update = applied(outcome.clone());

    assert_eq!(update.form, acme_form());
    assert_eq!(update.flash.as_deref(), Some("Invalid supplier: missing name"));
    let failure = update.failure.unwrap();
    assert_eq!(failure.kind, FailureKind::Client);
    assert_eq!(failure.status, Some(400));

    let after = before.apply(&outcome);
    assert_eq!(after.form, acme_form());
    assert_eq!(after.flash.as_deref(), Some("Invalid supplier: missing name"));
    assert_eq!(api.calls(), vec!["create".to_string()]);
    assert!(api.suppliers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_product_list_aborts_before_any_request() {
    let (api, controller) = setup();
    let form = acme_form().with(FormField::Id, "1").with(FormField::ProductList, "[1, 2");

    assert!(matches!(controller.create(&form).await, Err(Error::InvalidProductList(_))));
    assert!(matches!(controller.update(&form).await, Err(Error::InvalidProductList(_))));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn update_then_retrieve_reflects_the_update() {
    let (api, controller) = setup();
    let created = api.seed(payload("Acme", true));

    let form = acme_form()
        .with(FormField::Id, created.id.clone())
        .with(FormField::Name, "Acme Tools")
        .with(FormField::Available, "false");
    let updated = applied(controller.update(&form).await.unwrap());
    assert_eq!(updated.form.name, "Acme Tools");

    let blank = FormState::reset().with(FormField::Id, created.id.clone());
    let retrieved = applied(controller.retrieve(&blank).await);
    assert_eq!(retrieved.form.name, "Acme Tools");
    assert_eq!(retrieved.form.available, "false");
    assert_eq!(api.calls(), vec!["update 1".to_string(), "retrieve 1".to_string()]);
}

#[tokio::test]
async fn retrieve_failure_clears_all_but_id() {
    let (_, controller) = setup();
    let form = acme_form().with(FormField::Id, "99");

    let update = applied(controller.retrieve(&form).await);

    assert_eq!(update.form, FormState::reset().with(FormField::Id, "99"));
    assert_eq!(update.flash.as_deref(), Some("Supplier with id '99' was not found."));
    assert_eq!(update.failure.unwrap().kind, FailureKind::NotFound);
}

#[tokio::test]
async fn delete_then_retrieve_does_not_repopulate() {
    let (api, controller) = setup();
    let created = api.seed(payload("Acme", true));
    let form = FormState::from_supplier(&created);

    let deleted = applied(controller.delete(&form).await);
    assert_eq!(deleted.flash.as_deref(), Some(DELETED_MESSAGE));
    assert_eq!(deleted.form, form.cleared());

    let retrieved = applied(controller.retrieve(&deleted.form).await);
    assert!(!retrieved.is_success());
    assert_eq!(retrieved.form, FormState::reset().with(FormField::Id, created.id));
}

#[tokio::test]
async fn delete_failure_shows_server_message() {
    let (api, controller) = setup();
    *api.delete_failure.lock().unwrap() = Some(Failure {
        kind: FailureKind::Server,
        status: Some(500),
        message: "Database is locked".into(),
    });
    let form = acme_form().with(FormField::Id, "3");

    let update = applied(controller.delete(&form).await);

    assert_eq!(update.form, form);
    assert_eq!(update.flash.as_deref(), Some("Database is locked"));
}

#[tokio::test]
async fn clear_resets_everything_without_touching_flash() {
    let (api, controller) = setup();
    let page = Page {
        form: acme_form().with(FormField::Id, "5"),
        flash: Some("Success".into()),
        results: None,
    };

    let page = page.apply(&controller.clear());

    assert_eq!(page.form, FormState::reset());
    assert_eq!(page.flash.as_deref(), Some("Success"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn search_with_empty_form_lists_everything() {
    let (api, controller) = setup();
    api.seed(payload("Acme", true));
    api.seed(payload("Globex", false));

    let update = applied(controller.search(&FormState::reset()).await);

    assert_eq!(api.calls(), vec!["search ".to_string()]);
    let results = update.results.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(update.form.name, "Acme");
}

#[tokio::test]
async fn search_sends_filters_and_copies_first_match() {
    let (api, controller) = setup();
    api.seed(payload("Acme", false));
    api.seed(payload("Acme", true));

    let form = acme_form().with(FormField::Phone, "");
    let update = applied(controller.search(&form).await);

    assert_eq!(
        api.calls(),
        vec!["search name=Acme&address=NY&rating=4.5&available=true".to_string()]
    );
    let results = update.results.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(update.form.id, results[0].id);

    let page = Page::default().apply(&controller.search(&form.with(FormField::Available, "false")).await);
    assert_eq!(api.calls()[1], "search name=Acme&address=NY&rating=4.5");
    let html = page.results_html().unwrap();
    assert_eq!(html.split("<tbody>").nth(1).unwrap().matches("<tr>").count(), 2);
    assert_eq!(page.form.id, "1");
}

#[tokio::test]
async fn search_failure_keeps_form_and_previous_results() {
    let (api, controller) = setup();
    api.seed(payload("Acme", true));
    api.seed(payload("Globex", false));

    let page = Page::default().apply(&controller.search(&FormState::reset()).await);
    let previous = page.results.clone().unwrap();
    assert_eq!(previous.len(), 2);

    *api.search_failure.lock().unwrap() = Some(Failure {
        kind: FailureKind::Server,
        status: Some(503),
        message: "Search index unavailable".into(),
    });
    let form = page.form.clone().with(FormField::Name, "Globex");
    let outcome = controller.search(&form).await;
    let update = applied(outcome.clone());

    assert_eq!(update.form, form);
    assert_eq!(update.results, None);
    assert_eq!(update.flash.as_deref(), Some("Search index unavailable"));
    assert_eq!(update.failure.unwrap().kind, FailureKind::Server);

    let page = page.apply(&outcome);
    assert_eq!(page.form, form);
    assert_eq!(page.flash.as_deref(), Some("Search index unavailable"));
    assert_eq!(page.results, Some(previous));
}

#[tokio::test]
async fn search_without_matches_keeps_the_form() {
    let (_, controller) = setup();
    let form = acme_form();

    let update = applied(controller.search(&form).await);

    assert_eq!(update.form, form);
    assert_eq!(update.results, Some(vec![]));
    assert_eq!(update.flash.as_deref(), Some(SUCCESS_MESSAGE));
}

#[tokio::test]
async fn make_available_marks_and_fills() {
    let (api, controller) = setup();
    let created = api.seed(payload("Acme", false));

    let update = applied(controller.make_available(&FormState::from_supplier(&created)).await);

    assert_eq!(update.form.available, "true");
    assert_eq!(api.calls(), vec!["make-available 1".to_string()]);
}

#[tokio::test]
async fn older_search_is_superseded_by_newer_one() {
    let api = Arc::new(MemoryApi::default());
    api.seed(payload("Acme", true));
    api.seed(payload("Globex", true));
    let (release, gate) = oneshot::channel();
    *api.search_gate.lock().unwrap() = Some(gate);
    let controller = Arc::new(FormController::new(api.clone()));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move {
            let form = FormState::reset().with(FormField::Name, "Acme");
            controller.search(&form).await
        }
    });
    api.search_entered.notified().await;

    let page = Page::default();
    let second = controller
        .search(&FormState::reset().with(FormField::Name, "Globex"))
        .await;
    let page = page.apply(&second);
    assert_eq!(page.form.name, "Globex");

    release.send(()).unwrap();
    let first = first.await.unwrap();
    assert!(matches!(first, Outcome::Superseded(_)));

    let page = page.apply(&first);
    assert_eq!(page.form.name, "Globex");
    assert_eq!(page.results.unwrap().len(), 1);
}
