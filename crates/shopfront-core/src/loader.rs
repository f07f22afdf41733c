// ── Loader facade ──
//
// Wires transport -> request lifecycle -> normalizer -> reconciler for one
// UI surface. Every load names a slot; only the newest load per slot is
// decoded and returned, older ones come back `Outcome::Superseded`.

use serde_json::{Value, json};
use shopfront_api::{ApiClient, ListParams, RawListPayload, Resource, Transport};
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::filter::ListFilter;
use crate::lifecycle::{Outcome, RequestController};
use crate::model::{Entity, Reservation};
use crate::normalize::{RawListResponse, normalize};
use crate::page::{Page, PageRequest};
use crate::reconcile::StatusReconciler;

/// Slot name for a resource's detail view.
///
/// One slot per view, not per record: moving from one record to the next
/// supersedes the load still in flight for the previous one.
pub fn detail_slot(resource: Resource) -> String {
    format!("{resource}:detail")
}

/// State-changing reservation actions (`POST reservations/{id}/{action}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationAction {
    Accept,
    Cancel { reason: Option<String> },
    Confirm,
}

impl ReservationAction {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Cancel { .. } => "cancel",
            Self::Confirm => "confirm",
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Cancel { reason } => json!({ "reason": reason }),
            Self::Accept | Self::Confirm => json!({}),
        }
    }
}

/// Loads canonical pages and records for one independent surface.
///
/// Dropping the loader (or calling [`shutdown`](Self::shutdown)) tears down
/// its request controller.
#[derive(Debug)]
pub struct Loader<T = ApiClient> {
    transport: T,
    reconciler: StatusReconciler,
    requests: RequestController,
    default_page_size: Option<u32>,
}

impl Loader<ApiClient> {
    /// Build the HTTP client and reconciler from a session config.
    pub fn connect(config: &SessionConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.as_str(), &config.transport_config())?;
        let reconciler = config.reconciler()?;
        debug!(url = %config.api_url, locale = %config.locale, "loader connected");
        Ok(Self::new(client, reconciler).with_default_page_size(config.page_size))
    }
}

impl<T: Transport> Loader<T> {
    pub fn new(transport: T, reconciler: StatusReconciler) -> Self {
        Self {
            transport,
            reconciler,
            requests: RequestController::new(),
            default_page_size: None,
        }
    }

    pub fn with_default_page_size(mut self, page_size: Option<u32>) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn reconciler(&self) -> &StatusReconciler {
        &self.reconciler
    }

    pub fn requests(&self) -> &RequestController {
        &self.requests
    }

    // ── Lists ────────────────────────────────────────────────────────

    /// Load one page of `E` from its default endpoint.
    pub async fn load_page<E: Entity>(
        &self,
        slot: &str,
        params: ListParams,
    ) -> Outcome<Result<Page<E>, CoreError>> {
        self.load_page_from::<E>(E::RESOURCE, slot, params).await
    }

    /// Load one page of `E` from a specific endpoint (e.g. the storefront
    /// variant of a collection).
    pub async fn load_page_from<E: Entity>(
        &self,
        resource: Resource,
        slot: &str,
        mut params: ListParams,
    ) -> Outcome<Result<Page<E>, CoreError>> {
        if params.page_size.is_none() {
            params.page_size = self.default_page_size;
        }
        let query = params.clone();
        let fetched = self
            .requests
            .run(slot, |cancel| async move {
                self.transport.fetch_list(resource, &query, &cancel).await
            })
            .await;

        fetched.map(|result| {
            result
                .map_err(CoreError::from)
                .and_then(|payload| self.assemble_page(payload, &params))
        })
    }

    fn assemble_page<E: Entity>(
        &self,
        payload: RawListPayload,
        params: &ListParams,
    ) -> Result<Page<E>, CoreError> {
        let requested = PageRequest {
            page: params.page,
            page_size: params.page_size,
        };
        let mut entities = RawListResponse::from_json(payload.body)
            .decode::<E::Raw>()?
            .map_items(|raw| E::reconcile(raw, &self.reconciler));

        // A bare array without a usable total is the whole collection, so
        // search and status have to be applied here before slicing.
        let whole_collection = entities.is_bare() && payload.total_count.is_none_or(|t| t < 0);
        if whole_collection {
            let filter = ListFilter::from_params::<E>(params, &self.reconciler);
            if !filter.is_empty() {
                entities.retain(|entity| filter.matches(entity));
            }
        }

        normalize(entities, requested, payload.total_count)
    }

    // ── Records ──────────────────────────────────────────────────────

    /// Load a single record into `slot`.
    pub async fn load_one<E: Entity>(&self, slot: &str, id: &str) -> Outcome<Result<E, CoreError>> {
        let fetched = self
            .requests
            .run(slot, |cancel| async move {
                self.transport.fetch_one(E::RESOURCE, id, &cancel).await
            })
            .await;

        fetched.map(|result| {
            result
                .map_err(CoreError::from)
                .and_then(|value| self.decode_record::<E>(value))
        })
    }

    /// Load a record into its resource's detail slot (see [`detail_slot`]).
    pub async fn load_detail<E: Entity>(&self, id: &str) -> Outcome<Result<E, CoreError>> {
        self.load_one::<E>(&detail_slot(E::RESOURCE), id).await
    }

    fn decode_record<E: Entity>(&self, value: Value) -> Result<E, CoreError> {
        let raw: E::Raw = serde_json::from_value(value)
            .map_err(|e| CoreError::malformed("body", e.to_string()))?;
        Ok(E::reconcile(raw, &self.reconciler))
    }

    // ── Reservation actions ──────────────────────────────────────────

    /// Run a reservation action in the reservations detail slot, so its
    /// response and a concurrent detail load cannot overwrite each other
    /// out of order.
    pub async fn reservation_action(
        &self,
        id: &str,
        action: ReservationAction,
    ) -> Outcome<Result<Reservation, CoreError>> {
        let slot = detail_slot(Resource::Reservations);
        let body = action.body();
        debug!(id, action = action.path(), "reservation action");
        let fetched = self
            .requests
            .run(slot, |cancel| async move {
                self.transport
                    .perform(Resource::Reservations, id, action.path(), &body, &cancel)
                    .await
            })
            .await;

        fetched.map(|result| {
            result
                .map_err(CoreError::from)
                .and_then(|value| self.decode_record::<Reservation>(value))
        })
    }

    /// Cancel a slot's in-flight request; its result will be discarded.
    pub fn cancel(&self, slot: &str) {
        self.requests.cancel(slot);
    }

    /// Tear down the request controller. Later loads are all superseded.
    pub fn shutdown(&self) {
        self.requests.shutdown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::model::{Customer, Reservation};
    use crate::reconcile::StatusKind;

    /// Replies keyed by search text (lists) or id (records), after a delay.
    #[derive(Default)]
    struct Scripted {
        lists: Mutex<HashMap<Option<String>, (u64, RawListPayload)>>,
        records: Mutex<HashMap<String, (u64, Value)>>,
        calls: AtomicUsize,
        last_action: Mutex<Option<(String, Value)>>,
    }

    impl Scripted {
        fn list(self, search: Option<&str>, delay_ms: u64, payload: RawListPayload) -> Self {
            self.lists
                .lock()
                .unwrap()
                .insert(search.map(str::to_owned), (delay_ms, payload));
            self
        }

        fn record(self, id: &str, delay_ms: u64, body: Value) -> Self {
            self.records
                .lock()
                .unwrap()
                .insert(id.to_owned(), (delay_ms, body));
            self
        }
    }

    fn not_found() -> shopfront_api::Error {
        shopfront_api::Error::Api {
            status: 404,
            message: "not scripted".into(),
            code: None,
        }
    }

    impl Transport for Scripted {
        async fn fetch_list(
            &self,
            _resource: Resource,
            params: &ListParams,
            _cancel: &CancellationToken,
        ) -> Result<RawListPayload, shopfront_api::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let scripted = self.lists.lock().unwrap().get(&params.search).cloned();
            let (delay, payload) = scripted.ok_or_else(not_found)?;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(payload)
        }

        async fn fetch_one(
            &self,
            _resource: Resource,
            id: &str,
            _cancel: &CancellationToken,
        ) -> Result<Value, shopfront_api::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let scripted = self.records.lock().unwrap().get(id).cloned();
            let (delay, body) = scripted.ok_or_else(not_found)?;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(body)
        }

        async fn perform(
            &self,
            _resource: Resource,
            id: &str,
            action: &str,
            body: &Value,
            _cancel: &CancellationToken,
        ) -> Result<Value, shopfront_api::Error> {
            *self.last_action.lock().unwrap() = Some((action.to_owned(), body.clone()));
            let status = match action {
                "accept" => "ACCEPTED",
                "cancel" => "CANCELED",
                _ => "CONFIRMED",
            };
            Ok(json!({ "id": id, "status": status }))
        }
    }

    fn loader(transport: Scripted) -> Loader<Scripted> {
        Loader::new(transport, StatusReconciler::default())
    }

    fn reservations(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| {
                    json!({
                        "id": format!("r-{i}"),
                        "code": format!("RSV-{i:03}"),
                        "status": if i % 2 == 0 { "PENDING" } else { "CANCELED" },
                        "customerFirstName": if i == 3 { "Marta" } else { "Ana" }
                    })
                })
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn page_envelope_is_reconciled() {
        let body = json!({
            "items": [{ "id": 1, "status": "ready_for_pickup", "customerName": "Ana Pérez" }],
            "totalItems": 11,
            "page": 2,
            "pageSize": 10,
            "totalPages": 2
        });
        let loader = loader(Scripted::default().list(None, 5, RawListPayload::new(body)));

        let page = loader
            .load_page::<Reservation>("list", ListParams::new().page(2).page_size(10))
            .await
            .into_current()
            .unwrap()
            .unwrap();

        assert_eq!(page.total_items(), 11);
        assert_eq!(page.items()[0].status.kind(), StatusKind::ReadyForPickup);
        assert_eq!(page.items()[0].customer_name, "Ana Pérez");
    }

    #[tokio::test(start_paused = true)]
    async fn bare_collection_is_filtered_then_sliced() {
        let loader = loader(
            Scripted::default().list(Some("ana"), 0, RawListPayload::new(reservations(6))),
        );
        let params = ListParams::new()
            .search("ana")
            .status("pending")
            .page(1)
            .page_size(2);

        let page = loader
            .load_page::<Reservation>("list", params)
            .await
            .into_current()
            .unwrap()
            .unwrap();

        // Even ids are pending; "Marta" (r-3) is odd anyway.
        assert_eq!(page.total_items(), 3);
        assert_eq!(page.total_pages(), 2);
        let codes: Vec<_> = page.items().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["RSV-000", "RSV-002"]);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_band_total_skips_client_filtering() {
        let payload = RawListPayload::new(reservations(2)).with_total_count(40);
        let loader = loader(Scripted::default().list(Some("zzz"), 0, payload));

        let page = loader
            .load_page::<Reservation>("list", ListParams::new().search("zzz").page_size(2))
            .await
            .into_current()
            .unwrap()
            .unwrap();
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.total_items(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_list_response_is_superseded() {
        let slow = RawListPayload::new(json!([{ "id": "old" }]));
        let fast = RawListPayload::new(json!([{ "id": "new" }])).with_total_count(1);
        let loader = loader(
            Scripted::default()
                .list(Some("a"), 100, slow)
                .list(Some("ab"), 10, fast),
        );

        let first = loader.load_page::<Customer>("customers", ListParams::new().search("a"));
        let second = loader.load_page::<Customer>("customers", ListParams::new().search("ab"));
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_superseded());
        let page = second.into_current().unwrap().unwrap();
        assert_eq!(page.items()[0].id, "new");
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_payload_surfaces_only_when_current() {
        let bad = RawListPayload::new(json!({ "items": [], "totalItems": "lots" }));
        let good = RawListPayload::new(json!([]));
        let loader = loader(
            Scripted::default()
                .list(Some("bad"), 50, bad.clone())
                .list(Some("good"), 10, good)
                .list(Some("only"), 0, bad),
        );

        let (stale, fresh) = tokio::join!(
            loader.load_page::<Customer>("c", ListParams::new().search("bad")),
            loader.load_page::<Customer>("c", ListParams::new().search("good")),
        );
        assert!(stale.is_superseded());
        assert!(fresh.into_current().unwrap().unwrap().is_empty());

        let err = loader
            .load_page::<Customer>("c", ListParams::new().search("only"))
            .await
            .into_current()
            .unwrap()
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_passes_through() {
        let loader = loader(Scripted::default());
        let err = loader
            .load_page::<Customer>("c", ListParams::new())
            .await
            .into_current()
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Transport(shopfront_api::Error::Api { status: 404, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn default_page_size_applies() {
        let loader = loader(Scripted::default().list(None, 0, RawListPayload::new(reservations(5))))
            .with_default_page_size(Some(2));
        let page = loader
            .load_page::<Reservation>("list", ListParams::new())
            .await
            .into_current()
            .unwrap()
            .unwrap();
        assert_eq!(page.page_size(), 2);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn detail_prefetch_race_keeps_latest() {
        let loader = loader(
            Scripted::default()
                .record("r-1", 80, json!({ "id": "r-1", "status": "PENDING" }))
                .record("r-1b", 5, json!({ "id": "r-1", "status": "ACCEPTED" })),
        );

        let (old, new) = tokio::join!(
            loader.load_one::<Reservation>("detail", "r-1"),
            loader.load_one::<Reservation>("detail", "r-1b"),
        );
        assert!(old.is_superseded());
        assert_eq!(
            new.into_current().unwrap().unwrap().status.kind(),
            StatusKind::Accepted
        );
    }

    #[tokio::test(start_paused = true)]
    async fn detail_view_moving_between_records_keeps_latest() {
        let loader = loader(
            Scripted::default()
                .record("r-1", 80, json!({ "id": "r-1", "status": "PENDING" }))
                .record("r-2", 5, json!({ "id": "r-2", "status": "ACCEPTED" })),
        );

        let (first, second) = tokio::join!(
            loader.load_detail::<Reservation>("r-1"),
            loader.load_detail::<Reservation>("r-2"),
        );
        assert!(first.is_superseded());
        let shown = second.into_current().unwrap().unwrap();
        assert_eq!(shown.id, "r-2");
        assert_eq!(shown.status.kind(), StatusKind::Accepted);
    }

    #[tokio::test(start_paused = true)]
    async fn detail_views_of_different_resources_are_independent() {
        let loader = loader(
            Scripted::default()
                .record("r-1", 40, json!({ "id": "r-1", "status": "PENDING" }))
                .record("c-1", 5, json!({ "id": "c-1", "firstName": "Ana" })),
        );

        let (reservation, customer) = tokio::join!(
            loader.load_detail::<Reservation>("r-1"),
            loader.load_detail::<Customer>("c-1"),
        );
        assert_eq!(reservation.into_current().unwrap().unwrap().id, "r-1");
        assert_eq!(customer.into_current().unwrap().unwrap().id, "c-1");
    }

    #[tokio::test(start_paused = true)]
    async fn record_of_wrong_type_is_malformed() {
        let loader = loader(Scripted::default().record("x", 0, json!({ "id": true })));
        let err = loader
            .load_detail::<Reservation>("x")
            .await
            .into_current()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse { ref field, .. } if field == "body"));
    }

    #[tokio::test(start_paused = true)]
    async fn action_supersedes_pending_detail_load() {
        let loader = loader(
            Scripted::default().record("r-7", 50, json!({ "id": "r-7", "status": "PENDING" })),
        );

        let (detail, action) = tokio::join!(
            loader.load_detail::<Reservation>("r-7"),
            loader.reservation_action(
                "r-7",
                ReservationAction::Cancel {
                    reason: Some("sin stock".into())
                }
            ),
        );

        assert!(detail.is_superseded());
        let updated = action.into_current().unwrap().unwrap();
        assert_eq!(updated.status.kind(), StatusKind::Cancelled);

        let sent = loader.transport().last_action.lock().unwrap().clone().unwrap();
        assert_eq!(sent, ("cancel".to_owned(), json!({ "reason": "sin stock" })));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_supersedes_later_loads() {
        let loader = loader(Scripted::default().list(None, 0, RawListPayload::new(json!([]))));
        loader.shutdown();
        assert!(
            loader
                .load_page::<Customer>("c", ListParams::new())
                .await
                .is_superseded()
        );
    }

    #[test]
    fn detail_slots_are_per_resource() {
        assert_eq!(detail_slot(Resource::Reservations), "reservations:detail");
        assert_ne!(detail_slot(Resource::Reservations), detail_slot(Resource::Sales));
    }
}
