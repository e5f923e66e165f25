//! The alert service: fetch, flatten, acknowledge, publish

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{AlertView, RawContact};
use crate::source::ContactSource;
use crate::store::AckStore;

/// User-facing message published when a load fails
const LOAD_ERROR_MESSAGE: &str = "Failed to load alerts data.";

/// Publishes the flattened alert collection and its load lifecycle
///
/// Single writer: all mutation of the published collection and the
/// acknowledgment set goes through this service. Readers subscribe to the
/// watch channels, which hold the last published value and deliver
/// publications in production order.
///
/// On fetch or decode failure the service publishes an empty collection and a
/// non-null error message; the previous collection is discarded. Overlapping
/// loads are last-publish-wins: a load that is no longer the newest publishes
/// nothing.
pub struct AlertService {
    source: Arc<dyn ContactSource>,
    acks: Arc<AckStore>,
    progress_tick: Duration,
    alerts_tx: watch::Sender<Vec<AlertView>>,
    loading_tx: watch::Sender<bool>,
    error_tx: watch::Sender<Option<String>>,
    progress_tx: watch::Sender<u8>,
    load_epoch: AtomicU64,
}

impl AlertService {
    /// Create a service over `source` with acknowledgments in `acks`
    ///
    /// `progress_tick` paces the decorative 0→100 loading counter; zero skips
    /// the pacing entirely.
    pub fn new(source: Arc<dyn ContactSource>, acks: Arc<AckStore>, progress_tick: Duration) -> Self {
        let (alerts_tx, _) = watch::channel(Vec::new());
        let (loading_tx, _) = watch::channel(true);
        let (error_tx, _) = watch::channel(None);
        let (progress_tx, _) = watch::channel(0);

        Self {
            source,
            acks,
            progress_tick,
            alerts_tx,
            loading_tx,
            error_tx,
            progress_tx,
            load_epoch: AtomicU64::new(0),
        }
    }

    /// Subscribe to the published alert collection
    ///
    /// The receiver holds the last publication and sees every subsequent one:
    /// the initial load result and any acknowledge-triggered republication.
    pub fn alerts(&self) -> watch::Receiver<Vec<AlertView>> {
        self.alerts_tx.subscribe()
    }

    /// Subscribe to the loading flag
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    /// Subscribe to the user-facing error message
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.error_tx.subscribe()
    }

    /// Subscribe to the decorative loading progress counter (0..=100)
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    /// Fetch the contact collection once, flatten it, and publish the result
    ///
    /// Failures never propagate: they surface as an empty publication plus an
    /// error message.
    pub async fn load(&self) {
        let epoch = self.load_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        self.loading_tx.send_replace(true);
        self.error_tx.send_replace(None);
        self.progress_tx.send_replace(0);

        if !self.progress_tick.is_zero() {
            for value in (0..=100u8).step_by(5) {
                self.progress_tx.send_replace(value);
                tokio::time::sleep(self.progress_tick).await;
            }
        }

        let result = self.source.fetch().await;

        if self.load_epoch.load(Ordering::SeqCst) != epoch {
            debug!(epoch, "discarding stale load result");
            return;
        }

        self.progress_tx.send_replace(100);

        match result {
            Ok(contacts) => {
                let acked = self.acks.snapshot();
                let views = flatten(&contacts, &acked);
                debug!(contacts = contacts.len(), alerts = views.len(), "alerts published");
                self.alerts_tx.send_replace(views);
            }
            Err(err) => {
                warn!(%err, "contact document load failed");
                self.error_tx.send_replace(Some(LOAD_ERROR_MESSAGE.to_string()));
                self.alerts_tx.send_replace(Vec::new());
            }
        }

        self.loading_tx.send_replace(false);
    }

    /// Re-run [`load`](Self::load) with the identical contract
    pub async fn retry_load(&self) {
        self.load().await;
    }

    /// Mark `alert_id` acknowledged
    ///
    /// Idempotent: a second call with the same identifier changes nothing and
    /// triggers no republication. The persisted set only ever grows.
    pub fn acknowledge(&self, alert_id: &str) {
        if !self.acks.insert(alert_id) {
            return;
        }

        self.alerts_tx.send_modify(|alerts| {
            for alert in alerts.iter_mut() {
                if alert.error_id == alert_id {
                    alert.acknowledged = true;
                }
            }
        });
        debug!(%alert_id, "alert acknowledged");
    }
}

/// Flatten contacts into one view per alert, seeding `acknowledged` from the set
fn flatten(contacts: &[RawContact], acked: &HashSet<String>) -> Vec<AlertView> {
    contacts
        .iter()
        .flat_map(|contact| {
            contact.alerts.iter().map(|alert| {
                AlertView::from_parts(contact, alert, acked.contains(&alert.error_id))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::models::{RawAlert, Severity};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    fn alert(id: &str, severity: Severity, time: i64) -> RawAlert {
        RawAlert {
            error_id: id.to_string(),
            error_severity: severity,
            error_category: "telemetry".to_string(),
            error_message: format!("short {id}"),
            long_message: format!("long {id}"),
            error_time: time,
            selected: false,
            is_new: false,
            expanded: false,
        }
    }

    fn contact(name: i64, alerts: Vec<RawAlert>) -> RawContact {
        RawContact {
            id: format!("doc-{name}"),
            contact_id: format!("c-{name}"),
            contact_status: "active".to_string(),
            contact_name: name,
            contact_ground: "WALLOPS".to_string(),
            contact_satellite: format!("SAT-{name}"),
            contact_equipment: "ANT-1".to_string(),
            contact_state: "executing".to_string(),
            contact_step: "AOS".to_string(),
            contact_detail: format!("detail {name}"),
            contact_begin_timestamp: 1_000 + name,
            contact_end_timestamp: 2_000 + name,
            contact_latitude: 37.94,
            contact_longitude: -75.46,
            contact_azimuth: 110.5,
            contact_elevation: 52.0,
            contact_resolution: String::new(),
            contact_resolution_status: "open".to_string(),
            alerts,
        }
    }

    /// Contact 101 carries E1, contact 102 carries E2 and E3.
    fn scenario_contacts() -> Vec<RawContact> {
        vec![
            contact(101, vec![alert("E1", Severity::Critical, 2_000)]),
            contact(
                102,
                vec![
                    alert("E2", Severity::Warning, 1_000),
                    alert("E3", Severity::Critical, 3_000),
                ],
            ),
        ]
    }

    struct StaticSource(Vec<RawContact>);

    #[async_trait]
    impl ContactSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<RawContact>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ContactSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<RawContact>> {
            Err(Error::Status(503))
        }
    }

    /// Pops one scripted (delay, payload) response per fetch call.
    struct ScriptedSource {
        responses: Mutex<Vec<(Duration, Vec<RawContact>)>>,
    }

    #[async_trait]
    impl ContactSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<RawContact>> {
            let (delay, contacts) = self.responses.lock().remove(0);
            tokio::time::sleep(delay).await;
            Ok(contacts)
        }
    }

    fn service(source: impl ContactSource + 'static) -> AlertService {
        let store = Arc::new(MemoryStore::new());
        AlertService::new(
            Arc::new(source),
            Arc::new(AckStore::new(store, "acknowledgedAlerts")),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn flattening_preserves_count_and_parent_fields() {
        let contacts = scenario_contacts();
        let expected: usize = contacts.iter().map(|c| c.alerts.len()).sum();

        let svc = service(StaticSource(contacts.clone()));
        svc.load().await;

        let views = svc.alerts().borrow().clone();
        assert_eq!(views.len(), expected);

        for view in &views {
            let parent = contacts
                .iter()
                .find(|c| c.alerts.iter().any(|a| a.error_id == view.error_id))
                .unwrap();
            assert_eq!(view.contact_name, parent.contact_name);
            assert_eq!(view.contact_begin_timestamp, parent.contact_begin_timestamp);
            assert_eq!(view.contact_end_timestamp, parent.contact_end_timestamp);
            assert_eq!(view.contact_satellite, parent.contact_satellite);
            assert_eq!(view.contact_detail, parent.contact_detail);
            assert!(!view.acknowledged);
        }
    }

    #[tokio::test]
    async fn load_lifecycle_flags() {
        let svc = service(StaticSource(scenario_contacts()));
        let loading = svc.loading();
        let error = svc.error();
        let progress = svc.progress();

        assert!(*loading.borrow());
        svc.load().await;

        assert!(!*loading.borrow());
        assert_eq!(*error.borrow(), None);
        assert_eq!(*progress.borrow(), 100);
    }

    #[tokio::test]
    async fn failed_load_publishes_empty_collection_and_error() {
        let svc = service(FailingSource);
        svc.load().await;

        assert!(svc.alerts().borrow().is_empty());
        assert_eq!(
            svc.error().borrow().as_deref(),
            Some("Failed to load alerts data.")
        );
        assert!(!*svc.loading().borrow());
    }

    #[tokio::test]
    async fn retry_after_failure_recovers() {
        let store = Arc::new(MemoryStore::new());
        let acks = Arc::new(AckStore::new(store, "acknowledgedAlerts"));

        // First load fails, retry against a healthy source succeeds with the
        // same contract.
        let failing = AlertService::new(Arc::new(FailingSource), acks.clone(), Duration::ZERO);
        failing.load().await;
        assert!(failing.alerts().borrow().is_empty());

        let healthy = AlertService::new(
            Arc::new(StaticSource(scenario_contacts())),
            acks,
            Duration::ZERO,
        );
        healthy.retry_load().await;
        assert_eq!(healthy.alerts().borrow().len(), 3);
        assert_eq!(*healthy.error().borrow(), None);
    }

    #[tokio::test]
    async fn acknowledge_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let acks = Arc::new(AckStore::new(store, "acknowledgedAlerts"));
        let svc = AlertService::new(
            Arc::new(StaticSource(scenario_contacts())),
            acks.clone(),
            Duration::ZERO,
        );
        svc.load().await;

        svc.acknowledge("E2");
        let after_once = svc.alerts().borrow().clone();
        let set_once = acks.snapshot();

        svc.acknowledge("E2");
        let after_twice = svc.alerts().borrow().clone();
        let set_twice = acks.snapshot();

        assert_eq!(after_once, after_twice);
        assert_eq!(set_once, set_twice);
        assert!(after_once
            .iter()
            .find(|a| a.error_id == "E2")
            .unwrap()
            .acknowledged);
    }

    #[tokio::test]
    async fn acknowledgments_survive_a_reload() {
        let store = Arc::new(MemoryStore::new());
        let acks = Arc::new(AckStore::new(store.clone(), "acknowledgedAlerts"));
        let svc = AlertService::new(
            Arc::new(StaticSource(scenario_contacts())),
            acks,
            Duration::ZERO,
        );

        svc.load().await;
        svc.acknowledge("E2");

        // Simulated restart: fresh ack store over the same backing slot,
        // fresh service, same source.
        let acks = Arc::new(AckStore::new(store, "acknowledgedAlerts"));
        let svc = AlertService::new(
            Arc::new(StaticSource(scenario_contacts())),
            acks,
            Duration::ZERO,
        );
        svc.load().await;

        let views = svc.alerts().borrow().clone();
        let by_id = |id: &str| views.iter().find(|a| a.error_id == id).unwrap();
        assert!(by_id("E2").acknowledged);
        assert!(!by_id("E1").acknowledged);
        assert!(!by_id("E3").acknowledged);
    }

    #[tokio::test]
    async fn acknowledge_republishes_to_subscribers() {
        let svc = service(StaticSource(scenario_contacts()));
        svc.load().await;

        let mut rx = svc.alerts();
        rx.borrow_and_update();

        svc.acknowledge("E1");
        assert!(rx.has_changed().unwrap());
        assert!(rx
            .borrow_and_update()
            .iter()
            .find(|a| a.error_id == "E1")
            .unwrap()
            .acknowledged);

        // No republication for an already-acknowledged identifier.
        svc.acknowledge("E1");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn later_load_wins_over_a_stale_one() {
        let scripted = ScriptedSource {
            responses: Mutex::new(vec![
                (
                    Duration::from_millis(500),
                    vec![contact(1, vec![alert("OLD", Severity::Info, 1)])],
                ),
                (
                    Duration::ZERO,
                    vec![contact(2, vec![alert("NEW", Severity::Info, 2)])],
                ),
            ]),
        };

        let svc = Arc::new(service(scripted));

        let slow = tokio::spawn({
            let svc = svc.clone();
            async move { svc.load().await }
        });
        tokio::task::yield_now().await;

        // Second load starts while the first is still in flight and finishes
        // first.
        svc.load().await;
        slow.await.unwrap();

        let views = svc.alerts().borrow().clone();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].error_id, "NEW");
    }
}
