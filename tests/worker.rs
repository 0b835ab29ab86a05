use chrono::Utc;
use skiphire::catalog::CatalogSource;
use skiphire::infrastructure::ManualClock;
use skiphire::worker::{CatalogWorker, WorkerHandle, WorkerMessage, WorkerResponse};
use skiphire::{Config, FetchError, LocationKey, Skip};
use std::sync::mpsc;
use std::time::Duration;

struct Fixed(Vec<Skip>);

impl CatalogSource for Fixed {
    fn fetch(&mut self, _key: &LocationKey) -> Result<Vec<Skip>, FetchError> {
        Ok(self.0.clone())
    }
}

#[test]
fn responses_come_back_in_request_order() {
    let config = Config::default();
    let client = skiphire::catalog_client(
        &config,
        Box::new(Fixed(Vec::new())),
        Box::new(ManualClock::new(Utc::now())),
    );

    let (tx, rx) = mpsc::channel();
    let mut handle = WorkerHandle::spawn(CatalogWorker::new(client), move |response| {
        let _ = tx.send(response);
    })
    .unwrap();

    let key = LocationKey::new("NR32", "Lowestoft").unwrap();
    handle.post(WorkerMessage::fetch_catalog(1, key.clone(), false)).unwrap();
    handle.post(WorkerMessage::fetch_catalog(2, key.clone(), false)).unwrap();

    let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();

    assert!(matches!(first, WorkerResponse::CatalogLoaded { request_id: 1, from_cache: false, .. }));
    assert!(matches!(second, WorkerResponse::CatalogLoaded { request_id: 2, from_cache: true, .. }));
    assert_eq!(second.key(), &key);

    handle.shutdown();
    assert!(handle.post(WorkerMessage::fetch_catalog(3, key, false)).is_err());
}
