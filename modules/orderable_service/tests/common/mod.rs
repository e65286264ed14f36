//! Common test utilities and shared menu fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use orderable_service::domain::{
    ContentCatalog, ContentService, EventPublisher, NoOpEventPublisher, PositionEvent,
    PositionStore,
};
use orderable_service::infra::storage::InMemoryPositionStore;
use orderable_service::{Config, Content, Orderable, PartitionKey};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const MAIN_MENU: PartitionKey = 1;
pub const FOOTER_MENU: PartitionKey = 2;

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}

pub fn print_menu(label: &str, contents: &[Content]) {
    println!("   {}:", label);
    for c in contents {
        println!("     [{}] {} (id {})", c.position, c.name, c.id);
    }
}

/// Publisher that records every event
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<PositionEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<PositionEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: PositionEvent) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Publisher whose every publish fails
pub struct BrokenPublisher;

#[async_trait]
impl EventPublisher for BrokenPublisher {
    async fn publish(&self, _event: PositionEvent) -> anyhow::Result<()> {
        anyhow::bail!("event bus is down")
    }
}

pub fn memory_store() -> Arc<InMemoryPositionStore<Content>> {
    Arc::new(InMemoryPositionStore::new())
}

pub fn service_over(store: Arc<dyn PositionStore<Content>>) -> Arc<ContentService> {
    Arc::new(ContentService::new(
        store,
        Arc::new(NoOpEventPublisher),
        Config::default(),
    ))
}

pub fn create_test_service() -> (Arc<ContentService>, Arc<InMemoryPositionStore<Content>>) {
    let store = memory_store();
    (service_over(store.clone()), store)
}

/// Ordering service and catalog sharing one in-memory store
pub fn create_test_catalog() -> (Arc<ContentService>, ContentCatalog) {
    let store = memory_store();
    let catalog = ContentCatalog::new(store.clone(), Config::default());
    (service_over(store), catalog)
}

/// Append one content per name to `menu`, in order
pub async fn seed_menu(service: &ContentService, menu: PartitionKey, names: &[&str]) -> Vec<Content> {
    let mut created = Vec::new();
    for name in names {
        let slug = name.to_lowercase().replace(' ', "-");
        let content = service
            .append(Content::draft(menu, *name, slug, format!("{} body", name)))
            .await
            .unwrap();
        created.push(content);
    }
    created
}

pub fn names(contents: &[Content]) -> Vec<&str> {
    contents.iter().map(|c| c.name.as_str()).collect()
}

pub fn positions(contents: &[Content]) -> Vec<u32> {
    contents.iter().map(|c| c.position).collect()
}

/// Positions of every partition in `contents` form exactly `0..n`
pub fn assert_dense(contents: &[Content]) {
    let menus: BTreeSet<PartitionKey> = contents.iter().map(|c| c.partition_key()).collect();
    for menu in menus {
        let mut slots: Vec<u32> = contents
            .iter()
            .filter(|c| c.menu_id == menu)
            .map(|c| c.position)
            .collect();
        slots.sort_unstable();
        let expected: Vec<u32> = (0..slots.len() as u32).collect();
        assert_eq!(slots, expected, "menu {} is not dense", menu);
    }
}
