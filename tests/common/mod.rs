#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum_storefront_api::{
    cart::CatalogProduct,
    client::{ClientError, ClientResult, DraftApi, SubmissionApi},
    drafts::{DraftConfig, DraftFlow, DraftSnapshot, SessionId},
    dto::{
        auxiliary::AuxiliaryForm,
        orders::{NewOrder, OrderConfirmation},
        reservations::{NewReservation, ReservationConfirmation},
    },
    storage::{KeyValueStore, StorageError, StorageResult},
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

fn unavailable() -> ClientError {
    ClientError::Transient {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

/// In-memory draft store that counts calls and can be told to fail.
#[derive(Debug, Default)]
pub struct FakeDrafts {
    drafts: Mutex<HashMap<(DraftFlow, String), DraftSnapshot>>,
    pub saves: Mutex<Vec<DraftSnapshot>>,
    pub gets: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail_get: AtomicBool,
    pub fail_save: AtomicBool,
    pub fail_delete: AtomicBool,
    /// Simulated latency of `save_draft`, in milliseconds.
    pub save_delay_ms: AtomicU64,
}

impl FakeDrafts {
    pub fn stored(&self, flow: DraftFlow, session_id: &SessionId) -> Option<DraftSnapshot> {
        self.drafts
            .lock()
            .unwrap()
            .get(&(flow, session_id.to_string()))
            .cloned()
    }

    pub fn seed(&self, flow: DraftFlow, session_id: &SessionId, snapshot: DraftSnapshot) {
        self.drafts
            .lock()
            .unwrap()
            .insert((flow, session_id.to_string()), snapshot);
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<DraftSnapshot> {
        self.saves.lock().unwrap().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.drafts.lock().unwrap().len()
    }
}

impl DraftApi for FakeDrafts {
    async fn get_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
    ) -> ClientResult<Option<DraftSnapshot>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.stored(flow, session_id))
    }

    async fn save_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
        snapshot: &DraftSnapshot,
    ) -> ClientResult<()> {
        self.saves.lock().unwrap().push(snapshot.clone());
        let delay = self.save_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.seed(flow, session_id, snapshot.clone());
        Ok(())
    }

    async fn delete_draft(&self, flow: DraftFlow, session_id: &SessionId) -> ClientResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.drafts
            .lock()
            .unwrap()
            .remove(&(flow, session_id.to_string()));
        Ok(())
    }
}

/// Records submissions; each endpoint can be switched to fail.
#[derive(Debug, Default)]
pub struct FakeSubmissions {
    pub reservations: Mutex<Vec<NewReservation>>,
    pub orders: Mutex<Vec<NewOrder>>,
    pub auxiliary: Mutex<Vec<AuxiliaryForm>>,
    pub fail_primary: AtomicBool,
    pub fail_auxiliary: AtomicBool,
}

impl FakeSubmissions {
    pub fn primary_calls(&self) -> usize {
        self.reservations.lock().unwrap().len() + self.orders.lock().unwrap().len()
    }

    pub fn auxiliary_calls(&self) -> usize {
        self.auxiliary.lock().unwrap().len()
    }
}

impl SubmissionApi for FakeSubmissions {
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> ClientResult<ReservationConfirmation> {
        self.reservations.lock().unwrap().push(reservation.clone());
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(ReservationConfirmation {
            id: Uuid::new_v4(),
            reference: "RSV-TEST".to_string(),
            created_at: Utc::now(),
        })
    }

    async fn create_order(&self, order: &NewOrder) -> ClientResult<OrderConfirmation> {
        self.orders.lock().unwrap().push(order.clone());
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(OrderConfirmation {
            id: Uuid::new_v4(),
            invoice_number: "INV-TEST".to_string(),
            total_amount: order.expected_total,
            created_at: Utc::now(),
        })
    }

    async fn submit_auxiliary_form(
        &self,
        _flow: DraftFlow,
        _session_id: &SessionId,
        form: &AuxiliaryForm,
    ) -> ClientResult<()> {
        self.auxiliary.lock().unwrap().push(form.clone());
        if self.fail_auxiliary.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

/// Storage whose every operation fails.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Poisoned)
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Poisoned)
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Poisoned)
    }
}

pub fn product(name: &str, price: Decimal, stock: u32) -> CatalogProduct {
    CatalogProduct {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price: Some(price),
        image_ref: None,
        sku: Some(format!("SKU-{name}")),
        stock_quantity: stock,
        is_active: true,
    }
}

pub fn config() -> DraftConfig {
    DraftConfig::default()
}
