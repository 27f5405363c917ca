//! Per-staff serialization for the booking critical section.
//!
//! The registry hands out one async mutex per staff member, so two booking
//! attempts for the same staff member serialize while attempts for
//! different staff members proceed fully in parallel. Acquisition is
//! bounded; a timeout fails closed with a transient error before any
//! storage work happens.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::BookingError;

/// Registry of per-staff booking locks.
#[derive(Debug, Default)]
pub struct StaffLockRegistry {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl StaffLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the exclusive lock for `staff_id`, waiting at most
    /// `timeout`. The returned guard must be held for the duration of the
    /// conflict re-check plus insert/update.
    pub async fn acquire(
        &self,
        staff_id: Uuid,
        timeout: Duration,
    ) -> Result<OwnedMutexGuard<()>, BookingError> {
        let lock = Arc::clone(
            self.locks
                .entry(staff_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );

        tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                BookingError::Transient(format!(
                    "booking lock for staff {staff_id} not acquired within {timeout:?}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_staff_serializes() {
        let registry = StaffLockRegistry::new();
        let staff = Uuid::new_v4();

        let guard = registry
            .acquire(staff, Duration::from_millis(100))
            .await
            .expect("first acquisition succeeds");

        let blocked = registry.acquire(staff, Duration::from_millis(50)).await;
        assert!(matches!(blocked, Err(BookingError::Transient(_))));

        drop(guard);

        registry
            .acquire(staff, Duration::from_millis(100))
            .await
            .expect("lock is free again after release");
    }

    #[tokio::test]
    async fn different_staff_do_not_contend() {
        let registry = StaffLockRegistry::new();

        let _a = registry
            .acquire(Uuid::new_v4(), Duration::from_millis(100))
            .await
            .expect("first staff lock");
        let _b = registry
            .acquire(Uuid::new_v4(), Duration::from_millis(100))
            .await
            .expect("second staff lock acquired while first is held");
    }
}
