use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per doctor. Holding the guard serializes every
/// read-validate-write sequence touching that doctor's schedule.
///
/// Entries live only while someone holds or waits for them, so the map stays
/// bounded by the number of doctors with in-flight mutations.
#[derive(Default)]
pub struct DoctorLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// Exclusive access to one doctor's schedule. Releases the entry on drop.
pub struct DoctorGuard<'a> {
    locks: &'a DashMap<Uuid, Arc<Mutex<()>>>,
    doctor_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, doctor_id: Uuid) -> DoctorGuard<'_> {
        // The map shard must not stay borrowed across the await.
        let mutex = self.locks.entry(doctor_id).or_default().clone();
        let guard = mutex.lock_owned().await;

        DoctorGuard {
            locks: &self.locks,
            doctor_id,
            guard: Some(guard),
        }
    }

    pub fn tracked_doctors(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for DoctorGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold their own clone, so a count of one means the map is the last owner.
        self.locks
            .remove_if(&self.doctor_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
