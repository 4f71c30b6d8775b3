//! Small coordinator-internal guards.
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use txls_core::event::EventHub;

use crate::error::ServiceError;

/// Lock a mutex, recovering the data from a poisoned lock.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Set of project/language names with a lifecycle operation running.
///
/// A second operation on the same name fails fast instead of racing
/// the first through the toolchain.
pub(crate) struct InFlight {
    names: Mutex<HashSet<String>>,
}

impl InFlight {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            names: Mutex::new(HashSet::new()),
        })
    }

    /// Reserve `name`, releasing it when the guard drops.
    pub(crate) fn acquire(
        self: &Arc<Self>,
        name: &str,
    ) -> Result<InFlightGuard, ServiceError> {
        let mut names = lock(&self.names);
        if !names.insert(name.to_string()) {
            return Err(ServiceError::OperationInFlight(name.to_string()));
        }
        Ok(InFlightGuard {
            set: Arc::clone(self),
            name: name.to_string(),
        })
    }
}

pub(crate) struct InFlightGuard {
    set: Arc<InFlight>,
    name: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.set.names).remove(&self.name);
    }
}

/// Fires the languages-changed signal when dropped, so every exit
/// path of a lifecycle method refreshes subscribers.
pub(crate) struct FireOnDrop<'a>(pub(crate) &'a EventHub);

impl Drop for FireOnDrop<'_> {
    fn drop(&mut self) {
        self.0.fire_languages_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn acquire_rejects_second_holder() {
        let in_flight = InFlight::new();
        let _guard = in_flight.acquire("demo").unwrap();
        assert!(matches!(
            in_flight.acquire("demo"),
            Err(ServiceError::OperationInFlight(name)) if name == "demo"
        ));
    }

    #[test]
    fn drop_releases_the_name() {
        let in_flight = InFlight::new();
        drop(in_flight.acquire("demo").unwrap());
        assert!(in_flight.acquire("demo").is_ok());
    }

    #[test]
    fn distinct_names_do_not_conflict() {
        let in_flight = InFlight::new();
        let _a = in_flight.acquire("a").unwrap();
        assert!(in_flight.acquire("b").is_ok());
    }

    #[test]
    fn fire_on_drop_fires_once() {
        let hub = EventHub::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        hub.on_languages_changed(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        {
            let _fire = FireOnDrop(&hub);
            assert_eq!(count.load(Ordering::SeqCst), 0);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
