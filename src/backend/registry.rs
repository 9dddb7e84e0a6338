//! Backend registry: the set of known backends and a stack of active ones
//!
//! Algorithms never consult the registry. It only helps callers pick a
//! backend, which they then pass to the algorithm explicitly:
//!
//! ```
//! use mdsr::prelude::*;
//! use mdsr::backend::registry;
//! use mdsr::algorithm::squared_distances;
//!
//! let backend = registry::global().lock().first_preferred()?;
//! let x = backend.create_from_rows(&[vec![0.0, 0.0], vec![3.0, 4.0]])?;
//! let d = squared_distances(backend.as_ref(), &x)?;
//! assert_eq!(backend.get(&d, 0, 1)?, 25.0);
//! # Ok::<(), mdsr::error::Error>(())
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::{CpuBackend, DenseMatrix, MatrixValue, SharedBackend};
use crate::error::{Error, Result};

/// Backend names in the order [`BackendRegistry::first_preferred`] tries them
pub const PREFERRED_BACKEND_ORDER: &[&str] = &["lapack", "gsl", CpuBackend::NAME];

/// Registered backends plus the stack of active ones
///
/// `available` keeps registration order; the last entry pushed onto the
/// active stack is the active backend.
pub struct BackendRegistry<M: MatrixValue> {
    available: Vec<SharedBackend<M>>,
    active: Vec<SharedBackend<M>>,
}

impl<M: MatrixValue> BackendRegistry<M> {
    /// Empty registry: nothing available, nothing active
    pub fn new() -> Self {
        Self {
            available: Vec::new(),
            active: Vec::new(),
        }
    }

    /// Make `backend` available
    ///
    /// Names are unique: registering a second backend under a name already
    /// present leaves the registry unchanged.
    pub fn register(&mut self, backend: SharedBackend<M>) {
        let name = backend.name();
        if self.available.iter().any(|b| b.name() == name) {
            debug!(backend = name, "backend already registered, ignoring");
            return;
        }
        debug!(backend = name, "registered backend");
        self.available.push(backend);
    }

    /// Run each loader and register what it produces
    ///
    /// A loader that fails is skipped; the remaining loaders still run.
    /// Returns how many backends were added.
    pub fn register_from_loaders<I, F>(&mut self, loaders: I) -> usize
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Result<SharedBackend<M>>,
    {
        let before = self.available.len();
        for load in loaders {
            match load() {
                Ok(backend) => self.register(backend),
                Err(err) => warn!(error = %err, "skipping backend that failed to load"),
            }
        }
        self.available.len() - before
    }

    /// Backends in registration order
    pub fn available(&self) -> &[SharedBackend<M>] {
        &self.available
    }

    /// Names of the available backends in registration order
    pub fn available_names(&self) -> Vec<&'static str> {
        self.available.iter().map(|b| b.name()).collect()
    }

    /// Replace the active backend
    ///
    /// Pops the top of the active stack (if any) and pushes `backend`.
    pub fn set_active(&mut self, backend: SharedBackend<M>) {
        self.active.pop();
        self.push_active(backend);
    }

    /// Activate `backend` on top of the current one
    pub fn push_active(&mut self, backend: SharedBackend<M>) {
        debug!(backend = backend.name(), depth = self.active.len() + 1, "activated backend");
        self.active.push(backend);
    }

    /// Deactivate the top backend, restoring the one below it
    pub fn pop_active(&mut self) -> Option<SharedBackend<M>> {
        let popped = self.active.pop();
        if let Some(b) = &popped {
            debug!(backend = b.name(), depth = self.active.len(), "deactivated backend");
        }
        popped
    }

    /// The active backend
    ///
    /// Returns `Error::NoActiveBackend` if nothing has been activated.
    pub fn active(&self) -> Result<SharedBackend<M>> {
        self.active.last().cloned().ok_or(Error::NoActiveBackend)
    }

    /// First backend matching `preferences`, in preference order
    ///
    /// Falls back to the first registered backend when no name matches and
    /// returns `Error::NoBackendAvailable` when nothing is registered.
    pub fn first_available(&self, preferences: &[&str]) -> Result<SharedBackend<M>> {
        preferences
            .iter()
            .find_map(|name| self.available.iter().find(|b| b.name() == *name))
            .or_else(|| self.available.first())
            .cloned()
            .ok_or(Error::NoBackendAvailable)
    }

    /// [`first_available`](Self::first_available) with [`PREFERRED_BACKEND_ORDER`]
    pub fn first_preferred(&self) -> Result<SharedBackend<M>> {
        self.first_available(PREFERRED_BACKEND_ORDER)
    }
}

impl<M: MatrixValue> Default for BackendRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MatrixValue> fmt::Debug for BackendRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active: Vec<_> = self.active.iter().map(|b| b.name()).collect();
        f.debug_struct("BackendRegistry")
            .field("available", &self.available_names())
            .field("active", &active)
            .finish()
    }
}

/// Guard returned by [`push_scoped`]; pops the active stack when dropped
///
/// The registry lock is only held while pushing and popping, so the scoped
/// backend can be looked up through the same registry in between.
#[must_use = "the backend is deactivated as soon as the guard is dropped"]
pub struct ScopedBackend<'a, M: MatrixValue> {
    registry: &'a Mutex<BackendRegistry<M>>,
}

impl<M: MatrixValue> Drop for ScopedBackend<'_, M> {
    fn drop(&mut self) {
        self.registry.lock().pop_active();
    }
}

/// Activate `backend` in `registry` until the returned guard is dropped
pub fn push_scoped<M: MatrixValue>(
    registry: &Mutex<BackendRegistry<M>>,
    backend: SharedBackend<M>,
) -> ScopedBackend<'_, M> {
    registry.lock().push_active(backend);
    ScopedBackend { registry }
}

static GLOBAL_REGISTRY: OnceLock<Mutex<BackendRegistry<DenseMatrix>>> = OnceLock::new();

/// Process-wide registry of backends working on [`DenseMatrix`]
///
/// Built-in backends are registered on first access. The active stack starts
/// empty.
pub fn global() -> &'static Mutex<BackendRegistry<DenseMatrix>> {
    GLOBAL_REGISTRY.get_or_init(|| {
        let mut registry = BackendRegistry::<DenseMatrix>::new();
        registry.register(Arc::new(CpuBackend::new()));
        Mutex::new(registry)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DerivedOps, MatrixBackend};

    /// Backend with no primitives, identified only by name
    #[derive(Debug)]
    struct Named(&'static str);

    impl MatrixBackend for Named {
        type Matrix = DenseMatrix;

        fn name(&self) -> &'static str {
            self.0
        }
    }

    impl DerivedOps for Named {}

    fn named(name: &'static str) -> SharedBackend<DenseMatrix> {
        Arc::new(Named(name))
    }

    fn active_name(r: &BackendRegistry<DenseMatrix>) -> &'static str {
        r.active().unwrap().name()
    }

    #[test]
    fn test_empty_registry() {
        let r = BackendRegistry::<DenseMatrix>::new();
        assert!(matches!(r.active(), Err(Error::NoActiveBackend)));
        assert!(matches!(r.first_preferred(), Err(Error::NoBackendAvailable)));
        assert!(r.available().is_empty());
    }

    #[test]
    fn test_set_push_pop() {
        let mut r = BackendRegistry::new();
        r.set_active(named("a"));
        assert_eq!(active_name(&r), "a");

        r.push_active(named("b"));
        assert_eq!(active_name(&r), "b");

        r.set_active(named("c"));
        assert_eq!(active_name(&r), "c");

        assert_eq!(r.pop_active().unwrap().name(), "c");
        assert_eq!(active_name(&r), "a");
        r.pop_active();
        assert!(r.pop_active().is_none());
        assert!(matches!(r.active(), Err(Error::NoActiveBackend)));
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut r = BackendRegistry::new();
        r.register(named("a"));
        r.register(named("b"));
        r.register(named("a"));
        assert_eq!(r.available_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_first_available_order() {
        let mut r = BackendRegistry::new();
        r.register(named("x"));
        r.register(named("cpu"));
        r.register(named("gsl"));

        assert_eq!(r.first_preferred().unwrap().name(), "gsl");
        assert_eq!(r.first_available(&["cpu", "gsl"]).unwrap().name(), "cpu");
        assert_eq!(r.first_available(&["missing"]).unwrap().name(), "x");
        assert_eq!(r.first_available(&[]).unwrap().name(), "x");
    }

    #[test]
    fn test_loader_failures_are_skipped() {
        let mut r = BackendRegistry::new();
        let loaders: Vec<Box<dyn FnOnce() -> Result<SharedBackend<DenseMatrix>>>> = vec![
            Box::new(|| Ok(named("a"))),
            Box::new(|| Err(Error::Backend("library not found".into()))),
            Box::new(|| Ok(named("b"))),
            Box::new(|| Ok(named("a"))),
        ];
        assert_eq!(r.register_from_loaders(loaders), 2);
        assert_eq!(r.available_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_scoped_backend_restores_previous() {
        let r = Mutex::new(BackendRegistry::new());
        r.lock().set_active(named("outer"));
        {
            let _guard = push_scoped(&r, named("inner"));
            assert_eq!(active_name(&r.lock()), "inner");
        }
        assert_eq!(active_name(&r.lock()), "outer");
    }

    #[test]
    fn test_global_has_cpu() {
        let names = global().lock().available_names();
        assert!(names.contains(&CpuBackend::NAME));
    }
}
