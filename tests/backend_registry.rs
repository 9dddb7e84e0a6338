//! Integration tests for backend selection through the registry

use std::sync::Arc;

use mdsr::algorithm::{project_to_dimension, squared_distances};
use mdsr::backend::{SharedBackend, push_scoped, registry};
use mdsr::prelude::*;
use parking_lot::Mutex;

mod common;

/// Backend that only reports a name; every primitive is left unimplemented
struct Stub(&'static str);

impl MatrixBackend for Stub {
    type Matrix = DenseMatrix;

    fn name(&self) -> &'static str {
        self.0
    }
}

impl DerivedOps for Stub {}

fn stub(name: &'static str) -> SharedBackend<DenseMatrix> {
    Arc::new(Stub(name))
}

#[test]
fn test_global_registry_runs_the_pipeline() {
    let backend = registry::global().lock().first_preferred().unwrap();
    assert_eq!(backend.name(), CpuBackend::NAME);

    let x = common::matrix(backend.as_ref(), &[&[1.0, 2.0], &[4.0, 3.0], &[0.0, 1.0]]);
    let d = squared_distances(backend.as_ref(), &x).unwrap();
    let y = project_to_dimension(backend.as_ref(), &d, 2).unwrap();
    assert_eq!(backend.shape(&y).unwrap(), (3, 2));
}

#[test]
fn test_active_stack_selects_backend() {
    let registry = Mutex::new(BackendRegistry::<DenseMatrix>::new());
    registry.lock().register(Arc::new(CpuBackend::new()));
    registry.lock().register(stub("stub"));

    assert!(matches!(
        registry.lock().active(),
        Err(Error::NoActiveBackend)
    ));

    let cpu = registry.lock().first_available(&["cpu"]).unwrap();
    registry.lock().set_active(cpu);
    {
        let _scope = push_scoped(&registry, stub("stub"));
        let active = registry.lock().active().unwrap();
        assert_eq!(active.name(), "stub");

        // an operation the stub does not provide is reported, not defaulted
        assert_eq!(
            active.create(2, 2, 0.0).unwrap_err(),
            Error::not_implemented("stub", "create")
        );
    }
    let active = registry.lock().active().unwrap();
    assert_eq!(active.name(), "cpu");
    assert!(active.create(2, 2, 0.0).is_ok());
}

#[test]
fn test_preference_falls_back_to_registration_order() {
    let mut registry = BackendRegistry::<DenseMatrix>::new();
    assert!(matches!(
        registry.first_preferred(),
        Err(Error::NoBackendAvailable)
    ));

    registry.register(stub("first"));
    registry.register(stub("second"));
    assert_eq!(registry.first_preferred().unwrap().name(), "first");
    assert_eq!(registry.first_available(&["second"]).unwrap().name(), "second");

    registry.register(Arc::new(CpuBackend::new()));
    assert_eq!(registry.first_preferred().unwrap().name(), "cpu");
}

#[test]
fn test_loaders_register_what_they_can() {
    let mut registry = BackendRegistry::<DenseMatrix>::new();
    let loaders: Vec<Box<dyn FnOnce() -> Result<SharedBackend<DenseMatrix>>>> = vec![
        Box::new(|| Err(Error::Backend("liblapack.so: cannot open shared object".into()))),
        Box::new(|| Ok(Arc::new(CpuBackend::new()) as SharedBackend<DenseMatrix>)),
    ];
    assert_eq!(registry.register_from_loaders(loaders), 1);
    assert_eq!(registry.available_names(), vec!["cpu"]);
}
