//! Shared fixtures for controller tests.

use crate::daemon::Housekeeper;
use crate::plant::{DispatchResult, Plant, PlantContext};
use crate::registry::PlantRegistry;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Plant that echoes its construction context and invocation flags back as
/// its response, so tests can assert exactly what reached it.
pub struct EchoPlant {
    ctx: PlantContext,
}

impl EchoPlant {
    pub fn new(ctx: PlantContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Plant for EchoPlant {
    fn name(&self) -> &'static str {
        "EchoPlant"
    }

    async fn process_request(
        &mut self,
        api_mode: bool,
        http_method: Option<&str>,
    ) -> DispatchResult {
        json!({
            "plant": self.name(),
            "method": self.ctx.method.as_str(),
            "user": self.ctx.user,
            "api_mode": api_mode,
            "http_method": http_method,
            "fields": self.ctx.payload,
        })
    }
}

/// Registry wiring every given name to an [`EchoPlant`] factory
pub fn echo_registry(names: &[&str]) -> Arc<PlantRegistry> {
    let mut registry = PlantRegistry::new();
    for name in names {
        registry.register(name, |ctx| Box::new(EchoPlant::new(ctx)));
    }
    Arc::new(registry)
}

/// Housekeeper that counts how many times it ran
#[derive(Default)]
pub struct CountingHousekeeper {
    runs: AtomicUsize,
}

impl CountingHousekeeper {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Housekeeper for CountingHousekeeper {
    async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Housekeeper that always fails, for verifying failures stay contained
pub struct FailingHousekeeper;

#[async_trait]
impl Housekeeper for FailingHousekeeper {
    async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("housekeeping exploded".into())
    }
}
