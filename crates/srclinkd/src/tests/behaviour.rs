//! Behavioural tests for the daemon bootstrap sequence.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, bootstrap_with};

use super::support::{FailingConfigLoader, HealthEvent, RecordingHealthReporter, TestConfigLoader};

struct BootstrapWorld {
    loader: Box<dyn ConfigLoader>,
    reporter: RecordingHealthReporter,
    outcome: Option<Result<Daemon, BootstrapError>>,
}

impl BootstrapWorld {
    fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            reporter: RecordingHealthReporter::default(),
            outcome: None,
        }
    }

    fn has_event(&self, predicate: impl Fn(&HealthEvent) -> bool) -> bool {
        self.reporter.events().iter().any(predicate)
    }
}

#[fixture]
fn world() -> RefCell<BootstrapWorld> {
    RefCell::new(BootstrapWorld::new())
}

#[given("a healthy configuration loader")]
fn given_healthy_loader(world: &RefCell<BootstrapWorld>) {
    world.borrow_mut().loader = Box::new(TestConfigLoader::new());
}

#[given("a failing configuration loader")]
fn given_failing_loader(world: &RefCell<BootstrapWorld>) {
    world.borrow_mut().loader = Box::new(FailingConfigLoader);
}

#[when("the daemon bootstrap runs")]
fn when_bootstrap_runs(world: &RefCell<BootstrapWorld>) {
    let mut world = world.borrow_mut();
    let outcome = bootstrap_with(&*world.loader, &world.reporter);
    world.outcome = Some(outcome);
}

#[then("bootstrap succeeds")]
fn then_bootstrap_succeeds(world: &RefCell<BootstrapWorld>) {
    let world = world.borrow();
    match &world.outcome {
        Some(Ok(daemon)) => assert_eq!(daemon.config().port(), 0),
        other => panic!("expected bootstrap to succeed, got {other:?}"),
    }
}

#[then("bootstrap fails")]
fn then_bootstrap_fails(world: &RefCell<BootstrapWorld>) {
    let world = world.borrow();
    assert!(
        matches!(
            world.outcome,
            Some(Err(BootstrapError::Configuration { .. }))
        ),
        "expected a configuration error, got {:?}",
        world.outcome
    );
}

#[then("the reporter recorded bootstrap start")]
fn then_reporter_start(world: &RefCell<BootstrapWorld>) {
    assert!(
        world
            .borrow()
            .has_event(|event| *event == HealthEvent::BootstrapStarting)
    );
}

#[then("the reporter recorded bootstrap success")]
fn then_reporter_success(world: &RefCell<BootstrapWorld>) {
    assert!(
        world
            .borrow()
            .has_event(|event| *event == HealthEvent::BootstrapSucceeded)
    );
}

#[then("the reporter recorded bootstrap failure")]
fn then_reporter_failure(world: &RefCell<BootstrapWorld>) {
    assert!(
        world
            .borrow()
            .has_event(|event| matches!(event, HealthEvent::BootstrapFailed(_)))
    );
}

#[scenario(
    path = "tests/features/daemon_bootstrap.feature",
    name = "Bootstrap succeeds with a healthy configuration"
)]
fn bootstrap_succeeds(world: RefCell<BootstrapWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/daemon_bootstrap.feature",
    name = "Bootstrap fails when configuration cannot be loaded"
)]
fn bootstrap_fails(world: RefCell<BootstrapWorld>) {
    drop(world);
}
