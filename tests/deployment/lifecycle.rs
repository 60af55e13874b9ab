//! Session lifecycle as seen by the harness

use super::*;
use tck_deployer::{context, Containers, DeployError, ExecutionContext, NoOverrides, SessionState};

#[test]
fn test_full_harness_cycle() {
    let (containers, runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);

    containers.setup().unwrap();
    assert!(containers.deploy(&mut input.as_slice(), "First.jar"));
    containers.undeploy("First.jar");
    assert!(containers.deploy(&mut input.as_slice(), "Second.jar"));
    containers.undeploy("Second.jar");
    containers.cleanup().unwrap();

    assert_eq!(
        runtime.events(),
        vec![
            "teardown",
            "create First.jar",
            "close First.jar",
            "teardown",
            "create Second.jar",
            "close Second.jar",
        ]
    );
    assert_eq!(containers.session().state(), SessionState::Idle);
}

#[test]
fn test_validation_failure_unwrapped() {
    let (containers, runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);
    runtime.fail_next(GatewayError::wrapping(
        "deployment failed",
        GatewayError::Validation("ambiguous dependency".to_string()),
    ));

    assert!(!containers.deploy(&mut input.as_slice(), "Invalid.jar"));

    let exception = containers.deployment_exception().unwrap();
    assert!(exception.is_validation());
    assert!(matches!(
        exception.cause(),
        DeployError::Validation { message } if message == "ambiguous dependency"
    ));
}

#[test]
fn test_runtime_failure_keeps_cause() {
    let (containers, runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);
    runtime.fail_next(GatewayError::runtime("container exploded"));

    assert!(!containers.deploy(&mut input.as_slice(), "Boom.jar"));

    let exception = containers.deployment_exception().unwrap();
    assert!(!exception.is_validation());
    assert!(matches!(exception.cause(), DeployError::RuntimeCreation { .. }));
    assert!(exception.to_string().contains("container exploded"));
}

#[test]
fn test_exception_cleared_by_next_success() {
    let (containers, runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);
    runtime.fail_next(GatewayError::runtime("boom"));

    assert!(!containers.deploy(&mut input.as_slice(), "A.jar"));
    assert!(containers.deployment_exception().is_some());

    assert!(containers.deploy(&mut input.as_slice(), "A.jar"));
    assert!(containers.deployment_exception().is_none());
}

#[test]
fn test_undeploy_tolerated_without_deploy() {
    let (containers, runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());

    containers.undeploy("Ghost.jar");
    containers.undeploy("Ghost.jar");

    assert!(runtime.events().is_empty());
    assert_eq!(containers.session().state(), SessionState::Idle);
}

#[test]
fn test_undeploy_after_failed_deploy() {
    let (containers, runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);
    context::replace(Some(ExecutionContext::root("harness")));
    runtime.fail_next(GatewayError::runtime("boom"));

    assert!(!containers.deploy(&mut input.as_slice(), "A.jar"));
    assert_eq!(context::current().unwrap().label(), "harness");
    containers.undeploy("A.jar");

    assert_eq!(runtime.events(), vec!["teardown", "create A.jar"]);
    assert_eq!(context::current().unwrap().label(), "harness");
    assert_eq!(containers.session().state(), SessionState::Idle);
    context::replace(None);
}

#[test]
fn test_undeploy_after_failed_deploy_keeping_context() {
    let config = DeployerConfig::default().keep_context_on_failure();
    let (containers, runtime, _dir) = deployer(NoOverrides, config);
    let input = archive(&[("a.txt", "1")]);
    context::replace(Some(ExecutionContext::root("harness")));
    runtime.fail_next(GatewayError::runtime("boom"));

    assert!(!containers.deploy(&mut input.as_slice(), "A.jar"));
    let during = context::current().unwrap();
    assert!(during.archive().is_some());
    assert_eq!(during.parent().unwrap().label(), "harness");

    containers.undeploy("A.jar");

    assert_eq!(context::current().unwrap().label(), "harness");
    context::replace(None);
}

#[test]
fn test_context_scoped_to_deployment() {
    let (containers, _runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);
    context::replace(Some(ExecutionContext::root("harness")));

    assert!(containers.deploy(&mut input.as_slice(), "Scoped.jar"));
    let scope = context::current().unwrap();
    assert_eq!(scope.resolve("a.txt").unwrap().as_deref(), Some(&b"1"[..]));

    containers.undeploy("Scoped.jar");
    assert_eq!(context::current().unwrap().label(), "harness");
    context::replace(None);
}

#[test]
fn test_context_kept_after_failure_when_configured() {
    let config = DeployerConfig::default().keep_context_on_failure();
    let (containers, runtime, _dir) = deployer(NoOverrides, config);
    let input = archive(&[("a.txt", "1")]);
    runtime.fail_next(GatewayError::runtime("boom"));

    assert!(!containers.deploy(&mut input.as_slice(), "Leaky.jar"));
    assert!(context::current().unwrap().archive().is_some());

    containers.undeploy("Leaky.jar");
    assert!(context::current().is_none());
}

#[test]
fn test_current_deployment_reported() {
    let (containers, _runtime, _dir) = deployer(NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);

    assert!(containers.deploy(&mut input.as_slice(), "Live.war"));

    let info = containers.session().current_deployment().unwrap();
    assert_eq!(info.name, "Live.war");
    assert_eq!(info.kind, tck_deployer::ArchiveKind::Web);
    assert!(info.archive_path.exists());

    containers.undeploy("Live.war");
    assert!(containers.session().current_deployment().is_none());
}
