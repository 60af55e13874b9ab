//! Archive rewriting observed through a full deploy

use super::*;
use tck_deployer::{BytesSource, Containers, DeployError, ResourceOverrideMap};

fn descriptor_overrides(_: &str) -> tck_deployer::DeployResult<ResourceOverrideMap> {
    Ok(ResourceOverrideMap::new()
        .with("meta/desc.xml", BytesSource::new("new"))
        .with("meta/extra.xml", BytesSource::new("added")))
}

#[test]
fn test_overrides_replace_and_append() {
    let (containers, runtime, _dir) = deployer(descriptor_overrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1"), ("meta/desc.xml", "old")]);

    assert!(containers.deploy(&mut input.as_slice(), "Scenario.jar"));

    let created = runtime.last_created();
    assert_eq!(created.app_name, "Scenario.jar");
    assert_eq!(created.paths, vec!["a.txt", "meta/desc.xml", "meta/extra.xml"]);
    assert_eq!(created.content("a.txt"), Some(&b"1"[..]));
    assert_eq!(created.content("meta/desc.xml"), Some(&b"new"[..]));
    assert_eq!(created.content("meta/extra.xml"), Some(&b"added"[..]));
}

#[test]
fn test_forced_deployment_synthesizes_descriptor() {
    let config = DeployerConfig::default().force_deployment(true);
    let (containers, runtime, _dir) = deployer(descriptor_overrides, config);
    let input = archive(&[("a.txt", "1"), ("meta/desc.xml", "old")]);

    assert!(containers.deploy(&mut input.as_slice(), "Scenario.jar"));

    let created = runtime.last_created();
    assert_eq!(
        created.paths,
        vec!["a.txt", "meta/desc.xml", "meta/extra.xml", "META-INF/beans.xml"]
    );
    assert_eq!(created.content("META-INF/beans.xml"), Some(&b"<beans />"[..]));
}

#[test]
fn test_forced_deployment_keeps_existing_descriptor() {
    let config = DeployerConfig::default().force_deployment(true);
    let (containers, runtime, _dir) = deployer(tck_deployer::NoOverrides, config);
    let input = archive(&[("META-INF/beans.xml", "<beans mine=\"yes\"/>")]);

    assert!(containers.deploy(&mut input.as_slice(), "Own.jar"));

    let created = runtime.last_created();
    assert_eq!(created.paths, vec!["META-INF/beans.xml"]);
    assert_eq!(
        created.content("META-INF/beans.xml"),
        Some(&b"<beans mine=\"yes\"/>"[..])
    );
}

#[test]
fn test_web_archive_classes_lifted_to_root() {
    let (containers, runtime, _dir) = deployer(tck_deployer::NoOverrides, DeployerConfig::default());
    let input = archive(&[
        ("WEB-INF/classes/org/tck/Foo.class", "cafebabe"),
        ("WEB-INF/web.xml", "<web-app/>"),
        ("index.html", "<html/>"),
    ]);

    assert!(containers.deploy(&mut input.as_slice(), "Web.war"));

    assert_eq!(
        runtime.last_created().paths,
        vec!["org/tck/Foo.class", "WEB-INF/web.xml", "index.html"]
    );
}

#[test]
fn test_class_path_archive_keeps_layout() {
    let (containers, runtime, _dir) = deployer(tck_deployer::NoOverrides, DeployerConfig::default());
    let input = archive(&[("WEB-INF/classes/org/tck/Foo.class", "cafebabe")]);

    assert!(containers.deploy(&mut input.as_slice(), "Lib.jar"));

    assert_eq!(
        runtime.last_created().paths,
        vec!["WEB-INF/classes/org/tck/Foo.class"]
    );
}

#[test]
fn test_web_override_matches_remapped_path() {
    let resolver = |_: &str| -> tck_deployer::DeployResult<ResourceOverrideMap> {
        Ok(ResourceOverrideMap::new().with("META-INF/beans.xml", BytesSource::new("<beans/>")))
    };
    let (containers, runtime, _dir) = deployer(resolver, DeployerConfig::default());
    let input = archive(&[("WEB-INF/classes/META-INF/beans.xml", "<old/>")]);

    assert!(containers.deploy(&mut input.as_slice(), "Web.war"));

    let created = runtime.last_created();
    assert_eq!(created.paths, vec!["META-INF/beans.xml"]);
    assert_eq!(created.content("META-INF/beans.xml"), Some(&b"<beans/>"[..]));
}

#[test]
fn test_remap_collision_rejected_before_runtime() {
    let (containers, runtime, _dir) = deployer(tck_deployer::NoOverrides, DeployerConfig::default());
    let input = archive(&[
        ("WEB-INF/classes/a.txt", "lifted"),
        ("a.txt", "root"),
    ]);

    assert!(!containers.deploy(&mut input.as_slice(), "Clash.war"));

    let exception = containers.deployment_exception().unwrap();
    assert!(matches!(exception.cause(), DeployError::DuplicateEntry(p) if p == "a.txt"));
    assert_eq!(runtime.events(), vec!["teardown"]);
}

#[test]
fn test_corrupt_archive_reported() {
    let (containers, runtime, _dir) = deployer(tck_deployer::NoOverrides, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);
    let truncated = &input[..300];

    assert!(!containers.deploy(&mut &truncated[..], "Broken.jar"));

    assert!(containers.deployment_exception().unwrap().cause().is_rewrite_failure());
    assert_eq!(runtime.events(), vec!["teardown"]);
}
