//! Descriptor catalog driving real deployments

use super::*;
use tck_deployer::{Containers, DeployError, DescriptorCatalog};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn catalog_fixture() -> (DescriptorCatalog, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "res/org/tck/beans/ejb-jar.xml", "<ejb-jar/>");
    write(dir.path(), "res/org/tck/beans/custom-beans.xml", "<beans custom=\"1\"/>");
    write(dir.path(), "res/org/tck/beans/validation.xml", "<validation-config/>");
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"{
            "resource_root": "res",
            "artifacts": {
                "org.tck.beans.EjbTest": {
                    "ejb_jar": "ejb-jar.xml",
                    "resources": [
                        { "source": "custom-beans.xml", "destination": "WEB-INF/classes/META-INF/beans.xml" }
                    ]
                },
                "org.tck.beans.ValidatedTest": { "validation": "validation.xml" },
                "org.tck.beans.MissingTest": { "validation": "nowhere.xml" }
            }
        }"#,
    )
    .unwrap();
    (DescriptorCatalog::load(&catalog_path).unwrap(), dir)
}

#[test]
fn test_catalog_descriptors_land_in_archive() {
    let (catalog, _res) = catalog_fixture();
    let (containers, runtime, _dir) = deployer(catalog, DeployerConfig::default());
    let input = archive(&[
        ("WEB-INF/classes/org/tck/beans/EjbTest.class", "cafebabe"),
        ("WEB-INF/classes/META-INF/beans.xml", "<beans/>"),
    ]);

    assert!(containers.deploy(&mut input.as_slice(), "org.tck.beans.EjbTest.war"));

    let created = runtime.last_created();
    assert_eq!(
        created.paths,
        vec![
            "org/tck/beans/EjbTest.class",
            "META-INF/beans.xml",
            "META-INF/ejb-jar.xml",
        ]
    );
    assert_eq!(
        created.content("META-INF/beans.xml"),
        Some(&b"<beans custom=\"1\"/>"[..])
    );
    assert_eq!(created.content("META-INF/ejb-jar.xml"), Some(&b"<ejb-jar/>"[..]));
}

#[test]
fn test_catalog_validation_descriptor() {
    let (catalog, _res) = catalog_fixture();
    let (containers, runtime, _dir) = deployer(catalog, DeployerConfig::default());
    let input = archive(&[("org/tck/beans/ValidatedTest.class", "cafebabe")]);

    assert!(containers.deploy(&mut input.as_slice(), "org.tck.beans.ValidatedTest.jar"));

    assert_eq!(
        runtime.last_created().content("META-INF/validation.xml"),
        Some(&b"<validation-config/>"[..])
    );
}

#[test]
fn test_missing_validation_descriptor_aborts_deploy() {
    let (catalog, _res) = catalog_fixture();
    let (containers, runtime, _dir) = deployer(catalog, DeployerConfig::default());
    let input = archive(&[("org/tck/beans/MissingTest.class", "cafebabe")]);

    assert!(!containers.deploy(&mut input.as_slice(), "org.tck.beans.MissingTest.jar"));

    let exception = containers.deployment_exception().unwrap();
    assert!(matches!(
        exception.cause(),
        DeployError::ResourceResolution { path, .. } if path == "META-INF/validation.xml"
    ));
    assert_eq!(runtime.events(), vec!["teardown"]);
}

#[test]
fn test_artifact_outside_catalog_deploys_unchanged() {
    let (catalog, _res) = catalog_fixture();
    let (containers, runtime, _dir) = deployer(catalog, DeployerConfig::default());
    let input = archive(&[("a.txt", "1")]);

    assert!(containers.deploy(&mut input.as_slice(), "org.tck.other.PlainTest.jar"));

    assert_eq!(runtime.last_created().paths, vec!["a.txt"]);
}
