use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use super::*;

trait Settings: Send + Sync {
    fn datasource_settings(&self) -> String;
}

struct Fixed(&'static str);

impl Settings for Fixed {
    fn datasource_settings(&self) -> String {
        self.0.to_owned()
    }
}

fn fixed(name: &'static str, profiles: &[&'static str]) -> Candidate<dyn Settings> {
    let value = name;
    Candidate::<dyn Settings>::singleton(name, profiles.to_vec(), move || Arc::new(Fixed(value)))
}

/// dev/default, prod, qa and uat candidates for "datasource"
fn environments() -> Registry<&'static str> {
    let mut builder = RegistryBuilder::new();
    builder
        .register("datasource", fixed("dev", &["dev", "default"]))
        .and_then(|b| b.register("datasource", fixed("prod", &["prod"])))
        .and_then(|b| b.register("datasource", fixed("qa", &["qa"])))
        .and_then(|b| b.register("datasource", fixed("uat", &["uat"])))
        .unwrap();
    builder.build()
}

#[test]
fn dev_and_default_selects_dev() -> Result<(), WiringError> {
    let registry = environments();
    let active = ActiveProfiles::new(["dev", "default"]);

    let settings: Arc<dyn Settings> = registry.resolve("datasource", &active)?;
    assert_eq!(settings.datasource_settings(), "dev");
    Ok(())
}

#[test]
fn prod_selects_prod() -> Result<(), WiringError> {
    let registry = environments();
    let settings: Arc<dyn Settings> = registry.resolve("datasource", &ActiveProfiles::new(["prod"]))?;
    assert_eq!(settings.datasource_settings(), "prod");
    Ok(())
}

#[test]
fn unknown_environment_is_unresolved() {
    let registry = environments();
    let result = registry.resolve::<dyn Settings>("datasource", &ActiveProfiles::new(["staging"]));
    assert_eq!(
        result.err(),
        Some(WiringError::UnresolvedDependency {
            name: "datasource".to_owned(),
            active: "[staging]".to_owned(),
        })
    );
}

#[test]
fn unregistered_name_or_capability_is_unresolved() {
    let registry = environments();
    let active = ActiveProfiles::new(["dev"]);

    assert!(matches!(
        registry.resolve::<dyn Settings>("cache", &active),
        Err(WiringError::UnresolvedDependency { .. })
    ));
    assert!(matches!(
        registry.resolve::<String>("datasource", &active),
        Err(WiringError::UnresolvedDependency { .. })
    ));
}

// Disable clippy lint on the comparison of fat pointers:
// this is only test code, comparing the data pointers is enough here
#[allow(clippy::vtable_address_comparisons)]
#[test]
fn resolution_is_idempotent() -> Result<(), WiringError> {
    let registry = environments();
    let active = ActiveProfiles::new(["uat"]);

    let v1: Arc<dyn Settings> = registry.resolve("datasource", &active)?;
    let v2: Arc<dyn Settings> = registry.resolve("datasource", &active)?;
    assert!(Arc::ptr_eq(&v1, &v2));
    assert_eq!(v1.datasource_settings(), v2.datasource_settings());
    Ok(())
}

#[allow(clippy::vtable_address_comparisons)]
#[test]
fn prototypes_are_rebuilt() -> Result<(), WiringError> {
    let mut builder = RegistryBuilder::new();
    builder.register(
        "datasource",
        Candidate::<dyn Settings>::prototype("fresh", ["dev"], || Arc::new(Fixed("fresh"))),
    )?;
    let registry = builder.build();
    let active = ActiveProfiles::new(["dev"]);

    let v1: Arc<dyn Settings> = registry.resolve("datasource", &active)?;
    let v2: Arc<dyn Settings> = registry.resolve("datasource", &active)?;
    assert!(!Arc::ptr_eq(&v1, &v2));
    assert_eq!(v1.datasource_settings(), v2.datasource_settings());
    assert_eq!(registry.candidates::<dyn Settings>("datasource")[0].scope(), Scope::Prototype);
    Ok(())
}

#[test]
fn specific_label_wins_over_fallback() -> Result<(), WiringError> {
    let mut builder = RegistryBuilder::new();
    builder
        .register("datasource", fixed("embedded", &["default"]))?
        .register("datasource", fixed("dev", &["dev"]))?;
    let registry = builder.build();

    let with_dev: Arc<dyn Settings> = registry.resolve("datasource", &ActiveProfiles::new(["dev", "default"]))?;
    assert_eq!(with_dev.datasource_settings(), "dev");

    let fallback_only: Arc<dyn Settings> = registry.resolve("datasource", &ActiveProfiles::default())?;
    assert_eq!(fallback_only.datasource_settings(), "embedded");
    Ok(())
}

#[test]
fn ties_are_ambiguous() -> Result<(), WiringError> {
    let mut builder = RegistryBuilder::new();
    builder
        .register("datasource", fixed("first", &["default"]))?
        .register("datasource", fixed("second", &["default", "test"]))?
        .register("datasource", fixed("third", &["qa"]))?
        .register("datasource", fixed("fourth", &["qa", "uat"]))?;
    let registry = builder.build();

    let fallback_tie = registry.resolve::<dyn Settings>("datasource", &ActiveProfiles::default());
    assert_eq!(
        fallback_tie.err(),
        Some(WiringError::AmbiguousDependency {
            name: "datasource".to_owned(),
            active: "[default]".to_owned(),
            candidates: vec!["first".to_owned(), "second".to_owned()],
        })
    );

    // the fallback candidates are out of the tie once a specific label matches
    let specific_tie = registry.resolve::<dyn Settings>("datasource", &ActiveProfiles::new(["qa", "default"]));
    assert_eq!(
        specific_tie.err(),
        Some(WiringError::AmbiguousDependency {
            name: "datasource".to_owned(),
            active: "[default, qa]".to_owned(),
            candidates: vec!["third".to_owned(), "fourth".to_owned()],
        })
    );
    Ok(())
}

#[test]
fn qualified_resolution() -> Result<(), WiringError> {
    let registry = environments();
    let active = ActiveProfiles::new(["qa"]);

    let qa: Arc<dyn Settings> = registry.resolve_qualified("datasource", "qa", &active)?;
    assert_eq!(qa.datasource_settings(), "qa");

    assert_eq!(
        registry.resolve_qualified::<dyn Settings>("datasource", "prod", &active).err(),
        Some(WiringError::UnresolvedDependency {
            name: "datasource".to_owned(),
            active: "[qa]".to_owned(),
        })
    );
    assert_eq!(
        registry.resolve_qualified::<dyn Settings>("datasource", "mock", &active).err(),
        Some(WiringError::UnknownQualifier {
            name: "datasource".to_owned(),
            qualifier: "mock".to_owned(),
        })
    );
    Ok(())
}

#[test]
fn qualifier_breaks_ties() -> Result<(), WiringError> {
    let registry = environments();
    let active = ActiveProfiles::new(["qa", "uat"]);

    assert!(matches!(
        registry.resolve::<dyn Settings>("datasource", &active),
        Err(WiringError::AmbiguousDependency { .. })
    ));
    let uat: Arc<dyn Settings> = registry.resolve_qualified("datasource", "uat", &active)?;
    assert_eq!(uat.datasource_settings(), "uat");
    Ok(())
}

#[test]
fn registration_errors() {
    let mut builder = RegistryBuilder::new();
    assert_eq!(
        builder.register("datasource", fixed("unlabeled", &[" "])).err(),
        Some(WiringError::MissingProfile {
            name: "datasource".to_owned(),
            candidate: "unlabeled".to_owned(),
        })
    );

    assert!(builder.register("datasource", fixed("dev", &["dev"])).is_ok());
    assert_eq!(
        builder.register("datasource", fixed("dev", &["qa"])).err(),
        Some(WiringError::DuplicateCandidate {
            name: "datasource".to_owned(),
            candidate: "dev".to_owned(),
        })
    );

    let registry = builder.build();
    let names: Vec<&str> = registry
        .candidates::<dyn Settings>("datasource")
        .iter()
        .map(|c| c.name())
        .collect();
    assert_eq!(names, vec!["dev"]);
}

#[test]
fn capabilities_are_kept_apart() -> Result<(), WiringError> {
    let mut builder = environments_builder();
    builder.register(
        "datasource",
        Candidate::<String>::singleton("url", ["dev"], || Arc::new("sqlite::memory:".to_owned())),
    )?;
    let registry = builder.build();
    let active = ActiveProfiles::new(["dev"]);

    let url: Arc<String> = registry.resolve("datasource", &active)?;
    let settings: Arc<dyn Settings> = registry.resolve("datasource", &active)?;
    assert_eq!(url.as_str(), "sqlite::memory:");
    assert_eq!(settings.datasource_settings(), "dev");
    assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["datasource"]);
    Ok(())
}

fn environments_builder() -> RegistryBuilder<&'static str> {
    let mut builder = RegistryBuilder::new();
    builder
        .register("datasource", fixed("dev", &["dev", "default"]))
        .and_then(|b| b.register("datasource", fixed("prod", &["prod"])))
        .unwrap();
    builder
}

#[test]
fn context_fails_fast() {
    let result = ApplicationContext::start(environments(), ActiveProfiles::new(["staging"]));
    assert!(matches!(
        result.err(),
        Some(WiringError::UnresolvedDependency { name, .. }) if name == "datasource"
    ));
}

#[test]
fn context_injects_into_constructors() -> Result<(), WiringError> {
    struct Faux {
        settings: Arc<dyn Settings>,
    }

    let ctx = ApplicationContext::start(environments(), ActiveProfiles::parse("prod"))?;
    let faux = ctx.inject_and_call("datasource", |settings: Arc<dyn Settings>| Faux { settings })?;
    assert_eq!(faux.settings.datasource_settings(), "prod");
    assert_eq!(ctx.active_profiles().to_string(), "[prod]");

    let qualified: Arc<dyn Settings> = ctx.inject_qualified("datasource", "prod")?;
    assert_eq!(qualified.datasource_settings(), "prod");
    assert_eq!(ctx.registry().candidates::<dyn Settings>("datasource").len(), 4);
    Ok(())
}

#[allow(clippy::vtable_address_comparisons)]
#[test]
fn start_builds_nothing() -> Result<(), WiringError> {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let mut builder = RegistryBuilder::new();
    builder.register(
        "datasource",
        Candidate::<dyn Settings>::singleton("dev", ["dev"], move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(Fixed("dev"))
        }),
    )?;

    let ctx = ApplicationContext::start(builder.build(), ActiveProfiles::new(["dev"]))?;
    assert_eq!(built.load(Ordering::SeqCst), 0);

    let v1: Arc<dyn Settings> = ctx.inject("datasource")?;
    let v2: Arc<dyn Settings> = ctx.inject("datasource")?;
    assert!(Arc::ptr_eq(&v1, &v2));
    assert_eq!(built.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn registration_macro() -> Result<(), WiringError> {
    #[derive(Default)]
    struct Dev;
    impl Settings for Dev {
        fn datasource_settings(&self) -> String {
            "dev".to_owned()
        }
    }
    #[derive(Default)]
    struct Prod;
    impl Settings for Prod {
        fn datasource_settings(&self) -> String {
            "prod".to_owned()
        }
    }

    let mut builder = RegistryBuilder::new();
    crate::register_candidates!(&mut builder, "datasource" => dyn Settings {
        "dev" ["dev", "default"] => Dev::default,
        "prod" ["prod"] => Prod::default,
    })?;
    let registry = builder.build();

    let names: Vec<&str> = registry
        .candidates::<dyn Settings>("datasource")
        .iter()
        .map(|c| c.name())
        .collect();
    assert_eq!(names, vec!["dev", "prod"]);
    let dev_labels: Vec<&str> = registry.candidates::<dyn Settings>("datasource")[0]
        .profiles()
        .map(Profile::as_str)
        .collect();
    assert_eq!(dev_labels, vec!["default", "dev"]);
    let dev: Arc<dyn Settings> = registry.resolve("datasource", &ActiveProfiles::default())?;
    assert_eq!(dev.datasource_settings(), "dev");
    Ok(())
}

const LABELS: [&str; 5] = ["dev", "qa", "uat", "prod", "staging"];

proptest! {
    // A single intersecting candidate is always the one returned
    #[test]
    fn single_match_is_returned(
        target in 0usize..4,
        extra in proptest::collection::vec(0usize..LABELS.len(), 0..3),
    ) {
        let registry = environments();
        let expected = ["dev", "prod", "qa", "uat"][target];
        let mut labels = vec![expected];
        labels.extend(extra.iter().map(|i| LABELS[*i]).filter(|l| *l == expected || *l == "staging"));
        let active = ActiveProfiles::new(labels);

        let settings: Arc<dyn Settings> = registry.resolve("datasource", &active).unwrap();
        prop_assert_eq!(settings.datasource_settings(), expected);
    }

    #[test]
    fn no_intersection_is_unresolved(labels in proptest::collection::vec("zz[a-z]{4,8}", 1..4)) {
        let registry = environments();
        let active = ActiveProfiles::new(labels.iter().map(String::as_str));
        let result = registry.resolve::<dyn Settings>("datasource", &active);
        prop_assert!(
            matches!(result, Err(WiringError::UnresolvedDependency { .. })),
            "expected unresolved for {}",
            active
        );
    }
}
