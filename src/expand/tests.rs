//! Tests for case expansion, pools and the expansion pipeline.

use crate::case::{Case, CaseProperty, CorrelationPath};
use crate::config::{Config, ConfigLibrary, ConfigProperty, ExpansionKind};
use crate::error::ExpansionError;
use crate::expand::{ExpansionPlan, PoolProperty, apply_pools, expand, expand_tree, split_pools};
use crate::tree::build_tree;
use std::collections::HashSet;

/// Rendered cases, sorted so comparisons ignore case order.
fn rendered(cases: &[Case]) -> Vec<String> {
    let mut out: Vec<String> = cases.iter().map(Case::to_string).collect();
    out.sort();
    out
}

fn expected(cases: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = cases.iter().map(|c| c.to_string()).collect();
    out.sort();
    out
}

fn device_library() -> ConfigLibrary {
    ConfigLibrary::new([
        Config::new("IPhoneX-Setup")
            .import("IMPORT.Accounts", ["TeamAccount-Setup"])
            .property("Platform", ["Ios"]),
        Config::new("SamsungS7-Setup")
            .import("IMPORT", ["JakesAccount-Setup"])
            .property("Platform", ["Android"]),
        Config::new("TeamAccount-Setup")
            .property("Username", ["Tom", "Bob"])
            .property("SeleniumHub", ["Saucelabs"]),
        Config::new("JakesAccount-Setup")
            .property("Username", ["Jake"])
            .property("SeleniumHub", ["LocalFarm"]),
        Config::new("SearchSites-Setup")
            .property("SiteName", ["google"])
            .property("Sid", ["23"]),
        Config::new("SocialSites-Setup")
            .property("SiteName", ["facebook", "twitter"])
            .property("Sid", ["41", "42", "43"]),
    ])
}

fn assert_correlation_holds(cases: &[Case]) {
    for case in cases {
        for a in case.properties().iter().filter(|p| !p.is_pool()) {
            for b in case.properties().iter().filter(|p| !p.is_pool()) {
                assert!(
                    !a.correlation_path.conflicts_with(&b.correlation_path),
                    "{} and {} disagree in {}",
                    a.name,
                    b.name,
                    case
                );
            }
        }
    }
}

// =========================================================================
// Cartesian expansion
// =========================================================================

#[test]
fn test_single_config_expands_its_values() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2"])
        .property("b", ["1"])
        .property("c", ["1"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(
        rendered(&cases),
        expected(&["p:a(1) p:b(1) p:c(1)", "p:a(2) p:b(1) p:c(1)"])
    );
}

#[test]
fn test_two_by_two_gives_four_cases() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2"])
        .property("b", ["1", "2"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(
        rendered(&cases),
        expected(&[
            "p:a(1) p:b(1)",
            "p:a(1) p:b(2)",
            "p:a(2) p:b(1)",
            "p:a(2) p:b(2)",
        ])
    );
}

#[test]
fn test_cases_follow_declaration_order() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2"])
        .property("b", ["x", "y"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();
    let order: Vec<String> = cases.iter().map(|c| c.to_grid(",")).collect();

    assert_eq!(order, ["1,x", "1,y", "2,x", "2,y"]);
}

#[test]
fn test_import_chain_multiplies_across_configs() {
    let library = ConfigLibrary::new([
        Config::new("Application").property("version", ["1.0", "1.5", "2.0", "3.0"]),
        Config::new("User")
            .import("IMPORT", ["Application"])
            .property("role", ["admin", "guest"]),
    ]);
    let config = Config::new("Session").import("IMPORT", ["User"]).property(
        "locale",
        ["en", "fr", "de", "es", "it", "nl", "pt", "pl", "sv"],
    );

    let cases = expand(&config, &library).unwrap();

    assert_eq!(cases.len(), 4 * 2 * 9);
}

#[test]
fn test_large_vehicle_fixture() {
    let library = ConfigLibrary::new([
        Config::new("Application").property("version", ["1.0", "1.5", "2.0"]),
        Config::new("User").import("IMPORT", ["Application"]).property(
            "user",
            ["alice", "bob", "cathy", "dave", "eve", "frank", "grant", "harry", "ivan"],
        ),
        Config::new("Vehicle")
            .import("IMPORT", ["User"])
            .property("make", ["Audi", "Bugatti", "Chrysler", "Dodge", "Ferrari"])
            .property("year", ["2012", "2013", "2014", "2015", "2016"])
            .property("condition", ["new", "used"])
            .property("type", ["convertible", "suv", "4x4", "hatchback", "sedan"])
            .property(
                "feature",
                ["airbags", "electric_windows", "seat_warmer", "adjustable_steering", "backwiper"],
            ),
    ]);
    let vehicle = library.resolve("Vehicle", "test").unwrap();

    let cases = expand(vehicle, &library).unwrap();

    assert_eq!(cases.len(), 33_750);
    let urls: HashSet<String> = cases
        .iter()
        .map(|t| {
            format!(
                "http://cars/{}/{}/{}?user={}&year={}&with={}&type={}",
                t.get("version").unwrap(),
                t.get("condition").unwrap(),
                t.get("make").unwrap(),
                t.get("user").unwrap(),
                t.get("year").unwrap(),
                t.get("feature").unwrap(),
                t.get("type").unwrap()
            )
        })
        .collect();
    assert!(urls.contains("http://cars/1.5/new/Dodge?user=harry&year=2013&with=adjustable_steering&type=4x4"));
    assert!(urls.contains("http://cars/2.0/used/Ferrari?user=cathy&year=2012&with=airbags&type=sedan"));
}

#[test]
fn test_device_and_site_sample() {
    let config = Config::new("TestConfig")
        .import("IMPORT.Devices", ["IPhoneX-Setup", "SamsungS7-Setup"])
        .import("IMPORT.SiteInfo", ["SearchSites-Setup", "SocialSites-Setup"]);

    let cases = expand(&config, &device_library()).unwrap();

    // (2 team users + Jake) x (1 search site + 2 x 3 social sites)
    assert_eq!(cases.len(), 3 * 7);
    for case in &cases {
        let hub = case.get("SeleniumHub").unwrap();
        match case.get("Platform").unwrap() {
            "Ios" => assert_eq!(hub, "Saucelabs"),
            "Android" => {
                assert_eq!(hub, "LocalFarm");
                assert_eq!(case.get("Username").unwrap(), "Jake");
            }
            other => panic!("unexpected platform {}", other),
        }
    }
}

#[test]
fn test_missing_property_lookup_fails() {
    let config = Config::new("TestConfig").property("a", ["1"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert!(matches!(
        cases[0].get("url"),
        Err(ExpansionError::PropertyNotFound(name)) if name == "url"
    ));
}

// =========================================================================
// Deduplication
// =========================================================================

#[test]
fn test_duplicate_values_are_deduplicated() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "1", "2"])
        .property("b", ["x"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(x)", "p:a(2) p:b(x)"]));
}

#[test]
fn test_structurally_identical_imports_are_deduplicated() {
    let library = ConfigLibrary::new([
        Config::new("One").property("a", ["1"]),
        Config::new("AlsoOne").property("a", ["1"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT", ["One", "AlsoOne"])
        .property("b", ["1", "2"]);

    let cases = expand(&config, &library).unwrap();
    let fingerprints: HashSet<String> = cases.iter().map(Case::fingerprint).collect();

    assert_eq!(cases.len(), 2);
    assert_eq!(fingerprints.len(), cases.len());
}

// =========================================================================
// Correlation
// =========================================================================

#[test]
fn test_correlation_within_a_config() {
    let config = Config::new("TestConfig")
        .correlated_property("a", ["1", "2"], "correlationKey")
        .correlated_property("b", ["1", "2"], "correlationKey");

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(1)", "p:a(2) p:b(2)"]));
    assert_correlation_holds(&cases);
}

#[test]
fn test_correlation_leaves_other_properties_free() {
    let config = Config::new("TestConfig")
        .correlated_property("a", ["1", "2"], "k")
        .correlated_property("b", ["1", "2"], "k")
        .property("c", ["x", "y", "z"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(cases.len(), 6);
    assert!(cases.iter().all(|c| c.get("a").unwrap() == c.get("b").unwrap()));
}

#[test]
fn test_correlation_with_imported_config() {
    let library = ConfigLibrary::new([
        Config::new("TestConfig1").correlated_property("a", ["1", "2"], "correlationKey")
    ]);
    let config = Config::new("TestConfig2")
        .import("IMPORT", ["TestConfig1"])
        .correlated_property("b", ["1", "2"], "correlationKey");

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(1)", "p:a(2) p:b(2)"]));
}

#[test]
fn test_correlation_across_composed_imports() {
    let library = ConfigLibrary::new([
        Config::new("TestConfig1").correlated_property("a", ["1", "2"], "correlationKey"),
        Config::new("TestConfig2").correlated_property("b", ["1", "2"], "correlationKey"),
    ]);
    // The root shares its name with a library config it imports.
    let config = Config::new("TestConfig2")
        .import("IMPORT", ["TestConfig1"])
        .import("IMPORT", ["TestConfig2"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(1)", "p:a(2) p:b(2)"]));
}

#[test]
fn test_correlated_import_pairs_with_field() {
    let library = ConfigLibrary::new([
        Config::new("Composition1").property("a", ["1"]),
        Config::new("Composition2").property("a", ["2"]),
    ]);
    let config = Config::new("Super")
        .with(
            ConfigProperty::import("IMPORT", ["Composition1", "Composition2"])
                .with_correlation("correlationKeyX"),
        )
        .correlated_property("c", ["1", "2"], "correlationKeyX");

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:c(1)", "p:a(2) p:c(2)"]));
    let a = cases[0].property("a").unwrap();
    assert_eq!(a.correlation_key, None);
    assert_eq!(a.correlation_path.index_for("correlationKeyX"), Some(0));
}

#[test]
fn test_correlated_import_branches_with_equal_values_both_survive() {
    let library = ConfigLibrary::new([
        Config::new("A").property("x", ["1"]),
        Config::new("B").property("x", ["1"]),
    ]);
    let config = Config::new("TestConfig")
        .with(ConfigProperty::import("IMPORT", ["A", "B"]).with_correlation("k"))
        .correlated_property("y", ["p", "q"], "k");

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:x(1) p:y(p)", "p:x(1) p:y(q)"]));
    assert_correlation_holds(&cases);
}

#[test]
fn test_equal_cases_from_correlated_branches_are_merged_at_the_end() {
    let library = ConfigLibrary::new([
        Config::new("A").property("x", ["1"]),
        Config::new("B").property("x", ["1"]),
    ]);
    let config = Config::new("TestConfig")
        .with(ConfigProperty::import("IMPORT", ["A", "B"]).with_correlation("k"))
        .property("y", ["p"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:x(1) p:y(p)"]));
}

#[test]
fn test_correlation_holds_for_every_case() {
    let library = ConfigLibrary::new([
        Config::new("Left")
            .correlated_property("x", ["1", "2", "3"], "k")
            .property("free", ["a", "b"]),
        Config::new("Right").correlated_property("y", ["1", "2", "3"], "k"),
    ]);
    let config = Config::new("Top")
        .import("IMPORT.Left", ["Left"])
        .import("IMPORT.Right", ["Right"])
        .correlated_property("z", ["1", "2", "3"], "k");

    let cases = expand(&config, &library).unwrap();

    assert_eq!(cases.len(), 3 * 2);
    assert_correlation_holds(&cases);
    for case in &cases {
        assert_eq!(case.get("x").unwrap(), case.get("y").unwrap());
        assert_eq!(case.get("y").unwrap(), case.get("z").unwrap());
    }
}

// =========================================================================
// Import precedence
// =========================================================================

#[test]
fn test_resolve_setup_single_default() {
    let library = ConfigLibrary::new([Config::new("D[1]").property("a", ["1"])]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]"])
        .property("b", ["1"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(1)"]));
}

#[test]
fn test_resolve_setup_import_alternatives() {
    let library = ConfigLibrary::new([
        Config::new("D[1]").property("a", ["1"]).property("c", ["1"]),
        Config::new("D[2]").property("m", ["1"]).property("n", ["1"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]", "D[2]"])
        .property("b", ["1"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(
        rendered(&cases),
        expected(&["p:a(1) p:b(1) p:c(1)", "p:b(1) p:m(1) p:n(1)"])
    );
}

#[test]
fn test_resolve_setup_alternatives_each_expanded() {
    let library = ConfigLibrary::new([
        Config::new("D[1]").property("a", ["T", "F"]),
        Config::new("D[2]").property("b", ["T", "F"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]", "D[2]"])
        .property("c", ["T", "F"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(
        rendered(&cases),
        expected(&[
            "p:a(T) p:c(T)",
            "p:a(T) p:c(F)",
            "p:a(F) p:c(T)",
            "p:a(F) p:c(F)",
            "p:b(T) p:c(T)",
            "p:b(T) p:c(F)",
            "p:b(F) p:c(T)",
            "p:b(F) p:c(F)",
        ])
    );
}

#[test]
fn test_later_import_overrides_earlier() {
    let library = ConfigLibrary::new([
        Config::new("D[1]").property("a", ["1"]).property("b", ["1"]),
        Config::new("D[2]").property("a", ["2"]).property("c", ["1"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]"])
        .import("IMPORT.DefaultSetup2", ["D[2]"])
        .property("d", ["1"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(2) p:b(1) p:c(1) p:d(1)"]));
}

#[test]
fn test_later_import_overrides_expanded_values() {
    let library = ConfigLibrary::new([
        Config::new("D[1]")
            .property("a", ["1", "2", "3"])
            .property("b", ["1"]),
        Config::new("D[2]").property("a", ["4", "5"]).property("c", ["1"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]"])
        .import("IMPORT.DefaultSetup2", ["D[2]"])
        .property("d", ["1"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(
        rendered(&cases),
        expected(&["p:a(4) p:b(1) p:c(1) p:d(1)", "p:a(5) p:b(1) p:c(1) p:d(1)"])
    );
}

#[test]
fn test_nested_import_priority() {
    let library = ConfigLibrary::new([
        Config::new("D[1]").property("a", ["1"]),
        Config::new("D[2]").property("a", ["2"]),
        Config::new("D[3]")
            .import("IMPORT.DefaultSetup", ["D[2]"])
            .property("a", ["3"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]"])
        .import("IMPORT.DefaultSetup2", ["D[3]"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(3)"]));
}

#[test]
fn test_nested_import_priority_with_expansions() {
    let library = ConfigLibrary::new([
        Config::new("D[1]").property("a", ["1"]),
        Config::new("D[2]").property("a", ["2.1", "2.2"]),
        Config::new("D[3]").import("IMPORT.DefaultSetup", ["D[2]"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[1]"])
        .import("IMPORT.DefaultSetup2", ["D[3]"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(2.1)", "p:a(2.2)"]));
}

#[test]
fn test_nested_import_priority_reversed() {
    let library = ConfigLibrary::new([
        Config::new("D[1]").property("a", ["1"]),
        Config::new("D[2]").property("a", ["2.1", "2.2"]),
        Config::new("D[3]").import("IMPORT.DefaultSetup", ["D[2]"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.DefaultSetup", ["D[3]"])
        .import("IMPORT.DefaultSetup2", ["D[1]"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1)"]));
}

#[test]
fn test_top_level_property_overrides_import() {
    let library = ConfigLibrary::new([Config::new("Defaults")
        .property("browser", ["chrome", "firefox"])
        .property("timeout", ["30"])]);
    let config = Config::new("TestConfig")
        .import("IMPORT", ["Defaults"])
        .property("timeout", ["5"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(cases.len(), 2);
    assert!(cases.iter().all(|c| c.get("timeout").unwrap() == "5"));
}

// =========================================================================
// Empty configs
// =========================================================================

#[test]
fn test_empty_config_gives_no_cases() {
    let cases = expand(&Config::new("Empty"), &ConfigLibrary::default()).unwrap();

    assert!(cases.is_empty());
}

#[test]
fn test_empty_import_contributes_nothing() {
    let library = ConfigLibrary::new([Config::new("Nothing")]);
    let config = Config::new("TestConfig")
        .import("IMPORT", ["Nothing"])
        .property("b", ["1", "2"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:b(1)", "p:b(2)"]));
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn test_missing_import_fails() {
    let config = Config::new("TestConfig")
        .import("IMPORT", ["Nowhere"])
        .property("b", ["1"]);

    let err = expand(&config, &ConfigLibrary::default()).unwrap_err();

    assert_eq!(
        err,
        ExpansionError::Resolution {
            config: "Nowhere".to_string(),
            referenced_by: "TestConfig".to_string(),
        }
    );
}

#[test]
fn test_duplicate_import_target_fails() {
    let library = ConfigLibrary::new([
        Config::new("Twice").property("a", ["1"]),
        Config::new("Twice").property("a", ["2"]),
    ]);
    let config = Config::new("TestConfig").import("IMPORT", ["Twice"]);

    let err = expand(&config, &library).unwrap_err();

    assert!(matches!(
        err,
        ExpansionError::AmbiguousReference { ref config, count: 2 } if config == "Twice"
    ));
}

#[test]
fn test_empty_property_fails() {
    let config = Config::new("TestConfig")
        .property("a", ["1"])
        .property("b", Vec::<String>::new());

    let err = expand(&config, &ConfigLibrary::default()).unwrap_err();

    match err {
        ExpansionError::Structural { config, reason } => {
            assert_eq!(config, "TestConfig");
            assert!(reason.contains("'b'"));
        }
        other => panic!("expected structural error, got {:?}", other),
    }
}

#[test]
fn test_import_cycle_fails() {
    let library = ConfigLibrary::new([
        Config::new("A").import("IMPORT", ["B"]),
        Config::new("B").import("IMPORT", ["A"]),
    ]);
    let config = Config::new("Top").import("IMPORT", ["A"]);

    let err = expand(&config, &library).unwrap_err();

    assert_eq!(err.exit_code(), crate::exit_codes::STRUCTURE_FAILURE);
}

// =========================================================================
// Pools
// =========================================================================

#[test]
fn test_pool_with_matching_length_pairs_values() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2"])
        .pool_property("b", ["1", "2"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(1)", "p:a(2) p:b(2)"]));
}

#[test]
fn test_pool_values_are_recycled_in_order() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2", "3", "4"])
        .pool_property("b", ["1", "2"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();
    let order: Vec<String> = cases.iter().map(Case::to_string).collect();

    assert_eq!(
        order,
        ["p:a(1) p:b(1)", "p:a(2) p:b(2)", "p:a(3) p:b(1)", "p:a(4) p:b(2)"]
    );
}

#[test]
fn test_pool_buried_in_import() {
    let library = ConfigLibrary::new([Config::new("TestConfig1").pool_property("b", ["1", "2"])]);
    let config = Config::new("TestConfig2")
        .import("IMPORT", ["TestConfig1"])
        .property("a", ["1", "2", "3", "4"]);

    let cases = expand(&config, &library).unwrap();

    assert_eq!(
        rendered(&cases),
        expected(&["p:a(1) p:b(1)", "p:a(2) p:b(2)", "p:a(3) p:b(1)", "p:a(4) p:b(2)"])
    );
}

#[test]
fn test_extra_pool_values_are_dropped() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2"])
        .pool_property("b", ["1", "2", "3", "4"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(rendered(&cases), expected(&["p:a(1) p:b(1)", "p:a(2) p:b(2)"]));
}

#[test]
fn test_pool_does_not_multiply_case_count() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2", "3"])
        .property("c", ["x", "y"])
        .pool_property("tag", ["t1", "t2", "t3", "t4", "t5"]);

    let plan = ExpansionPlan::prepare(&config, &ConfigLibrary::default()).unwrap();

    assert_eq!(plan.tree().unwrap().case_count_upper_bound(), 6);
    assert_eq!(plan.expand().unwrap().len(), 6);
}

#[test]
fn test_pools_sharing_a_key_move_together() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2", "3"])
        .with(ConfigProperty::literal("user", ["alice", "bob"]).pooled().with_correlation("login"))
        .with(ConfigProperty::literal("password", ["pa", "pb"]).pooled().with_correlation("login"));

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();
    let pairs: Vec<(&str, &str)> = cases
        .iter()
        .map(|c| (c.get("user").unwrap(), c.get("password").unwrap()))
        .collect();

    assert_eq!(pairs, [("alice", "pa"), ("bob", "pb"), ("alice", "pa")]);
}

#[test]
fn test_independent_pools_keep_their_own_counters() {
    let config = Config::new("TestConfig")
        .property("a", ["1", "2", "3"])
        .pool_property("b", ["x", "y"])
        .pool_property("c", ["p", "q", "r"]);

    let cases = expand(&config, &ConfigLibrary::default()).unwrap();
    let grid: Vec<String> = cases.iter().map(|c| c.to_grid(",")).collect();

    assert_eq!(grid, ["1,x,p", "2,y,q", "3,x,r"]);
}

#[test]
fn test_pool_overridden_by_later_property_is_not_assigned() {
    let library = ConfigLibrary::new([Config::new("Tags").pool_property("tag", ["t1", "t2"])]);
    let config = Config::new("TestConfig")
        .import("IMPORT", ["Tags"])
        .property("a", ["1", "2"])
        .property("tag", ["fixed"]);

    let cases = expand(&config, &library).unwrap();

    assert!(cases.iter().all(|c| c.get("tag").unwrap() == "fixed"));
}

#[test]
fn test_top_level_pool_overrides_imported_pool_on_same_key() {
    let library = ConfigLibrary::new([Config::new("Tags").with(
        ConfigProperty::literal("tag", ["i1", "i2"])
            .pooled()
            .with_correlation("k"),
    )]);
    let config = Config::new("TestConfig")
        .import("IMPORT", ["Tags"])
        .property("a", ["1", "2"])
        .with(
            ConfigProperty::literal("tag", ["r1", "r2"])
                .pooled()
                .with_correlation("k"),
        );

    let cases = expand(&config, &library).unwrap();
    let tags: Vec<&str> = cases.iter().map(|c| c.get("tag").unwrap()).collect();

    assert_eq!(tags, ["r1", "r2"]);
}

#[test]
fn test_later_import_pool_overrides_earlier_on_same_key() {
    let library = ConfigLibrary::new([
        Config::new("First").with(ConfigProperty::literal("tag", ["f1", "f2"]).pooled().with_correlation("k")),
        Config::new("Second").with(ConfigProperty::literal("tag", ["s1", "s2"]).pooled().with_correlation("k")),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT.First", ["First"])
        .import("IMPORT.Second", ["Second"])
        .property("a", ["1", "2", "3"]);

    let cases = expand(&config, &library).unwrap();
    let tags: Vec<&str> = cases.iter().map(|c| c.get("tag").unwrap()).collect();

    assert_eq!(tags, ["s1", "s2", "s1"]);
}

#[test]
fn test_empty_pool_fails() {
    let config = Config::new("TestConfig").pool_property("b", Vec::<String>::new());

    let err = expand(&config, &ConfigLibrary::default()).unwrap_err();

    assert!(matches!(err, ExpansionError::Structural { .. }));
}

#[test]
fn test_pool_import_fails() {
    let library = ConfigLibrary::new([Config::new("Other").property("a", ["1"])]);
    let config = Config::new("TestConfig").with(ConfigProperty::import("IMPORT", ["Other"]).pooled());

    let err = expand(&config, &library).unwrap_err();

    match err {
        ExpansionError::Structural { reason, .. } => assert!(reason.contains("cannot import")),
        other => panic!("expected structural error, got {:?}", other),
    }
}

#[test]
fn test_split_pools_leaves_placeholder_in_place() {
    let config = Config::new("TestConfig")
        .pool_property("b", ["1", "2"])
        .property("a", ["x"]);

    let (processed, pools) = split_pools(&config).unwrap();

    assert_eq!(processed.properties[0].name, "b");
    assert_eq!(processed.properties[0].values, ["1"]);
    assert_eq!(processed.properties[0].expansion, ExpansionKind::Pool);
    assert_eq!(
        processed.properties[0].correlation_key.as_deref(),
        Some("pool:TestConfig/b#0")
    );
    assert_eq!(processed.properties[1], config.properties[1]);
    assert_eq!(
        pools,
        [PoolProperty {
            name: "b".to_string(),
            values: vec!["1".to_string(), "2".to_string()],
            correlation_key: "pool:TestConfig/b#0".to_string(),
            config: "TestConfig".to_string(),
            index: 0,
        }]
    );
}

#[test]
fn test_apply_pools_injects_into_correlated_case() {
    let mut keyed = CaseProperty::new("a", "1");
    keyed.correlation_key = Some("login".to_string());
    keyed.correlation_path = CorrelationPath::new().child("login", 0);
    let cases = vec![Case::single(keyed), Case::single(CaseProperty::new("a", "2"))];
    let pools = [PoolProperty {
        name: "user".to_string(),
        values: vec!["alice".to_string()],
        correlation_key: "login".to_string(),
        config: "Accounts".to_string(),
        index: 0,
    }];

    let cases = apply_pools(cases, &pools);

    let user = cases[0].property("user").unwrap();
    assert_eq!(user.value, "alice");
    assert!(user.is_pool());
    assert_eq!(user.origin_config_path, ["Accounts"]);
    assert!(!cases[1].contains("user"));
}

// =========================================================================
// Traceability
// =========================================================================

#[test]
fn test_case_properties_record_their_origin() {
    let library = ConfigLibrary::new([Config::new("TestConfig1").property("a", ["1", "2"])]);
    let config = Config::new("TestConfig2")
        .import("IMPORT", ["TestConfig1"])
        .property("b", ["x"]);

    let cases = expand(&config, &library).unwrap();
    let a = cases[1].property("a").unwrap();
    let b = cases[1].property("b").unwrap();

    assert_eq!(a.origin_path, ":TestConfig2/IMPORT:TestConfig1/a:2");
    assert_eq!(a.origin_config_path, ["TestConfig2", "TestConfig1"]);
    assert_eq!(a.property_index, 0);
    assert_eq!(a.value_index, 1);
    assert_eq!(b.origin_path, ":TestConfig2/b:x");
    assert_eq!(b.property_index, 1);
}

#[test]
fn test_expand_tree_matches_pipeline_without_pools() {
    let config = Config::new("TestConfig")
        .import("IMPORT.Devices", ["IPhoneX-Setup", "SamsungS7-Setup"])
        .property("Browser", ["chrome", "edge"]);
    let library = device_library();

    let tree = build_tree(&config, &library).unwrap();
    let direct = expand_tree(&tree).unwrap();
    let piped = expand(&config, &library).unwrap();

    assert_eq!(rendered(&direct), rendered(&piped));
}

#[test]
fn test_plan_only_keeps_reachable_pools() {
    let library = ConfigLibrary::new([
        Config::new("Used").pool_property("tag", ["t1"]),
        Config::new("Unused").pool_property("other", ["o1"]),
    ]);
    let config = Config::new("TestConfig")
        .import("IMPORT", ["Used"])
        .property("a", ["1"]);

    let plan = ExpansionPlan::prepare(&config, &library).unwrap();

    assert_eq!(plan.pools().len(), 1);
    assert_eq!(plan.pools()[0].name, "tag");
}
