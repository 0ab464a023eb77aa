//! Aggregation properties over the bundled knowledge base

mod common;

use common::kb;
use rams::core::aggregate::{
    controls_for_activities, hazards_for_activities, permits_for_activities, ppe_for_activities,
    Aggregation,
};
use std::collections::BTreeSet;

fn as_set(items: &[String]) -> BTreeSet<&str> {
    items.iter().map(String::as_str).collect()
}

fn has_no_duplicates(items: &[String]) -> bool {
    as_set(items).len() == items.len()
}

// ============================================================================
// Worked example
// ============================================================================

#[test]
fn test_distribution_board_profile() {
    let kb = kb();
    let codes = ["distribution_board"];

    assert_eq!(
        hazards_for_activities(&kb, &codes),
        vec!["electric_shock_direct", "arc_flash", "electrical_fire"]
    );
    assert_eq!(
        controls_for_activities(&kb, &codes),
        vec![
            "dead_working",
            "isolation",
            "lockout_tagout",
            "competent_persons",
            "circuit_protection"
        ]
    );
    assert_eq!(
        ppe_for_activities(&kb, &codes),
        vec![
            "Safety boots",
            "Insulated gloves",
            "Arc-rated face shield",
            "Safety glasses"
        ]
    );
    assert_eq!(
        permits_for_activities(&kb, &codes),
        vec!["Permit to Work (Electrical)"]
    );
}

#[test]
fn test_multi_activity_first_seen_order() {
    let kb = kb();
    let agg = Aggregation::for_activities(&kb, &["distribution_board", "refurb_strip_out"]);

    insta::assert_snapshot!(agg.hazards.join("\n"), @r"
    electric_shock_direct
    arc_flash
    electrical_fire
    asbestos_exposure
    dust_inhalation
    cuts_sharp_edges
    slips_trips
    ");
    insta::assert_snapshot!(agg.ppe.join("\n"), @r"
    Safety boots
    Insulated gloves
    Arc-rated face shield
    Safety glasses
    Hard hat
    FFP3 dust mask
    Cut-resistant gloves
    ");
    assert_eq!(agg.permits, vec!["Permit to Work (Electrical)"]);
    assert!(agg.unresolved.is_empty());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_idempotent_and_duplicate_free() {
    let kb = kb();
    let codes = [
        "fault_finding",
        "cable_jointing",
        "hazardous_area_install",
        "testing_inspection",
    ];
    let first = Aggregation::for_activities(&kb, &codes);
    let second = Aggregation::for_activities(&kb, &codes);

    assert_eq!(first, second);
    assert!(has_no_duplicates(&first.hazards));
    assert!(has_no_duplicates(&first.controls));
    assert!(has_no_duplicates(&first.ppe));
    assert!(has_no_duplicates(&first.permits));
    // Three activities cite the electrical permit
    assert_eq!(
        first.permits,
        vec![
            "Permit to Work (Electrical)",
            "Live Working Justification",
            "Confined Space Entry Permit",
            "Hot Works Permit"
        ]
    );
}

#[test]
fn test_order_independent_as_sets() {
    let kb = kb();
    let forward = ["final_circuits", "cable_containment", "ev_charger_install"];
    let reversed = ["ev_charger_install", "cable_containment", "final_circuits"];
    let repeated = [
        "cable_containment",
        "final_circuits",
        "cable_containment",
        "ev_charger_install",
    ];

    let a = Aggregation::for_activities(&kb, &forward);
    for other in [&reversed[..], &repeated[..]] {
        let b = Aggregation::for_activities(&kb, other);
        assert_eq!(as_set(&a.hazards), as_set(&b.hazards));
        assert_eq!(as_set(&a.controls), as_set(&b.controls));
        assert_eq!(as_set(&a.ppe), as_set(&b.ppe));
        assert_eq!(as_set(&a.permits), as_set(&b.permits));
    }

    let b = Aggregation::for_activities(&kb, &reversed);
    assert_ne!(a.hazards, b.hazards, "list order follows selection order");
}

#[test]
fn test_monotonic_in_selection() {
    let kb = kb();
    let all: Vec<String> = kb.activities().iter().map(|a| a.code.clone()).collect();

    for n in 0..all.len() {
        let smaller = Aggregation::for_activities(&kb, &all[..n]);
        let larger = Aggregation::for_activities(&kb, &all[..=n]);
        assert!(as_set(&smaller.hazards).is_subset(&as_set(&larger.hazards)));
        assert!(as_set(&smaller.controls).is_subset(&as_set(&larger.controls)));
        assert!(as_set(&smaller.ppe).is_subset(&as_set(&larger.ppe)));
        assert!(as_set(&smaller.permits).is_subset(&as_set(&larger.permits)));
    }
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_empty_selection() {
    let kb = kb();
    let none: [&str; 0] = [];
    let agg = Aggregation::for_activities(&kb, &none);
    assert!(agg.is_empty());
    assert!(agg.unresolved.is_empty());
}

#[test]
fn test_unknown_codes_contribute_nothing() {
    let kb = kb();
    let with_unknown = Aggregation::for_activities(&kb, &["bogus", "swa_cable_pulling", "DATA_CABLE"]);
    let without = Aggregation::for_activities(&kb, &["swa_cable_pulling"]);

    assert_eq!(with_unknown.hazards, without.hazards);
    assert_eq!(with_unknown.controls, without.controls);
    assert_eq!(with_unknown.unresolved, vec!["bogus", "DATA_CABLE"]);
}

#[test]
fn test_activity_without_hazards_still_adds_ppe() {
    let kb = kb();
    let agg = Aggregation::for_activities(&kb, &["data_cable"]);
    assert!(agg.hazards.is_empty());
    assert!(agg.controls.is_empty());
    assert!(agg.permits.is_empty());
    assert_eq!(agg.ppe, vec!["Safety boots", "Hi-vis vest"]);
}

#[test]
fn test_inactive_activity_still_aggregates() {
    let kb = kb();
    let agg = Aggregation::for_activities(&kb, &["switchgear_retrofit"]);
    assert_eq!(agg.hazards, vec!["arc_flash", "electric_shock_direct"]);
    assert!(agg.unresolved.is_empty());
}
