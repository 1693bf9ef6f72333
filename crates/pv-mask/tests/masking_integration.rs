//! Integration tests for pv-mask.
//!
//! These tests verify:
//! - Masked documents round-trip back to their original values
//! - Label reuse is deterministic within a session and scoped per prefix
//! - Known keys are inert and unknown keys fail safe
//! - Vault snapshots carry a session's labels across processes

use pv_mask::{MaskPolicy, MaskingEngine, TokenVault, VaultSnapshot};
use serde_json::{json, Value};

/// A resolved-entity report in the shape the upstream engine exports.
fn entity_report() -> Value {
    json!({
        "RESOLVED_ENTITY": {
            "ENTITY_ID": 1,
            "ENTITY_NAME": "Robert Smith",
            "IDENTIFIER_DATA": ["EMAIL: bsmith@work.com"],
            "ADDRESS_DATA": ["HOME: 1515 Adela Ln Las Vegas NV 89132"]
        }
    })
}

// ============================================================================
// Round-Trip Tests
// ============================================================================

#[test]
fn test_entity_report_masks_to_expected_document() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let masked = engine.mask(&entity_report()).unwrap();

    assert_eq!(
        masked,
        json!({
            "RESOLVED_ENTITY": {
                "ENTITY_ID": 1,
                "ENTITY_NAME": "ENTITY_NAME_1",
                "IDENTIFIER_DATA": ["EMAIL: EMAIL_1"],
                "ADDRESS_DATA": ["HOME: HOME_1"]
            }
        })
    );
}

#[test]
fn test_rendered_masked_report_unmasks_to_original_text() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let original = entity_report();
    let masked = engine.mask(&original).unwrap();

    let masked_text = serde_json::to_string_pretty(&masked).unwrap();
    let restored = engine.unmask(&masked_text).unwrap();

    assert_eq!(restored, serde_json::to_string_pretty(&original).unwrap());
}

#[test]
fn test_unmask_applies_to_prose_not_just_json() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    engine.mask(&entity_report()).unwrap();

    let summary = "ENTITY_NAME_1 can be reached at EMAIL_1 or at HOME_1.";
    assert_eq!(
        engine.unmask(summary).unwrap(),
        "Robert Smith can be reached at bsmith@work.com \
         or at 1515 Adela Ln Las Vegas NV 89132."
    );
}

// ============================================================================
// Reuse and Prefix Scoping Tests
// ============================================================================

#[test]
fn test_repeated_value_reuses_label_across_documents() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());

    let first = engine
        .mask(&json!(["HOME: 1515 Adela Ln Las Vegas NV 89132"]))
        .unwrap();
    let second = engine
        .mask(&json!(["HOME: 1515 Adela Ln Las Vegas NV 89132"]))
        .unwrap();

    assert_eq!(first, json!(["HOME: HOME_1"]));
    assert_eq!(second, json!(["HOME: HOME_1"]));
    assert_eq!(engine.vault().len().unwrap(), 1);
}

#[test]
fn test_distinct_values_get_strictly_increasing_labels() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let masked = engine
        .mask(&json!([
            {"EMAIL": "a@b.com"},
            {"EMAIL": "c@d.com"},
            {"EMAIL": "a@b.com"}
        ]))
        .unwrap();

    assert_eq!(
        masked,
        json!([{"EMAIL": "EMAIL_1"}, {"EMAIL": "EMAIL_2"}, {"EMAIL": "EMAIL_1"}])
    );
}

#[test]
fn test_identical_values_under_different_keys_never_share_labels() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let masked = engine
        .mask(&json!({"EMAIL": "shared", "MOBILE": "shared"}))
        .unwrap();

    assert_eq!(masked, json!({"EMAIL": "EMAIL_1", "MOBILE": "MOBILE_1"}));

    // Each label recovers the value through its own prefix.
    assert_eq!(engine.unmask("EMAIL_1/MOBILE_1").unwrap(), "shared/shared");
}

#[test]
fn test_prefix_scoping_survives_proper_prefix_collision() {
    let mut policy = MaskPolicy::default();
    policy.mask_key("HOMETOWN");
    let mut engine = MaskingEngine::new(policy);

    let masked = engine
        .mask(&json!({"HOMETOWN": "Las Vegas", "HOME": "Las Vegas"}))
        .unwrap();

    // HOME must not reuse HOMETOWN_1 even though the values match and
    // the label text starts with "HOME".
    assert_eq!(
        masked,
        json!({"HOMETOWN": "HOMETOWN_1", "HOME": "HOME_1"})
    );
}

#[test]
fn test_masking_is_deterministic_within_a_session() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let doc = entity_report();

    let first = engine.mask(&doc).unwrap();
    let second = engine.mask(&doc).unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Classification Behavior Tests
// ============================================================================

#[test]
fn test_known_keys_are_inert() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let doc = json!({
        "MATCH_LEVEL": 3,
        "STATUS": "possibly related",
        "ENTITY_ID": 100002
    });

    assert_eq!(engine.mask(&doc).unwrap(), doc);
    assert!(engine.vault().is_empty().unwrap());
}

#[test]
fn test_unknown_key_is_masked_like_pii() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let masked = engine.mask(&json!({"FOO": "bar"})).unwrap();

    assert_eq!(masked, json!({"FOO": "FOO_1"}));
    assert_eq!(engine.unmask("FOO_1").unwrap(), "bar");
}

#[test]
fn test_policy_extension_changes_classification() {
    let mut policy = MaskPolicy::default();
    policy.allow_key("FOO");
    let mut engine = MaskingEngine::new(policy);

    assert_eq!(engine.mask(&json!({"FOO": "bar"})).unwrap(), json!({"FOO": "bar"}));
}

#[test]
fn test_unregistered_label_survives_unmask() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    engine.mask(&json!({"EMAIL": "a@b.com"})).unwrap();

    let text = "decoy UNKNOWN_9 next to EMAIL_1";
    assert_eq!(
        engine.unmask(text).unwrap(),
        "decoy UNKNOWN_9 next to a@b.com"
    );
}

// ============================================================================
// Snapshot Persistence Tests
// ============================================================================

#[test]
fn test_snapshot_carries_session_across_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.json");

    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let masked = engine.mask(&entity_report()).unwrap();
    engine.into_vault().snapshot().unwrap().save(&path).unwrap();

    // A later process restores the vault and unmasks text derived from
    // the masked document.
    let vault = TokenVault::from_snapshot(VaultSnapshot::load(&path).unwrap());
    let reader = MaskingEngine::with_vault(MaskPolicy::default(), vault);

    let masked_text = serde_json::to_string_pretty(&masked).unwrap();
    let restored = reader.unmask(&masked_text).unwrap();
    assert_eq!(
        restored,
        serde_json::to_string_pretty(&entity_report()).unwrap()
    );
}

#[test]
fn test_restored_session_continues_label_sequence() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    engine.mask(&json!({"EMAIL": "a@b.com"})).unwrap();
    let snapshot = engine.into_vault().snapshot().unwrap();

    let mut resumed = MaskingEngine::with_vault(
        MaskPolicy::default(),
        TokenVault::from_snapshot(snapshot),
    );
    let masked = resumed
        .mask(&json!({"EMAIL": "a@b.com", "MOBILE": "555"}))
        .unwrap();

    assert_eq!(masked, json!({"EMAIL": "EMAIL_1", "MOBILE": "MOBILE_1"}));
    let masked = resumed.mask(&json!({"EMAIL": "new@z.com"})).unwrap();
    assert_eq!(masked, json!({"EMAIL": "EMAIL_2"}));
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_empty_document_shapes() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());

    assert_eq!(engine.mask(&json!({})).unwrap(), json!({}));
    assert_eq!(engine.mask(&json!([])).unwrap(), json!([]));
    assert_eq!(engine.mask(&json!("")).unwrap(), json!(""));
}

#[test]
fn test_unicode_values_round_trip() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let doc = json!({"ENTITY_NAME": "Ægir Müller-Lüdenscheidt 中村"});

    let masked = engine.mask(&doc).unwrap();
    assert_eq!(masked, json!({"ENTITY_NAME": "ENTITY_NAME_1"}));
    assert_eq!(
        engine.unmask("ENTITY_NAME_1").unwrap(),
        "Ægir Müller-Lüdenscheidt 中村"
    );
}

#[test]
fn test_mixed_scalar_array_under_masked_key_parent() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());
    let masked = engine
        .mask(&json!({"FEATURES": [1, true, "EMAIL: a@b.com", "loose text"]}))
        .unwrap();

    assert_eq!(
        masked,
        json!({"FEATURES": [1, true, "EMAIL: EMAIL_1", "loose text"]})
    );
}

#[test]
fn test_deeply_nested_report_within_default_limit() {
    let mut engine = MaskingEngine::new(MaskPolicy::default());

    let mut doc = json!({"EMAIL": "a@b.com"});
    for _ in 0..60 {
        doc = json!({ "WRAPPER": [doc] });
    }

    let masked = engine.mask(&doc).unwrap();
    let rendered = serde_json::to_string(&masked).unwrap();
    assert!(rendered.contains("EMAIL_1"));
    assert!(!rendered.contains("a@b.com"));
}
