// Unit tests for the format enforcer.
//
// Fixed examples cover clause trimming and lead-in repair; property tests
// cover idempotence and the lead-in guarantee over arbitrary input.

use proptest::prelude::*;

use respectrewrite::format::{fix, inspect};

// ============================================================
// Fixed examples
// ============================================================

#[test]
fn extra_clauses_are_trimmed() {
    assert_eq!(
        fix("It's rude. This hurts. Extra trailing clause."),
        "It's rude. This hurts."
    );
}

#[test]
fn missing_lead_in_is_prepended() {
    assert_eq!(
        fix("rude generalization. This is harmful."),
        "It's rude generalization. This is harmful."
    );
}

#[test]
fn compliant_output_is_unchanged() {
    let text = "It's insulting intelligence. This makes people feel hated.";
    assert_eq!(fix(text), text);
}

#[test]
fn no_boundary_passes_through_unsplit() {
    assert_eq!(fix("hateful remark"), "It's hateful remark");
}

#[test]
fn empty_input_yields_bare_lead_in() {
    assert_eq!(fix(""), "It's ");
}

#[test]
fn second_clause_lead_in_is_not_repaired() {
    // Only the first clause is corrected; "That" stays as generated.
    let fixed = fix("It's mean. That hurts. Also this.");
    assert_eq!(fixed, "It's mean. That hurts.");
    assert!(!inspect(&fixed).has_connective);
}

#[test]
fn markdown_wrapped_output_gets_lead_in() {
    assert_eq!(
        fix("**Insulting.** This demeans people."),
        "It's **Insulting. ** This demeans people."
    );
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #[test]
    fn fix_is_idempotent(raw in any::<String>()) {
        let once = fix(&raw);
        prop_assert_eq!(fix(&once), once);
    }

    #[test]
    fn fix_is_idempotent_on_sentence_like_text(raw in "[A-Za-z' .]{0,60}") {
        let once = fix(&raw);
        prop_assert_eq!(fix(&once), once);
    }

    #[test]
    fn fix_always_starts_with_lead_in(raw in any::<String>()) {
        prop_assert!(fix(&raw).starts_with("It's"));
    }

    #[test]
    fn multi_boundary_input_has_one_internal_boundary(
        a in "[a-z ]{0,15}",
        b in "[a-z ]{0,15}",
        rest in "[a-z .]{0,20}",
    ) {
        let fixed = fix(&format!("{a}.{b}.{rest}"));
        prop_assert_eq!(inspect(&fixed).internal_boundaries, 1);
        prop_assert!(fixed.ends_with('.'));
    }
}
