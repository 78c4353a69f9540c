use super::*;
use proptest::prelude::*;
use test_case::test_case;

fn pcc(code: &str) -> Pcc {
    Pcc::new(code).unwrap()
}

// ============================================================================
// PCC
// ============================================================================

#[test_case("U9XF" ; "letters and digit")]
#[test_case("2GAC" ; "leading digit")]
#[test_case("0000" ; "all digits")]
fn valid_pcc(code: &str) {
    assert_eq!(Pcc::new(code).unwrap().as_str(), code);
}

#[test_case("U9X" ; "too short")]
#[test_case("U9XFF" ; "too long")]
#[test_case("u9xf" ; "lowercase")]
#[test_case("U9-F" ; "punctuation")]
#[test_case("" ; "empty")]
fn invalid_pcc(code: &str) {
    assert_eq!(Pcc::new(code), Err(TypeError::InvalidPcc(code.to_string())));
}

#[test]
fn wildcard_is_not_a_pcc() {
    assert_eq!(Pcc::new("*"), Err(TypeError::WildcardNotAllowed));
}

#[test_case("u9xf", "U9XF")]
#[test_case(" kh-6g ", "KH6G")]
#[test_case("ue07xyz", "UE07")]
#[test_case("*", "*")]
#[test_case("--", "")]
fn normalize_pcc_input(raw: &str, expected: &str) {
    assert_eq!(Pcc::normalize_input(raw), expected);
}

#[test]
fn pcc_serde_rejects_invalid() {
    let ok: Pcc = serde_json::from_str("\"U9XF\"").unwrap();
    assert_eq!(ok, pcc("U9XF"));
    assert!(serde_json::from_str::<Pcc>("\"U9\"").is_err());
}

// ============================================================================
// PCC Scope
// ============================================================================

#[test]
fn scope_from_wire_form() {
    assert_eq!(PccScope::from_codes(&["*"]).unwrap(), PccScope::All);

    let scope = PccScope::from_codes(&["UE07", "KH6G"]).unwrap();
    assert_eq!(scope.pccs(), &[pcc("UE07"), pcc("KH6G")]);

    assert_eq!(
        PccScope::from_codes::<&str>(&[]),
        Err(TypeError::EmptyScope)
    );
    assert_eq!(
        PccScope::from_codes(&["*", "UE07"]),
        Err(TypeError::MixedScope)
    );
    assert_eq!(
        PccScope::from_codes(&["UE07", "UE07"]),
        Err(TypeError::DuplicatePcc(pcc("UE07")))
    );
}

#[test]
fn adding_code_to_wildcard_narrows_scope() {
    let scope = PccScope::All.with_pcc(pcc("U9XF")).unwrap();
    assert!(!scope.is_all());
    assert_eq!(scope.pccs(), &[pcc("U9XF")]);
}

#[test]
fn adding_duplicate_code_is_rejected() {
    let scope = PccScope::specific([pcc("U9XF")]).unwrap();
    assert_eq!(
        scope.with_pcc(pcc("U9XF")),
        Err(TypeError::DuplicatePcc(pcc("U9XF")))
    );
}

#[test]
fn removing_last_code_resets_to_wildcard() {
    let scope = PccScope::All.with_pcc(pcc("U9XF")).unwrap();
    let scope = scope.without_pcc(&pcc("U9XF")).unwrap();
    assert_eq!(scope, PccScope::All);
}

#[test]
fn removing_unknown_code_is_rejected() {
    let scope = PccScope::specific([pcc("U9XF"), pcc("KH6G")]).unwrap();
    assert_eq!(
        scope.clone().without_pcc(&pcc("2GAC")),
        Err(TypeError::PccNotInScope(pcc("2GAC")))
    );
    let scope = scope.without_pcc(&pcc("U9XF")).unwrap();
    assert_eq!(scope.pccs(), &[pcc("KH6G")]);
}

#[test]
fn scope_names_and_covers() {
    let scope = PccScope::specific([pcc("U9XF")]).unwrap();
    assert!(scope.names(&pcc("U9XF")));
    assert!(!scope.names(&pcc("KH6G")));
    assert!(!PccScope::All.names(&pcc("U9XF")));
    assert!(PccScope::All.covers(&pcc("U9XF")));
}

#[test]
fn scope_label() {
    assert_eq!(PccScope::All.label(), "All PCCs");
    let many = PccScope::from_codes(&["AAAA", "BBBB", "CCCC", "DDDD", "EEEE"]).unwrap();
    assert_eq!(many.label(), "AAAA, BBBB, CCCC +2");
}

#[test]
fn scope_serde_uses_wire_form() {
    let json = serde_json::to_string(&PccScope::All).unwrap();
    assert_eq!(json, r#"["*"]"#);

    let scope: PccScope = serde_json::from_str(r#"["UE07","KH6G","2GAC"]"#).unwrap();
    assert_eq!(scope.pccs().len(), 3);

    assert!(serde_json::from_str::<PccScope>("[]").is_err());
    assert!(serde_json::from_str::<PccScope>(r#"["*","UE07"]"#).is_err());
}

// ============================================================================
// Command
// ============================================================================

#[test]
fn command_requires_canonical_form() {
    assert!(Command::new("*R").is_ok());
    assert!(Command::new("W/*").is_ok());
    assert_eq!(Command::new(""), Err(TypeError::EmptyCommand));
    assert_eq!(
        Command::new("wc"),
        Err(TypeError::NonCanonicalCommand("wc".to_string()))
    );
    assert_eq!(
        Command::new(" WC"),
        Err(TypeError::NonCanonicalCommand(" WC".to_string()))
    );
}

#[test]
fn command_matching_is_literal() {
    let wc = Command::new("WC").unwrap();
    assert!(wc.is_prefix_of("WC1-3"));
    assert!(!Command::new("W-").unwrap().is_prefix_of("WC1-3"));

    // `*` in an entry is literal text
    let star = Command::new("W/*").unwrap();
    assert!(star.is_prefix_of("W/*ABC"));
    assert!(!star.is_prefix_of("W/ABC"));

    assert!(Command::new("IG").unwrap().matches_exact("IG"));
    assert!(!Command::new("IG").unwrap().matches_exact("IGX"));
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn context_wire_names() {
    for context in ContextKind::ALL {
        let parsed: ContextKind = context.as_str().parse().unwrap();
        assert_eq!(parsed, context);
    }
    assert_eq!(
        "ticketed-pnr".parse::<ContextKind>().unwrap(),
        ContextKind::TicketedPnr
    );
    assert!("booking".parse::<ContextKind>().is_err());
    assert_eq!(
        serde_json::to_string(&ContextKind::TicketedPnr).unwrap(),
        "\"ticketedPnr\""
    );
    assert!(!ContextKind::Any.is_specific());
    assert!(ContextKind::Pnr.is_specific());
}

// ============================================================================
// Entity IDs
// ============================================================================

#[test]
fn ids_accept_admin_ui_strings_and_numbers() {
    let id: RuleSetId = serde_json::from_str("\"1-default\"").unwrap();
    assert_eq!(id.as_str(), "1-default");
    assert_eq!(id.as_number(), None);

    let id: GroupId = serde_json::from_str("7").unwrap();
    assert_eq!(id, GroupId::new(7));
    assert_eq!(id.as_number(), Some(7));

    // Always written back as a string
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    assert_eq!(
        serde_json::to_string(&CommandId::new("cmd-1")).unwrap(),
        "\"cmd-1\""
    );

    assert!(serde_json::from_str::<RoleId>("\"  \"").is_err());
    assert!(serde_json::from_str::<RoleId>("-3").is_err());
}

#[test]
fn next_numeric_id_skips_text_and_stops_at_max() {
    let ids = ["grp-1", "4", "2"];
    assert_eq!(next_numeric_id(ids), Some(5));
    assert_eq!(next_numeric_id(["grp-1"]), Some(1));

    let max = u64::MAX.to_string();
    assert_eq!(next_numeric_id([max.as_str()]), None);
}

proptest! {
    /// Property: normalised input is always a valid PCC, the wildcard, or
    /// shorter than four characters.
    #[test]
    fn prop_normalized_pcc_input_is_well_formed(raw in ".{0,12}") {
        let normalized = Pcc::normalize_input(&raw);
        prop_assert!(normalized.chars().count() <= Pcc::LEN);
        if normalized.len() == Pcc::LEN && !normalized.contains('*') {
            prop_assert!(Pcc::new(normalized).is_ok());
        }
    }

    /// Property: add-then-remove of a single code always lands on the wildcard.
    #[test]
    fn prop_add_then_remove_is_wildcard(code in "[A-Z0-9]{4}") {
        let pcc = Pcc::new(code).unwrap();
        let scope = PccScope::All.with_pcc(pcc.clone()).unwrap();
        prop_assert_eq!(scope.without_pcc(&pcc).unwrap(), PccScope::All);
    }
}
