//! Tests for configuration loading and validation

use barbershop::config::{AdmissionPolicy, ShopConfig, MAX_CLIENT_COUNT};

#[test]
fn test_builder_chain_validates() {
    let cfg = ShopConfig::new()
        .with_barbers(2)
        .with_sofa_capacity(3)
        .with_shop_capacity(10)
        .with_clients(12)
        .with_admission(AdmissionPolicy::Wait);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.standing_places(), Ok(7));
    assert_eq!(cfg.waiting_capacity(), Ok(10));
}

#[test]
fn test_json_missing_required_field() {
    let err = ShopConfig::from_json_str(r#"{"barber_count":1,"sofa_capacity":1}"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_json_without_any_capacity_is_invalid() {
    let err = ShopConfig::from_json_str(r#"{"barber_count":1,"sofa_capacity":1,"client_count":3}"#)
        .unwrap_err();
    assert!(err.contains("standing_capacity or shop_capacity"));
}

#[test]
fn test_json_client_cap() {
    let json = format!(
        r#"{{"barber_count":1,"sofa_capacity":1,"standing_capacity":1,"client_count":{}}}"#,
        MAX_CLIENT_COUNT + 1
    );
    assert!(ShopConfig::from_json_str(&json).is_err());
}

#[test]
fn test_admission_policy_parsing() {
    assert_eq!("balk".parse::<AdmissionPolicy>(), Ok(AdmissionPolicy::Balk));
    assert_eq!(" WAIT ".parse::<AdmissionPolicy>(), Ok(AdmissionPolicy::Wait));
    assert!("queue".parse::<AdmissionPolicy>().is_err());
    assert_eq!(
        serde_json::to_string(&AdmissionPolicy::Wait).unwrap(),
        "\"wait\""
    );
    assert_eq!(AdmissionPolicy::default(), AdmissionPolicy::Balk);
}
