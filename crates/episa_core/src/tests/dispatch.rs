//! Tests for method dispatch
//!
//! These tests verify:
//! - Method names are matched case-insensitively
//! - Invalid settings and overrides fail with `ConfigurationError`
//! - Sampling-scheme advisories are reported without aborting the run
//! - Options must belong to the selected method's family

use crate::error::{ConfigurationError, Error};
use crate::model::{InputParameter, OutputVariable};
use crate::service::{
    ConfLevel, DeltaOptions, FastOptions, Method, MethodOptions, RunRequest,
    SensitivityAnalysisService, ServiceConfig,
};

fn small_service(method: Method) -> SensitivityAnalysisService {
    let inputs = vec![
        InputParameter::new("a", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
        InputParameter::new("b", vec![1.0, 0.0, 1.0, 0.5, 0.2, 0.9]),
    ];
    let outputs = vec![OutputVariable::new("y", vec![10.0, 20.0, 30.0, 40.0, 45.0, 61.0])];
    let config = ServiceConfig {
        method,
        ..Default::default()
    };
    SensitivityAnalysisService::new(&inputs, &outputs, config).unwrap()
}

fn quick_delta() -> MethodOptions {
    MethodOptions::Delta(DeltaOptions {
        num_resamples: 20,
        ..Default::default()
    })
}

/// "SOBOL" and "sobol" select the same method
#[test]
fn test_method_case_insensitive() {
    let upper = ServiceConfig::new("SOBOL", true, 0.95, 0).unwrap();
    let lower = ServiceConfig::new("sobol", true, 0.95, 0).unwrap();
    assert_eq!(upper.method, lower.method);
    assert_eq!(upper.method.family(), Method::Sobol.family());
}

/// Deserialized configs and requests match method names the same way
#[test]
fn test_method_case_insensitive_when_deserialized() {
    let config: ServiceConfig = serde_json::from_str(r#"{"method": "Delta"}"#).unwrap();
    assert_eq!(config.method, Method::Delta);

    let method: Method = serde_json::from_str(r#""FRACTIONAL_FACTORIAL""#).unwrap();
    assert_eq!(method, Method::FractionalFactorial);
    assert_eq!(serde_json::to_string(&method).unwrap(), r#""fractional_factorial""#);

    let err = serde_json::from_str::<Method>(r#""anova""#).unwrap_err();
    assert!(err.to_string().contains("anova"));
}

/// Unknown methods are rejected with the supported set in the message
#[test]
fn test_unknown_method_rejected() {
    let err = ServiceConfig::new("anova", true, 0.95, 0).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownMethod { ref method } if method == "anova"));
    assert!(err.to_string().contains("fractional_factorial"));

    let mut service = small_service(Method::Delta);
    assert!(service.set_method("Morris").is_ok());
    assert_eq!(service.method(), Method::Morris);
    assert!(service.set_method("pca").is_err());
    assert_eq!(service.method(), Method::Morris);
}

/// Confidence levels must lie strictly inside (0, 1)
#[test]
fn test_conf_level_range() {
    for ok in [1e-6, 0.5, 0.95, 0.999_999] {
        assert!(ConfLevel::new(ok).is_ok(), "{ok} should be accepted");
    }
    for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(ConfLevel::new(bad), Err(ConfigurationError::ConfLevel { .. })),
            "{bad} should be rejected"
        );
    }
}

/// An invalid override fails before any override is applied
#[test]
fn test_invalid_override_applies_nothing() {
    let mut service = small_service(Method::Delta);
    let request = RunRequest::new()
        .method(Method::Morris)
        .calc_second_order(false)
        .conf_level(1.0);

    let err = service.run(request).unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::ConfLevel { .. })
    ));
    assert_eq!(service.method(), Method::Delta);
    assert!(service.calc_second_order());
    assert_eq!(service.conf_level(), 0.95);
}

/// Valid overrides persist as the new configuration
#[test]
fn test_valid_overrides_persist() {
    let mut service = small_service(Method::Delta);
    let request = RunRequest::new()
        .method(Method::Latin)
        .conf_level(0.9)
        .options(quick_delta());

    service.run(request).unwrap();
    assert_eq!(service.method(), Method::Latin);
    assert_eq!(service.conf_level(), 0.9);
    assert_eq!(service.other_parameters(), Some(&quick_delta()));
}

/// Options for another family are rejected
#[test]
fn test_options_family_mismatch() {
    let mut service = small_service(Method::Delta);
    let err = service
        .run(RunRequest::new().options(MethodOptions::Fast(FastOptions::default())))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::OptionsMismatch {
            method: Method::Delta,
            ..
        })
    ));
}

/// Absent options fall back to the family defaults
#[test]
fn test_absent_options_use_defaults() {
    let mut service = small_service(Method::Delta);
    service.run(RunRequest::new()).unwrap();
    assert_eq!(
        service.other_parameters(),
        Some(&MethodOptions::Delta(DeltaOptions::default()))
    );
}

/// Advisories are reported in the results; DGSM has none
#[test]
fn test_advisories() {
    let mut service = small_service(Method::Delta);
    let results = service.run(RunRequest::new().options(quick_delta())).unwrap();
    assert_eq!(results.advisories.len(), 1);
    assert!(results.advisories[0].message.contains("'latin'"));

    for method in Method::ALL {
        let expected = method.family() != crate::service::MethodFamily::Dgsm;
        assert_eq!(method.family().advisory().is_some(), expected, "{method}");
    }
}

/// A failing analysis routine aborts the run with its own error
#[test]
fn test_analysis_failure_propagates() {
    // Without second order, 2 variables need a multiple of 4 rows
    let mut service = small_service(Method::Sobol);
    let err = service
        .run(RunRequest::new().calc_second_order(false))
        .unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
}
