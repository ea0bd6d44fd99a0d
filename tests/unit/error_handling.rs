// tests/unit/error_handling.rs
//! Error messages and configuration validation failures.

use jira_harvest::{
    AppError, BaseUrl, CommandLineInput, Credentials, HarvestConfig, ValidationError,
};

#[cfg(test)]
mod validation_error_tests {
    use super::*;

    #[test]
    fn validation_error_messages() {
        let err = ValidationError::InvalidUrl {
            url: "ftp://jira".to_string(),
            reason: "unsupported scheme".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid URL: ftp://jira - unsupported scheme");

        let err = ValidationError::OutOfBounds {
            value: 0,
            min: 1,
            max: 64,
        };
        assert_eq!(err.to_string(), "Value out of bounds: 0, expected 1..=64");
    }

    #[test]
    fn base_url_rejects_non_http_schemes() {
        assert!(matches!(
            BaseUrl::parse("ftp://issues.apache.org/jira"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(BaseUrl::parse("https://issues.apache.org/jira/").is_ok());
    }

    #[test]
    fn credentials_need_both_halves() {
        assert!(matches!(
            Credentials::from_parts(Some("alice".to_string()), None),
            Err(ValidationError::IncompleteCredentials { .. })
        ));
        assert!(Credentials::from_parts(None, None).unwrap().is_none());
        assert!(
            Credentials::from_parts(Some("alice".to_string()), Some("t0ken-value".to_string()))
                .unwrap()
                .is_some()
        );
    }
}

#[cfg(test)]
mod app_error_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn validation_converts_into_app_error() {
        let app_err: AppError = ValidationError::EmptyField("user").into();
        assert!(matches!(app_err, AppError::Validation(_)));
        assert_eq!(app_err.to_string(), "Empty required field: user");
    }

    #[test]
    fn service_errors_list_server_messages() {
        let err = AppError::JiraService {
            status: reqwest::StatusCode::BAD_REQUEST,
            messages: vec!["The value 'X' does not exist for the field 'project'.".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("does not exist"));
        assert!(err.is_remote());
        assert!(!AppError::HarvestAlreadyRun.is_remote());
    }

    #[test]
    fn config_surfaces_validation_failures() {
        let cli = CommandLineInput::parse_from(["jira-harvest", "-n", "0"]);
        let err = HarvestConfig::from_parts(cli, None).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::OutOfBounds { value: 0, .. })
        ));
    }
}
