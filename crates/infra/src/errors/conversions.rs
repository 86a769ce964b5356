//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use reqwest::Error as HttpError;
use truesign_domain::TrueSignError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TrueSignError);

impl From<InfraError> for TrueSignError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TrueSignError> for InfraError {
    fn from(value: TrueSignError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTrueSignError {
    fn into_truesign(self) -> TrueSignError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TrueSignError */
/* -------------------------------------------------------------------------- */

impl IntoTrueSignError for HttpError {
    fn into_truesign(self) -> TrueSignError {
        if self.is_timeout() {
            return TrueSignError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TrueSignError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return TrueSignError::Internal(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return TrueSignError::Serialization(format!("failed to decode HTTP body: {self}"));
        }

        if let Some(status) = self.status() {
            return TrueSignError::Api {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        TrueSignError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_truesign())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TrueSignError */
/* -------------------------------------------------------------------------- */

impl IntoTrueSignError for IoError {
    fn into_truesign(self) -> TrueSignError {
        TrueSignError::Internal(format!("I/O failure ({:?}): {self}", self.kind()))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_truesign())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → TrueSignError */
/* -------------------------------------------------------------------------- */

impl IntoTrueSignError for url::ParseError {
    fn into_truesign(self) -> TrueSignError {
        TrueSignError::Config(format!("invalid URL: {self}"))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(value.into_truesign())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::CONFLICT))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: TrueSignError = InfraError::from(error).into();
        assert_eq!(mapped.status(), Some(409));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: TrueSignError = InfraError::from(error).into();
        assert!(matches!(mapped, TrueSignError::Network(_)), "got {mapped:?}");
    }

    #[test]
    fn io_error_keeps_kind() {
        let err = IoError::new(ErrorKind::PermissionDenied, "no access");
        let mapped: TrueSignError = InfraError::from(err).into();
        match mapped {
            TrueSignError::Internal(msg) => assert!(msg.contains("PermissionDenied")),
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[test]
    fn url_error_maps_to_config() {
        let err = url::Url::parse("not a url").unwrap_err();
        let mapped: TrueSignError = InfraError::from(err).into();
        assert!(matches!(mapped, TrueSignError::Config(_)));
    }
}
