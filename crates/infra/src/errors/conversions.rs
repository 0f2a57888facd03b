//! Conversions from external infrastructure errors into domain errors.

use openhouse_domain::OpenHouseError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub OpenHouseError);

impl From<InfraError> for OpenHouseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<OpenHouseError> for InfraError {
    fn from(value: OpenHouseError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDomainError {
    fn into_domain(self) -> OpenHouseError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → OpenHouseError */
/* -------------------------------------------------------------------------- */

impl IntoDomainError for SqlError {
    fn into_domain(self) -> OpenHouseError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        OpenHouseError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        OpenHouseError::Database("database is locked".into())
                    }
                    // SQLITE_CONSTRAINT_UNIQUE: the durable unique-email
                    // backstop, surfaced as a distinguishable conflict.
                    (ErrorCode::ConstraintViolation, 2067) => {
                        OpenHouseError::Conflict("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        OpenHouseError::Database("foreign key constraint violation".into())
                    }
                    _ => OpenHouseError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                OpenHouseError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                OpenHouseError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                OpenHouseError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                OpenHouseError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                OpenHouseError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => OpenHouseError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => OpenHouseError::Database("invalid SQL query".into()),
            other => OpenHouseError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → OpenHouseError */
/* -------------------------------------------------------------------------- */

impl IntoDomainError for r2d2::Error {
    fn into_domain(self) -> OpenHouseError {
        OpenHouseError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → OpenHouseError */
/* -------------------------------------------------------------------------- */

impl IntoDomainError for HttpError {
    fn into_domain(self) -> OpenHouseError {
        if self.is_timeout() {
            return OpenHouseError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return OpenHouseError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message = format!(
                "HTTP {} {}",
                code,
                status.canonical_reason().unwrap_or("unknown status")
            );

            return match code {
                404 => OpenHouseError::NotFound(message),
                409 => OpenHouseError::Conflict(message),
                400..=499 => OpenHouseError::InvalidInput(message),
                500..=599 => OpenHouseError::Network(message),
                _ => OpenHouseError::Network(message),
            };
        }

        OpenHouseError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use rusqlite::Error as SqlError;
    use tokio::runtime::Runtime;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: OpenHouseError = InfraError::from(err).into();
        match mapped {
            OpenHouseError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 2067 },
            Some("UNIQUE constraint failed: leads.email".into()),
        );

        let mapped: OpenHouseError = InfraError::from(err).into();
        assert!(matches!(mapped, OpenHouseError::Conflict(_)), "got {:?}", mapped);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: OpenHouseError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, OpenHouseError::NotFound(_)), "got {:?}", mapped);
    }

    #[test]
    fn http_status_500_maps_to_network_error() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::INTERNAL_SERVER_ERROR))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: OpenHouseError = InfraError::from(error).into();
            match mapped {
                OpenHouseError::Network(msg) => assert!(msg.contains("500")),
                other => panic!("expected network error, got {:?}", other),
            }
        });
    }
}
