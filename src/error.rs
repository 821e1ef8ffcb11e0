//! Error taxonomy for the Books table facade.
//!
//! Every SDK failure is folded into one of a handful of kinds by its service
//! error code. Nothing here retries or recovers: errors go straight back to
//! the caller.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

use crate::book::BookKey;
use crate::dynamodb::Item;

/// Errors surfaced by [`BookStore`](crate::BookStore) operations.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conditional check failed for {0}")]
    ConditionalCheckFailed(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Table already exists: {0}")]
    AlreadyExists(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid request: {0}")]
    Request(#[from] BuildError),
    #[error("Service error: {0}")]
    Service(String),
}

impl From<serde_dynamo::Error> for FacadeError {
    fn from(err: serde_dynamo::Error) -> Self {
        FacadeError::Serialization(err.to_string())
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, FacadeError>;

/// A [`FacadeError`] raised while bulk loading, tagged with the record that failed.
#[derive(Debug, Error)]
#[error("Bulk load stopped at record {position}: {source}")]
pub struct BulkLoadError {
    /// Zero-based position of the failing record in the input sequence.
    pub position: usize,
    /// Key of the failing record, `None` when it could not be read as a book.
    pub key: Option<BookKey>,
    #[source]
    pub source: FacadeError,
}

/// What a request was aimed at, used to label the error it produced.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    /// Account-level calls that name no table.
    Service,
    Table(&'a str),
    Record(&'a Item),
}

impl Target<'_> {
    fn describe(&self) -> String {
        match self {
            Target::Service => "DynamoDB service".to_string(),
            Target::Table(name) => (*name).to_string(),
            Target::Record(key) => key.describe_key(),
        }
    }
}

/// Maps a DynamoDB error code onto the facade taxonomy.
pub(crate) fn classify(code: Option<&str>, detail: String, target: Target<'_>) -> FacadeError {
    match code {
        Some("ValidationException") => FacadeError::Validation(detail),
        Some("ConditionalCheckFailedException") => {
            FacadeError::ConditionalCheckFailed(target.describe())
        }
        Some("ResourceInUseException") => FacadeError::AlreadyExists(target.describe()),
        Some("ResourceNotFoundException") => FacadeError::TableNotFound(detail),
        Some(
            "ProvisionedThroughputExceededException"
            | "RequestLimitExceeded"
            | "ThrottlingException"
            | "LimitExceededException"
            | "InternalServerError"
            | "ServiceUnavailable",
        ) => FacadeError::ServiceUnavailable(detail),
        _ => FacadeError::Service(detail),
    }
}

/// Maps any SDK operation error onto the facade taxonomy.
pub(crate) fn map_sdk_error<E, R>(err: SdkError<E, R>, target: Target<'_>) -> FacadeError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();
    if let Some(service_error) = err.as_service_error() {
        return classify(service_error.code(), detail, target);
    }
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            FacadeError::ServiceUnavailable(detail)
        }
        _ => FacadeError::Service(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::put_item::PutItemError;
    use aws_smithy_runtime_api::client::result::ConnectorError;

    fn key() -> Item {
        BookKey::new(1001, "Americanah").to_item()
    }

    #[test]
    fn test_classify_validation() {
        let err = classify(
            Some("ValidationException"),
            "empty key".to_string(),
            Target::Table("Books"),
        );
        assert!(matches!(err, FacadeError::Validation(ref d) if d == "empty key"));
    }

    #[test]
    fn test_classify_conditional_check_names_record() {
        let key = key();
        let err = classify(
            Some("ConditionalCheckFailedException"),
            "condition".to_string(),
            Target::Record(&key),
        );
        assert_eq!(
            err.to_string(),
            "Conditional check failed for book_id=1001, title=\"Americanah\""
        );
    }

    #[test]
    fn test_classify_resource_in_use_is_already_exists() {
        let err = classify(
            Some("ResourceInUseException"),
            "in use".to_string(),
            Target::Table("Books"),
        );
        assert_eq!(err.to_string(), "Table already exists: Books");
    }

    #[test]
    fn test_classify_transient_codes() {
        for code in [
            "ProvisionedThroughputExceededException",
            "RequestLimitExceeded",
            "ThrottlingException",
            "LimitExceededException",
            "InternalServerError",
            "ServiceUnavailable",
        ] {
            let err = classify(Some(code), "busy".to_string(), Target::Table("Books"));
            assert!(
                matches!(err, FacadeError::ServiceUnavailable(_)),
                "{code} should be transient"
            );
        }
    }

    #[test]
    fn test_classify_unknown_code() {
        let err = classify(Some("Whatever"), "odd".to_string(), Target::Table("Books"));
        assert!(matches!(err, FacadeError::Service(_)));
        let err = classify(None, "no code".to_string(), Target::Table("Books"));
        assert!(matches!(err, FacadeError::Service(_)));
    }

    #[test]
    fn test_bulk_load_error_display() {
        let err = BulkLoadError {
            position: 2,
            key: None,
            source: FacadeError::Validation("missing field `title`".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Bulk load stopped at record 2: Validation failed: missing field `title`"
        );
    }

    fn service_error(code: &str) -> SdkError<PutItemError, ()> {
        SdkError::service_error(
            PutItemError::generic(
                ErrorMetadata::builder()
                    .code(code)
                    .message("reported by service")
                    .build(),
            ),
            (),
        )
    }

    #[test]
    fn test_map_timeout_is_service_unavailable() {
        let err: SdkError<PutItemError, ()> = SdkError::timeout_error("request timed out");
        let mapped = map_sdk_error(err, Target::Table("Books"));
        assert!(
            matches!(mapped, FacadeError::ServiceUnavailable(_)),
            "got {mapped:?}"
        );
    }

    #[test]
    fn test_map_dispatch_failure_is_service_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: SdkError<PutItemError, ()> =
            SdkError::dispatch_failure(ConnectorError::io(Box::new(io)));
        let mapped = map_sdk_error(err, Target::Table("Books"));
        assert!(
            matches!(mapped, FacadeError::ServiceUnavailable(_)),
            "got {mapped:?}"
        );
    }

    #[test]
    fn test_map_service_error_uses_code() {
        let key = key();

        let mapped = map_sdk_error(
            service_error("ConditionalCheckFailedException"),
            Target::Record(&key),
        );
        assert_eq!(
            mapped.to_string(),
            "Conditional check failed for book_id=1001, title=\"Americanah\""
        );

        let mapped = map_sdk_error(
            service_error("ProvisionedThroughputExceededException"),
            Target::Record(&key),
        );
        assert!(
            matches!(mapped, FacadeError::ServiceUnavailable(_)),
            "got {mapped:?}"
        );

        let mapped = map_sdk_error(service_error("ValidationException"), Target::Record(&key));
        assert!(matches!(mapped, FacadeError::Validation(_)), "got {mapped:?}");
    }

    #[test]
    fn test_service_target_label() {
        let err = classify(
            Some("ResourceInUseException"),
            "in use".to_string(),
            Target::Service,
        );
        assert_eq!(err.to_string(), "Table already exists: DynamoDB service");
    }
}
