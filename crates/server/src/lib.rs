use api_types::ErrorResponse;
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerConfig, app, run, run_with_listener, spawn_with_listener};

mod accounts;
mod server;
mod transactions;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountCreated, AccountNew, AccountView, BalanceView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            OperationType, TransactionListResponse, TransactionNew, TransactionView,
        };
    }

    pub use api_types::ErrorResponse;
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Timeout,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
        EngineError::UnsupportedOperation(_)
        | EngineError::InvalidId(_)
        | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "request timed out".to_string(),
            ),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tracing_subscriber::{
        Layer,
        layer::{Context, SubscriberExt},
    };

    use super::*;

    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn error_events(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    fn status_of(err: EngineError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        assert_eq!(
            status_of(EngineError::Conflict("x".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        assert_eq!(
            status_of(EngineError::KeyNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn engine_validation_maps_to_400() {
        for err in [
            EngineError::InsufficientFunds("x".to_string()),
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidDocument("x".to_string()),
        ] {
            assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn engine_internal_maps_to_500() {
        assert_eq!(
            status_of(EngineError::UnsupportedOperation("refund".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(EngineError::InvalidId("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn only_database_errors_are_logged_here() {
        // The engine already logs failed postings.
        let logged = error_events(|| {
            let _ = ServerError::from(EngineError::UnsupportedOperation("refund".to_string()))
                .into_response();
            let _ = ServerError::from(EngineError::InvalidId("x".to_string())).into_response();
        });
        assert_eq!(logged, 0);

        let logged = error_events(|| {
            let _ = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
                "boom".to_string(),
            )))
            .into_response();
        });
        assert_eq!(logged, 1);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timeout_maps_to_408() {
        let res = ServerError::Timeout.into_response();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
