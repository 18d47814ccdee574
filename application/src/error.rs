//! [`Error`]-related definitions.

use std::fmt;

use axum::{response::IntoResponse, Json};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::{command, infra::database};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Create a new [`Error`] rejecting an invalid document `field`.
    #[must_use]
    pub fn invalid(field: &str) -> Self {
        Self {
            code: "INVALID_DOCUMENT",
            status_code: http::StatusCode::UNPROCESSABLE_ENTITY,
            message: format!("invalid `{field}` value"),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// JSON body of an [`Error`] response.
#[derive(Debug, Serialize)]
struct Body {
    /// [`Error`] code.
    code: Code,

    /// [`Error`] message.
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let Self {
            code,
            status_code,
            backtrace,
            message,
        } = self;

        if status_code.is_server_error() {
            tracing::error!(
                "[{code}]: {message}{}",
                backtrace
                    .iter()
                    .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
            );
        }

        (status_code, Json(Body { code, message })).into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        // Storage-level slug uniqueness is the safety net against concurrent
        // creations racing the pre-check.
        self.is_unique_violation(Some("properties_slug_key"))
            .then(|| SlugError::Conflict.into())
    }
}

impl AsError for command::save_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::save_property::ExecutionError as E;
        match self {
            E::Db(e) => e.try_as_error(),
            E::SlugAttemptsExhausted(..) => Some(SlugError::Exhausted.into()),
        }
    }
}

impl AsError for command::update_property_details::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_property_details::ExecutionError as E;
        match self {
            E::Db(e) => e.try_as_error(),
            E::PropertyNotExists(..) => Some(PropertyError::NotExists.into()),
            E::SlugAttemptsExhausted(..) => Some(SlugError::Exhausted.into()),
        }
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` does not exist"]
        NotExists,
    }
}

define_error! {
    enum SlugError {
        #[code = "SLUG_CONFLICT"]
        #[status = CONFLICT]
        #[message = "`Slug` was taken concurrently, retry the request"]
        Conflict,

        #[code = "SLUG_EXHAUSTED"]
        #[status = CONFLICT]
        #[message = "no free `Slug` variant found"]
        Exhausted,
    }
}
