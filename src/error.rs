use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::users::UserStoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Login required")]
    AuthRequired,

    #[error("Access denied.")]
    Forbidden,

    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    MalformedCatalog(#[from] serde_json::Error),

    #[error("Mail dispatch failed: {0}")]
    Mail(#[from] lettre::transport::smtp::Error),

    #[error("Malformed mail message: {0}")]
    MailMessage(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    MailAddress(#[from] lettre::address::AddressError),

    #[error("Completion API call failed: {0}")]
    Chat(#[from] reqwest::Error),

    #[error("Completion API returned no choices")]
    EmptyCompletion,

    #[error(transparent)]
    UserStore(#[from] UserStoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            // Anonymous hits on login-gated routes bounce to the login form.
            AppError::AuthRequired => return Redirect::to("/login").into_response(),
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Catalog(_)
            | AppError::MalformedCatalog(_)
            | AppError::MailMessage(_)
            | AppError::MailAddress(_)
            | AppError::UserStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Mail(_) | AppError::Chat(_) | AppError::EmptyCompletion => {
                StatusCode::BAD_GATEWAY
            }
        };

        (status, self.to_string()).into_response()
    }
}
