use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Resolves the bearer token into an `Identity` extension, or rejects with 401.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) =
        auth.ok_or_else(|| AppError::Auth("Missing or malformed authorization header".to_string()))?;

    let identity = validate_token(auth.token(), &config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
