//! HTTP Handlers

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use pix_core::{
    DecodedPayload, PixChargeRequest, PixError, PixKeyKind, cpf, decode_pix_payload,
    format_pix_key_display, generate_pix_payload,
};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadResponse {
    /// "Pix copia e cola" string
    pub payload: String,
    pub crc: String,
    /// Shape of the key that was encoded; `None` when unrecognised
    pub key_kind: Option<PixKeyKind>,
}

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateKeyRequest {
    pub pix_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateKeyResponse {
    pub valid: bool,
    pub kind: Option<PixKeyKind>,
    pub display: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateCpfRequest {
    pub cpf: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateCpfResponse {
    pub valid: bool,
    pub formatted: String,
    pub error: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(err: &PixError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().into(),
        }),
    )
}

fn invalid_json(rejection: &JsonRejection) -> ApiError {
    (
        rejection.status(),
        Json(ErrorResponse {
            error: rejection.body_text(),
            code: "INVALID_REQUEST".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Generate a BR Code for a fixed-amount charge
pub async fn create_payload(
    payload: Result<Json<PixChargeRequest>, JsonRejection>,
) -> Result<Json<PayloadResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| invalid_json(&e))?;

    let key_kind = PixKeyKind::detect(&request.pix_key);
    if key_kind.is_none() {
        // The encoder accepts any key; callers decide whether to block on this
        tracing::debug!(pix_key = %request.pix_key, "Encoding key with unrecognised shape");
    }

    let generated = generate_pix_payload(&request).map_err(|e| {
        tracing::warn!(error = %e, "Pix payload rejected");
        bad_request(&e)
    })?;

    Ok(Json(PayloadResponse {
        crc: generated.crc().to_string(),
        payload: generated.into_string(),
        key_kind,
    }))
}

/// Parse a BR Code back into its fields
pub async fn decode_payload(
    payload: Result<Json<DecodeRequest>, JsonRejection>,
) -> Result<Json<DecodedPayload>, ApiError> {
    let Json(request) = payload.map_err(|e| invalid_json(&e))?;

    let decoded = decode_pix_payload(&request.payload).map_err(|e| {
        tracing::warn!(error = %e, "Pix payload could not be decoded");
        bad_request(&e)
    })?;

    Ok(Json(decoded))
}

/// Shape check and display formatting for a Pix key
pub async fn validate_key(
    payload: Result<Json<ValidateKeyRequest>, JsonRejection>,
) -> Result<Json<ValidateKeyResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| invalid_json(&e))?;
    let kind = PixKeyKind::detect(&request.pix_key);

    Ok(Json(ValidateKeyResponse {
        valid: kind.is_some(),
        kind,
        display: format_pix_key_display(&request.pix_key),
    }))
}

/// Check-digit validation for a CPF
pub async fn validate_cpf(
    payload: Result<Json<ValidateCpfRequest>, JsonRejection>,
) -> Result<Json<ValidateCpfResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| invalid_json(&e))?;
    let result = cpf::check(&request.cpf);

    Ok(Json(ValidateCpfResponse {
        valid: result.is_ok(),
        formatted: cpf::format(&request.cpf),
        error: result.err().map(|e| e.user_message().to_string()),
    }))
}
