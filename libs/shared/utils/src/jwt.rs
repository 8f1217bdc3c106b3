use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{Identity, JwtClaims};

type HmacSha256 = Hmac<Sha256>;

/// Verify an HS256 token and resolve the caller identity carried in its claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Identity, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    let exp = claims.exp.ok_or_else(|| "Token has no expiry".to_string())?;
    let now = chrono::Utc::now().timestamp() as u64;
    if exp < now {
        debug!("Token expired at {} (now: {})", exp, now);
        return Err("Token expired".to_string());
    }

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| "Token subject is not a valid user id".to_string())?;

    let identity = Identity {
        id,
        is_doctor: claims.is_doctor,
        email: claims.email.unwrap_or_default(),
    };

    debug!("Token validated successfully for user: {} (doctor: {})", identity.id, identity.is_doctor);
    Ok(identity)
}
