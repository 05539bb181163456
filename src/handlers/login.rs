// Partner gateway handlers: initiate a login session, poll its status
use actix_web::{web, HttpResponse};
use base64::{engine::general_purpose, Engine as _};
use log::error;
use serde::{Deserialize, Serialize};

use crate::models::SessionStatus;
use crate::relay::{InitiateError, LoginRelay, PollStatus};
use crate::utils::responses::ResponseBuilder;

#[derive(Deserialize)]
pub struct InitiateLoginRequest {
    #[serde(default)]
    pub partner_key: Option<String>,
    #[serde(default)]
    pub site_identity: Option<String>,
}

#[derive(Serialize)]
pub struct InitiateLoginResponse {
    pub token: String,
    /// Base64-encoded PNG, no data-URI prefix
    pub qr_image: String,
}

#[derive(Deserialize)]
pub struct LoginStatusRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct LoginStatusResponse {
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Create a new pending login session for a partner site.
///
/// Responds with the raw session token and its QR rendering; the partner
/// renders the image and starts polling. Unregistered pairings get a 401
/// and no session row.
pub async fn initiate_login(
    body: web::Json<InitiateLoginRequest>,
    relay: web::Data<LoginRelay>,
) -> HttpResponse {
    let Some(partner_key) = non_blank(body.partner_key.as_deref()) else {
        return ResponseBuilder::missing_field("partner_key");
    };
    let Some(site_identity) = non_blank(body.site_identity.as_deref()) else {
        return ResponseBuilder::missing_field("site_identity");
    };

    match relay.initiate(partner_key, site_identity).await {
        Ok(login) => ResponseBuilder::ok(&InitiateLoginResponse {
            token: login.token,
            qr_image: general_purpose::STANDARD.encode(login.qr_png),
        }),
        Err(InitiateError::UnknownPartner) => ResponseBuilder::unauthorized_partner(),
        Err(err) => {
            error!("failed to initiate login session: {err}");
            ResponseBuilder::internal_server_error().build()
        }
    }
}

/// Report the current state of a login session.
///
/// Pure read; an unknown token reports `not_found` inside a 200 body so
/// that early or late pollers can keep retrying on a backoff.
pub async fn poll_login_status(
    body: web::Json<LoginStatusRequest>,
    relay: web::Data<LoginRelay>,
) -> HttpResponse {
    let Some(token) = non_blank(body.token.as_deref()) else {
        return ResponseBuilder::missing_field("token");
    };

    match relay.poll(token).await {
        Ok(PollStatus::Pending) => ResponseBuilder::ok(&LoginStatusResponse {
            status: SessionStatus::Pending,
            uid: None,
        }),
        Ok(PollStatus::Authorized { uid }) => ResponseBuilder::ok(&LoginStatusResponse {
            status: SessionStatus::Authorized,
            uid: Some(uid),
        }),
        Ok(PollStatus::NotFound) => ResponseBuilder::ok(&LoginStatusResponse {
            status: SessionStatus::NotFound,
            uid: None,
        }),
        Err(err) => {
            error!("failed to poll login session: {err}");
            ResponseBuilder::internal_server_error().build()
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
