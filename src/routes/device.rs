use axum::{
    Json,
    extract::Query,
    http::{HeaderMap, header::USER_AGENT},
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::services::device::{ClientHints, Device, connected_devices, current_device};

/// Screen details the browser reports alongside the request,
/// e.g. `?screen=1920x1080&touch=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceQuery {
    pub screen: Option<String>,
    #[serde(default)]
    pub touch: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub current: Device,
    pub devices: Vec<Device>,
}

pub async fn devices_handler(
    headers: HeaderMap,
    Query(query): Query<DeviceQuery>,
) -> Json<DevicesResponse> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let hints = ClientHints {
        screen: query.screen.as_deref().and_then(ClientHints::parse_screen),
        touch: query.touch,
    };

    let current = current_device(user_agent, hints, Local::now());
    Json(DevicesResponse { devices: connected_devices(current.clone()), current })
}
