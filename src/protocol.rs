use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://neviweb.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Header carrying the session token from the login response body.
pub const SESSION_HEADER: &str = "Session-Id";

pub const LOGIN_PATH: &str = "/api/login";
pub const GATEWAY_PATH: &str = "/api/gateway";

pub fn device_list_path(gateway_id: u64) -> String {
    format!("/api/device?gatewayId={gateway_id}")
}

pub fn device_data_path(device_id: u64) -> String {
    format!("/api/device/{device_id}/data")
}

pub fn device_setpoint_path(device_id: u64) -> String {
    format!("/api/device/{device_id}/setpoint")
}

/// Login is a form post; the portal rejects JSON bodies.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(rename = "stayConnected")]
    pub stay_connected: u8,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gateway {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SetpointForm {
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_paths_embed_ids() {
        assert_eq!(device_list_path(3), "/api/device?gatewayId=3");
        assert_eq!(device_data_path(42), "/api/device/42/data");
        assert_eq!(device_setpoint_path(42), "/api/device/42/setpoint");
    }

    #[test]
    fn login_form_uses_wire_field_names() {
        let form = LoginForm {
            email: "a@b.c",
            password: "secret",
            stay_connected: 1,
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["email"], "a@b.c");
        assert_eq!(value["stayConnected"], 1);
        assert!(value.get("stay_connected").is_none());
    }

    #[test]
    fn gateway_entry_parses() {
        let gateways: Vec<Gateway> =
            serde_json::from_str(r#"[{"id": 1, "name": "Home"}, {"id": 2, "name": "Chalet"}]"#)
                .unwrap();
        assert_eq!(gateways.len(), 2);
        assert_eq!(gateways[0].id, 1);
        assert_eq!(gateways[1].name, "Chalet");
    }

    #[test]
    fn login_response_session_optional() {
        let ok: LoginResponse = serde_json::from_str(r#"{"session": "abc"}"#).unwrap();
        assert_eq!(ok.session.as_deref(), Some("abc"));
        let missing: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.session.is_none());
    }
}
