use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, trace};

use crate::logger::MessageLogger;
use crate::protocol::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GATEWAY_PATH, Gateway, LOGIN_PATH, LoginForm,
    LoginResponse, SESSION_HEADER, SetpointForm, device_data_path, device_list_path,
    device_setpoint_path,
};
use crate::types::{DeviceData, DeviceInfo, DeviceRecord, Snapshot};
use crate::{Error, Result};

#[derive(Debug)]
struct Credentials {
    email: String,
    password: String,
}

pub struct NeviwebClientBuilder {
    email: String,
    password: String,
    gateway: String,
    base_url: String,
    timeout: Duration,
    log_path: Option<String>,
}

impl NeviwebClientBuilder {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            gateway: gateway.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_path: None,
        }
    }

    /// Point the client at a different portal (self-hosted or test double).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn message_log(mut self, path: impl Into<String>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Log in and resolve the configured gateway. This is the only way to
    /// obtain a client, so every client holds a live session and a
    /// resolved gateway id.
    pub async fn login(self) -> Result<NeviwebClient> {
        let logger = match self.log_path {
            Some(ref path) => Some(MessageLogger::new(path)?),
            None => None,
        };

        let mut client = NeviwebClient {
            http: new_http(self.timeout)?,
            base_url: self.base_url,
            timeout: self.timeout,
            credentials: Credentials {
                email: self.email,
                password: self.password,
            },
            gateway_name: self.gateway,
            gateway_id: 0,
            session_id: String::new(),
            logger,
        };
        client.login_session().await?;
        client.gateway_id = client.resolve_gateway().await?;
        Ok(client)
    }
}

#[derive(Debug)]
pub struct NeviwebClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    credentials: Credentials,
    gateway_name: String,
    gateway_id: u64,
    session_id: String,
    logger: Option<MessageLogger>,
}

impl NeviwebClient {
    pub fn builder(
        email: impl Into<String>,
        password: impl Into<String>,
        gateway: impl Into<String>,
    ) -> NeviwebClientBuilder {
        NeviwebClientBuilder::new(email, password, gateway)
    }

    pub fn gateway_id(&self) -> u64 {
        self.gateway_id
    }

    /// List the devices attached to the resolved gateway.
    pub async fn list_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        let path = device_list_path(self.gateway_id);
        if let Some(ref mut logger) = self.logger {
            logger.log_request("GET", &path);
        }
        let url = format!("{}{}", self.base_url, path);
        let resp = self.send_authed(|http| http.get(&url)).await?;
        Ok(resp.json().await?)
    }

    /// Fetch current telemetry for one device.
    pub async fn fetch_device_data(&mut self, device_id: u64) -> Result<DeviceData> {
        let path = device_data_path(device_id);
        if let Some(ref mut logger) = self.logger {
            logger.log_request("GET", &path);
        }
        let url = format!("{}{}", self.base_url, path);
        let resp = self.send_authed(|http| http.get(&url)).await?;
        Ok(resp.json().await?)
    }

    /// Fetch the device list, then telemetry for each device in turn.
    /// One failing device fails the whole refresh; the caller decides
    /// whether to keep an older snapshot.
    pub async fn fetch_all(&mut self) -> Result<Snapshot> {
        let devices = self.list_devices().await?;
        let mut snapshot = Snapshot::with_capacity(devices.len());
        for info in devices {
            let data = self.fetch_device_data(info.id).await?;
            snapshot.insert(info.id, DeviceRecord { info, data });
        }
        debug!(devices = snapshot.len(), "fetched device snapshot");
        if let Some(ref mut logger) = self.logger {
            logger.log_refresh(snapshot.len());
        }
        Ok(snapshot)
    }

    /// Write a target setpoint. The server's answer carries no usable
    /// body, so the write is not verified here; callers treat their own
    /// state update as optimistic.
    pub async fn set_temperature(&mut self, device_id: u64, temperature: f64) -> Result<()> {
        let path = device_setpoint_path(device_id);
        if let Some(ref mut logger) = self.logger {
            logger.log_command("set_temperature", device_id, temperature);
        }
        let url = format!("{}{}", self.base_url, path);
        let form = SetpointForm { temperature };
        self.send_authed(|http| http.put(&url).form(&form)).await?;
        Ok(())
    }

    async fn login_session(&mut self) -> Result<()> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        debug!(url = %url, "logging in");
        if let Some(ref mut logger) = self.logger {
            logger.log_request("POST", LOGIN_PATH);
        }

        let form = LoginForm {
            email: &self.credentials.email,
            password: &self.credentials.password,
            stay_connected: 1,
        };
        let resp = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Authentication(format!("login request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication(format!(
                "login rejected with status {status}"
            )));
        }

        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| Error::Authentication(format!("malformed login response: {e}")))?;
        self.session_id = body
            .session
            .ok_or_else(|| Error::Protocol("login response missing session field".to_string()))?;
        Ok(())
    }

    async fn resolve_gateway(&mut self) -> Result<u64> {
        if let Some(ref mut logger) = self.logger {
            logger.log_request("GET", GATEWAY_PATH);
        }
        let url = format!("{}{}", self.base_url, GATEWAY_PATH);
        let resp = self.send_authed(|http| http.get(&url)).await?;
        let gateways: Vec<Gateway> = resp.json().await?;

        gateways
            .iter()
            .find(|g| g.name == self.gateway_name)
            .map(|g| g.id)
            .ok_or_else(|| Error::GatewayNotFound(self.gateway_name.clone()))
    }

    /// Session cookies live in the HTTP client's jar, so a fresh login
    /// starts from a fresh client rather than merging cookies across
    /// sessions.
    async fn relogin(&mut self) -> Result<()> {
        self.http = new_http(self.timeout)?;
        self.login_session().await
    }

    /// Send an authenticated request. A 401/403 answer triggers exactly
    /// one re-login followed by a retry of the same request; any other
    /// non-success status is an error.
    async fn send_authed<B>(&mut self, build: B) -> Result<reqwest::Response>
    where
        B: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let resp = build(&self.http)
            .header(SESSION_HEADER, self.session_id.as_str())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(%status, "session rejected, logging in again");
            self.relogin().await?;
            let resp = build(&self.http)
                .header(SESSION_HEADER, self.session_id.as_str())
                .send()
                .await?;
            return Ok(resp.error_for_status()?);
        }

        trace!(%status, "request complete");
        Ok(resp.error_for_status()?)
    }
}

fn new_http(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = NeviwebClient::builder("a@b.c", "pw", "Home");
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert_eq!(builder.timeout, Duration::from_secs(15));
        assert!(builder.log_path.is_none());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let builder =
            NeviwebClient::builder("a@b.c", "pw", "Home").base_url("http://127.0.0.1:8080/");
        assert_eq!(builder.base_url, "http://127.0.0.1:8080");
    }
}
