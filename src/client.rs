//! Blocking HTTP client for the EPH Ember cloud API.
//!
//! - Blocking client using `ureq` (no async).
//! - Uses the wire types in `crate::models::ember`.
//! - Covers login, home listing, zone polling and the three zone commands
//!   (boost, cancel boost, set target temperature).
//!
//! Authentication
//! - A single password login. The returned token is sent verbatim in the
//!   `Authorization` header of every later request (no `Bearer ` prefix).
//!   The service also hands out a refresh token, but no refresh grant is
//!   known; once a session expires server-side, logging in again is the only
//!   recovery.
//!
//! The client keeps two in-memory caches: the home list survives after the
//! first successful fetch, the zone list is replaced wholesale by every poll.
//! State lives in `RefCell`s, so a client cannot be shared across threads;
//! issue requests sequentially.

use log::debug;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::time::Duration;

use crate::models::ember::{Credentials, DataEnvelope, GatewayId, Home, Zone, ZoneId};

pub const BASE_URL: &str = "https://eu-https.topband-cloud.com/ember-back/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const EP_LOGIN: &str = "appLogin/login";
const EP_HOMES_LIST: &str = "homes/list";
const EP_ZONES_POLLING: &str = "zones/polling";
const EP_ZONES_BOOST: &str = "zones/boost";
const EP_ZONES_CANCEL_BOOST: &str = "zones/cancelBoost";
const EP_ZONES_SET_TARGET_TEMPERATURE: &str = "zones/setTargetTemperature";

#[derive(Debug)]
pub enum EmberClientError {
    /// An authenticated endpoint was called before a successful `login`.
    MissingAuth,
    /// Login failed, whatever the underlying reason (network, status, decode).
    Auth(String),
    Transport {
        endpoint: &'static str,
        message: String,
    },
    Http {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    Decode {
        endpoint: &'static str,
        detail: String,
        body: String,
    },
}

impl core::fmt::Display for EmberClientError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EmberClientError::MissingAuth => write!(f, "not logged in: call login() before issuing requests"),
            EmberClientError::Auth(s) => write!(f, "authentication failed: {}", s),
            EmberClientError::Transport { endpoint, message } => {
                write!(f, "{}: transport error: {}", endpoint, message)
            }
            EmberClientError::Http { endpoint, status, body } => {
                write!(f, "{}: http {}: {}", endpoint, status, body)
            }
            EmberClientError::Decode { endpoint, detail, body } => {
                write!(f, "{}: decode error: {} (body: {})", endpoint, detail, body)
            }
        }
    }
}

impl std::error::Error for EmberClientError {}

pub struct EmberClient {
    agent: ureq::Agent,
    base_url: String,
    /// Set by `login`, replaced by a later `login`, never refreshed.
    session: RefCell<Option<Credentials>>,
    /// First successful fetch wins; see `list_homes` / `refresh_homes`.
    homes: RefCell<Option<Vec<Home>>>,
    /// Replaced wholesale by every `get_zones`.
    zones: RefCell<Vec<Zone>>,
}

impl EmberClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Client against a non-default base URL (tests, region-specific hosts).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        EmberClient {
            agent,
            base_url: base_url.into(),
            session: RefCell::new(None),
            homes: RefCell::new(None),
            zones: RefCell::new(Vec::new()),
        }
    }

    fn url(&self, path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Authenticate against the service and store the session token.
    ///
    /// Any failure (network, non-2xx status, undecodable body, missing token)
    /// surfaces as [`EmberClientError::Auth`]. The response caches are left
    /// untouched.
    pub fn login(&self, username: &str, password: &str) -> Result<(), EmberClientError> {
        let resp = self
            .agent
            .post(&self.url(EP_LOGIN))
            .set("Accept", "application/json")
            .send_json(serde_json::json!({ "userName": username, "password": password }));

        let text = Self::read_success(EP_LOGIN, resp).map_err(|e| EmberClientError::Auth(e.to_string()))?;
        let login: DataEnvelope<Credentials> =
            decode(EP_LOGIN, &text).map_err(|e| EmberClientError::Auth(e.to_string()))?;
        if login.data.token.is_empty() {
            return Err(EmberClientError::Auth("login response contained an empty token".to_string()));
        }

        debug!(
            "{}: session established (refresh token present: {})",
            EP_LOGIN,
            !login.data.refresh_token.is_empty()
        );
        *self.session.borrow_mut() = Some(login.data);
        Ok(())
    }

    /// The user's homes (gateways).
    ///
    /// Served from the cache after the first successful fetch; the cache is
    /// populated whole-list-or-nothing, so a decode failure leaves it empty
    /// and the next call queries the service again.
    pub fn list_homes(&self) -> Result<Vec<Home>, EmberClientError> {
        if let Some(cached) = self.homes.borrow().as_ref() {
            debug!("{}: served {} home(s) from cache", EP_HOMES_LIST, cached.len());
            return Ok(cached.clone());
        }

        let homes: Vec<Home> = self.get_data(EP_HOMES_LIST)?;
        *self.homes.borrow_mut() = Some(homes.clone());
        Ok(homes)
    }

    /// Drop the home cache and fetch a fresh list.
    pub fn refresh_homes(&self) -> Result<Vec<Home>, EmberClientError> {
        self.homes.borrow_mut().take();
        self.list_homes()
    }

    /// Poll the zones of one gateway. Always hits the service; the zone cache
    /// backing [`EmberClient::zone_by_name`] is replaced, not merged.
    pub fn get_zones(&self, gateway_id: &GatewayId) -> Result<Vec<Zone>, EmberClientError> {
        // the service spells this key with a capital W, unlike every other key
        let body = serde_json::json!({ "gateWayId": gateway_id });
        let zones: Vec<Zone> = self.post_data(EP_ZONES_POLLING, body)?;
        *self.zones.borrow_mut() = zones.clone();
        Ok(zones)
    }

    /// Temporarily override a zone's target temperature for `hours` hours.
    /// Only completion is reported; the response body is not interpreted.
    pub fn boost_zone(&self, zone_id: ZoneId, hours: i64, temperature: i64) -> Result<(), EmberClientError> {
        self.post_command(
            EP_ZONES_BOOST,
            serde_json::json!({ "zoneid": zone_id, "hours": hours, "temperature": temperature }),
        )
    }

    pub fn deactivate_boost_for_zone(&self, zone_id: ZoneId) -> Result<(), EmberClientError> {
        self.post_command(EP_ZONES_CANCEL_BOOST, serde_json::json!({ "zoneid": zone_id }))
    }

    /// Change a zone's persistent target temperature. Callers should check
    /// the result: unlike a boost this survives until changed back.
    pub fn set_target_temperature_for_zone(
        &self,
        zone_id: ZoneId,
        temperature: i64,
    ) -> Result<(), EmberClientError> {
        self.post_command(
            EP_ZONES_SET_TARGET_TEMPERATURE,
            serde_json::json!({ "zoneid": zone_id, "temperature": temperature }),
        )
    }

    /// First zone with exactly this name from the most recent `get_zones`
    /// poll. Returns a zero-valued `Zone` (zone id 0) when there is no match;
    /// not an error.
    pub fn zone_by_name(&self, name: &str) -> Zone {
        self.zones
            .borrow()
            .iter()
            .find(|z| z.name == name)
            .cloned()
            .unwrap_or_default()
    }

    fn auth_token(&self) -> Result<String, EmberClientError> {
        match self.session.borrow().as_ref() {
            Some(c) if !c.token.is_empty() => Ok(c.token.clone()),
            _ => Err(EmberClientError::MissingAuth),
        }
    }

    fn authed(&self, req: ureq::Request) -> Result<ureq::Request, EmberClientError> {
        let token = self.auth_token()?;
        // the token goes in verbatim; the service rejects a "Bearer " prefix
        Ok(req
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set("Authorization", &token))
    }

    fn get_data<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, EmberClientError> {
        let req = self.authed(self.agent.get(&self.url(endpoint)))?;
        let text = Self::read_success(endpoint, req.call())?;
        let envelope: DataEnvelope<T> = decode(endpoint, &text)?;
        Ok(envelope.data)
    }

    fn post_data<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: serde_json::Value,
    ) -> Result<T, EmberClientError> {
        let req = self.authed(self.agent.post(&self.url(endpoint)))?;
        let text = Self::read_success(endpoint, req.send_json(body))?;
        let envelope: DataEnvelope<T> = decode(endpoint, &text)?;
        Ok(envelope.data)
    }

    fn post_command(&self, endpoint: &'static str, body: serde_json::Value) -> Result<(), EmberClientError> {
        let req = self.authed(self.agent.post(&self.url(endpoint)))?;
        let text = Self::read_success(endpoint, req.send_json(body))?;
        debug!("{} response: {}", endpoint, text);
        Ok(())
    }

    fn read_success(
        endpoint: &'static str,
        resp: Result<ureq::Response, ureq::Error>,
    ) -> Result<String, EmberClientError> {
        match resp {
            Ok(r) => r.into_string().map_err(|e| EmberClientError::Transport {
                endpoint,
                message: format!("reading response body: {}", e),
            }),
            Err(ureq::Error::Transport(t)) => Err(EmberClientError::Transport {
                endpoint,
                message: t.to_string(),
            }),
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_else(|_| String::from("<no body>"));
                Err(EmberClientError::Http { endpoint, status, body })
            }
        }
    }
}

impl Default for EmberClient {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, EmberClientError> {
    let mut de = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut de).map_err(|e| EmberClientError::Decode {
        endpoint,
        detail: e.to_string(),
        body: body.to_string(),
    })
}
