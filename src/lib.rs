//! Client for the EPH Controls "Ember" home-heating cloud service.
//!
//! [`client::EmberClient`] logs in with account credentials, lists the
//! account's homes (gateways), polls per-zone thermostat state and issues
//! zone commands. See `src/main.rs` for a small end-to-end consumer.

pub mod models {
    pub mod ember;
}

pub mod client;
pub mod config;
