//! Redirect handling.
//!
//! reqwest fixes the redirect policy when a client is built, so the engine
//! keeps one immutable client per policy and picks one for each call. No
//! call ever mutates a shared transport, which keeps concurrent dispatch
//! safe even though the engine is normally driven one request at a time.

use reqwest::Client;

use crate::config::{build_client, EngineConfig};
use crate::error::HttpError;

/// Whether 3xx responses are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectPolicy {
    /// Follow redirects using the transport's default chain limit.
    #[default]
    Follow,
    /// Return the first response received, 3xx included.
    None,
}

impl RedirectPolicy {
    /// Policy for a `follow_redirects` flag.
    pub fn from_follow(follow: bool) -> Self {
        if follow {
            Self::Follow
        } else {
            Self::None
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::redirect::Policy {
        match self {
            Self::Follow => reqwest::redirect::Policy::default(),
            Self::None => reqwest::redirect::Policy::none(),
        }
    }
}

/// One transport per redirect policy, sharing every other setting.
#[derive(Debug, Clone)]
pub struct Transports {
    follow: Client,
    no_follow: Client,
}

impl Transports {
    /// Build both transports from the engine configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, HttpError> {
        Ok(Self {
            follow: build_client(config, RedirectPolicy::Follow)?,
            no_follow: build_client(config, RedirectPolicy::None)?,
        })
    }

    /// Transport for the given policy.
    pub fn for_policy(&self, policy: RedirectPolicy) -> &Client {
        match policy {
            RedirectPolicy::Follow => &self.follow,
            RedirectPolicy::None => &self.no_follow,
        }
    }
}
