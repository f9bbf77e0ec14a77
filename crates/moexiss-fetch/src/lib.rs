//! HTTP client, passport authentication, and XML extraction for the MOEX ISS.
//!
//! This crate provides the data-access layer:
//!
//! - [`Authenticator`] - MOEX Passport login producing a [`Session`]
//! - [`IssClient`] - reference lists and paginated end-of-day history
//! - [`url::Endpoints`] - ISS URL templates
//! - [`xml`] - block, rows, and attribute extraction from ISS replies
//!
//! Requests are issued one at a time; every operation awaits each reply
//! before sending the next request.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod client;
mod history;
mod reference;
pub mod url;
pub mod xml;

pub use auth::{Authenticator, PassportCookie, Session, SessionCookies, SessionState};
pub use client::{ClientConfig, FetchError, IssClient};
pub use history::HISTORY_BLOCK;
