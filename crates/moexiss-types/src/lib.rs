//! Core types for the moexiss ISS market data client.
//!
//! This crate provides the data structures shared across moexiss:
//!
//! - [`Credentials`] / [`AuthResult`] - MOEX Passport login and its outcome
//! - [`ReferenceKind`] / [`ReferenceRequest`] / [`ReferenceEntry`] - reference lists
//! - [`HistoryRow`] / [`HistoryQuery`] / [`IssDate`] - end-of-day history
//! - [`ResultSink`] / [`DataHandler`] - collectors for extracted rows

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod error;
mod history;
mod reference;
mod sink;

pub use auth::{AuthResult, BAD_REQUEST, Credentials, PASSPORT_NOT_FOUND};
pub use error::{DateError, MoexIssError, Result};
pub use history::{HistoryQuery, HistoryRow, IssDate};
pub use reference::{ReferenceEntry, ReferenceKind, ReferenceRequest};
pub use sink::{DataHandler, ResultSink};
