//! Client library for the Moscow Exchange ISS.
//!
//! This is a facade crate that re-exports the moexiss workspace crates.
//!
//! # Quick Start
//!
//! ```ignore
//! use moexiss_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let auth = Authenticator::new(&config)?;
//!     let mut session = auth.authenticate(Credentials::new("user", "secret")).await;
//!     if !auth.is_real_time(&mut session).await {
//!         return Err(session.auth_result().to_string().into());
//!     }
//!
//!     let client = IssClient::with_session(config, &session)?;
//!     let date: IssDate = "2024-03-05".parse()?;
//!     let mut handler = DataHandler::new();
//!     client
//!         .fetch_history(&HistoryQuery::new("stock", "shares", "TQBR", date), &mut handler)
//!         .await?;
//!
//!     for row in &handler.history {
//!         println!("{} {} {}", row.secid, row.close_price, row.num_trades);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use moexiss_types::*;

#[cfg(feature = "fetch")]
pub use moexiss_fetch::{
    Authenticator, ClientConfig, FetchError, HISTORY_BLOCK, IssClient, PassportCookie, Session,
    SessionCookies, SessionState, url, xml,
};

/// Prelude module for convenient imports.
///
/// ```
/// use moexiss_lib::prelude::*;
/// ```
pub mod prelude {
    pub use moexiss_types::{
        AuthResult, Credentials, DataHandler, HistoryQuery, HistoryRow, IssDate, MoexIssError,
        ReferenceEntry, ReferenceKind, ReferenceRequest, Result, ResultSink,
    };

    #[cfg(feature = "fetch")]
    pub use moexiss_fetch::{
        Authenticator, ClientConfig, FetchError, IssClient, Session, SessionState,
    };
}
