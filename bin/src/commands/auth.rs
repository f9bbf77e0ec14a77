//! Auth command implementation.
//!
//! Logs in once and prints the passport outcome, the way a login form
//! reports status code, status text, and the real-time flag.

use crate::ConnectionArgs;
use anyhow::Result;
use moexiss_lib::prelude::*;
use tracing::debug;

/// Authenticate and report the result.
pub(crate) async fn auth(connection: &ConnectionArgs) -> Result<()> {
    let credentials = connection.credentials()?;
    let auth = Authenticator::new(&connection.client_config())?;

    let mut session = auth.authenticate(credentials).await;
    let real_time = auth.is_real_time(&mut session).await;
    debug!(state = ?session.state(), "session checked");

    let result = session.auth_result();
    println!("Status code: {}", result.status);
    println!("Status text: {}", result.message);
    println!("Real-time:   {real_time}");
    if let Some(passport) = session.passport() {
        match passport.expires {
            Some(expires) => println!("Expires:     {}", expires.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Expires:     end of session"),
        }
    }

    Ok(())
}
