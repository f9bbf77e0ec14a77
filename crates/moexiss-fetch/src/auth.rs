//! MOEX Passport authentication and session tracking.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, TimeDelta, Utc};
use hyper::ext::ReasonPhrase;
use moexiss_types::{AuthResult, Credentials, PASSPORT_NOT_FOUND};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{AUTHORIZATION, HeaderValue, SET_COOKIE};
use reqwest::{Client, Response, Url};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{ClientConfig, FetchError};

/// The passport cookie issued after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassportCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Expiry time; `None` for a cookie that lasts as long as the session.
    pub expires: Option<DateTime<Utc>>,
}

impl PassportCookie {
    /// Returns true if the cookie has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Returns true if the cookie has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Validity of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No passport was obtained by the last attempt.
    Pending,
    /// The passport is present and unexpired.
    Valid,
    /// The passport has expired.
    Expired,
}

/// Cookie jar shared between a [`Session`] and the clients built from it.
///
/// Re-authentication swaps the jar's contents in place. Cookies set by ISS
/// replies are ignored, so requests never mutate the session.
#[derive(Debug, Default)]
pub struct SessionCookies {
    jar: RwLock<Jar>,
}

impl SessionCookies {
    fn replace(&self, jar: Jar) {
        *self.jar.write().unwrap_or_else(PoisonError::into_inner) = jar;
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, _cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {}

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .cookies(url)
    }
}

/// An authenticated (or failed) MOEX Passport session.
///
/// Holds the credentials it was created with so that
/// [`Authenticator::is_real_time`] can log in again once the passport expires.
#[derive(Debug)]
pub struct Session {
    credentials: Credentials,
    cookies: Arc<SessionCookies>,
    passport: Option<PassportCookie>,
    result: AuthResult,
}

impl Session {
    /// Returns the outcome of the most recent authentication attempt.
    #[must_use]
    pub const fn auth_result(&self) -> &AuthResult {
        &self.result
    }

    /// Returns the passport cookie, if the last attempt obtained one.
    #[must_use]
    pub const fn passport(&self) -> Option<&PassportCookie> {
        self.passport.as_ref()
    }

    /// Returns a handle to the session's cookie store.
    #[must_use]
    pub fn cookies(&self) -> Arc<SessionCookies> {
        Arc::clone(&self.cookies)
    }

    /// Returns the session state at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        match &self.passport {
            None => SessionState::Pending,
            Some(passport) if passport.is_expired_at(now) => SessionState::Expired,
            Some(_) => SessionState::Valid,
        }
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }
}

struct Attempt {
    jar: Jar,
    passport: Option<PassportCookie>,
    result: AuthResult,
}

impl Attempt {
    fn failed(result: AuthResult) -> Self {
        Self {
            jar: Jar::default(),
            passport: None,
            result,
        }
    }
}

/// Logs in to MOEX Passport and keeps sessions fresh.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: Client,
    auth_url: String,
    reference_uri: Url,
    passport_cookie: String,
}

impl Authenticator {
    /// Creates an authenticator for the endpoints in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference URI is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let reference_uri =
            Url::parse(&config.endpoints.reference_uri).map_err(|e| FetchError::InvalidUrl {
                url: config.endpoints.reference_uri.clone(),
                reason: e.to_string(),
            })?;

        // No cookie store: nothing from earlier requests may reach the auth endpoint.
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            auth_url: config.endpoints.auth.clone(),
            reference_uri,
            passport_cookie: config.passport_cookie.clone(),
        })
    }

    /// Creates an authenticator for the production MOEX Passport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(&ClientConfig::default())
    }

    /// Logs in with `credentials`.
    ///
    /// Never fails: transport errors, error statuses, and a missing passport
    /// are all recorded in [`Session::auth_result`].
    pub async fn authenticate(&self, credentials: Credentials) -> Session {
        let attempt = self.attempt(&credentials).await;
        let cookies = SessionCookies::default();
        cookies.replace(attempt.jar);

        Session {
            credentials,
            cookies: Arc::new(cookies),
            passport: attempt.passport,
            result: attempt.result,
        }
    }

    /// Logs in again with the session's stored credentials, updating it in place.
    pub async fn reauthenticate(&self, session: &mut Session) {
        let attempt = self.attempt(&session.credentials).await;
        session.cookies.replace(attempt.jar);
        session.passport = attempt.passport;
        session.result = attempt.result;
    }

    /// Returns true if the session may access real-time and historical data.
    ///
    /// If the passport is missing or expired the session is re-authenticated
    /// first. A valid session triggers no requests.
    pub async fn is_real_time(&self, session: &mut Session) -> bool {
        if session.state() != SessionState::Valid {
            debug!(state = ?session.state(), "passport missing or expired, re-authenticating");
            self.reauthenticate(session).await;
        }

        session.state() == SessionState::Valid
            && session
                .passport
                .as_ref()
                .is_some_and(|passport| passport.name == self.passport_cookie)
    }

    async fn attempt(&self, credentials: &Credentials) -> Attempt {
        let authorization = match basic_authorization(credentials) {
            Ok(value) => value,
            Err(e) => return Attempt::failed(AuthResult::transport_failure(e.to_string())),
        };

        let response = match self
            .client
            .get(&self.auth_url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "passport authentication failed");
                return Attempt::failed(AuthResult::transport_failure(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let reason = reason_phrase(&response);
            warn!(status = status.as_u16(), %reason, "passport authentication rejected");
            return Attempt::failed(AuthResult::new(status.as_u16(), reason));
        }

        let jar = Jar::default();
        let origin = response.url().clone();
        for header in response.headers().get_all(SET_COOKIE) {
            if let Ok(cookie) = header.to_str() {
                jar.add_cookie_str(cookie, &origin);
            }
        }

        let passport = self.find_passport(&jar, &response);
        let message = if passport.is_some() {
            info!(user = credentials.username(), "passport obtained");
            "OK"
        } else {
            warn!(user = credentials.username(), "no passport cookie in auth reply");
            PASSPORT_NOT_FOUND
        };

        Attempt {
            jar,
            passport,
            result: AuthResult::new(status.as_u16(), message),
        }
    }

    /// Picks the passport out of the cookies the jar would send to the reference URI.
    fn find_passport(&self, jar: &Jar, response: &Response) -> Option<PassportCookie> {
        let header = jar.cookies(&self.reference_uri)?;
        let value = header
            .to_str()
            .ok()?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.passport_cookie)
            .map(|(_, value)| value.to_string())?;

        let expires = response
            .cookies()
            .filter(|cookie| cookie.name() == self.passport_cookie)
            .last()
            .and_then(|cookie| cookie_expiry(cookie.max_age(), cookie.expires()));

        Some(PassportCookie {
            name: self.passport_cookie.clone(),
            value,
            expires,
        })
    }
}

/// The status text the server sent, falling back to the canonical phrase.
fn reason_phrase(response: &Response) -> String {
    // hyper only records the phrase when it differs from the canonical one
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string(),
    }
}

/// Builds `Basic base64(username:password)`.
fn basic_authorization(
    credentials: &Credentials,
) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
    let token = STANDARD.encode(format!(
        "{}:{}",
        credentials.username(),
        credentials.password()
    ));
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// `Max-Age` takes precedence over `Expires`.
fn cookie_expiry(
    max_age: Option<Duration>,
    expires: Option<std::time::SystemTime>,
) -> Option<DateTime<Utc>> {
    match max_age {
        Some(max_age) => TimeDelta::from_std(max_age)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta)),
        None => expires.map(DateTime::<Utc>::from),
    }
}
