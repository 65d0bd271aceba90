//! Session state container
//!
//! Holds the signed-in user and token, mirrors them into device storage
//! and rehydrates them at launch. Every operation follows the same
//! lifecycle: mark loading, clear the previous error, run, then record
//! either the new state or the failure message.

use std::path::Path;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::api::UserBackend;
use crate::clock::{iso_now, IdSource};
use crate::error::{ClientError, Result};
use crate::models::{Credentials, ProfileUpdate, SessionUser, SignupRequest, User};
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Loose email shape check used by the forms
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    /// Message of the last failed operation
    pub error: Option<String>,
    /// Set once the stored session has been checked
    pub is_initialized: bool,
}

/// Auth state bound to a backend and a device store
pub struct AuthStore<B, S> {
    backend: B,
    store: S,
    state: AuthState,
    ids: IdSource,
}

impl<B: UserBackend, S: KeyValueStore> AuthStore<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            state: AuthState::default(),
            ids: IdSource::new(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Drop the in-memory session without touching storage
    pub fn reset(&mut self) {
        let initialized = self.state.is_initialized;
        self.state = AuthState {
            is_initialized: initialized,
            ..AuthState::default()
        };
    }

    fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    fn fail<T>(&mut self, err: ClientError) -> Result<T> {
        warn!(error = %err, "Auth operation failed");
        self.state.is_loading = false;
        self.state.error = Some(err.to_string());
        Err(err)
    }

    /// Rehydrate the session persisted by a previous run
    pub fn check_auth_state(&mut self) -> Result<Option<SessionUser>> {
        self.state.is_loading = true;
        let loaded = self.load_persisted();
        self.state.is_loading = false;
        self.state.is_initialized = true;

        match loaded {
            Ok(Some((token, user))) => {
                info!(user_id = user.id, "Session restored");
                self.state.user = Some(user.clone());
                self.state.token = Some(token);
                self.state.is_authenticated = true;
                Ok(Some(user))
            }
            Ok(None) => {
                debug!("No stored session");
                self.state.user = None;
                self.state.token = None;
                self.state.is_authenticated = false;
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "Failed to check auth state");
                self.state.user = None;
                self.state.token = None;
                self.state.is_authenticated = false;
                self.state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn load_persisted(&self) -> Result<Option<(String, SessionUser)>> {
        let token = self
            .store
            .get_item(TOKEN_KEY)?
            .filter(|t| !t.is_empty());
        let user: Option<SessionUser> = self.store.get_json(USER_KEY)?;
        Ok(token.zip(user))
    }

    fn persist(&self, token: &str, user: &SessionUser) -> Result<()> {
        self.store.set_item(TOKEN_KEY, token)?;
        self.store.set_json(USER_KEY, user)
    }

    /// Look the user up by email and password. The first match wins.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<User> {
        self.begin();
        let result = self.try_login(credentials).await;
        match result {
            Ok(user) => {
                let session = SessionUser::from(&user);
                self.state.user = Some(session);
                self.state.token = Some(user.token.clone());
                self.state.is_authenticated = true;
                self.state.is_loading = false;
                info!(user_id = user.id, "Logged in");
                Ok(user)
            }
            Err(err) => self.fail(err),
        }
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<User> {
        let email = credentials.email.trim();
        if email.is_empty() || credentials.password.trim().is_empty() {
            return Err(ClientError::validation("Email and password are required"));
        }

        debug!(email, "Searching for user");
        let mut matches = self
            .backend
            .find_by_credentials(email, &credentials.password)
            .await?;
        if matches.is_empty() {
            return Err(ClientError::InvalidCredentials);
        }
        let user = matches.swap_remove(0);

        self.persist(&user.token, &SessionUser::from(&user))?;
        Ok(user)
    }

    /// Create an account. The new user still has to log in afterwards.
    pub async fn signup(&mut self, request: &SignupRequest) -> Result<User> {
        self.begin();
        let result = self.try_signup(request).await;
        match result {
            Ok(user) => {
                self.state.user = Some(SessionUser::from(&user));
                self.state.token = Some(user.token.clone());
                self.state.is_authenticated = false;
                self.state.is_loading = false;
                info!(user_id = user.id, "Signed up");
                Ok(user)
            }
            Err(err) => self.fail(err),
        }
    }

    async fn try_signup(&self, request: &SignupRequest) -> Result<User> {
        let name = request.name.trim();
        let email = request.email.trim();
        let organization = request.organization.trim();
        if name.is_empty()
            || email.is_empty()
            || organization.is_empty()
            || request.password.trim().is_empty()
        {
            return Err(ClientError::validation("All fields are required"));
        }
        if !is_valid_email(email) {
            return Err(ClientError::validation("Please enter a valid email address"));
        }

        if !self.backend.find_by_email(email).await?.is_empty() {
            return Err(ClientError::UserExists);
        }

        let id = self.ids.next();
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            organization: organization.to_string(),
            password: request.password.clone(),
            profile_image: None,
            token: format!("token_{id}_{id}"),
            created_at: Some(iso_now()),
            extra: serde_json::Map::new(),
        };

        let mut created = self.backend.create_user(&user).await?;
        // json-server echoes the body; keep our token if it was dropped
        if created.token.is_empty() {
            created.token = user.token;
        }
        Ok(created)
    }

    /// Forget the session locally. The server record is kept.
    pub fn logout(&mut self) -> Result<()> {
        self.begin();
        let removed = self
            .store
            .remove_item(TOKEN_KEY)
            .and_then(|()| self.store.remove_item(USER_KEY));
        if let Err(err) = removed {
            return self.fail(err);
        }
        self.reset();
        info!("Logged out");
        Ok(())
    }

    /// Fetch the stored record, merge the supplied fields and PUT the
    /// whole object back.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<SessionUser> {
        self.begin();
        let result = self.try_update_profile(update).await;
        match result {
            Ok(session) => {
                self.state.user = Some(session.clone());
                self.state.is_loading = false;
                info!(user_id = session.id, "Profile updated");
                Ok(session)
            }
            Err(err) => self.fail(err),
        }
    }

    async fn try_update_profile(&self, update: &ProfileUpdate) -> Result<SessionUser> {
        let current = self.state.user.as_ref().ok_or(ClientError::NotAuthenticated)?;
        let update = normalize_update(update)?;

        let prior = self.backend.get_user(current.id).await?;
        let merged = update.apply(&prior);
        let saved = self.backend.replace_user(&merged).await?;

        let session = SessionUser::from(&saved);
        self.store.set_json(USER_KEY, &session)?;
        Ok(session)
    }

    /// Replace only the profile photo
    pub async fn set_profile_photo(&mut self, bytes: &[u8], mime: &str) -> Result<SessionUser> {
        let uri = to_data_uri(bytes, mime);
        self.update_profile(&ProfileUpdate::photo(uri)).await
    }
}

fn normalize_update(update: &ProfileUpdate) -> Result<ProfileUpdate> {
    if update.is_empty() {
        return Err(ClientError::validation("Nothing to update"));
    }
    let trimmed = |v: &Option<String>| v.as_deref().map(str::trim).map(str::to_string);
    let normalized = ProfileUpdate {
        name: trimmed(&update.name),
        email: trimmed(&update.email),
        organization: trimmed(&update.organization),
        profile_image: update.profile_image.clone(),
    };

    let blank = [&normalized.name, &normalized.email, &normalized.organization]
        .iter()
        .any(|f| f.as_deref().is_some_and(str::is_empty));
    if blank {
        return Err(ClientError::validation("All fields are required"));
    }
    if let Some(ref email) = normalized.email {
        if !is_valid_email(email) {
            return Err(ClientError::validation("Please enter a valid email address"));
        }
    }
    Ok(normalized)
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Guess an image MIME type from the file extension
pub fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Read an image picked by the user
pub async fn load_profile_photo(path: &Path) -> Result<(Vec<u8>, &'static str)> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok((bytes, image_mime(path))),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Err(
            ClientError::PermissionDenied(format!("cannot access photos at {}", path.display())),
        ),
        Err(e) => Err(e.into()),
    }
}
