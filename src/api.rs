//! REST client for the users collection
//!
//! The backend is a generic CRUD server (json-server): collections are
//! filtered by query string, records replaced wholesale by PUT. There is
//! no retry, backoff or batching.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::User;

/// Operations the auth layer needs from the backend
#[async_trait]
pub trait UserBackend: Send + Sync {
    /// `GET /users?email=`
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>>;

    /// `GET /users?email=&password=`
    async fn find_by_credentials(&self, email: &str, password: &str) -> Result<Vec<User>>;

    /// `POST /users`
    async fn create_user(&self, user: &User) -> Result<User>;

    /// `GET /users/:id`
    async fn get_user(&self, id: u64) -> Result<User>;

    /// `PUT /users/:id` with the full object
    async fn replace_user(&self, user: &User) -> Result<User>;
}

/// HTTP implementation over reqwest
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the given backend root
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .gzip(true)
            .use_rustls_tls()
            .build()?;

        let mut base = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {base_url}: {e}")))?;
        // Url::join drops the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { client, base })
    }

    /// Build from loaded config
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Config(format!("bad endpoint {path}: {e}")))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }

    #[instrument(skip(self, query))]
    async fn get_list(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<User>> {
        let url = self.endpoint(path)?;
        debug!("Querying collection");
        let response = self.client.get(url).query(query).send().await?;
        let users: Vec<User> = Self::decode(response).await?;
        info!(matches = users.len(), "Collection query returned");
        Ok(users)
    }
}

#[async_trait]
impl UserBackend for ApiClient {
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>> {
        self.get_list("users", &[("email", email)]).await
    }

    async fn find_by_credentials(&self, email: &str, password: &str) -> Result<Vec<User>> {
        self.get_list("users", &[("email", email), ("password", password)])
            .await
    }

    #[instrument(skip(self, user), fields(id = user.id))]
    async fn create_user(&self, user: &User) -> Result<User> {
        let url = self.endpoint("users")?;
        let response = self.client.post(url).json(user).send().await?;
        let created: User = Self::decode(response).await?;
        info!("User created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: u64) -> Result<User> {
        let url = self.endpoint(&format!("users/{id}"))?;
        let response = self.client.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("user {id}")));
        }
        Self::decode(response).await
    }

    #[instrument(skip(self, user), fields(id = user.id))]
    async fn replace_user(&self, user: &User) -> Result<User> {
        let url = self.endpoint(&format!("users/{}", user.id))?;
        let response = self.client.put(url).json(user).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("user {}", user.id)));
        }
        let updated: User = Self::decode(response).await?;
        info!("User replaced");
        Ok(updated)
    }
}

/// In-memory users collection with json-server filter semantics
#[derive(Debug, Default)]
pub struct MemoryBackend {
    users: Mutex<Vec<User>>,
    writes: Mutex<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            writes: Mutex::new(0),
        }
    }

    /// Snapshot of the collection
    pub fn users(&self) -> Vec<User> {
        self.users.lock().map(|u| u.clone()).unwrap_or_default()
    }

    /// Number of POST/PUT calls served
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    fn collection(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>> {
        self.users
            .lock()
            .map_err(|_| ClientError::Storage("backend poisoned".to_string()))
    }

    fn record_write(&self) {
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
    }
}

#[async_trait]
impl UserBackend for MemoryBackend {
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>> {
        Ok(self
            .collection()?
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn find_by_credentials(&self, email: &str, password: &str) -> Result<Vec<User>> {
        Ok(self
            .collection()?
            .iter()
            .filter(|u| u.email == email && u.password == password)
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        self.record_write();
        self.collection()?.push(user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        self.collection()?
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("user {id}")))
    }

    async fn replace_user(&self, user: &User) -> Result<User> {
        self.record_write();
        let mut users = self.collection()?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| ClientError::NotFound(format!("user {}", user.id)))?;
        *slot = user.clone();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, email: &str, password: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Test",
            "email": email,
            "organization": "Org",
            "password": password,
            "token": format!("token_{id}_{id}")
        }))
        .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/api", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint("users").unwrap().as_str(), "http://localhost:3000/api/users");

        let root = ApiClient::new("http://localhost:3000", Duration::from_secs(5)).unwrap();
        assert_eq!(root.endpoint("users/7").unwrap().as_str(), "http://localhost:3000/users/7");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = ApiClient::new("not a url", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[tokio::test]
    async fn memory_backend_filters_like_json_server() {
        let backend = MemoryBackend::with_users(vec![
            user(1, "a@b.com", "secret1"),
            user(2, "c@d.com", "hunter2"),
        ]);
        assert_eq!(backend.find_by_email("a@b.com").await.unwrap().len(), 1);
        assert_eq!(
            backend.find_by_credentials("a@b.com", "secret1").await.unwrap()[0].id,
            1
        );
        assert!(backend.find_by_credentials("a@b.com", "wrong").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_backend_put_replaces_and_404s() {
        let backend = MemoryBackend::with_users(vec![user(1, "a@b.com", "x")]);
        let mut changed = backend.get_user(1).await.unwrap();
        changed.name = "Renamed".to_string();
        backend.replace_user(&changed).await.unwrap();
        assert_eq!(backend.get_user(1).await.unwrap().name, "Renamed");
        assert_eq!(backend.write_count(), 1);

        let missing = user(9, "z@z.com", "x");
        assert!(matches!(
            backend.replace_user(&missing).await,
            Err(ClientError::NotFound(_))
        ));
    }
}
