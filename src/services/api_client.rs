//! HTTP implementation of the profile services
//!
//! Talks to the JSON REST backend configured in `AppConfig`. Every remote call
//! is a single attempt; failures are converted to `ProfileError` at the trait
//! boundary and left to the caller to log.

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ActivityService, ImageService, PostService, UserService};
use crate::errors::{ProfileError, ProfileResult};
use crate::models::{Post, User};
use crate::stores::auth_store::SessionStore;
use crate::stores::settings_store::AppConfig;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
struct PostsPage {
    posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct FollowingStatus {
    following: bool,
}

#[derive(Debug, Deserialize)]
struct FollowResult {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct FollowCounts {
    followers: u64,
    following: u64,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    page_size: usize,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn user_path(user_id: &str, suffix: &str) -> String {
        let id = urlencoding::encode(user_id);
        if suffix.is_empty() {
            format!("users/{}", id)
        } else {
            format!("users/{}/{}", id, suffix)
        }
    }

    /// Where an avatar reference points: absolute URLs pass through, bare refs go to the file store
    fn avatar_url(&self, avatar_ref: &str) -> String {
        if avatar_ref.starts_with("http://") || avatar_ref.starts_with("https://") {
            avatar_ref.to_string()
        } else {
            self.endpoint(&format!("files/{}", urlencoding::encode(avatar_ref)))
        }
    }

    fn viewer_query(&self) -> Vec<(&'static str, String)> {
        self.session
            .current_user_id()
            .map(|id| vec![("viewer", id)])
            .unwrap_or_default()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, String> {
        let url = self.endpoint(path);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("API returned status: {}", response.status()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response from {}: {}", url, e))
    }

    async fn change_follow(&self, user: &User, follow: bool) -> Result<bool, String> {
        let url = self.endpoint(&Self::user_path(&user.id, "follow"));
        let request = if follow {
            self.http.post(&url)
        } else {
            self.http.delete(&url)
        };

        let response = request
            .query(&self.viewer_query())
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("API returned status: {}", response.status()));
        }

        let result: FollowResult = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse follow result: {}", e))?;
        Ok(result.success)
    }
}

/// Encode raw image bytes as a `data:` URL
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[async_trait(?Send)]
impl UserService for ApiClient {
    async fn fetch_user(&self, user_id: &str) -> ProfileResult<User> {
        let mut user: User = self
            .get_json(&Self::user_path(user_id, ""), &[])
            .await
            .map_err(ProfileError::RemoteFetchFailed)?;
        user.is_current_user |= self.session.current_user_id().as_deref() == Some(user.id.as_str());
        Ok(user)
    }
}

#[async_trait(?Send)]
impl PostService for ApiClient {
    async fn load_posts(&self, user: &User) -> ProfileResult<Vec<Post>> {
        self.load_paged_posts(user, 0).await
    }

    async fn load_paged_posts(&self, user: &User, offset: usize) -> ProfileResult<Vec<Post>> {
        let query = [
            ("offset", offset.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        let page: PostsPage = self
            .get_json(&Self::user_path(&user.id, "posts"), &query)
            .await
            .map_err(ProfileError::RemoteFetchFailed)?;
        log::debug!("Loaded {} posts for {} at offset {}", page.posts.len(), user.id, offset);
        Ok(page.posts)
    }
}

#[async_trait(?Send)]
impl ActivityService for ApiClient {
    async fn check_is_following(&self, user: &User) -> ProfileResult<bool> {
        let status: FollowingStatus = self
            .get_json(&Self::user_path(&user.id, "following-status"), &self.viewer_query())
            .await
            .map_err(ProfileError::RemoteFetchFailed)?;
        Ok(status.following)
    }

    async fn follow_user_eventually(&self, user: &User) -> ProfileResult<bool> {
        self.change_follow(user, true)
            .await
            .map_err(ProfileError::RemoteFetchFailed)
    }

    async fn unfollow_user_eventually(&self, user: &User) -> ProfileResult<bool> {
        self.change_follow(user, false)
            .await
            .map_err(ProfileError::RemoteFetchFailed)
    }

    async fn fetch_followers_quantity(&self, user: &User) -> ProfileResult<(u64, u64)> {
        let counts: FollowCounts = self
            .get_json(&Self::user_path(&user.id, "follow-counts"), &[])
            .await
            .map_err(ProfileError::RemoteFetchFailed)?;
        Ok((counts.followers, counts.following))
    }
}

#[async_trait(?Send)]
impl ImageService for ApiClient {
    async fn load_avatar(&self, avatar_ref: &str) -> ProfileResult<String> {
        if avatar_ref.starts_with("data:") {
            return Ok(avatar_ref.to_string());
        }

        let url = self.avatar_url(avatar_ref);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ProfileError::ImageLoadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProfileError::ImageLoadFailed(format!(
                "status {} for {}",
                response.status(),
                url
            )));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("image/"))
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProfileError::ImageLoadFailed(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ProfileError::ImageLoadFailed(format!("empty body for {}", url)));
        }

        Ok(to_data_url(&mime, &bytes))
    }
}
