//! Invalidate-and-refetch wrapper for server-owned data.
//!
//! A screen never edits its copy of backend data. After any mutation it calls
//! [`Resource::invalidate`] and then [`Resource::ensure`], which refetches
//! only what is stale. Caching or request de-duplication can be added here
//! without touching the screens.

use std::future::Future;

use crate::api::ClientError;

/// What a screen shows for a resource at any moment
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Never requested
    Idle,
    Loading,
    Loaded(T),
    /// Last fetch failed; the message is ready to display next to a retry action
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Resource<T> {
    name: &'static str,
    state: LoadState<T>,
    stale: bool,
    fetches: u32,
}

impl<T> Resource<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: LoadState::Idle,
            stale: true,
            fetches: 0,
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of fetches issued so far
    pub fn fetches(&self) -> u32 {
        self.fetches
    }

    /// Mark the local copy out of date after a mutation
    pub fn invalidate(&mut self) {
        tracing::debug!(resource = self.name, "Invalidated");
        self.stale = true;
    }

    /// Fetch unconditionally. On failure the state becomes `Failed` with the
    /// server's message (or `fallback`) and the error is returned so the
    /// caller can react to authorization failures.
    pub async fn refresh<F, Fut>(&mut self, fetch: F, fallback: &str) -> Result<(), ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.state = LoadState::Loading;
        self.fetches += 1;

        match fetch().await {
            Ok(data) => {
                tracing::debug!(resource = self.name, "Loaded");
                self.state = LoadState::Loaded(data);
                self.stale = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = self.name, error = %e, "Fetch failed");
                self.state = LoadState::Failed(e.user_message(fallback));
                Err(e)
            }
        }
    }

    /// Fetch only if stale or not yet loaded
    pub async fn ensure<F, Fut>(&mut self, fetch: F, fallback: &str) -> Result<(), ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if !self.stale && matches!(self.state, LoadState::Loaded(_)) {
            return Ok(());
        }
        self.refresh(fetch, fallback).await
    }
}
