use crate::{management::TrackDataset, types::AccessToken};

/// State held for one interactive run.
///
/// Owns the pending authorization code, the access token obtained from it and
/// the most recent dataset. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct Session {
    auth_code: Option<String>,
    token: Option<AccessToken>,
    dataset: Option<TrackDataset>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new login: wipes token and dataset and stores the fresh code.
    pub fn begin_login(&mut self, code: String) {
        self.reset();
        self.auth_code = Some(code);
    }

    /// Hands out the authorization code once; later calls return `None`.
    pub fn take_auth_code(&mut self) -> Option<String> {
        self.auth_code.take()
    }

    pub fn set_token(&mut self, token: AccessToken) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Replaces the current dataset with a newly fetched one.
    pub fn set_dataset(&mut self, dataset: TrackDataset) {
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&TrackDataset> {
        self.dataset.as_ref()
    }

    /// Forgets everything tied to the current login.
    pub fn reset(&mut self) {
        self.auth_code = None;
        self.token = None;
        self.dataset = None;
    }
}
