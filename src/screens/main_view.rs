use super::Screen;
use crate::api::{Backend, ReferralData, RegisterReferralRequest};
use crate::error::{ApiError, StoreError};
use crate::session::Session;
use crate::store::SessionStore;
use tracing::{info, warn};

pub const NO_INVITED_USERS: &str = "You haven't invited any user yet.";

/// Referral overview of the signed-in user.
#[derive(Debug, Clone)]
pub struct MainScreen {
    pub referrals: ReferralData,
    pub ref_input: String,
    pub submit_enabled: bool,
    pub message: Option<String>,
}

impl Default for MainScreen {
    fn default() -> Self {
        MainScreen {
            referrals: ReferralData::default(),
            ref_input: String::new(),
            submit_enabled: true,
            message: None,
        }
    }
}

impl MainScreen {
    /// Fetch referral data with the stored token. A missing token is sent
    /// as empty and the server's 401 takes the user back to login.
    pub fn load<B, S>(&mut self, backend: &B, session: &mut Session<S>) -> Result<Option<Screen>, StoreError>
    where
        B: Backend + ?Sized,
        S: SessionStore,
    {
        let token = session.token()?.unwrap_or_default();
        match backend.fetch_referrals(&token) {
            Ok(data) => {
                self.referrals = data;
                Ok(None)
            }
            Err(e) => self.fail(e, session),
        }
    }

    /// Register the inviter code typed into `ref_input`.
    pub fn submit_referral<B, S>(
        &mut self,
        backend: &B,
        session: &mut Session<S>,
    ) -> Result<Option<Screen>, StoreError>
    where
        B: Backend + ?Sized,
        S: SessionStore,
    {
        self.submit_enabled = false;
        let token = session.token()?.unwrap_or_default();
        let req = RegisterReferralRequest {
            ref_code: self.ref_input.clone(),
        };
        match backend.register_referral(&token, &req) {
            Ok(resp) => {
                self.ref_input.clear();
                self.referrals.invited = resp.invited;
                self.message = Some(resp.message);
                Ok(None)
            }
            Err(e) => {
                self.submit_enabled = true;
                self.ref_input.clear();
                self.fail(e, session)
            }
        }
    }

    pub fn logout<S: SessionStore>(&mut self, session: &mut Session<S>) -> Result<Screen, StoreError> {
        session.sign_out()?;
        Ok(Screen::Login)
    }

    /// The inviter can be registered once; the form hides after that.
    pub fn shows_referral_form(&self) -> bool {
        self.referrals.invited.is_empty()
    }

    pub fn can_submit_referral(&self) -> bool {
        self.shows_referral_form() && self.submit_enabled
    }

    /// Lines of the invited users list, or a placeholder when empty.
    pub fn invited_lines(&self) -> Vec<String> {
        if self.referrals.users.is_empty() {
            return vec![NO_INVITED_USERS.to_string()];
        }
        self.referrals.users.clone()
    }

    fn fail<S: SessionStore>(&mut self, e: ApiError, session: &mut Session<S>) -> Result<Option<Screen>, StoreError> {
        self.message = Some(e.user_message());
        if e.is_unauthorized() {
            info!("session rejected by server, signing out");
            return self.logout(session).map(Some);
        }
        warn!(error = %e, "referral request failed");
        Ok(None)
    }
}
