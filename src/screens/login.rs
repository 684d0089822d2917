use super::Screen;
use crate::api::{Backend, LoginRequest};
use crate::error::StoreError;
use crate::session::Session;
use crate::store::SessionStore;
use tracing::warn;

/// Phone number entry. Requests a one-time code for the number.
#[derive(Debug, Clone)]
pub struct LoginScreen {
    pub phone_input: String,
    pub submit_enabled: bool,
    pub message: Option<String>,
}

impl Default for LoginScreen {
    fn default() -> Self {
        LoginScreen {
            phone_input: String::new(),
            submit_enabled: true,
            message: None,
        }
    }
}

impl LoginScreen {
    /// Already signed in users go straight to the main screen.
    pub fn mount<S: SessionStore>(&self, session: &Session<S>) -> Result<Option<Screen>, StoreError> {
        if session.state()?.is_authenticated() {
            return Ok(Some(Screen::Main));
        }
        Ok(None)
    }

    /// Send `phone_input` to the backend. On success the issued code is
    /// stored and the flow moves to verification.
    pub fn submit<B, S>(&mut self, backend: &B, session: &mut Session<S>) -> Result<Option<Screen>, StoreError>
    where
        B: Backend + ?Sized,
        S: SessionStore,
    {
        self.submit_enabled = false;
        self.message = Some("Sending code...".into());
        let req = LoginRequest {
            phone: self.phone_input.clone(),
        };
        match backend.login(&req) {
            Ok(resp) => {
                session.code_sent(&resp.phone, &resp.code)?;
                Ok(Some(Screen::Verify))
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.submit_enabled = true;
                self.message = Some(e.user_message());
                Ok(None)
            }
        }
    }
}
