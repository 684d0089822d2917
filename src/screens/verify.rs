use super::Screen;
use crate::api::{Backend, VerifyRequest};
use crate::error::StoreError;
use crate::session::{Session, SessionState};
use crate::store::SessionStore;
use tracing::warn;

/// Code entry. Exchanges the one-time code for a session token.
#[derive(Debug, Clone)]
pub struct VerifyScreen {
    pub phone: String,
    /// Code issued by the login step, shown as "Code from SMS".
    pub issued_code: String,
    pub code_input: String,
    pub submit_enabled: bool,
    pub message: Option<String>,
}

impl VerifyScreen {
    /// Build the screen from a pending verification. `None` means there is
    /// no stored phone and code and the user belongs on the login screen.
    pub fn mount<S: SessionStore>(session: &Session<S>) -> Result<Option<Self>, StoreError> {
        match session.state()? {
            SessionState::PendingVerification { phone, code } => Ok(Some(VerifyScreen {
                phone,
                issued_code: code,
                code_input: String::new(),
                submit_enabled: true,
                message: None,
            })),
            _ => Ok(None),
        }
    }

    /// Send the entered code. On success the token is stored and the
    /// caller should redirect to `Screen::Main` once its countdown ends.
    pub fn submit<B, S>(&mut self, backend: &B, session: &mut Session<S>) -> Result<Option<Screen>, StoreError>
    where
        B: Backend + ?Sized,
        S: SessionStore,
    {
        self.submit_enabled = false;
        let req = VerifyRequest {
            phone: self.phone.clone(),
            code: self.issued_code.clone(),
            verify: self.code_input.clone(),
        };
        match backend.verify(&req) {
            Ok(resp) => {
                session.verified(&resp.token)?;
                self.code_input.clear();
                self.message = Some(resp.message);
                Ok(Some(Screen::Main))
            }
            Err(e) => {
                warn!(error = %e, "verification failed");
                self.submit_enabled = true;
                self.message = Some(e.user_message());
                Ok(None)
            }
        }
    }
}
