#![allow(dead_code)]

use referral_cli::api::{
    Backend, LoginRequest, LoginResponse, ReferralData, RegisterReferralRequest,
    RegisterReferralResponse, VerifyRequest, VerifyResponse,
};
use referral_cli::error::ApiError;
use referral_cli::screens::{LoginScreen, MainScreen, VerifyScreen};
use referral_cli::ui::{Frontend, LoginAction, MainAction, VerifyAction};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Backend answering from queued responses and recording every request.
#[derive(Default)]
pub struct FakeBackend {
    pub login_replies: RefCell<VecDeque<Result<LoginResponse, ApiError>>>,
    pub verify_replies: RefCell<VecDeque<Result<VerifyResponse, ApiError>>>,
    pub fetch_replies: RefCell<VecDeque<Result<ReferralData, ApiError>>>,
    pub register_replies: RefCell<VecDeque<Result<RegisterReferralResponse, ApiError>>>,

    pub logins: RefCell<Vec<LoginRequest>>,
    pub verifies: RefCell<Vec<VerifyRequest>>,
    /// Tokens sent to `GET /api/data/`.
    pub fetches: RefCell<Vec<String>>,
    pub registers: RefCell<Vec<(String, RegisterReferralRequest)>>,
}

fn next<T>(queue: &RefCell<VecDeque<Result<T, ApiError>>>, what: &str) -> Result<T, ApiError> {
    queue.borrow_mut().pop_front().unwrap_or_else(|| {
        Err(ApiError::Rejected {
            status: 500,
            message: format!("no {} reply queued", what),
        })
    })
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_login(self, reply: Result<LoginResponse, ApiError>) -> Self {
        self.login_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn on_verify(self, reply: Result<VerifyResponse, ApiError>) -> Self {
        self.verify_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn on_fetch(self, reply: Result<ReferralData, ApiError>) -> Self {
        self.fetch_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn on_register(self, reply: Result<RegisterReferralResponse, ApiError>) -> Self {
        self.register_replies.borrow_mut().push_back(reply);
        self
    }
}

impl Backend for FakeBackend {
    fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.logins.borrow_mut().push(req.clone());
        next(&self.login_replies, "login")
    }

    fn verify(&self, req: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        self.verifies.borrow_mut().push(req.clone());
        next(&self.verify_replies, "verify")
    }

    fn fetch_referrals(&self, token: &str) -> Result<ReferralData, ApiError> {
        self.fetches.borrow_mut().push(token.to_string());
        next(&self.fetch_replies, "fetch")
    }

    fn register_referral(
        &self,
        token: &str,
        req: &RegisterReferralRequest,
    ) -> Result<RegisterReferralResponse, ApiError> {
        self.registers.borrow_mut().push((token.to_string(), req.clone()));
        next(&self.register_replies, "register")
    }
}

impl Backend for &FakeBackend {
    fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        (*self).login(req)
    }

    fn verify(&self, req: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        (*self).verify(req)
    }

    fn fetch_referrals(&self, token: &str) -> Result<ReferralData, ApiError> {
        (*self).fetch_referrals(token)
    }

    fn register_referral(
        &self,
        token: &str,
        req: &RegisterReferralRequest,
    ) -> Result<RegisterReferralResponse, ApiError> {
        (*self).register_referral(token, req)
    }
}

/// What the scripted front end saw while the router ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Login { message: Option<String> },
    Verify { issued_code: String, message: Option<String> },
    Main { invited: String, form: bool, message: Option<String> },
    Verified(String),
    Countdown(u64),
}

/// Front end replaying queued user actions. An empty queue quits.
#[derive(Default)]
pub struct ScriptedFrontend {
    pub login_actions: VecDeque<LoginAction>,
    pub verify_actions: VecDeque<VerifyAction>,
    pub main_actions: VecDeque<MainAction>,
    pub seen: Vec<Seen>,
    pub busy_messages: Vec<String>,
}

impl ScriptedFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_login(mut self, action: LoginAction) -> Self {
        self.login_actions.push_back(action);
        self
    }

    pub fn then_verify(mut self, action: VerifyAction) -> Self {
        self.verify_actions.push_back(action);
        self
    }

    pub fn then_main(mut self, action: MainAction) -> Self {
        self.main_actions.push_back(action);
        self
    }

    pub fn countdown_ticks(&self) -> Vec<u64> {
        self.seen
            .iter()
            .filter_map(|s| match s {
                Seen::Countdown(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn main_visits(&self) -> usize {
        self.seen.iter().filter(|s| matches!(s, Seen::Main { .. })).count()
    }
}

impl Frontend for ScriptedFrontend {
    fn login(&mut self, screen: &LoginScreen) -> anyhow::Result<LoginAction> {
        self.seen.push(Seen::Login {
            message: screen.message.clone(),
        });
        Ok(self.login_actions.pop_front().unwrap_or(LoginAction::Quit))
    }

    fn verify(&mut self, screen: &VerifyScreen) -> anyhow::Result<VerifyAction> {
        self.seen.push(Seen::Verify {
            issued_code: screen.issued_code.clone(),
            message: screen.message.clone(),
        });
        Ok(self.verify_actions.pop_front().unwrap_or(VerifyAction::Quit))
    }

    fn main(&mut self, screen: &MainScreen) -> anyhow::Result<MainAction> {
        self.seen.push(Seen::Main {
            invited: screen.referrals.invited.clone(),
            form: screen.shows_referral_form(),
            message: screen.message.clone(),
        });
        Ok(self.main_actions.pop_front().unwrap_or(MainAction::Quit))
    }

    fn busy(&mut self, message: &str) {
        self.busy_messages.push(message.to_string());
    }

    fn idle(&mut self) {}

    fn verified(&mut self, message: &str) {
        self.seen.push(Seen::Verified(message.to_string()));
    }

    fn countdown(&mut self, remaining: u64) {
        self.seen.push(Seen::Countdown(remaining));
    }
}

pub fn login_ok(phone: &str, code: &str) -> Result<LoginResponse, ApiError> {
    Ok(LoginResponse {
        phone: phone.into(),
        code: code.into(),
    })
}

pub fn verify_ok(token: &str, message: &str) -> Result<VerifyResponse, ApiError> {
    Ok(VerifyResponse {
        token: token.into(),
        message: message.into(),
    })
}

pub fn referrals(own_code: &str, invited: &str, users: &[&str]) -> Result<ReferralData, ApiError> {
    Ok(ReferralData {
        own_code: own_code.into(),
        invited: invited.into(),
        users: users.iter().map(|u| u.to_string()).collect(),
    })
}

pub fn rejected<T>(status: u16, message: &str) -> Result<T, ApiError> {
    Err(ApiError::Rejected {
        status,
        message: message.into(),
    })
}

pub fn unauthorized<T>() -> Result<T, ApiError> {
    Err(ApiError::Unauthorized {
        message: "Invalid token.".into(),
    })
}
