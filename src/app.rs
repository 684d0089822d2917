// Router: runs one screen at a time and follows the navigation each screen
// asks for. The persisted session decides where a screen may be entered.

use crate::api::Backend;
use crate::countdown::Countdown;
use crate::screens::{LoginScreen, MainScreen, Screen, VerifyScreen};
use crate::session::Session;
use crate::store::SessionStore;
use crate::ui::{Frontend, LoginAction, MainAction, VerifyAction};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Delay between a successful verification and the main screen.
#[derive(Debug, Clone, Copy)]
pub struct Redirect {
    pub seconds: u64,
    pub tick: Duration,
}

enum Step {
    Goto(Screen),
    Exit,
}

pub struct App<B, S, F> {
    backend: B,
    session: Session<S>,
    frontend: F,
    redirect: Redirect,
}

impl<B, S, F> App<B, S, F>
where
    B: Backend,
    S: SessionStore,
    F: Frontend,
{
    pub fn new(backend: B, session: Session<S>, frontend: F, redirect: Redirect) -> Self {
        App {
            backend,
            session,
            frontend,
            redirect,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// Run the flow from `start` until the user quits.
    pub fn run(&mut self, start: Screen) -> Result<()> {
        let mut screen = start;
        loop {
            debug!(?screen, "entering screen");
            let step = match screen {
                Screen::Login => self.login()?,
                Screen::Verify => self.verify()?,
                Screen::Main => self.main()?,
            };
            match step {
                Step::Goto(next) => screen = next,
                Step::Exit => return Ok(()),
            }
        }
    }

    fn login(&mut self) -> Result<Step> {
        let mut view = LoginScreen::default();
        if let Some(next) = view.mount(&self.session).context("Reading stored session")? {
            return Ok(Step::Goto(next));
        }
        loop {
            match self.frontend.login(&view)? {
                LoginAction::Quit => return Ok(Step::Exit),
                LoginAction::Submit(phone) => {
                    view.phone_input = phone;
                    self.frontend.busy("Sending code...");
                    let outcome = view.submit(&self.backend, &mut self.session);
                    self.frontend.idle();
                    if let Some(next) = outcome.context("Saving login")? {
                        return Ok(Step::Goto(next));
                    }
                }
            }
        }
    }

    fn verify(&mut self) -> Result<Step> {
        let Some(mut view) = VerifyScreen::mount(&self.session).context("Reading stored session")? else {
            return Ok(Step::Goto(Screen::Login));
        };
        loop {
            match self.frontend.verify(&view)? {
                VerifyAction::Quit => return Ok(Step::Exit),
                VerifyAction::Submit(code) => {
                    view.code_input = code;
                    self.frontend.busy("Checking code...");
                    let outcome = view.submit(&self.backend, &mut self.session);
                    self.frontend.idle();
                    if let Some(next) = outcome.context("Saving session token")? {
                        let message = view.message.clone().unwrap_or_default();
                        info!(server_message = %message, "verified");
                        self.frontend.verified(&message);
                        return Ok(self.redirect_after_countdown(next));
                    }
                }
            }
        }
    }

    fn redirect_after_countdown(&mut self, next: Screen) -> Step {
        let countdown = Countdown::start(self.redirect.seconds, self.redirect.tick);
        let frontend = &mut self.frontend;
        if countdown.wait(|remaining| frontend.countdown(remaining)) {
            Step::Goto(next)
        } else {
            Step::Exit
        }
    }

    fn main(&mut self) -> Result<Step> {
        let mut view = MainScreen::default();
        self.frontend.busy("Loading referrals...");
        let loaded = view.load(&self.backend, &mut self.session);
        self.frontend.idle();
        if let Some(next) = loaded.context("Updating stored session")? {
            return Ok(Step::Goto(next));
        }
        loop {
            let outcome = match self.frontend.main(&view)? {
                MainAction::Quit => return Ok(Step::Exit),
                MainAction::Logout => Some(view.logout(&mut self.session).context("Clearing session")?),
                MainAction::Refresh => {
                    self.frontend.busy("Loading referrals...");
                    let loaded = view.load(&self.backend, &mut self.session);
                    self.frontend.idle();
                    loaded.context("Updating stored session")?
                }
                MainAction::RegisterReferral(code) => {
                    if !view.can_submit_referral() {
                        continue;
                    }
                    view.ref_input = code;
                    self.frontend.busy("Registering referral code...");
                    let submitted = view.submit_referral(&self.backend, &mut self.session);
                    self.frontend.idle();
                    submitted.context("Updating stored session")?
                }
            };
            if let Some(next) = outcome {
                return Ok(Step::Goto(next));
            }
        }
    }
}
