// UI layer: renders each screen in the terminal and asks the user what to
// do next, using `dialoguer` prompts, an `indicatif` spinner while requests
// are in flight and `crossterm` for a bit of colour.

use crate::screens::{capitalize, LoginScreen, MainScreen, VerifyScreen};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    Submit(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyAction {
    Submit(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainAction {
    RegisterReferral(String),
    Refresh,
    Logout,
    Quit,
}

/// What the router needs from a user interface.
pub trait Frontend {
    fn login(&mut self, screen: &LoginScreen) -> Result<LoginAction>;
    fn verify(&mut self, screen: &VerifyScreen) -> Result<VerifyAction>;
    fn main(&mut self, screen: &MainScreen) -> Result<MainAction>;
    /// A request is in flight.
    fn busy(&mut self, message: &str);
    fn idle(&mut self);
    /// Verification succeeded; `message` is the server's greeting.
    fn verified(&mut self, message: &str);
    /// Seconds left before the redirect to the main screen.
    fn countdown(&mut self, remaining: u64);
}

/// Interactive terminal front end.
#[derive(Default)]
pub struct Terminal {
    spinner: Option<ProgressBar>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bold());
}

fn show_message(message: &Option<String>) {
    if let Some(m) = message.as_deref().filter(|m| !m.is_empty()) {
        println!("{}", capitalize(m).yellow());
    }
}

impl Frontend for Terminal {
    fn login(&mut self, screen: &LoginScreen) -> Result<LoginAction> {
        heading("Login");
        show_message(&screen.message);
        let items = vec!["Send code", "Exit"];
        // `Select` shows a keyboard-navigable list in the terminal.
        let selection = Select::new().items(&items).default(0).interact()?;
        if selection != 0 {
            return Ok(LoginAction::Quit);
        }
        let phone: String = Input::new().with_prompt("Phone number").interact_text()?;
        Ok(LoginAction::Submit(phone))
    }

    fn verify(&mut self, screen: &VerifyScreen) -> Result<VerifyAction> {
        heading("Verify");
        println!("Code from SMS: {}", screen.issued_code.as_str().cyan());
        show_message(&screen.message);
        let items = vec!["Accept code", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        if selection != 0 {
            return Ok(VerifyAction::Quit);
        }
        let code: String = Input::new().with_prompt("Code").interact_text()?;
        Ok(VerifyAction::Submit(code))
    }

    fn main(&mut self, screen: &MainScreen) -> Result<MainAction> {
        heading("Main");
        if let Some(m) = screen.message.as_deref().filter(|m| !m.is_empty()) {
            println!("Message: {}", capitalize(m).yellow());
        }
        println!("Your referral code: {}", screen.referrals.own_code.as_str().cyan());
        println!("Registered referral code: {}", screen.referrals.invited);
        println!("Users invited by you:");
        for line in screen.invited_lines() {
            println!("  - {}", line);
        }

        let mut actions = Vec::new();
        if screen.can_submit_referral() {
            actions.push(("Register referral code", MainAction::RegisterReferral(String::new())));
        }
        actions.push(("Refresh", MainAction::Refresh));
        actions.push(("Logout", MainAction::Logout));
        actions.push(("Exit", MainAction::Quit));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
        let selection = Select::new().items(&labels).default(0).interact()?;
        match actions.into_iter().nth(selection).map(|(_, action)| action) {
            Some(MainAction::RegisterReferral(_)) => {
                let code: String = Input::new().with_prompt("Referral code").interact_text()?;
                Ok(MainAction::RegisterReferral(code))
            }
            Some(action) => Ok(action),
            None => Ok(MainAction::Quit),
        }
    }

    fn busy(&mut self, message: &str) {
        // indicatif's spinner runs while the blocking request is sent.
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn idle(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn verified(&mut self, message: &str) {
        if !message.is_empty() {
            println!("{}", capitalize(message).green());
        }
    }

    fn countdown(&mut self, remaining: u64) {
        println!("Redirect to Main page in {}...", remaining);
    }
}
