// Screen logic for the three steps of the flow. Nothing here touches the
// terminal: each screen holds its transient UI state, talks to a `Backend`
// and a `Session`, and tells the router where to go next.

pub mod login;
pub mod main_view;
pub mod verify;

pub use login::LoginScreen;
pub use main_view::MainScreen;
pub use verify::VerifyScreen;

/// The steps of the flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Verify,
    Main,
}

/// Upper-case the first character of a server message for display.
pub fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
