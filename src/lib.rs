// Library root
// -----------
// The binary (`main.rs`) parses the configuration and hands an API client,
// a session and a terminal front end to the router in `app`.
//
// Module responsibilities:
// - `api`: HTTP calls to the referral backend behind the `Backend` trait.
// - `store`: persisted key-value entries (phone, code, token).
// - `session`: the login state machine on top of the store.
// - `screens`: Login, Verify and Main logic, free of terminal code.
// - `countdown`: the redirect timer shown after verification.
// - `ui`: terminal rendering and prompts.
// - `app`: the router tying screens, session and UI together.
pub mod api;
pub mod app;
pub mod config;
pub mod countdown;
pub mod error;
pub mod screens;
pub mod session;
pub mod store;
pub mod ui;
