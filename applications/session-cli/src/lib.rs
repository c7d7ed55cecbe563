/// Soul Session CLI - terminal driver for a media session
///
/// Wires a `soul-session` service to a simulated engine and a JSON track
/// catalogue, and reads transport commands from stdin.
pub mod app;
pub mod catalogue;
pub mod commands;
pub mod config;
pub mod engine;
