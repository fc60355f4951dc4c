use crate::{config::Appearance, store::ServerConfigStore};
use color_eyre::eyre::Error;
use std::sync::Arc;

/// The global state of the bot
/// Arc so one copy is shared by every command and event handler.
pub type State = Arc<RawAppState>;

#[derive(Debug)]
pub struct RawAppState {
    /// Branding for the panel and the forwarded reviews. Fixed for the life of the process.
    pub appearance: Appearance,
    /// Which channels each guild picked in `/setup`. Empty on every start.
    pub servers: ServerConfigStore,
}

impl RawAppState {
    pub fn new(appearance: Appearance) -> State {
        Arc::new(RawAppState {
            appearance,
            servers: ServerConfigStore::new(),
        })
    }
}

// User data, which is stored and accessible in all command invocations
pub type PoiseContext<'a> = poise::Context<'a, State, Error>;
