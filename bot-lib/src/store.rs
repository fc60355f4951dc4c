use parking_lot::RwLock;
use poise::serenity_prelude::{ChannelId, GuildId};
use std::collections::HashMap;

/// Where a guild's panel lives and where its reviews go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub guild_id: GuildId,
    pub panel_channel: ChannelId,
    pub feedback_channel: ChannelId,
}

/// Per-guild channel configuration.
///
/// Starts empty with the process, only `/setup` writes to it, and nothing is ever saved.
/// Reads vastly outnumber writes, hence the `RwLock`. Never hold the guard across an await.
#[derive(Debug, Default)]
pub struct ServerConfigStore {
    configs: RwLock<HashMap<GuildId, ServerConfig>>,
}

impl ServerConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites whatever the guild had before, returning the old entry.
    pub fn set(
        &self,
        guild_id: GuildId,
        panel_channel: ChannelId,
        feedback_channel: ChannelId,
    ) -> Option<ServerConfig> {
        self.configs.write().insert(
            guild_id,
            ServerConfig {
                guild_id,
                panel_channel,
                feedback_channel,
            },
        )
    }

    pub fn get(&self, guild_id: GuildId) -> Option<ServerConfig> {
        self.configs.read().get(&guild_id).copied()
    }

    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }
}
