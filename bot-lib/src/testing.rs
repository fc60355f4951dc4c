use crate::{
    feedback::Submission,
    platform::{ChatPlatform, PlatformError},
};
use parking_lot::Mutex;
use poise::serenity_prelude::{ChannelId, GuildId};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Posted {
    Review(ChannelId, Submission),
    Panel(ChannelId),
}

/// Records what would have been posted instead of talking to discord.
#[derive(Debug, Default)]
pub struct FakePlatform {
    channels: HashSet<ChannelId>,
    failure: Option<PlatformError>,
    lookup_failure: Option<PlatformError>,
    posted: Mutex<Vec<Posted>>,
}

impl FakePlatform {
    pub fn with_channels(channels: impl IntoIterator<Item = ChannelId>) -> Self {
        FakePlatform {
            channels: channels.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Every post fails with `failure` from now on.
    pub fn failing_with(mut self, failure: PlatformError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Every channel lookup fails with `failure` from now on.
    pub fn failing_lookup_with(mut self, failure: PlatformError) -> Self {
        self.lookup_failure = Some(failure);
        self
    }

    pub fn posted(&self) -> Vec<Posted> {
        self.posted.lock().clone()
    }

    fn post(&self, channel_id: ChannelId, posted: Posted) -> Result<(), PlatformError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        if !self.channels.contains(&channel_id) {
            return Err(PlatformError::NotFound);
        }

        self.posted.lock().push(posted);

        Ok(())
    }
}

impl ChatPlatform for FakePlatform {
    async fn channel_exists(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<bool, PlatformError> {
        if let Some(failure) = &self.lookup_failure {
            return Err(failure.clone());
        }

        Ok(self.channels.contains(&channel_id))
    }

    async fn post_review(
        &self,
        channel_id: ChannelId,
        submission: &Submission,
    ) -> Result<(), PlatformError> {
        self.post(channel_id, Posted::Review(channel_id, submission.clone()))
    }

    async fn post_panel(&self, channel_id: ChannelId) -> Result<(), PlatformError> {
        self.post(channel_id, Posted::Panel(channel_id))
    }
}
