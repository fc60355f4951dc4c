use crate::{config::Appearance, feedback::Submission};
use poise::serenity_prelude::{
    ButtonStyle, ChannelId, Context, CreateActionRow, CreateButton, CreateEmbed,
    CreateEmbedAuthor, CreateMessage, GuildId, ReactionType,
};
use serenity::{http::HttpError, model::ModelError};
use thiserror::Error;

/// The custom id of the persistent panel button.
///
/// Discord hands it back on every click, including clicks on panels posted before a restart,
/// so it must never change.
pub const PANEL_BUTTON_ID: &str = "review_panel_button";

/// The ways talking to the platform can fail, as far as the flows care.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("missing permissions")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    /// The failures discord reports through the status code alone.
    fn from_status(status: u16) -> Option<PlatformError> {
        match status {
            403 => Some(PlatformError::Forbidden),
            404 => Some(PlatformError::NotFound),
            _ => None,
        }
    }
}

impl From<serenity::Error> for PlatformError {
    fn from(error: serenity::Error) -> Self {
        let known = match &error {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
                PlatformError::from_status(response.status_code.as_u16())
            }
            // Raised by serenity's own permission checks before a request is even sent
            serenity::Error::Model(ModelError::InvalidPermissions { .. }) => {
                Some(PlatformError::Forbidden)
            }
            _ => None,
        };

        known.unwrap_or_else(|| PlatformError::Other(format!("{error:?}")))
    }
}

/// What the review flows need from the chat platform.
///
/// Implemented over serenity for the real bot and by an in-memory fake in tests.
pub trait ChatPlatform {
    /// Whether `channel_id` still exists in `guild_id` and is visible to the bot.
    async fn channel_exists(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<bool, PlatformError>;

    async fn post_review(
        &self,
        channel_id: ChannelId,
        submission: &Submission,
    ) -> Result<(), PlatformError>;

    /// Posts the panel embed with the persistent review button.
    async fn post_panel(&self, channel_id: ChannelId) -> Result<(), PlatformError>;
}

pub struct SerenityPlatform<'a> {
    ctx: &'a Context,
    appearance: &'a Appearance,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(ctx: &'a Context, appearance: &'a Appearance) -> Self {
        Self { ctx, appearance }
    }
}

impl ChatPlatform for SerenityPlatform<'_> {
    async fn channel_exists(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<bool, PlatformError> {
        // The cache guard can't live across the await below
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.contains_key(&channel_id));

        if let Some(exists) = cached {
            return Ok(exists);
        }

        match channel_id.to_channel(self.ctx).await {
            Ok(channel) => Ok(channel
                .guild()
                .is_some_and(|channel| channel.guild_id == guild_id)),
            Err(error) => match PlatformError::from(error) {
                PlatformError::NotFound | PlatformError::Forbidden => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn post_review(
        &self,
        channel_id: ChannelId,
        submission: &Submission,
    ) -> Result<(), PlatformError> {
        let embed = CreateEmbed::new()
            .colour(self.appearance.colour())
            .description(submission.description(self.appearance));

        channel_id
            .send_message(self.ctx, CreateMessage::new().embed(embed))
            .await?;

        Ok(())
    }

    async fn post_panel(&self, channel_id: ChannelId) -> Result<(), PlatformError> {
        channel_id
            .send_message(self.ctx, panel_message(self.appearance))
            .await?;

        Ok(())
    }
}

pub fn panel_message(appearance: &Appearance) -> CreateMessage {
    let mut embed = CreateEmbed::new()
        .title(&appearance.panel_title)
        .description(&appearance.panel_description)
        .colour(appearance.colour());

    if let Some(author) = &appearance.panel_author {
        embed = embed.author(CreateEmbedAuthor::new(author));
    }

    if let Some(url) = &appearance.panel_thumbnail_url {
        embed = embed.thumbnail(url);
    }

    CreateMessage::new()
        .embed(embed)
        .components(vec![CreateActionRow::Buttons(vec![panel_button(appearance)])])
}

fn panel_button(appearance: &Appearance) -> CreateButton {
    let button = CreateButton::new(PANEL_BUTTON_ID)
        .label(&appearance.button_label)
        .style(ButtonStyle::Success);

    match ReactionType::try_from(appearance.button_emoji.as_str()) {
        Ok(emoji) if !appearance.button_emoji.is_empty() => button.emoji(emoji),
        _ => button,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use poise::serenity_prelude::Permissions;

    #[test]
    fn status_codes_split_forbidden_and_not_found() {
        assert_eq!(PlatformError::from_status(403), Some(PlatformError::Forbidden));
        assert_eq!(PlatformError::from_status(404), Some(PlatformError::NotFound));
        assert_eq!(PlatformError::from_status(500), None);
        assert_eq!(PlatformError::from_status(429), None);
    }

    #[test]
    fn serenity_permission_check_is_forbidden() {
        let error = serenity::Error::Model(ModelError::InvalidPermissions {
            required: Permissions::SEND_MESSAGES,
            present: Permissions::empty(),
        });

        assert_eq!(PlatformError::from(error), PlatformError::Forbidden);
    }

    #[test]
    fn anything_else_is_other() {
        let error = serenity::Error::Other("gateway went away");

        assert!(matches!(
            PlatformError::from(error),
            PlatformError::Other(detail) if detail.contains("gateway went away")
        ));
    }
}
