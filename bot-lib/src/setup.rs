use crate::{
    platform::{ChatPlatform, PlatformError},
    store::{ServerConfig, ServerConfigStore},
};
use poise::serenity_prelude::{ChannelId, GuildId, Mentionable};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("caller is not an administrator")]
    NotAdministrator,
    #[error("no permission to post in {0}")]
    MissingPermission(ChannelId),
    #[error("setup failed: {0}")]
    Other(String),
}

impl SetupError {
    pub fn user_message(&self) -> String {
        match self {
            SetupError::NotAdministrator => {
                "You don't have administrator permission to use this command.".to_owned()
            }
            SetupError::MissingPermission(_) => {
                "❌ I don't have permission to send messages in one of the channels. Check my permissions."
                    .to_owned()
            }
            SetupError::Other(_) => "Something went wrong while setting up the review panel.".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetupRequest {
    pub guild_id: GuildId,
    pub panel_channel: ChannelId,
    pub feedback_channel: ChannelId,
    pub invoker_is_admin: bool,
}

/// Points the guild's reviews at the given channels and posts a fresh panel.
///
/// The configuration is written before the panel goes out, so a failed post still leaves the
/// new channels in effect. Running it again replaces the channels and posts another panel.
pub async fn run_setup(
    store: &ServerConfigStore,
    platform: &impl ChatPlatform,
    request: SetupRequest,
) -> Result<ServerConfig, SetupError> {
    let SetupRequest {
        guild_id,
        panel_channel,
        feedback_channel,
        invoker_is_admin,
    } = request;

    if !invoker_is_admin {
        return Err(SetupError::NotAdministrator);
    }

    if let Some(previous) = store.set(guild_id, panel_channel, feedback_channel) {
        tracing::info!(
            "Replacing review channels for {}: panel {} -> {}, feedback {} -> {}",
            guild_id,
            previous.panel_channel,
            panel_channel,
            previous.feedback_channel,
            feedback_channel
        );
    }

    platform
        .post_panel(panel_channel)
        .await
        .map_err(|error| match error {
            PlatformError::Forbidden => {
                tracing::warn!("No permission to post review panel in {}", panel_channel);
                SetupError::MissingPermission(panel_channel)
            }
            other => {
                tracing::error!("Failed to post review panel in {}: {}", panel_channel, other);
                SetupError::Other(other.to_string())
            }
        })?;

    tracing::info!(
        "Review panel posted in {} for {}, reviews go to {}",
        panel_channel,
        guild_id,
        feedback_channel
    );

    Ok(ServerConfig {
        guild_id,
        panel_channel,
        feedback_channel,
    })
}

pub fn success_message(config: &ServerConfig) -> String {
    format!(
        "✅ Success! The review panel was sent to {} and reviews will be posted in {}.",
        config.panel_channel.mention(),
        config.feedback_channel.mention()
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{FakePlatform, Posted};

    const GUILD: GuildId = GuildId::new(1);
    const C1: ChannelId = ChannelId::new(201);
    const C2: ChannelId = ChannelId::new(202);
    const C3: ChannelId = ChannelId::new(203);
    const C4: ChannelId = ChannelId::new(204);

    fn request(panel_channel: ChannelId, feedback_channel: ChannelId) -> SetupRequest {
        SetupRequest {
            guild_id: GUILD,
            panel_channel,
            feedback_channel,
            invoker_is_admin: true,
        }
    }

    #[tokio::test]
    async fn setup_stores_config_and_posts_panel() {
        let store = ServerConfigStore::new();
        let platform = FakePlatform::with_channels([C1, C2]);

        let config = run_setup(&store, &platform, request(C1, C2)).await.unwrap();

        assert_eq!(store.get(GUILD), Some(config));
        assert_eq!(config.panel_channel, C1);
        assert_eq!(config.feedback_channel, C2);
        assert_eq!(platform.posted(), vec![Posted::Panel(C1)]);
        assert_eq!(
            success_message(&config),
            "✅ Success! The review panel was sent to <#201> and reviews will be posted in <#202>."
        );
    }

    #[tokio::test]
    async fn setup_twice_is_last_write_wins_with_two_panels() {
        let store = ServerConfigStore::new();
        let platform = FakePlatform::with_channels([C1, C2, C3, C4]);

        run_setup(&store, &platform, request(C1, C2)).await.unwrap();
        run_setup(&store, &platform, request(C3, C4)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(GUILD),
            Some(ServerConfig {
                guild_id: GUILD,
                panel_channel: C3,
                feedback_channel: C4,
            })
        );
        assert_eq!(platform.posted(), vec![Posted::Panel(C1), Posted::Panel(C3)]);
    }

    #[tokio::test]
    async fn non_admin_changes_nothing() {
        let store = ServerConfigStore::new();
        let platform = FakePlatform::with_channels([C1, C2]);

        let outcome = run_setup(
            &store,
            &platform,
            SetupRequest {
                invoker_is_admin: false,
                ..request(C1, C2)
            },
        )
        .await;

        assert_eq!(outcome, Err(SetupError::NotAdministrator));
        assert!(store.is_empty());
        assert!(platform.posted().is_empty());
    }

    #[tokio::test]
    async fn setup_then_review_end_to_end() {
        use crate::feedback::{Delivered, SUCCESS_MESSAGE, acknowledgement, open_form, submit};
        use poise::serenity_prelude::UserId;

        let store = ServerConfigStore::new();
        let platform = FakePlatform::with_channels([C1, C2]);
        let member = UserId::new(42);
        let review = "Great service, fast and friendly!";

        run_setup(&store, &platform, request(C1, C2)).await.unwrap();
        assert_eq!(open_form(&store, Some(GUILD)).map(|c| c.feedback_channel), Ok(C2));

        let outcome = submit(&store, &platform, Some(GUILD), member, "5", review).await;
        assert_eq!(outcome, Ok(Delivered { channel_id: C2 }));
        assert_eq!(acknowledgement(&outcome), SUCCESS_MESSAGE);

        let posted = platform.posted();
        assert_eq!(posted.len(), 2);
        assert_eq!(posted[0], Posted::Panel(C1));

        let Posted::Review(channel, submission) = &posted[1] else {
            panic!("expected a review, got {:?}", posted[1]);
        };
        assert_eq!(*channel, C2);
        assert_eq!(submission.submitter, member);
        assert_eq!(submission.rating.stars("⭐"), "⭐⭐⭐⭐⭐");
        assert_eq!(submission.review, review);

        // A rating out of range never reaches the feedback channel
        let outcome = submit(&store, &platform, Some(GUILD), member, "7", review).await;
        assert!(outcome.is_err());
        assert_eq!(platform.posted().len(), 2);
    }

    #[tokio::test]
    async fn forbidden_panel_post_is_a_permission_error() {
        let store = ServerConfigStore::new();
        let platform = FakePlatform::with_channels([C1, C2]).failing_with(PlatformError::Forbidden);

        let outcome = run_setup(&store, &platform, request(C1, C2)).await;

        assert_eq!(outcome, Err(SetupError::MissingPermission(C1)));
        assert!(outcome.unwrap_err().user_message().contains("permission"));
    }

    #[tokio::test]
    async fn other_failures_are_generic() {
        let store = ServerConfigStore::new();
        let platform = FakePlatform::with_channels([C2]);

        let outcome = run_setup(&store, &platform, request(C1, C2)).await;

        assert_eq!(outcome, Err(SetupError::Other("not found".to_owned())));
        assert_eq!(
            outcome.unwrap_err().user_message(),
            "Something went wrong while setting up the review panel."
        );
    }
}
