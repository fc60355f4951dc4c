use crate::{
    data::PoiseContext,
    platform::SerenityPlatform,
    setup::{SetupRequest, run_setup, success_message},
};
use color_eyre::eyre::{OptionExt, Result};
use poise::serenity_prelude::GuildChannel;

/// Choose where the review panel goes and where finished reviews are sent.
#[poise::command(
    slash_command,
    guild_only,
    ephemeral = true,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn setup(
    ctx: PoiseContext<'_>,
    #[description = "The channel where the panel to click and review will be"]
    #[channel_types("Text")]
    panel_channel: GuildChannel,
    #[description = "The channel where finished reviews will be sent"]
    #[channel_types("Text")]
    feedback_channel: GuildChannel,
) -> Result<()> {
    let guild_id = ctx.guild_id().ok_or_eyre("No guild ID?")?;

    // Non-admins never get here, poise checks required_permissions first
    let invoker_is_admin = ctx
        .author_member()
        .await
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.administrator());

    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let platform = SerenityPlatform::new(ctx.serenity_context(), &data.appearance);

    let reply = match run_setup(
        &data.servers,
        &platform,
        SetupRequest {
            guild_id,
            panel_channel: panel_channel.id,
            feedback_channel: feedback_channel.id,
            invoker_is_admin,
        },
    )
    .await
    {
        Ok(config) => success_message(&config),
        Err(error) => error.user_message(),
    };

    ctx.say(reply).await?;

    Ok(())
}
