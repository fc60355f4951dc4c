use crate::{commands::review::handle_review_interaction, data::State};
use color_eyre::eyre::{Error, Result};
use poise::serenity_prelude as serenity;
use review_traits::ForwardRefToTracing;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, State, Error>,
    data: &State,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            tracing::info!(
                "Logged in as {} (ID: {})",
                data_about_bot.user.name,
                data_about_bot.user.id
            );
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            handle_review_interaction(ctx, data, interaction)
                .await
                .trace_err_with("Review interaction failed");
        }
        serenity::FullEvent::Ratelimit { data } => {
            tracing::warn!("Ratelimited: {:?}", data);
        }
        _ => {}
    };

    Ok(())
}
