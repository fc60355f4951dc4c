pub mod review;
pub mod setup;

use crate::{data::State, setup::SetupError};
use color_eyre::eyre::Error;
use poise::{CreateReply, FrameworkError};
use review_traits::ForwardRefToTracing;

const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// Every framework error ends in exactly one private reply where there is someone to reply to.
pub async fn on_error(error: FrameworkError<'_, State, Error>) {
    match error {
        FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            tracing::debug!(
                "{} tried /{} without {:?}",
                ctx.author().tag(),
                ctx.command().name,
                missing_permissions
            );

            ctx.send(
                CreateReply::default()
                    .content(SetupError::NotAdministrator.user_message())
                    .ephemeral(true),
            )
            .await
            .trace_err_ok();
        }
        FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("/{} failed: {:?}", ctx.command().name, error);

            ctx.send(
                CreateReply::default()
                    .content(GENERIC_FAILURE)
                    .ephemeral(true),
            )
            .await
            .trace_err_ok();
        }
        error => {
            tracing::error!("{:?}", error);
        }
    }
}
