use color_eyre::eyre::{Result, WrapErr};
use poise::serenity_prelude::{
    CacheHttp, ComponentInteraction, CreateInteractionResponse, CreateInteractionResponseMessage,
    ModalInteraction,
};

pub mod commands;
pub mod config;
pub mod data;
pub mod event_handler;
pub mod feedback;
pub mod platform;
pub mod setup;
pub mod store;
#[cfg(test)]
mod testing;

fn private_message(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// Answers an interaction with a message only the person who triggered it can see.
trait ReplyPrivately {
    async fn reply_privately(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> Result<()>;
}

impl ReplyPrivately for ComponentInteraction {
    async fn reply_privately(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> Result<()> {
        self.create_response(cache_http, private_message(content))
            .await
            .wrap_err("Failed to answer button click")
    }
}

impl ReplyPrivately for ModalInteraction {
    async fn reply_privately(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> Result<()> {
        self.create_response(cache_http, private_message(content))
            .await
            .wrap_err("Failed to answer review form")
    }
}
