//! The review flow: panel button, review form, validation, delivery.
//!
//! Clicking the panel button only checks that the guild is configured and opens the form
//! ([`open_form`]). Submitting the form runs [`submit`], which validates and forwards the review.
//! Every outcome, good or bad, ends in exactly one private reply built by [`acknowledgement`].

use crate::{
    config::Appearance,
    platform::{ChatPlatform, PlatformError},
    store::{ServerConfig, ServerConfigStore},
};
use poise::serenity_prelude::{ChannelId, GuildId, Mentionable, UserId};
use thiserror::Error;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MIN_REVIEW_CHARS: usize = 10;
pub const MAX_REVIEW_CHARS: usize = 1024;

pub const SUCCESS_MESSAGE: &str = "Your review was sent! Thank you.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("reviews are not configured for this server")]
    NotConfigured,
    #[error("rating `{0}` is not a number")]
    RatingNotANumber(String),
    #[error("rating {0} is outside of 1..=5")]
    RatingOutOfRange(i64),
    #[error("review is {0} characters long")]
    ReviewLength(usize),
    #[error("feedback channel {0} can't be found")]
    ChannelNotFound(ChannelId),
    #[error("no permission to post in {0}")]
    MissingPermission(ChannelId),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl FeedbackError {
    /// The private reply the submitter sees.
    pub fn user_message(&self) -> String {
        match self {
            FeedbackError::NotConfigured => {
                "The review system hasn't been set up yet. Ask an admin to use `/setup`.".to_owned()
            }
            FeedbackError::RatingNotANumber(_) => "The rating must be a number.".to_owned(),
            FeedbackError::RatingOutOfRange(_) => {
                format!("Please enter a valid rating from {MIN_RATING} to {MAX_RATING}.")
            }
            FeedbackError::ReviewLength(_) => format!(
                "Your review must be between {MIN_REVIEW_CHARS} and {MAX_REVIEW_CHARS} characters."
            ),
            FeedbackError::ChannelNotFound(_) => {
                "The feedback channel could not be found. Please contact an admin.".to_owned()
            }
            FeedbackError::MissingPermission(_) => {
                "I don't have permission to post in the feedback channel. Please let an admin know."
                    .to_owned()
            }
            FeedbackError::Delivery(_) => {
                "Something went wrong while sending your review.".to_owned()
            }
        }
    }
}

/// A validated star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(u8);

impl Rating {
    /// Parses the raw text typed into the form. Surrounding whitespace is ignored, decimals are not.
    pub fn parse(raw: &str) -> Result<Rating, FeedbackError> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| FeedbackError::RatingNotANumber(raw.to_owned()))?;

        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(FeedbackError::RatingOutOfRange(value));
        }

        Ok(Rating(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn stars(self, star: &str) -> String {
        star.repeat(self.0 as usize)
    }
}

pub fn validate_review(review: &str) -> Result<(), FeedbackError> {
    let length = review.chars().count();

    if !(MIN_REVIEW_CHARS..=MAX_REVIEW_CHARS).contains(&length) {
        return Err(FeedbackError::ReviewLength(length));
    }

    Ok(())
}

/// A review that passed validation. Never stored, only forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub rating: Rating,
    pub review: String,
    pub submitter: UserId,
}

impl Submission {
    pub fn new(raw_rating: &str, review: &str, submitter: UserId) -> Result<Self, FeedbackError> {
        let rating = Rating::parse(raw_rating)?;
        validate_review(review)?;

        Ok(Submission {
            rating,
            review: review.to_owned(),
            submitter,
        })
    }

    /// The body of the embed posted to the feedback channel.
    pub fn description(&self, appearance: &Appearance) -> String {
        format!(
            "{} | **New review**\n\n\
             {} | **Submitted by:**\n{}\n\n\
             {} | **Rating: ({}/{MAX_RATING})**\n{}\n\n\
             {} | **Review:**\n{}",
            appearance.review_icon,
            appearance.submitter_icon,
            self.submitter.mention(),
            appearance.rating_icon,
            self.rating.value(),
            self.rating.stars(&appearance.star),
            appearance.text_icon,
            self.review,
        )
    }
}

/// Where a delivered review ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivered {
    pub channel_id: ChannelId,
}

fn configured_guild(
    store: &ServerConfigStore,
    guild_id: Option<GuildId>,
) -> Result<ServerConfig, FeedbackError> {
    guild_id
        .and_then(|guild_id| store.get(guild_id))
        .ok_or(FeedbackError::NotConfigured)
}

/// Guard for the panel button. On success the caller opens the review form.
pub fn open_form(
    store: &ServerConfigStore,
    guild_id: Option<GuildId>,
) -> Result<ServerConfig, FeedbackError> {
    configured_guild(store, guild_id)
}

/// Validates a submitted form and forwards it to the guild's feedback channel.
///
/// The feedback channel is looked up again here, so a `/setup` that happened while the form
/// was open wins.
pub async fn submit(
    store: &ServerConfigStore,
    platform: &impl ChatPlatform,
    guild_id: Option<GuildId>,
    submitter: UserId,
    raw_rating: &str,
    review: &str,
) -> Result<Delivered, FeedbackError> {
    let config = configured_guild(store, guild_id)?;
    let submission = Submission::new(raw_rating, review, submitter)?;
    let channel_id = config.feedback_channel;

    match platform.channel_exists(config.guild_id, channel_id).await {
        Ok(true) => {}
        Ok(false) => return Err(FeedbackError::ChannelNotFound(channel_id)),
        Err(error) => {
            tracing::error!("Couldn't resolve feedback channel {}: {}", channel_id, error);
            return Err(FeedbackError::Delivery(error.to_string()));
        }
    }

    match platform.post_review(channel_id, &submission).await {
        Ok(()) => {
            tracing::info!(
                "Delivered a {}/{} review from {} to {}",
                submission.rating.value(),
                MAX_RATING,
                submitter,
                channel_id
            );

            Ok(Delivered { channel_id })
        }
        Err(PlatformError::Forbidden) => Err(FeedbackError::MissingPermission(channel_id)),
        Err(PlatformError::NotFound) => Err(FeedbackError::ChannelNotFound(channel_id)),
        Err(PlatformError::Other(error)) => {
            tracing::error!("Failed to send review to {}: {}", channel_id, error);
            Err(FeedbackError::Delivery(error))
        }
    }
}

/// The single private reply that closes a submission.
pub fn acknowledgement(outcome: &Result<Delivered, FeedbackError>) -> String {
    match outcome {
        Ok(_) => SUCCESS_MESSAGE.to_owned(),
        Err(error) => error.user_message(),
    }
}
