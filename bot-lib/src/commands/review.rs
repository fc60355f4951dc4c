use crate::{
    ReplyPrivately,
    config::Appearance,
    data::State,
    feedback::{MAX_REVIEW_CHARS, MIN_REVIEW_CHARS, acknowledgement, open_form, submit},
    platform::{PANEL_BUTTON_ID, SerenityPlatform},
};
use color_eyre::eyre::{Result, WrapErr};
use poise::serenity_prelude::{
    self as serenity, ActionRowComponent, ComponentInteraction, CreateActionRow, CreateInputText,
    CreateInteractionResponse, CreateModal, InputTextStyle, Interaction, ModalInteraction,
};

pub const REVIEW_FORM_ID: &str = "review_form";
const RATING_INPUT_ID: &str = "review_rating";
const REVIEW_INPUT_ID: &str = "review_text";

/// Routes panel clicks and review form submissions. Anything else is left alone.
pub async fn handle_review_interaction(
    ctx: &serenity::Context,
    data: &State,
    interaction: &Interaction,
) -> Result<()> {
    match interaction {
        Interaction::Component(component) if component.data.custom_id == PANEL_BUTTON_ID => {
            handle_panel_button(ctx, data, component).await
        }
        Interaction::Modal(modal) if modal.data.custom_id == REVIEW_FORM_ID => {
            handle_review_form(ctx, data, modal).await
        }
        _ => Ok(()),
    }
}

fn review_form(appearance: &Appearance) -> CreateModal {
    let rating = CreateInputText::new(InputTextStyle::Short, "Rating (1 to 5)", RATING_INPUT_ID)
        .placeholder("e.g. 5")
        .min_length(1)
        .max_length(1)
        .required(true);

    let review = CreateInputText::new(InputTextStyle::Paragraph, "Your review", REVIEW_INPUT_ID)
        .placeholder("Describe your experience with our service.")
        .min_length(MIN_REVIEW_CHARS as u16)
        .max_length(MAX_REVIEW_CHARS as u16)
        .required(true);

    CreateModal::new(REVIEW_FORM_ID, &appearance.form_title).components(vec![
        CreateActionRow::InputText(rating),
        CreateActionRow::InputText(review),
    ])
}

async fn handle_panel_button(
    ctx: &serenity::Context,
    data: &State,
    interaction: &ComponentInteraction,
) -> Result<()> {
    if let Err(error) = open_form(&data.servers, interaction.guild_id) {
        tracing::debug!(
            "{} clicked the review panel in {:?}: {}",
            interaction.user.tag(),
            interaction.guild_id,
            error
        );

        return interaction
            .reply_privately(ctx, error.user_message())
            .await;
    }

    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Modal(review_form(&data.appearance)),
        )
        .await
        .wrap_err("Failed to open review form")
}

/// What the user typed into `custom_id`, empty if the field didn't come back at all.
fn input_value(interaction: &ModalInteraction, custom_id: &str) -> String {
    interaction
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.clone()
            }
            _ => None,
        })
        .unwrap_or_default()
}

async fn handle_review_form(
    ctx: &serenity::Context,
    data: &State,
    interaction: &ModalInteraction,
) -> Result<()> {
    let rating = input_value(interaction, RATING_INPUT_ID);
    let review = input_value(interaction, REVIEW_INPUT_ID);
    let platform = SerenityPlatform::new(ctx, &data.appearance);

    let outcome = submit(
        &data.servers,
        &platform,
        interaction.guild_id,
        interaction.user.id,
        &rating,
        &review,
    )
    .await;

    if let Err(error) = &outcome {
        tracing::debug!("Rejected review from {}: {}", interaction.user.tag(), error);
    }

    interaction
        .reply_privately(ctx, acknowledgement(&outcome))
        .await
}

