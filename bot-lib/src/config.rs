use color_eyre::eyre::{Result, WrapErr};
use poise::serenity_prelude::{Colour, GuildId};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const GUILD_ID_VAR: &str = "GUILD_ID";

/// Everything the process needs from the environment before it may connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    pub token: String,
    /// The guild the `/setup` command is registered in.
    pub guild_id: GuildId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("Missing `{0}`. Set it in the environment or in a .env file next to the bot")]
    MissingVar(&'static str),
    #[error("`GUILD_ID` must be a numeric guild id, got `{0}`")]
    InvalidGuildId(String),
}

impl Secrets {
    pub fn from_env() -> Result<Secrets, StartupError> {
        Secrets::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Secrets::from_env`] but reads through `lookup`, so tests don't touch the real env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Secrets, StartupError> {
        let read = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(StartupError::MissingVar(key))
        };

        let token = read(TOKEN_VAR)?;
        let raw_guild_id = read(GUILD_ID_VAR)?;

        let guild_id = raw_guild_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(GuildId::new)
            .ok_or(StartupError::InvalidGuildId(raw_guild_id))?;

        Ok(Secrets { token, guild_id })
    }
}

/// How the panel and the forwarded reviews look.
///
/// Every field is optional in the file; a missing file means all defaults.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Appearance {
    /// Title of the panel embed.
    pub panel_title: String,
    /// Body of the panel embed. Supports discord markdown.
    pub panel_description: String,
    /// Shown as the embed author, usually the store or server name.
    pub panel_author: Option<String>,
    pub panel_thumbnail_url: Option<String>,
    /// Label of the persistent button.
    pub button_label: String,
    /// Either a unicode emoji or a custom emoji like `<:name:id>`.
    pub button_emoji: String,
    /// Colour of both the panel and the review embeds, as `[r, g, b]`.
    pub embed_color: [u8; 3],
    /// Repeated once per rating point.
    pub star: String,
    pub review_icon: String,
    pub submitter_icon: String,
    pub rating_icon: String,
    pub text_icon: String,
    /// Title of the review form.
    pub form_title: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance {
            panel_title: "⭐ Reviews".to_owned(),
            panel_description: "**Click the button below!**\n\n\
                **This is the server's review system.**\n\n\
                **Tell us how we did.**"
                .to_owned(),
            panel_author: None,
            panel_thumbnail_url: None,
            button_label: "Review".to_owned(),
            button_emoji: "⭐".to_owned(),
            embed_color: [71, 199, 100],
            star: "⭐".to_owned(),
            review_icon: "💚".to_owned(),
            submitter_icon: "👥".to_owned(),
            rating_icon: "✅".to_owned(),
            text_icon: "💎".to_owned(),
            form_title: "Leave a review".to_owned(),
        }
    }
}

impl Appearance {
    /// Loads the appearance file, falling back to defaults when there is no file at all.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Appearance> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            tracing::info!(
                "No appearance file at {}, using defaults",
                config_path.display()
            );
            return Ok(Appearance::default());
        }

        let file = std::fs::read_to_string(config_path).wrap_err("Could not read config file")?;

        toml::from_str(&file).wrap_err("Could not parse config file")
    }

    pub fn colour(&self) -> Colour {
        let [r, g, b] = self.embed_color;
        Colour::from_rgb(r, g, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_both_vars() {
        let secrets =
            Secrets::from_lookup(lookup(&[(TOKEN_VAR, "abc"), (GUILD_ID_VAR, "123456789109876")]))
                .unwrap();

        assert_eq!(
            secrets,
            Secrets {
                token: "abc".to_owned(),
                guild_id: GuildId::new(123456789109876),
            }
        );
    }

    #[test]
    fn missing_token_is_fatal() {
        assert_eq!(
            Secrets::from_lookup(lookup(&[(GUILD_ID_VAR, "1")])),
            Err(StartupError::MissingVar(TOKEN_VAR))
        );
    }

    #[test]
    fn missing_or_blank_guild_is_fatal() {
        assert_eq!(
            Secrets::from_lookup(lookup(&[(TOKEN_VAR, "abc")])),
            Err(StartupError::MissingVar(GUILD_ID_VAR))
        );
        assert_eq!(
            Secrets::from_lookup(lookup(&[(TOKEN_VAR, "abc"), (GUILD_ID_VAR, "  ")])),
            Err(StartupError::MissingVar(GUILD_ID_VAR))
        );
    }

    #[test]
    fn garbage_guild_is_fatal() {
        assert_eq!(
            Secrets::from_lookup(lookup(&[(TOKEN_VAR, "abc"), (GUILD_ID_VAR, "my server")])),
            Err(StartupError::InvalidGuildId("my server".to_owned()))
        );
        assert_eq!(
            Secrets::from_lookup(lookup(&[(TOKEN_VAR, "abc"), (GUILD_ID_VAR, "0")])),
            Err(StartupError::InvalidGuildId("0".to_owned()))
        );
    }

    #[test]
    fn should_deserialize_partial_appearance() {
        let test_input = r#"
panel_title = "⭐ Store Reviews"
panel_author = "Corner Store"
embed_color = [1, 2, 3]
star = "<:star:1336393802319138846>"
"#;

        let appearance: Appearance = toml::from_str(test_input).unwrap();

        assert_eq!(
            appearance,
            Appearance {
                panel_title: "⭐ Store Reviews".to_owned(),
                panel_author: Some("Corner Store".to_owned()),
                embed_color: [1, 2, 3],
                star: "<:star:1336393802319138846>".to_owned(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn missing_file_means_defaults() {
        let appearance = Appearance::load("definitely/not/a/real/appearance.toml").unwrap();

        assert_eq!(appearance, Appearance::default());
    }
}
