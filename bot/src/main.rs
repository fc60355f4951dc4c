use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use review_lib::{
    commands::{on_error, setup::setup},
    config::{Appearance, Secrets},
    data::RawAppState,
    event_handler::event_handler,
};
use tracing_subscriber::util::SubscriberInitExt;

/// The cli arguments for the bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Don't start the discord bot
    #[arg(short, long, default_value = "false")]
    pub dry_run: bool,

    /// Path to the appearance file, defaults are used if it doesn't exist
    #[arg(short, long, default_value_t = String::from("config.toml"))]
    pub config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is a convenience, the real environment works just as well
    let dotenv_result = dotenv();
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .finish()
        .init();

    if let Err(e) = dotenv_result {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let Args {
        dry_run,
        config: config_path,
    } = Args::parse();

    let Secrets { token, guild_id } =
        Secrets::from_env().wrap_err("Missing startup configuration")?;
    let appearance = Appearance::load(&config_path).wrap_err("Failed to load appearance")?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![setup()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;

                tracing::info!("Registered /setup in {}", guild_id);

                Ok(RawAppState::new(appearance))
            })
        });

    let client = serenity::ClientBuilder::new(token, serenity::GatewayIntents::non_privileged())
        .framework(framework.build())
        .await;

    if dry_run {
        println!("Bot setup worked, dry run enabled, exiting");
        return Ok(());
    }

    tracing::info!("Starting bot");

    client
        .wrap_err("Failed to start bot (serenity)")?
        .start()
        .await
        .wrap_err("Failed to start bot (startup)")
}
