use poise::serenity_prelude as serenity;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;

use crate::{api::Upstream, commands, settings::Settings, state::RenderStore, Result};

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared by every command invocation.
pub struct Data {
    pub settings: Settings,
    pub renders: Mutex<RenderStore>,
    pub upstream: Arc<dyn Upstream>,
    pub started: chrono::DateTime<chrono::Utc>,
    rotating: AtomicBool,
}

/// Cycled through as the bot's "playing" status.
const ACTIVITIES: &[&str] = &[
    "Alt Checker | /altcheck",
    "Bedwars Stats | /bedwars",
    "Utility | /help",
    "Utility | /info",
    "Settings | /setrender",
    "Settings | /requestchange",
    "Community | /suggest",
];
const ACTIVITY_PERIOD: Duration = Duration::from_secs(15);

pub async fn run(settings: Settings, renders: RenderStore, upstream: Arc<dyn Upstream>) -> Result<()> {
    let token = settings.token.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::list(),
            pre_command: |ctx| {
                Box::pin(async move {
                    log::info!(
                        "Got command '{}' by user '{}'",
                        ctx.invocation_string(),
                        ctx.author().name
                    );
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                log::info!(
                    "Registered {} commands",
                    framework.options().commands.len()
                );

                Ok(Data {
                    settings,
                    renders: Mutex::new(renders),
                    upstream,
                    started: chrono::Utc::now(),
                    rotating: AtomicBool::new(false),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, serenity::GatewayIntents::non_privileged())
        .framework(framework)
        .await?;

    Ok(client.start().await?)
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            log::info!(
                "Connected as {} in {} guilds",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
            // Ready fires again after reconnects.
            if !data.rotating.swap(true, Ordering::SeqCst) {
                tokio::spawn(rotate_activity(ctx.clone()));
            }
        }
        serenity::FullEvent::Resume { .. } => {
            log::info!("Connection to discord resumed.");
        }
        _ => {}
    }
    Ok(())
}

async fn rotate_activity(ctx: serenity::Context) {
    let mut interval = tokio::time::interval(ACTIVITY_PERIOD);
    for activity in ACTIVITIES.iter().cycle() {
        interval.tick().await;
        ctx.set_activity(Some(serenity::ActivityData::playing(*activity)));
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            log::error!(
                "Command '{}' by '{}' failed: {:?}",
                ctx.command().name,
                ctx.author().name,
                error
            );
            if let Err(e) = ctx.say(commands::failure_message(&ctx.command().name)).await {
                log::warn!("Failed to report error to user: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                log::error!("Error while handling error: {}", e);
            }
        }
    }
}
