use super::EMBED_COLOUR;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// View information about the bot
#[poise::command(slash_command, ephemeral)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let name = ctx.cache().current_user().name.clone();
    let guilds = ctx.cache().guild_count();
    let uptime = chrono::Utc::now() - ctx.data().started;
    let latency = ctx.ping().await;
    let commands = ctx.framework().options().commands.len();

    ctx.send(
        poise::CreateReply::default().embed(
            serenity::CreateEmbed::new()
                .title("ℹ️ Bot Information")
                .colour(EMBED_COLOUR)
                .field("Bot Name", name, true)
                .field("Servers", guilds.to_string(), true)
                .field("Uptime", format_uptime(uptime), true)
                .field("Latency", format!("{}ms", latency.as_millis()), true)
                .field("Commands", commands.to_string(), true)
                .field("Version", VERSION, true)
                .footer(serenity::CreateEmbedFooter::new(format!(
                    "Copyright © {}",
                    chrono::Utc::now().format("%Y")
                ))),
        ),
    )
    .await?;

    Ok(())
}

/// Show all available commands or get help for a specific command
#[poise::command(slash_command, ephemeral)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "The specific command to get help for"] command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "Alt checks and stats are fetched live from third-party APIs.",
            ..Default::default()
        },
    )
    .await?;

    Ok(())
}

/// `1d 2h 3m 4s`
fn format_uptime(uptime: chrono::Duration) -> String {
    let seconds = uptime.num_seconds().max(0);
    format!(
        "{}d {}h {}m {}s",
        seconds / 86_400,
        seconds % 86_400 / 3_600,
        seconds % 3_600 / 60,
        seconds % 60
    )
}
