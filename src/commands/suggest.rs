use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const SUGGESTION_COLOUR: u32 = 0x3498db;

/// Send a suggestion to the Admins
#[poise::command(slash_command, ephemeral)]
pub async fn suggest(
    ctx: Context<'_>,
    #[description = "Your suggestion to send"] suggestion: String,
) -> Result<(), Error> {
    let channel = ctx.data().settings.suggestions_channel;
    if channel == 0 {
        log::error!("No suggestion channel configured");
        ctx.say("❌ Suggestion channel not found. Please contact the administrator.")
            .await?;
        return Ok(());
    }

    let location = ctx.guild().map(|guild| guild.name.clone());
    let author = ctx.author();

    let embed = serenity::CreateEmbed::new()
        .title("New Suggestion Received")
        .colour(SUGGESTION_COLOUR)
        .fields(
            fields(&suggestion, &author.name, author.id.get(), location.as_deref())
                .into_iter()
                .map(|(name, value)| (name, value, false)),
        );

    let sent = serenity::ChannelId::new(channel)
        .send_message(ctx.serenity_context(), serenity::CreateMessage::new().embed(embed))
        .await;

    match sent {
        Ok(_) => {
            log::info!("Sent suggestion from '{}'", author.name);
            ctx.say("✅ Your suggestion has been sent! Thank you!").await?;
        }
        Err(e) => {
            log::error!("Failed to send suggestion: {}", e);
            ctx.say("❌ An error occurred while sending your suggestion.")
                .await?;
        }
    }

    Ok(())
}

fn fields(
    suggestion: &str,
    author: &str,
    author_id: u64,
    location: Option<&str>,
) -> Vec<(&'static str, String)> {
    vec![
        ("Suggestion", suggestion.to_string()),
        ("From", format!("{} (ID: {})", author, author_id)),
        ("Location", location.unwrap_or("User DMs").to_string()),
    ]
}
