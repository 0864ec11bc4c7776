use super::EMBED_COLOUR;
use crate::{
    discord::{Context, Error},
    state::{RenderStyles, DEFAULT_RENDER},
};
use poise::serenity_prelude as serenity;

/// Skin render poses offered by the render service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, poise::ChoiceParameter)]
pub enum RenderType {
    Default,
    Marching,
    Walking,
    Crouching,
    Crossed,
    #[name = "Criss Cross"]
    CrissCross,
    Ultimate,
    Isometric,
    Head,
    Custom,
    Cheering,
    Relaxing,
    Trudging,
    Cowering,
    Pointing,
    Lunging,
    Dungeons,
    Facepalm,
    Sleeping,
    Dead,
    Archer,
    Kicking,
    Mojavatar,
    #[name = "High Ground"]
    HighGround,
    Clown,
}

impl RenderType {
    /// Path segment the render service expects.
    pub fn id(&self) -> &'static str {
        match self {
            RenderType::Default => DEFAULT_RENDER,
            RenderType::Marching => "marching",
            RenderType::Walking => "walking",
            RenderType::Crouching => "crouching",
            RenderType::Crossed => "crossed",
            RenderType::CrissCross => "criss_cross",
            RenderType::Ultimate => "ultimate",
            RenderType::Isometric => "isometric",
            RenderType::Head => "head",
            RenderType::Custom => "custom",
            RenderType::Cheering => "cheering",
            RenderType::Relaxing => "relaxing",
            RenderType::Trudging => "trudging",
            RenderType::Cowering => "cowering",
            RenderType::Pointing => "pointing",
            RenderType::Lunging => "lunging",
            RenderType::Dungeons => "dungeons",
            RenderType::Facepalm => "facepalm",
            RenderType::Sleeping => "sleeping",
            RenderType::Dead => "dead",
            RenderType::Archer => "archer",
            RenderType::Kicking => "kicking",
            RenderType::Mojavatar => "mojavatar",
            RenderType::HighGround => "high_ground",
            RenderType::Clown => "clown",
        }
    }
}

/// Set render type for a Minecraft username
#[poise::command(slash_command, check = "crate::checks::is_admin")]
pub async fn setrender(
    ctx: Context<'_>,
    #[description = "The Minecraft username"] username: String,
    #[description = "The render type to set"] render_type: RenderType,
) -> Result<(), Error> {
    let mut renders = ctx.data().renders.lock().await;

    let previous = renders.set(&username, render_type.id()).await?;
    log::info!(
        "Updated render type for '{}' from {} to {}",
        username,
        previous.as_deref().unwrap_or(DEFAULT_RENDER),
        render_type.id()
    );

    ctx.say(format!(
        "Render type for {} has been set to {}.",
        username,
        render_type.id()
    ))
    .await?;

    Ok(())
}

/// Request a change for your player model rendering
#[poise::command(slash_command, ephemeral)]
pub async fn requestchange(
    ctx: Context<'_>,
    #[description = "Minecraft username"] username: String,
    #[description = "The render type you want to change to"] render_type: RenderType,
) -> Result<(), Error> {
    let channel = ctx.data().settings.render_requests_channel;
    if channel == 0 {
        log::error!("No render request channel configured");
        ctx.say("❌ Error: The render channel could not be found. Please contact an administrator.")
            .await?;
        return Ok(());
    }

    let current = ctx.data().renders.lock().await.render_style(&username);
    let location = ctx
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| "User DMs".to_string());
    let author = ctx.author();

    let embed = serenity::CreateEmbed::new()
        .title("Player Model Change Request")
        .description(format!(
            "**Username:** {}\n**Current Render:** {}\n**Requested Render:** {}",
            username,
            current,
            render_type.id()
        ))
        .colour(EMBED_COLOUR)
        .field(
            "Request Sent By",
            format!("{} (ID: {})", author.name, author.id),
            false,
        )
        .field("Location", location, false)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Requested by {}",
            author.name
        )));

    let sent = serenity::ChannelId::new(channel)
        .send_message(ctx.serenity_context(), serenity::CreateMessage::new().embed(embed))
        .await;

    match sent {
        Ok(_) => {
            log::info!(
                "Sent render change request for '{}' ({} -> {})",
                username,
                current,
                render_type.id()
            );
            ctx.say("✅ Your request for the player model change has been sent! Thank you.")
                .await?;
        }
        Err(e) => {
            log::error!("Failed to send render change request: {}", e);
            ctx.say("❌ Error: The request could not be delivered. Please contact an administrator.")
                .await?;
        }
    }

    Ok(())
}
