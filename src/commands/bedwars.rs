use super::{skin_url, EMBED_COLOUR};
use crate::{
    api::{Account, ApiError},
    discord::{Context, Error},
    state::RenderStyles,
    stats::{format_stars, ratio, strip_color_codes, thousands, BedwarsStats},
};
use poise::serenity_prelude as serenity;

/// View Bedwars statistics for a player
#[poise::command(slash_command)]
pub async fn bedwars(
    ctx: Context<'_>,
    #[description = "The Minecraft username to check"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let upstream = ctx.data().upstream.as_ref();

    let account = match upstream.resolve(&username).await {
        Ok(account) => account,
        Err(ApiError::NotFound) => {
            log::info!("Player '{}' not found", username);
            ctx.say(format!("Player '{}' not found.", username)).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("Found id {} for '{}'", account.id, account.name);

    let html = match upstream.raw_stats(&account.id).await {
        Ok(html) => html,
        Err(e) => {
            log::warn!("No Bedwars stats for {}: {}", account.name, e);
            ctx.say(format!("No Bedwars stats found for {}.", account.name))
                .await?;
            return Ok(());
        }
    };
    let stats = BedwarsStats::parse(&html)?;

    let title = match upstream.formatted_profile(&account.id).await {
        Ok(profile) => profile
            .formatted
            .map(|formatted| strip_color_codes(&formatted))
            .unwrap_or_else(|| account.name.clone()),
        Err(e) => {
            log::warn!("No formatted name for {}: {}", account.name, e);
            account.name.clone()
        }
    };

    let render_style = ctx.data().renders.lock().await.render_style(&account.name);
    log::info!("Using render type {} for {}", render_style, account.name);

    ctx.send(poise::CreateReply::default().embed(embed(&account, &title, &render_style, &stats)))
        .await?;
    log::info!("Successfully displayed stats for {}", account.name);

    Ok(())
}

fn embed(account: &Account, title: &str, render_style: &str, stats: &BedwarsStats) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("Bedwars Stats: {}", title))
        .description("Detailed statistics for Bedwars")
        .colour(EMBED_COLOUR)
        .thumbnail(skin_url(render_style, &account.name, "full"))
        .fields(
            fields(stats)
                .into_iter()
                .map(|(name, value)| (name, value, false)),
        )
}

fn section(first: (&str, u64), second: (&str, u64), ratio_name: &str) -> String {
    format!(
        "{}: `{}`\n{}: `{}`\n{}: `{:.2}`",
        first.0,
        thousands(first.1),
        second.0,
        thousands(second.1),
        ratio_name,
        ratio(first.1, second.1)
    )
}

fn fields(stats: &BedwarsStats) -> Vec<(&'static str, String)> {
    vec![
        (
            "🏆 Win/Loss",
            section(("Wins", stats.wins), ("Losses", stats.losses), "W/L Ratio"),
        ),
        (
            "⚔️ Final K/D",
            section(
                ("Final Kills", stats.final_kills),
                ("Final Deaths", stats.final_deaths),
                "FKDR",
            ),
        ),
        (
            "🛏️ Bed Stats",
            section(
                ("Beds Broken", stats.beds_broken),
                ("Beds Lost", stats.beds_lost),
                "BBLR",
            ),
        ),
        (
            "⚔️ K/D",
            section(("Kills", stats.kills), ("Deaths", stats.deaths), "K/D Ratio"),
        ),
        ("⭐ Stars", format!("`{}`", format_stars(stats.stars))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_fields() {
        let stats = BedwarsStats {
            final_kills: 12_345,
            final_deaths: 0,
            wins: 300,
            losses: 200,
            beds_broken: 10,
            beds_lost: 4,
            kills: 0,
            deaths: 0,
            stars: 1204,
        };

        let fields = fields(&stats);

        assert_eq!(fields[0].1, "Wins: `300`\nLosses: `200`\nW/L Ratio: `1.50`");
        assert_eq!(
            fields[1].1,
            "Final Kills: `12,345`\nFinal Deaths: `0`\nFKDR: `12345.00`"
        );
        assert_eq!(fields[2].1, "Beds Broken: `10`\nBeds Lost: `4`\nBBLR: `2.50`");
        assert_eq!(fields[3].1, "Kills: `0`\nDeaths: `0`\nK/D Ratio: `0.00`");
        assert_eq!(fields[4], ("⭐ Stars", "`1204✪`".to_string()));
    }
}
