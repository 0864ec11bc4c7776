use super::{skin_url, EMBED_COLOUR};
use crate::{
    alts::{self, namemc_url, Outcome, Report},
    api::ApiError,
    discord::{Context, Error},
};
use poise::serenity_prelude as serenity;

/// Discord rejects embed field values above this many characters.
const FIELD_LIMIT: usize = 1024;
/// Discord's caps on the number of fields and on the whole embed's text.
const MAX_FIELDS: usize = 25;
const EMBED_LIMIT: usize = 6000;
/// Room kept for the "…and N more" field.
const OVERFLOW_RESERVE: usize = 64;

/// Check for alts on a Minecraft account
#[poise::command(slash_command)]
pub async fn altcheck(
    ctx: Context<'_>,
    #[description = "The Minecraft username to check"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    log::info!("Checking alts for '{}'", username);

    // Snapshot so the store is not held across upstream calls.
    let styles = ctx.data().renders.lock().await.styles();

    let report = match alts::check(ctx.data().upstream.as_ref(), &styles, &username).await {
        Ok(report) => report,
        Err(ApiError::NotFound) => {
            ctx.say(format!("Could not find player: {}", username))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    ctx.send(poise::CreateReply::default().embed(embed(&report)))
        .await?;
    log::info!(
        "Successfully checked alts for '{}' ({} found)",
        username,
        report.outcomes.len()
    );

    Ok(())
}

fn embed(report: &Report) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title(report))
        .colour(EMBED_COLOUR)
        .thumbnail(skin_url(&report.render_style, &report.subject.name, "bust"))
        .fields(
            fields(report)
                .into_iter()
                .map(|(name, value)| (name, value, false)),
        )
}

fn title(report: &Report) -> String {
    format!("Alt Check: {}", report.subject.name)
}

/// Embed fields in display order, cut short to stay within Discord's embed limits.
fn fields(report: &Report) -> Vec<(String, String)> {
    let mut fields = vec![
        ("UUID".to_string(), report.subject.id.clone()),
        (
            "NameMC Profile".to_string(),
            format!("[Link]({})", namemc_url(&report.subject.id)),
        ),
        ("FKDR".to_string(), report.subject_ratio.to_string()),
        (
            "Urchin Tags".to_string(),
            report.subject_reputation.to_string(),
        ),
    ];

    if report.outcomes.is_empty() {
        fields.push(("Alts Found".to_string(), "No alts found.".to_string()));
        return fields;
    }

    let mut used = title(report).chars().count()
        + fields
            .iter()
            .map(|(name, value)| name.chars().count() + value.chars().count())
            .sum::<usize>();

    let labels: Vec<String> = report.outcomes.iter().map(Outcome::label).collect();
    let mut shown = 0;
    for chunk in chunk_lines(&labels, FIELD_LIMIT) {
        let name = alts_field_name(shown);
        let size = name.chars().count() + chunk.chars().count();
        // One field is always left for the overflow line.
        if fields.len() + 1 >= MAX_FIELDS || used + size + OVERFLOW_RESERVE > EMBED_LIMIT {
            break;
        }
        used += size;
        shown += chunk.lines().count();
        fields.push((name.to_string(), chunk));
    }

    let hidden = labels.len() - shown;
    if hidden > 0 {
        fields.push((
            alts_field_name(shown).to_string(),
            format!("…and {} more", hidden),
        ));
    }

    fields
}

fn alts_field_name(shown: usize) -> &'static str {
    if shown == 0 {
        "Alts Found"
    } else {
        "Alts Found (cont.)"
    }
}

/// Joins lines with newlines, starting a new chunk before `limit` would be exceeded.
fn chunk_lines(lines: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        if !current.is_empty() && current.chars().count() + 1 + line.chars().count() > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
