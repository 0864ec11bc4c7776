use crate::discord::{Data, Error};

mod altcheck;
mod bedwars;
mod info;
mod render;
mod suggest;

/// Embed colour shared by every report.
pub(crate) const EMBED_COLOUR: u32 = 0x00ff00;

pub fn list() -> Vec<poise::Command<Data, Error>> {
    vec![
        altcheck::altcheck(),
        bedwars::bedwars(),
        render::setrender(),
        render::requestchange(),
        suggest::suggest(),
        info::info(),
        info::help(),
    ]
}

/// The only thing a user sees when a command fails unexpectedly.
pub fn failure_message(command: &str) -> &'static str {
    match command {
        "altcheck" => "An error occurred while checking alts.",
        "bedwars" => "An error occurred while fetching Bedwars stats.",
        "setrender" => "An error occurred while updating the render type.",
        "requestchange" => "❌ An unexpected error occurred. Please try again later.",
        "suggest" => "❌ An error occurred while sending your suggestion.",
        _ => "An error occurred while running this command.",
    }
}

/// Skin render for a player in the given style, e.g. `bust` or `full`.
pub(crate) fn skin_url(render_style: &str, username: &str, crop: &str) -> String {
    format!(
        "https://starlightskins.lunareclipse.studio/render/{}/{}/{}",
        render_style, username, crop
    )
}
