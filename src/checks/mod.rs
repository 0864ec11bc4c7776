use crate::discord::Context;
use crate::discord::Error;

/// Checks whether the user may change render types.
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    if ctx.data().settings.is_admin(ctx.author().id.get()) {
        Ok(true)
    } else {
        log::warn!(
            "'{}' tried to use '{}' without being an admin",
            ctx.author().name,
            ctx.command().name
        );
        ctx.say("You are not authorized to use this command.")
            .await?;
        Ok(false)
    }
}
