use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::helpers::read_note_body;
use crate::output::note_json;

pub async fn handle_edit(ctx: &AppContext<'_>, args: &EditArgs) -> anyhow::Result<()> {
    let body = read_note_body(args.body.clone())?;
    let service = ctx.open_service().await?;

    let note = service.update(args.id, &body, ctx.cancel()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&note_json(&note)?)?);
    } else if !ctx.quiet() {
        println!("Updated note {}", note.id);
    }
    Ok(())
}
