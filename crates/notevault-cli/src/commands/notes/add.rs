use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::read_note_body;
use crate::output::note_json;

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let body = read_note_body(args.body.clone())?;
    let service = ctx.open_service().await?;

    let note = service.create(&body, &args.owner, ctx.cancel()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&note_json(&note)?)?);
    } else if ctx.quiet() {
        println!("{}", note.id);
    } else {
        println!("Added note {}", note.id);
    }
    Ok(())
}
