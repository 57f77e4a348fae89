use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output::{note_json, print_note};

pub async fn handle_show(ctx: &AppContext<'_>, args: &ShowArgs) -> anyhow::Result<()> {
    let service = ctx.open_service().await?;
    let note = service.get(args.id, ctx.cancel()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&note_json(&note)?)?);
    } else {
        print_note(&note, ctx.quiet());
    }
    Ok(())
}
