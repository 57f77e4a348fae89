use crate::app::AppContext;
use crate::cli::DeleteArgs;

pub async fn handle_delete(ctx: &AppContext<'_>, args: &DeleteArgs) -> anyhow::Result<()> {
    let service = ctx.open_service().await?;
    let deleted = service.delete(args.id, ctx.cancel()).await?;

    if !ctx.quiet() {
        if deleted {
            println!("Deleted note {}", args.id);
        } else {
            println!("Note {} was already gone", args.id);
        }
    }
    Ok(())
}
