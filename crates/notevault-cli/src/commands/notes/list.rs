use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{notes_json, print_note_list};

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let service = ctx.open_service().await?;
    let report = service.list_report(&args.owner, ctx.cancel()).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&notes_json(&report.notes)?)?
        );
    } else {
        print_note_list(&report.notes, ctx.quiet());
    }

    if !report.skipped.is_empty() && !ctx.quiet() {
        let ids: Vec<String> = report.skipped.iter().map(|id| id.to_string()).collect();
        eprintln!(
            "Warning: {} note(s) could not be decrypted and were skipped: {}",
            ids.len(),
            ids.join(", ")
        );
    }
    Ok(())
}
