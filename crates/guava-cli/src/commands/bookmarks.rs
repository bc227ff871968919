use serde::Serialize;

use crate::cli::BookmarkCommands;
use crate::commands::common::{
    memo_action, open_session, print_json, source_note, MemoAction, SessionOptions,
};
use crate::error::CliError;

#[derive(Serialize)]
struct BookmarkListOutput<'a> {
    service_ids: &'a [String],
}

pub async fn run_bookmarks(
    command: BookmarkCommands,
    options: &SessionOptions,
) -> Result<(), CliError> {
    let session = open_session(options)?;
    let bookmarks = session.bookmarks();

    match command {
        BookmarkCommands::List { json } => {
            let service_ids = bookmarks.list_bookmarks().await?;
            if json {
                return print_json(&BookmarkListOutput {
                    service_ids: &service_ids,
                });
            }
            if service_ids.is_empty() {
                if session.is_authenticated()? {
                    println!("No bookmarks yet.");
                } else {
                    println!("Not signed in; bookmarks are only kept for signed-in users.");
                }
                return Ok(());
            }
            for service_id in &service_ids {
                println!("{service_id}");
            }
        }
        BookmarkCommands::Add { service_id } => {
            let outcome = bookmarks.add_bookmark(&service_id).await?;
            println!(
                "Bookmarked service {}{}",
                service_id.trim(),
                source_note(outcome.source)
            );
        }
        BookmarkCommands::Remove { service_id } => {
            let outcome = bookmarks.remove_bookmark(&service_id).await?;
            println!(
                "Removed bookmark for service {}{}",
                service_id.trim(),
                source_note(outcome.source)
            );
        }
        BookmarkCommands::Memo {
            service_id,
            text,
            clear,
        } => match memo_action(&text, clear) {
            MemoAction::Set(memo) => {
                let outcome = bookmarks.set_bookmark_memo(&service_id, &memo).await?;
                println!(
                    "Saved memo for service {}{}",
                    service_id.trim(),
                    source_note(outcome.source)
                );
            }
            MemoAction::Clear => {
                let outcome = bookmarks.set_bookmark_memo(&service_id, "").await?;
                println!(
                    "Cleared memo for service {}{}",
                    service_id.trim(),
                    source_note(outcome.source)
                );
            }
            MemoAction::Show => match bookmarks.get_bookmark_memo(&service_id).await? {
                Some(memo) => println!("{memo}"),
                None => println!("(no memo)"),
            },
        },
    }

    Ok(())
}

