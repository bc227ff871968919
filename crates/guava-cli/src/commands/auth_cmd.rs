use guava_core::auth::RegisterOutcome;

use crate::cli::AuthCommands;
use crate::commands::common::{open_session, SessionOptions};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, options: &SessionOptions) -> Result<(), CliError> {
    let session = open_session(options)?;
    match command {
        AuthCommands::Login { username, password } => {
            session.auth().login(&username, &password).await?;
            println!("Signed in as {} ({})", username.trim(), session.api().base_url());
        }
        AuthCommands::Register {
            username,
            email,
            password,
        } => match session.auth().register(&username, &email, &password).await? {
            RegisterOutcome::SignedIn(_) => {
                println!("Account created; signed in as {}", username.trim());
            }
            RegisterOutcome::AccountCreated => {
                println!("Account created. Run `guava auth login` to sign in.");
            }
        },
        AuthCommands::Refresh => {
            session.auth().refresh().await?;
            println!("Access token refreshed");
        }
        AuthCommands::Logout => {
            session.logout().await?;
            if session.config().purge_local_on_logout {
                println!("Signed out; local preferences cleared");
            } else {
                println!("Signed out");
            }
        }
        AuthCommands::Status => {
            let tokens = session.tokens().load()?;
            match tokens {
                Some(tokens) => println!(
                    "Signed in to {} (refresh token {})",
                    session.api().base_url(),
                    if tokens.refresh.is_some() {
                        "stored"
                    } else {
                        "missing"
                    }
                ),
                None => println!("Not signed in"),
            }
        }
    }
    Ok(())
}
