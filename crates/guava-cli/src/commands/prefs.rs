use guava_core::models::NotificationSettings;
use guava_core::Preferences;

use crate::cli::PrefsCommands;
use crate::commands::common::{
    memo_action, open_session, print_json, MemoAction, SessionOptions,
};
use crate::error::CliError;

pub async fn run_prefs(command: PrefsCommands, options: &SessionOptions) -> Result<(), CliError> {
    let session = open_session(options)?;
    let prefs = session.prefs();

    match command {
        PrefsCommands::Show { json } => {
            let current = prefs.load()?;
            if json {
                return print_json(&current);
            }
            for line in format_preferences_lines(&current) {
                println!("{line}");
            }
        }
        PrefsCommands::Notify { email, push, sms } => {
            let current = prefs.load()?.notifications;
            let updated = merge_notifications(current, email, push, sms);
            prefs.set_notifications(updated)?;
            println!(
                "Notifications: email={} push={} sms={}",
                updated.email, updated.push, updated.sms
            );
        }
        PrefsCommands::Telecom { telecom_id } => {
            prefs.set_telecom(telecom_id.as_deref())?;
            match prefs.load()?.telecom_id {
                Some(telecom_id) => println!("Telecom set to {telecom_id}"),
                None => println!("Telecom cleared"),
            }
        }
        PrefsCommands::Cards { card_ids } => {
            prefs.set_cards(&card_ids)?;
            let saved = prefs.load()?.card_ids;
            if saved.is_empty() {
                println!("Card selection cleared");
            } else {
                println!("Cards set to {}", saved.join(", "));
            }
        }
        PrefsCommands::Note {
            service_id,
            text,
            clear,
        } => match memo_action(&text, clear) {
            MemoAction::Set(note) => {
                prefs.set_note(&service_id, &note)?;
                println!("Saved note for service {}", service_id.trim());
            }
            MemoAction::Clear => {
                prefs.set_note(&service_id, "")?;
                println!("Cleared note for service {}", service_id.trim());
            }
            MemoAction::Show => match prefs.note(&service_id)? {
                Some(note) => println!("{note}"),
                None => println!("(no note)"),
            },
        },
        PrefsCommands::Telecoms => {
            for telecom in session.api().list_telecoms().await? {
                println!("{:>4}  {}", telecom.id, telecom.name);
            }
        }
        PrefsCommands::AvailableCards => {
            for card in session.api().list_cards().await? {
                match card.issuer.as_deref() {
                    Some(issuer) => println!("{:>4}  {} ({issuer})", card.id, card.name),
                    None => println!("{:>4}  {}", card.id, card.name),
                }
            }
        }
    }

    Ok(())
}

/// Apply the given channels over `current`; `None` keeps the stored value.
pub fn merge_notifications(
    current: NotificationSettings,
    email: Option<bool>,
    push: Option<bool>,
    sms: Option<bool>,
) -> NotificationSettings {
    NotificationSettings {
        email: email.unwrap_or(current.email),
        push: push.unwrap_or(current.push),
        sms: sms.unwrap_or(current.sms),
    }
}

pub fn format_preferences_lines(prefs: &Preferences) -> Vec<String> {
    let mut lines = vec![
        format!(
            "notifications: email={} push={} sms={}",
            prefs.notifications.email, prefs.notifications.push, prefs.notifications.sms
        ),
        format!(
            "favorites: {}",
            if prefs.favorites.is_empty() {
                "-".to_string()
            } else {
                prefs.favorites.join(", ")
            }
        ),
        format!("telecom: {}", prefs.telecom_id.as_deref().unwrap_or("-")),
        format!(
            "cards: {}",
            if prefs.card_ids.is_empty() {
                "-".to_string()
            } else {
                prefs.card_ids.join(", ")
            }
        ),
    ];
    for (service_id, note) in &prefs.notes {
        lines.push(format!("note[{service_id}]: {note}"));
    }
    lines
}
