use guava_core::catalog::{categories, compare, ServiceFilter};
use guava_core::util::normalize_text_option;

use crate::cli::ServiceCommands;
use crate::commands::common::{
    format_comparison_lines, format_plan_line, format_service_line, open_session, print_json,
    SessionOptions,
};
use crate::error::CliError;

pub async fn run_services(
    command: ServiceCommands,
    options: &SessionOptions,
) -> Result<(), CliError> {
    let session = open_session(options)?;
    let api = session.api();

    match command {
        ServiceCommands::List {
            category,
            query,
            sort,
            json,
        } => {
            let services = api.list_services().await?;
            let filter = ServiceFilter {
                category: normalize_text_option(category),
                query: normalize_text_option(query),
                sort: sort.into(),
            };
            let matched = filter.apply(&services);
            if json {
                return print_json(&matched);
            }
            if matched.is_empty() {
                println!("No services found.");
                return Ok(());
            }
            for service in matched {
                println!("{}", format_service_line(service));
            }
        }
        ServiceCommands::Show { service_id, json } => {
            let service = api.get_service(service_id.trim()).await.map_err(|error| {
                if error.status() == Some(404) {
                    CliError::ServiceNotFound(service_id.trim().to_string())
                } else {
                    error.into()
                }
            })?;
            if json {
                return print_json(&service);
            }

            println!("{}", format_service_line(&service));
            if !service.description.trim().is_empty() {
                println!("{}", service.description.trim());
            }
            for plan in &service.plans {
                println!("{}", format_plan_line(plan));
            }
            if session.prefs().load()?.is_favorite(&service.id) {
                println!("(bookmarked locally)");
            }
        }
        ServiceCommands::Compare { service_ids, json } => {
            let services = api.compare_services(&service_ids).await?;
            let rows = compare(&services);
            if json {
                return print_json(&rows);
            }
            for line in format_comparison_lines(&rows) {
                println!("{line}");
            }
        }
        ServiceCommands::Categories => {
            let services = api.list_services().await?;
            for category in categories(&services) {
                println!("{category}");
            }
        }
    }

    Ok(())
}
