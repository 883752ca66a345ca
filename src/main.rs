// carrental - rental offers and a tiny keyword chatbot
//
// This is the main entry point. Parses CLI args and dispatches to handlers.
// Results go to stdout as JSON; logs go to stderr.

use anyhow::Context;
use carrental_lib::{
    chat::{ChatReply, ChatService},
    core::{FileRecordStore, Listing, RentalForm, RentalIntake},
    db::{CarInventory, NewCar, TableRecordStore},
    Config, Database, RentalError, StaticCredentials,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    let outcome = match command {
        "new" => handle_new(&config, rest).await,
        "list" => handle_list(&config, rest).await,
        "listdb" => handle_listdb(&config).await,
        "chat" => return handle_chat(&config, rest).await,
        "add-car" => handle_add_car(&config, rest).await,
        "version" | "-v" | "--version" => {
            println!("carrental v{}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(ExitCode::SUCCESS);
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            return Ok(ExitCode::FAILURE);
        }
    };

    match outcome {
        Ok(doc) => {
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", json!({ "error": e.user_message() }));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Split `--flag value` pairs from free words. Flags in `switches` take no value.
fn parse_flags(args: &[String], switches: &[&str]) -> (HashMap<String, String>, Vec<String>) {
    let mut flags = HashMap::new();
    let mut words = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if let Some(name) = arg.strip_prefix("--") {
            if switches.contains(&name) {
                flags.insert(name.to_string(), "true".to_string());
            } else if i + 1 < args.len() {
                i += 1;
                flags.insert(name.to_string(), args[i].clone());
            }
        } else {
            words.push(arg.clone());
        }
        i += 1;
    }

    (flags, words)
}

async fn handle_new(config: &Config, args: &[String]) -> Result<Value, RentalError> {
    let (mut flags, _) = parse_flags(args, &[]);

    let form = RentalForm {
        co2_rating: flags.remove("co2"),
        engine: flags.remove("engine"),
        dias_alquiler: flags.remove("days"),
        num_vehi: flags.remove("units"),
        descuento: flags.remove("discount"),
    };

    let intake = RentalIntake::new(FileRecordStore::new(&config.rentals_file));
    let stored = intake.submit(form).await?;

    Ok(serde_json::to_value(&stored)?)
}

async fn handle_list(config: &Config, args: &[String]) -> Result<Value, RentalError> {
    let (flags, _) = parse_flags(args, &[]);
    let user = flags.get("user").map(String::as_str).unwrap_or("");
    let password = flags.get("password").map(String::as_str).unwrap_or("");

    let verifier = StaticCredentials::from_parts(
        config.admin_user.clone(),
        config.admin_password.clone(),
    );
    let listing = Listing::new(Arc::new(verifier));
    let store = FileRecordStore::new(&config.rentals_file);

    listing.file_document(&store, user, password).await
}

async fn handle_listdb(config: &Config) -> Result<Value, RentalError> {
    let db = Database::new(&config.database_path).await?;
    let store = TableRecordStore::new(db.clone());

    let doc = Listing::table_document(&store).await;

    db.close().await;
    doc
}

async fn handle_chat(config: &Config, args: &[String]) -> anyhow::Result<ExitCode> {
    if args.is_empty() {
        eprintln!("Error: No message provided");
        return Ok(ExitCode::FAILURE);
    }

    // Accept either a raw JSON body or plain words.
    let joined = args.join(" ");
    let body = if joined.trim_start().starts_with('{') {
        joined
    } else {
        json!({ "message": joined }).to_string()
    };

    let reply = chat_reply(config, &body).await;
    println!("{}", reply.to_document());

    Ok(if reply.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Open the inventory and answer one request body. Setup failures come back
/// as error replies, same as failures while answering.
async fn chat_reply(config: &Config, body: &str) -> ChatReply {
    let db = match Database::new(&config.database_path).await {
        Ok(db) => db,
        Err(e) => return ChatReply::from_error(&e),
    };

    let inventory = CarInventory::new(db.clone());
    let reply = match inventory.ensure_schema().await {
        Ok(()) => ChatService::new(inventory).reply(body).await,
        Err(e) => ChatReply::from_error(&e),
    };

    db.close().await;
    reply
}

async fn handle_add_car(config: &Config, args: &[String]) -> Result<Value, RentalError> {
    let (flags, words) = parse_flags(args, &["unavailable"]);

    if words.len() < 4 {
        return Err(RentalError::InvalidInput(
            "usage: add-car <make> <model> <year> <price-per-day> [--unavailable]".to_string(),
        ));
    }

    let year = words[2]
        .parse::<i32>()
        .map_err(|_| RentalError::InvalidInput(format!("year must be a number, got '{}'", words[2])))?;
    let price_per_day = words[3].parse::<f64>().map_err(|_| {
        RentalError::InvalidInput(format!("price must be a number, got '{}'", words[3]))
    })?;

    let db = Database::new(&config.database_path).await?;
    let inventory = CarInventory::new(db.clone());
    inventory.ensure_schema().await?;

    let row = inventory
        .add_car(NewCar {
            make: words[0].clone(),
            model: words[1].clone(),
            year,
            available: !flags.contains_key("unavailable"),
            price_per_day,
        })
        .await?;

    db.close().await;
    Ok(serde_json::to_value(&row)?)
}

fn print_usage() {
    println!(
        r#"carrental v{} - rental offers and a car rental chatbot

USAGE:
    carrental <COMMAND> [OPTIONS]

COMMANDS:
    new --co2 <r> --engine <e> --days <n> --units <n> --discount <d>
                           Append a rental to the rentals file
    list --user <id> --password <secret>
                           List the rentals file
    listdb                 List the rentals table (created and seeded on first use)
    chat <message>         Ask the chatbot (plain words or {{"message": "..."}})
    add-car <make> <model> <year> <price> [--unavailable]
                           Add a car to the chatbot's inventory
    version                Show version
    help                   Show this help

ENVIRONMENT:
    CARRENTAL_RENTALS_FILE     Rentals file (default ~/.carrental/rentals.json)
    CARRENTAL_DATABASE         SQLite database (default ~/.carrental/carrental.db)
    CARRENTAL_ADMIN_USER       User id accepted by `list`
    CARRENTAL_ADMIN_PASSWORD   Password accepted by `list`
    RUST_LOG                   Log filter (default info)

EXAMPLES:
    carrental new --co2 54 --engine Hybrid --days 3 --units 1 --discount 12.0
    carrental listdb
    carrental chat "is a car available?"
"#,
        env!("CARGO_PKG_VERSION")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let (flags, words) = parse_flags(
            &args(&["Toyota", "--engine", "Hybrid", "Prius", "--unavailable"]),
            &["unavailable"],
        );

        assert_eq!(flags.get("engine").map(String::as_str), Some("Hybrid"));
        assert!(flags.contains_key("unavailable"));
        assert_eq!(words, args(&["Toyota", "Prius"]));
    }

    fn config_with_database(database_path: std::path::PathBuf) -> Config {
        Config {
            rentals_file: database_path.with_file_name("rentals.json"),
            database_path,
            admin_user: None,
            admin_password: None,
            log_level: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_chat_reply_answers_from_fresh_database() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = config_with_database(temp.path().join("chat.db"));

        let reply = chat_reply(&config, r#"{"message": "is a car available?"}"#).await;
        assert_eq!(reply, ChatReply::Response("Available cars:\n".to_string()));
    }

    #[tokio::test]
    async fn test_chat_reply_reports_unopenable_database() {
        let temp = tempfile::TempDir::new().unwrap();
        // A regular file where the database directory should be.
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let config = config_with_database(blocker.join("chat.db"));

        let reply = chat_reply(&config, r#"{"message": "hello"}"#).await;
        assert!(matches!(reply, ChatReply::Error { server_side: true, .. }));
        assert!(reply.to_document()["error"]
            .as_str()
            .unwrap()
            .starts_with("An error occurred"));
    }

    #[test]
    fn test_trailing_flag_without_value_is_dropped() {
        let (flags, words) = parse_flags(&args(&["--discount"]), &[]);
        assert!(flags.is_empty());
        assert!(words.is_empty());
    }
}
