use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::{ContactChanges, ContactId, FAVORITE_MARKER};
use storage::{normalize_database_url, ContactStore, Storage, DEFAULT_DATABASE_URL};

#[derive(Parser, Debug)]
struct Cli {
    /// SQLite URL or plain file path, same as the server's `database_url`.
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the demo contacts into an empty store.
    Seed,
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    Create {
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        twitter: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&normalize_database_url(&cli.database_url)).await?;

    match cli.command {
        Command::Seed => {
            let seeded = storage.seed_demo_contacts().await?;
            println!("seeded {seeded} contacts");
        }
        Command::List { query } => {
            for contact in storage.get_contacts(query.as_deref()).await? {
                let marker = if contact.favorite { FAVORITE_MARKER } else { " " };
                println!("{marker} {} {}", contact.id, contact.display_name());
            }
        }
        Command::Create {
            first,
            last,
            twitter,
        } => {
            let contact = storage.create_empty_contact().await?;
            let changes = ContactChanges {
                first,
                last,
                twitter,
                ..ContactChanges::default()
            };
            if changes != ContactChanges::default() {
                storage.update_contact(&contact.id, changes).await?;
            }
            println!("created contact_id={}", contact.id);
        }
        Command::Delete { id } => {
            let Some(id) = ContactId::parse(&id) else {
                bail!("contact id must not be blank");
            };
            if storage.delete_contact(&id).await? {
                println!("deleted contact_id={id}");
            } else {
                println!("no contact with id {id}");
            }
        }
    }

    Ok(())
}
