//! registro-cli – command-line front end for a registro server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use registro_client::{ClientError, DEFAULT_API_URL, RegistroApp, RegistroClient};
use registro_types::Registro;

#[derive(Debug, Parser)]
#[command(name = "registro-cli", version, about = "Manage records on a registro server")]
struct Cli {
    /// Server base URL.
    #[arg(long, env = "REGISTRO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show one page of records, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Create a record.
    Add { text: String },
    /// Replace the text of a record.
    Edit { id: i64, text: String },
    /// Delete a record.
    Rm { id: i64 },
    /// Delete every record containing a word (case-sensitive).
    Purge { palabra: String },
    /// Delete every record.
    PurgeAll {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = RegistroClient::new(&cli.api_url).context("building HTTP client")?;
    let mut app = RegistroApp::new(client);

    match run(&mut app, cli.command).await {
        Err(ClientError::Locked) => {
            anyhow::bail!("Acceso restringido: se detectó contenido no permitido.")
        }
        Err(ClientError::NotConfirmed) => {
            anyhow::bail!("Usa --yes para confirmar que quieres borrar todos los registros.")
        }
        other => other.with_context(|| format!("request to {} failed", cli.api_url)),
    }
}

async fn run(app: &mut RegistroApp<RegistroClient>, command: Command) -> Result<(), ClientError> {
    match command {
        Command::List { page } => {
            app.load().await?;
            app.set_page(page);
            print_page(app);
        }
        Command::Add { text } => match app.submit(&text).await? {
            Some(r) => println!("Creado #{}: {}", r.id, r.contenido),
            None => println!("Nada que guardar."),
        },
        Command::Edit { id, text } => match app.edit(id, &text).await? {
            Some(r) => println!("Actualizado #{}: {}", r.id, r.contenido),
            None => println!("Nada que guardar."),
        },
        Command::Rm { id } => {
            app.remove(id).await?;
            println!("Eliminado #{id}");
        }
        Command::Purge { palabra } => {
            let response = app.purge_word(&palabra).await?;
            println!("{}", response.message);
        }
        Command::PurgeAll { yes } => {
            let response = app.purge_all(yes).await?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

fn print_page(app: &RegistroApp<RegistroClient>) {
    if app.registros().is_empty() {
        println!("No has escrito nada");
        return;
    }
    for Registro {
        id,
        contenido,
        created_at,
    } in app.current_page()
    {
        println!("{id:>5}  {}  {contenido}", created_at.format("%Y-%m-%d %H:%M"));
    }
    println!(
        "-- página {}/{} ({} registros)",
        app.page(),
        app.page_count(),
        app.registros().len()
    );
}
