// notes-store - the storage side of the notes app
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::{bail, Context};
use notes_store_lib::{
    bridge::{self, stdio},
    config::DB_PATH_VAR,
    db::initialize_store,
    logging, Config, Note, NotesService,
};
use std::env;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    logging::init_logging(&config.log_level)?;

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "init" => handle_init(&args[2..], &config).await,
        "status" => handle_status(&config).await,
        "list" => handle_list(&args[2..], &config).await,
        "show" => handle_show(&args[2..], &config).await,
        "new" => handle_new(&args[2..], &config).await,
        "edit" => handle_edit(&args[2..], &config).await,
        "rename" => handle_rename(&args[2..], &config).await,
        "folder" => handle_folder(&args[2..], &config).await,
        "folders" => handle_folders(&config).await,
        "search" => handle_search(&args[2..], &config).await,
        "serve" => handle_serve(config).await,
        "version" | "-v" | "--version" => {
            println!("notes-store v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

async fn handle_init(args: &[String], config: &Config) -> anyhow::Result<()> {
    let path = match (args.first(), &config.db_path) {
        (Some(arg), _) => arg.into(),
        (None, Some(path)) => path.clone(),
        (None, None) => bail!("no store path given and {} is not set", DB_PATH_VAR),
    };

    initialize_store(&path)
        .await
        .with_context(|| format!("could not initialize {}", path.display()))?;
    println!("Initialized notes store at {}", path.display());

    Ok(())
}

async fn handle_status(config: &Config) -> anyhow::Result<()> {
    let mut service = NotesService::from_config(config).await;
    let status = service.status();

    println!("\nnotes-store Status");
    println!("{}", "=".repeat(60));

    match &status.path {
        Some(path) if status.connected => println!("  Store:    {} (connected)", path),
        _ => println!("  Store:    not connected"),
    }

    if let Some(stats) = service.stats().await {
        println!("  Notes:    {}", stats.total_notes);
        println!("  Folders:  {}", stats.total_folders);
    }

    println!("{}", "=".repeat(60));
    service.close().await;

    Ok(())
}

async fn handle_list(args: &[String], config: &Config) -> anyhow::Result<()> {
    let mut service = connected(config).await?;

    let notes = match args.first() {
        Some(folder_id) => service.get_notes_in_folder(folder_id).await,
        None => service.get_all_notes().await,
    };

    print_notes(&notes);
    service.close().await;
    Ok(())
}

async fn handle_show(args: &[String], config: &Config) -> anyhow::Result<()> {
    let Some(id) = args.first() else {
        bail!("usage: notes-store show <id>");
    };

    let mut service = connected(config).await?;
    let note = service.get_note_by_id(id).await;
    service.close().await;

    match note {
        Some(note) => println!("{}", serde_json::to_string_pretty(&note)?),
        None => println!("No note with id '{}'", id),
    }
    Ok(())
}

async fn handle_new(args: &[String], config: &Config) -> anyhow::Result<()> {
    let mut positional = Vec::new();
    let mut folder_id: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--folder" => {
                i += 1;
                folder_id = args.get(i).cloned();
            }
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let Some(title) = positional.first().cloned() else {
        bail!("usage: notes-store new <title> [body] [--folder <id>]");
    };
    let body = positional[1..].join(" ");

    let mut service = connected(config).await?;
    let note = service.create_note(title, body, folder_id).await;
    service.close().await;

    print_written(note)
}

async fn handle_edit(args: &[String], config: &Config) -> anyhow::Result<()> {
    if args.len() < 3 {
        bail!("usage: notes-store edit <id> <title> <body>");
    }

    let mut service = connected(config).await?;
    let note = service
        .update_note(&args[0], args[1].clone(), args[2..].join(" "))
        .await;
    service.close().await;

    print_written(note)
}

async fn handle_rename(args: &[String], config: &Config) -> anyhow::Result<()> {
    if args.len() < 2 {
        bail!("usage: notes-store rename <id> <title>");
    }

    let mut service = connected(config).await?;
    let note = service
        .update_note_title(&args[0], args[1..].join(" "))
        .await;
    service.close().await;

    print_written(note)
}

async fn handle_folder(args: &[String], config: &Config) -> anyhow::Result<()> {
    let mut title_parts = Vec::new();
    let mut parent_id: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--parent" => {
                i += 1;
                parent_id = args.get(i).cloned();
            }
            arg => title_parts.push(arg.to_string()),
        }
        i += 1;
    }

    if title_parts.is_empty() {
        bail!("usage: notes-store folder <title> [--parent <id>]");
    }

    let mut service = connected(config).await?;
    let folder = service
        .create_folder(title_parts.join(" "), parent_id)
        .await;
    service.close().await;

    match folder {
        Some(folder) => println!("{}", serde_json::to_string_pretty(&folder)?),
        None => bail!("folder was not created, see the log for details"),
    }
    Ok(())
}

async fn handle_folders(config: &Config) -> anyhow::Result<()> {
    let mut service = connected(config).await?;
    let folders = service.get_all_folders().await;
    service.close().await;

    if folders.is_empty() {
        println!("No folders found.");
        return Ok(());
    }

    println!("\nFolders:");
    println!("{}", "=".repeat(60));
    for folder in &folders {
        let parent = if folder.is_at_root() {
            "(root)"
        } else {
            folder.parent_id.as_str()
        };
        println!("  {}  {}  in {}", folder.id, folder.title, parent);
    }
    println!("{}", "=".repeat(60));
    Ok(())
}

async fn handle_search(args: &[String], config: &Config) -> anyhow::Result<()> {
    if args.is_empty() {
        bail!("usage: notes-store search <query>");
    }

    let query = args.join(" ");
    let mut service = connected(config).await?;
    let notes = service
        .search_notes(&query, notes_store_lib::core::DEFAULT_SEARCH_LIMIT)
        .await;
    service.close().await;

    if notes.is_empty() {
        println!("No notes found matching '{}'", query);
    } else {
        print_notes(&notes);
    }
    Ok(())
}

async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let service = NotesService::from_config(&config).await;
    let (handle, worker) = bridge::spawn(service);

    let stdin = BufReader::new(tokio::io::stdin());
    stdio::serve(&handle, stdin, tokio::io::stdout()).await?;

    // Dropping the last handle lets the worker close the store
    drop(handle);
    worker.await?;
    Ok(())
}

async fn connected(config: &Config) -> anyhow::Result<NotesService> {
    let Some(path) = &config.db_path else {
        bail!("{} is not set; point it at a notes store file", DB_PATH_VAR);
    };

    let mut service = NotesService::new();
    service
        .connect(path)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    Ok(service)
}

fn print_written(note: Option<Note>) -> anyhow::Result<()> {
    match note {
        Some(note) => {
            println!("{}", serde_json::to_string_pretty(&note)?);
            Ok(())
        }
        None => bail!("note was not saved, see the log for details"),
    }
}

fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    println!("\nNotes:");
    println!("{}", "=".repeat(60));
    for (i, note) in notes.iter().enumerate() {
        println!("{:3}. {}  {}", i + 1, note.id, note.title);
    }
    println!("{}", "=".repeat(60));
}

fn print_usage() {
    println!(
        r#"notes-store v{} - storage for your notes

USAGE:
    notes-store <COMMAND> [OPTIONS]

COMMANDS:
    init [path]                      Create a store file (default: $NOTES_DB_PATH)
    status                           Show connection status and counts
    list [folder-id]                 List notes, optionally in one folder
    show <id>                        Print one note as JSON
    new <title> [body] [--folder id] Create a note
    edit <id> <title> <body>         Replace a note's title and body
    rename <id> <title>              Change a note's title
    folder <title> [--parent id]     Create a folder
    folders                          List folders
    search <query>                   Fuzzy search titles and bodies
    serve                            Answer JSON requests on stdin/stdout
    version                          Show version
    help                             Show this help

ENVIRONMENT:
    NOTES_DB_PATH    Store file to open
    NOTES_LOG        Log level when RUST_LOG is unset (default: info)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
