//! FamilySearch ancestry exporter.
//!
//! Walks the authorization-code OAuth flow interactively, fetches the
//! authenticated user's ancestry tree, and writes it to an .xlsx
//! spreadsheet:
//!
//! ```bash
//! FAMILYSEARCH_CLIENT_ID=... cargo run -p kindred -- --generations 4 --output tree.xlsx
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use familysearch::{Client, Config, Environment, Error as ApiError};
use kindred_core::{format_rows, write_spreadsheet, TreeFetcher, DEFAULT_GENERATIONS};

#[derive(Debug)]
struct Options {
    client_id: Option<String>,
    redirect_uri: String,
    environment: Environment,
    access_token: Option<String>,
    generations: u8,
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(options).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(options: Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new(
        options.client_id.clone().unwrap_or_default(),
        options.redirect_uri.clone(),
    )
    .with_environment(options.environment);
    let client = Client::new(config);

    let session = match options.access_token {
        Some(token) => client.session(token),
        None => {
            let state = uuid::Uuid::new_v4().simple().to_string();
            let url = client.authorization_url(Some(&state))?;
            println!("Please visit this URL to authorize the application:");
            println!();
            println!("  {url}");
            println!();
            print!("Paste the authorization code from the redirect URL: ");
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            let code = line.trim();
            if code.is_empty() {
                return Err("No authorization code provided".into());
            }

            match client.exchange_code(code).await {
                Ok(session) => session,
                Err(ApiError::ExpiredGrant) => {
                    eprintln!("Authorization code expired. Please try authorizing again.");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    println!(
        "Fetching ancestry ({} generations)...",
        options.generations
    );
    let fetched = TreeFetcher::new(session)
        .with_generations(options.generations)
        .fetch_all(|processed, total| println!("Processed {processed} / {total}"))
        .await?;

    let rows = format_rows(&fetched)?;
    write_spreadsheet(&rows, &options.output)?;

    println!("Total persons in tree: {}", fetched.len());
    println!("Wrote {} rows to {}", rows.len(), options.output.display());
    Ok(())
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        client_id: std::env::var("FAMILYSEARCH_CLIENT_ID").ok(),
        redirect_uri: std::env::var("FAMILYSEARCH_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        environment: match std::env::var("FAMILYSEARCH_ENV") {
            Ok(value) => value.parse().map_err(|e| format!("{e}"))?,
            Err(_) => Environment::default(),
        },
        access_token: std::env::var("FAMILYSEARCH_ACCESS_TOKEN").ok(),
        generations: DEFAULT_GENERATIONS,
        output: PathBuf::from("ancestry.xlsx"),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--generations" => {
                let value = args
                    .get(i + 1)
                    .ok_or("--generations requires a value")?;
                options.generations = value
                    .parse()
                    .map_err(|_| format!("Invalid generation count: {value}"))?;
                i += 2;
            }
            "--output" => {
                let value = args.get(i + 1).ok_or("--output requires a value")?;
                options.output = PathBuf::from(value);
                i += 2;
            }
            "--token" => {
                let value = args.get(i + 1).ok_or("--token requires a value")?;
                options.access_token = Some(value.clone());
                i += 2;
            }
            other => {
                return Err(format!("Unknown argument: {other}"));
            }
        }
    }

    // The OAuth prompt needs a client id; token sessions do not.
    if options.access_token.is_none() && options.client_id.is_none() {
        return Err(
            "FAMILYSEARCH_CLIENT_ID environment variable not set (or pass --token)".to_string(),
        );
    }

    Ok(options)
}

fn print_help() {
    println!("kindred - export a FamilySearch ancestry tree to a spreadsheet");
    println!();
    println!("USAGE:");
    println!("  kindred [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help             Show this help message");
    println!("  --generations <N>      Ancestry depth to fetch (default: 2)");
    println!("  --output <PATH>        Destination .xlsx file (default: ancestry.xlsx)");
    println!("  --token <TOKEN>        Use a pre-issued access token, skipping the OAuth prompt");
    println!();
    println!("ENVIRONMENT:");
    println!("  FAMILYSEARCH_CLIENT_ID      OAuth client id (required unless --token)");
    println!("  FAMILYSEARCH_REDIRECT_URI   OAuth redirect URI (default: http://localhost:3000)");
    println!("  FAMILYSEARCH_ENV            production | beta | integration (default: beta)");
    println!("  FAMILYSEARCH_ACCESS_TOKEN   Same as --token");
    println!();
    println!("EXAMPLES:");
    println!("  kindred                                  # OAuth prompt, 2 generations");
    println!("  kindred --generations 4 --output tree.xlsx");
    println!("  kindred --token b0-abc123                # reuse an existing session");
}
