use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Editor CLI for sitehost websites", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Account API key.
    #[arg(short, long, env = "SITEHOST_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Status,
    /// List your websites
    Websites,
    /// Show one website
    Show { slug: String },
    /// List a website's pages in menu order
    Pages { slug: String },
    /// Replace a page's content (`home` names the root page)
    EditPage {
        slug: String,
        page: String,
        content: String,
    },
    /// Renumber page positions 1..N
    Normalize { slug: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let base = cli.url.trim_end_matches('/');
    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", base)),
        Commands::Websites => client.get(format!("{}/admin/websites", base)),
        Commands::Show { slug } => client.get(format!("{}/admin/websites/{}", base, slug)),
        Commands::Pages { slug } => client.get(format!("{}/admin/websites/{}/pages", base, slug)),
        Commands::EditPage { slug, page, content } => client
            .patch(format!(
                "{}/admin/websites/{}/pages/{}",
                base,
                slug,
                page.trim_start_matches('/')
            ))
            .json(&json!({ "content": content })),
        Commands::Normalize { slug } => {
            client.post(format!("{}/admin/websites/{}/normalize", base, slug))
        }
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: editor API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
