use clap::{Parser, Subcommand};
use serde_json::json;
use url::Url;

use modal_overlay::client::{
    HttpTransport, History, MemoryHistory, MemoryHost, NavigationController, Element,
};
use modal_overlay::config::ClientConfig;

#[derive(Parser)]
#[command(name = "modal-cli")]
#[command(about = "Drive a modal overlay server the way a browser would", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Page the simulated browser starts on.
    #[arg(short, long, default_value = "/items")]
    page: String,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a modal link
    Open { path: String },
    /// Submit a modal form
    Submit {
        action: String,
        #[arg(short, long, default_value = "post")]
        method: String,
        /// Form field as name=value; repeatable
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ClientConfig {
        base_url: cli.url.clone(),
        timeout_secs: cli.timeout_secs,
        ..ClientConfig::default()
    };
    let start = Url::parse(&config.base_url)?.join(&cli.page)?;

    let mut controller = NavigationController::new(
        HttpTransport::new(&config)?,
        MemoryHistory::new(start.as_str()),
        MemoryHost::new(Element::new("div")),
        &config,
    );
    controller.attach();

    let outcome = match cli.command {
        Commands::Open { path } => controller.load(&path, None, None).await?,
        Commands::Submit {
            action,
            method,
            fields,
        } => {
            let fields = parse_fields(&fields)?;
            controller.load(&action, Some(&method), Some(&fields)).await?
        }
    };

    let report = json!({
        "outcome": outcome,
        "navigation": controller.navigation_state(),
        "location": controller.history().location(),
        "history": controller.history().entries(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_fields(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter()
        .map(|field| {
            field
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("field {field:?} is not name=value"))
        })
        .collect()
}
