use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
struct SaveRequest {
    work_id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SavedBook {
    work_id: String,
    title: String,
    author: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    message: String,
    saved: SavedBook,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    count: usize,
    saved_books: Vec<SavedBook>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, PartialEq)]
enum Command {
    Save {
        work_id: String,
        title: String,
        author: Option<String>,
        cover_url: Option<String>,
    },
    List(Option<u32>),
    Demo,
}

const DEFAULT_SERVICE_URL: &str = "http://0.0.0.0:7002";
const USAGE: &str = "Usage: shelf-client save <work_id> <title> [author] [cover_url] | list [limit]";

fn parse_args(args: &[String]) -> Result<Command, String> {
    let Some(command) = args.first() else {
        return Ok(Command::Demo);
    };

    match command.as_str() {
        "save" => match &args[1..] {
            [work_id, title, rest @ ..] if rest.len() <= 2 => Ok(Command::Save {
                work_id: work_id.clone(),
                title: title.clone(),
                author: rest.first().cloned(),
                cover_url: rest.get(1).cloned(),
            }),
            _ => Err("save expects <work_id> <title> [author] [cover_url]".to_string()),
        },
        "list" => match &args[1..] {
            [] => Ok(Command::List(None)),
            [limit] => limit
                .parse()
                .map(|limit| Command::List(Some(limit)))
                .map_err(|e| format!("Invalid limit '{}': {}", limit, e)),
            _ => Err("list expects at most one [limit]".to_string()),
        },
        other => Err(format!("Unknown command '{}'", other)),
    }
}

struct ShelfClient {
    client: Client,
    base_url: String,
}

impl ShelfClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn wait_for_service(&self) {
        info!("Waiting for persistence service at {}...", self.base_url);
        let url = format!("{}/status", self.base_url);

        loop {
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Persistence service is ready");
                    return;
                }
                Ok(response) => {
                    warn!("Persistence service responded with status: {}", response.status())
                }
                Err(e) => warn!("Persistence service not ready: {}", e),
            }
            sleep(Duration::from_secs(2)).await;
        }
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => format!("{} ({})", body.error, status),
            Err(_) => status.to_string(),
        }
    }

    async fn save(&self, request: SaveRequest) -> Result<SavedBook, Box<dyn std::error::Error>> {
        info!("Saving {} \"{}\"", request.work_id, request.title);

        let url = format!("{}/api/save-book", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        if response.status().is_success() {
            let body: SaveResponse = response.json().await?;
            info!("{} {} at {}", body.message, body.saved.work_id, body.saved.created_at);
            Ok(body.saved)
        } else {
            let message = Self::error_message(response).await;
            error!("Failed to save {}: {}", request.work_id, message);
            Err(message.into())
        }
    }

    async fn list(&self, limit: Option<u32>) -> Result<Vec<SavedBook>, Box<dyn std::error::Error>> {
        let url = format!("{}/api/saved-books", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await?;

        if response.status().is_success() {
            let body: ListResponse = response.json().await?;
            info!("{} saved book(s)", body.count);
            for book in &body.saved_books {
                info!(
                    "  {} | {} | {} | {}",
                    book.work_id,
                    book.title,
                    book.author.as_deref().unwrap_or("Unknown author"),
                    book.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            Ok(body.saved_books)
        } else {
            let message = Self::error_message(response).await;
            error!("Failed to list saved books: {}", message);
            Err(message.into())
        }
    }

    async fn demo(&self) -> Result<(), Box<dyn std::error::Error>> {
        let picks = [
            ("OL45883W", "Dune", "Frank Herbert"),
            ("OL66554W", "Pride and Prejudice", "Jane Austen"),
        ];

        for (work_id, title, author) in picks {
            self.save(SaveRequest {
                work_id: work_id.to_string(),
                title: title.to_string(),
                author: Some(author.to_string()),
                cover_url: None,
            })
            .await?;
        }

        self.list(Some(10)).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("shelf_client=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            error!("{}", e);
            info!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let base_url =
        std::env::var("PERSISTENCE_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
    let client = ShelfClient::new(base_url);

    client.wait_for_service().await;

    match command {
        Command::Save {
            work_id,
            title,
            author,
            cover_url,
        } => {
            client
                .save(SaveRequest {
                    work_id,
                    title,
                    author,
                    cover_url,
                })
                .await?;
        }
        Command::List(limit) => {
            client.list(limit).await?;
        }
        Command::Demo => {
            info!("No command given, saving and listing demo books");
            client.demo().await?;
        }
    }

    Ok(())
}
