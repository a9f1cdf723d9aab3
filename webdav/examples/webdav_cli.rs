// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WebDAV` client validation tool.
//!
//! This is a standalone CLI example for exercising the `WebDAV` client against
//! real servers. It serves as both a validation tool and example code for
//! using the `WebDavClient` API.

use std::error::Error;
use std::io::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use colored::Colorize as _;
use tracing_subscriber::EnvFilter;
use webdav_client::{PropertyName, WebDavClient, WebDavConfig, WebDavError};

/// `WebDAV` client validation tool.
#[derive(Parser)]
#[command(name = "webdav_cli")]
#[command(about = "WebDAV client validation tool", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file, takes precedence over the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// WebDAV server URL
    #[arg(long)]
    server: Option<String>,
    /// Path prefix on the server
    #[arg(long, default_value = "")]
    root: String,
    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,
    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Check that the server answers
    Check,
    /// List a remote directory
    Ls {
        /// Remote directory
        #[arg(default_value = "/")]
        path: String,
    },
    /// Create a remote directory
    Mkdir {
        /// Remote directory
        path: String,
    },
    /// Delete a remote resource
    Rm {
        /// Remote path
        path: String,
    },
    /// Copy a remote resource
    Cp {
        /// Source path
        from: String,
        /// Target path
        to: String,
    },
    /// Move a remote resource
    Mv {
        /// Source path
        from: String,
        /// Target path
        to: String,
    },
    /// Download a remote file or directory (trailing `/`)
    Get {
        /// Remote path
        remote: String,
        /// Local destination
        local: PathBuf,
    },
    /// Upload a local file or directory
    Put {
        /// Local source
        local: PathBuf,
        /// Remote path (trailing `/` for directories)
        remote: String,
    },
    /// Show resource metadata
    Info {
        /// Remote path
        path: String,
    },
    /// Show free space on the server
    Free,
    /// Publish a resource and print its public URL
    Publish {
        /// Remote path
        path: String,
    },
    /// Withdraw a published resource
    Unpublish {
        /// Remote path
        path: String,
    },
    /// Read a property, as `namespace name`
    Prop {
        /// Remote path
        path: String,
        /// Property namespace, e.g. `DAV:`
        namespace: String,
        /// Property name
        name: String,
    },
}

impl Cli {
    fn build_config(&self) -> Result<WebDavConfig, Box<dyn Error>> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            return Ok(WebDavConfig::from_str(&text)?);
        }

        // Read from environment variables when flags are absent
        let server = self
            .server
            .clone()
            .or_else(|| std::env::var("WEBDAV_SERVER").ok())
            .ok_or_else(|| {
                "WEBDAV_SERVER must be provided via --server or WEBDAV_SERVER env var".to_string()
            })?;

        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("WEBDAV_USERNAME").ok())
            .unwrap_or_default();

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("WEBDAV_PASSWORD").ok())
            .unwrap_or_default();

        Ok(WebDavConfig {
            server_login: username,
            server_password: password,
            server_root: self.root.clone(),
            timeout_secs: self.timeout,
            ..WebDavConfig::new(server)
        })
    }
}

async fn cmd_check(client: &WebDavClient) -> Result<(), WebDavError> {
    if client.check_connection().await? {
        println!("{}", "✓ Server is reachable".green());
    } else {
        println!("{}", "⚠ Server answered with an error".yellow());
    }
    Ok(())
}

async fn cmd_ls(client: &WebDavClient, path: &str) -> Result<(), WebDavError> {
    let names = client.list(path).await?;
    if names.is_empty() {
        println!("(empty)");
        return Ok(());
    }

    for name in names {
        if name.ends_with('/') {
            println!("{}", name.blue().bold());
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

async fn cmd_info(client: &WebDavClient, path: &str) -> Result<(), WebDavError> {
    let info = client.info(path).await?;
    let unknown = || "-".dimmed().to_string();

    println!("{:-<60}", "");
    println!("{:<12} {}", "Name", info.name.unwrap_or_else(unknown));
    println!(
        "{:<12} {}",
        "Size",
        info.size.map_or_else(unknown, |s| s.to_string())
    );
    println!("{:<12} {}", "Created", info.created.unwrap_or_else(unknown));
    println!("{:<12} {}", "Modified", info.modified.unwrap_or_else(unknown));
    println!("{:<12} {}", "Directory", info.is_directory);
    println!("{:-<60}", "");
    Ok(())
}

async fn cmd_publish(client: &WebDavClient, path: &str) -> Result<(), WebDavError> {
    match client.publish(path).await? {
        Some(url) => println!("{} {url}", "✓ Published:".green()),
        None => println!("{}", "✓ Published (server did not report a URL)".green()),
    }
    Ok(())
}

async fn cmd_prop(
    client: &WebDavClient,
    path: &str,
    namespace: &str,
    name: &str,
) -> Result<(), WebDavError> {
    let property = PropertyName::new(namespace, name);
    match client.get_property(path, &property).await? {
        Some(value) => println!("{property} = {value}"),
        None => println!("{property} is not set"),
    }
    Ok(())
}

/// Format error for user-friendly display.
fn format_error(err: &WebDavError) -> String {
    match err {
        WebDavError::NotConnection { .. } | WebDavError::CertificateNotValid(_) => format!(
            "{} {err}\nCheck the server URL and your connection",
            "Error:".red().bold()
        ),
        WebDavError::OptionNotValid { .. } => {
            format!("{} {err}\nCheck your configuration", "Error:".red().bold())
        }
        _ => format!("{} {err}", "Error:".red().bold()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env files (if they exist)
    // Priority: .env.local (highest) -> .env -> existing environment variables (lowest)
    dotenvy::dotenv().ok(); // Load .env
    dotenvy::from_filename(".env.local").ok(); // Load .env.local (overrides .env)

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.build_config()?;
    let client = WebDavClient::new(config)?;

    // Create a new runtime for the async operations
    let runtime = tokio::runtime::Runtime::new()?;

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Check => cmd_check(&client).await,
            Commands::Ls { path } => cmd_ls(&client, &path).await,
            Commands::Mkdir { path } => client.mkdir(&path).await,
            Commands::Rm { path } => client.clear(&path).await,
            Commands::Cp { from, to } => client.copy(&from, &to).await,
            Commands::Mv { from, to } => client.move_to(&from, &to).await,
            Commands::Get { remote, local } => client.download(&local, &remote).await,
            Commands::Put { local, remote } => client.upload(&local, &remote).await,
            Commands::Info { path } => cmd_info(&client, &path).await,
            Commands::Free => client
                .free()
                .await
                .map(|bytes| println!("{bytes} bytes available")),
            Commands::Publish { path } => cmd_publish(&client, &path).await,
            Commands::Unpublish { path } => client.unpublish(&path).await,
            Commands::Prop {
                path,
                namespace,
                name,
            } => cmd_prop(&client, &path, &namespace, &name).await,
        }
    });

    if let Err(e) = result {
        // Flush stdout before printing error
        std::io::stdout().flush().ok();
        eprintln!("{}", format_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
