//! # Vinilo CLI
//!
//! Command-line interface for the album receipt generator.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the browser form UI
//! vinilo serve --listen 0.0.0.0:8080
//!
//! # Render the demo receipt straight to a PNG
//! vinilo render --demo --png receipt.png
//!
//! # Render at native resolution
//! vinilo render --demo --scale 1 --png receipt.png
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vinilo::{
    ViniloError,
    export::{Capture, CaptureOptions, RasterCapture},
    form::ReceiptForm,
    receipt::{self, RandomCode},
    server::{self, ServerConfig},
};

/// Vinilo - album receipt generator
#[derive(Parser, Debug)]
#[command(name = "vinilo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the browser form UI
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },
    /// Render a receipt to a PNG file without the server
    Render {
        /// Output PNG path
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Use the seeded demo album instead of an empty form
        #[arg(long)]
        demo: bool,

        /// Resolution multiplier
        #[arg(long, default_value = "2")]
        scale: u32,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ViniloError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            server::serve(ServerConfig { listen_addr: listen }).await?;
        }
        Commands::Render { png, demo, scale } => {
            let form = if demo { ReceiptForm::demo() } else { ReceiptForm::new() };
            let view = receipt::project(&form, &RandomCode);

            let capture = RasterCapture::new();
            let options = CaptureOptions { scale, ..Default::default() };
            let image = capture.capture(&view, &options).await?;

            std::fs::write(&png, &image.png)?;
            println!(
                "Saved {}x{} receipt to {}",
                image.width,
                image.height,
                png.display()
            );
        }
    }

    Ok(())
}
