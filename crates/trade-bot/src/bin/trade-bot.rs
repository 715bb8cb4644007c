//! Order bot CLI
//!
//! Run the conversation over stdin, or serve it over WebSocket.
//!
//! # Usage
//!
//! ```bash
//! # Interactive REPL
//! cargo run --bin trade-bot -p trade-bot -- repl
//!
//! # WebSocket server
//! cargo run --bin trade-bot -p trade-bot -- serve --bind 0.0.0.0:8000
//! ```

use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, BufRead, Write};
use trade_bot::{server, BotConfig, OrderBot};

#[derive(Parser)]
#[command(name = "trade-bot", version, about = "Simulated crypto order bot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive conversation on stdin/stdout
    Repl,
    /// Serve conversations over WebSocket
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "warn,trade_bot=info".to_string()))
        .init();

    let cli = Cli::parse();
    let bot = OrderBot::new(BotConfig::default())?;

    match cli.command {
        Command::Repl => run_repl(bot).await,
        Command::Serve { bind } => {
            server::serve(bot, &bind).await?;
            Ok(())
        }
    }
}

async fn run_repl(bot: OrderBot) -> anyhow::Result<()> {
    const REPL_SESSION: &str = "repl";

    println!("{}\n", bot.welcome());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // Transport-level exit; never part of the conversation itself.
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        match bot.handle_message(REPL_SESSION, input).await {
            Ok(reply) => println!("{reply}\n"),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
