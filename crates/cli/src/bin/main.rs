//! promptdeck entrypoint

use clap::Parser;
use promptdeck::{App, Command, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = App::parse();
    app.init_tracing();

    match &app.command {
        Command::Chat(cmd) => cmd.run().await,
        Command::Generate => Config::default().save(),
    }
}
