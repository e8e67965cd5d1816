use clap::Parser;
use rokto_dan::config::{CliArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rokto_dan::init_tracing();

    let cli = CliArgs::parse();
    let config = ServerConfig::from_args(cli)?;

    // Fail fast on bad settings before touching the database.
    config.validate()?;

    rokto_dan::run(config).await
}
