use anyhow::Result;
use st_cli::{init_tracing, output::Output, Cli, Parser};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let api = cli.backend.connect()?;
    let out = Output::new(cli.json);

    cli.command.run(api.as_ref(), &out).await
}
