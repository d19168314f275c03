use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = lore_api::Args::parse();
	lore_api::run(args).await
}
