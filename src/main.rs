mod analyzer;
mod cli;
mod config;
mod directions;
mod input;
mod logging;
mod recorder;
mod report;
mod scorer;
mod segment;
mod session;
mod stroke;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
