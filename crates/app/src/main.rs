mod capture;
mod cli;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = cli::parse_config()?;
    capture::init_tracing(config.verbose)?;
    capture::run(config)
}
