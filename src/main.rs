mod error;
mod input;
mod config;
mod session;
mod flow;
mod formatting;
mod screens;
mod cli;

fn main() {
    use tracing_subscriber::{FmtSubscriber, EnvFilter};

    if let Err(err) = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init() {
        eprintln!("failed to initialize global tracing subscriber: {err}");
    }

    if let Err(err) = cli::start() {
        println!("{}", err);

        std::process::exit(1);
    }
}
