use clap::Parser;

use structptr_cli::Cli;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let stdout = std::io::stdout();
    if let Err(e) = structptr_cli::run(&cli, std::io::stdin().lock(), stdout.lock()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
