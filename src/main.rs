use clap::Parser;
use retire::api::{ApiError, Cli, Command, render_violations, run_calc, run_http_server};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                log::error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Calc(args) => match run_calc(&args) {
            Ok(report) => print!("{report}"),
            Err(ApiError::Invalid(err)) => {
                eprintln!("{}", render_violations(&err, args.locale.into()));
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
