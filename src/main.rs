use clap::Parser;
use quiz_session::Config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    if let Err(e) = quiz_session::logging::init(config.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = quiz_session::run(config).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
