use jira_scraper::Config;

#[tokio::main]
async fn main() {
    // Real environment variables take precedence over both files.
    dotenv::from_filename(".env.production").ok();
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if let Err(e) = jira_scraper::run(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
