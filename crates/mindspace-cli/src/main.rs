use eyre::Result;

mod config;
mod screen;

fn main() -> Result<()> {
    color_eyre::install()?;

    init_logging();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_command(std::env::args().nth(1)));
    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}

/// Logs go to stderr; stdout is the screening UI. `MINDSPACE_LOG_FORMAT=json`
/// switches to structured JSON lines.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("MINDSPACE_LOG_FORMAT").is_ok_and(|f| f == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_command(command: Option<String>) -> Result<()> {
    match command.as_deref() {
        None | Some("screen") => {
            let config = config::load_config()?.with_env_overrides();
            screen::run(&config).await
        }
        Some("config") => {
            let config = config::load_config()?.with_env_overrides();
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Some("init") => {
            let path = config::config_path()?;
            if path.exists() {
                return Err(eyre::eyre!("config already exists at {}", path.display()));
            }
            let path = config::save_config(&config::MindspaceConfig::default())?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Some(other) => Err(eyre::eyre!(
            "unknown command '{other}'; expected one of: screen, config, init"
        )),
    }
}
