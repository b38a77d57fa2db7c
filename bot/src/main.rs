use pricescout_core::ConfigError;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    pricescout_bot::init_tracing();

    match pricescout_bot::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ConfigError::MissingCredential { var }) = e.downcast_ref::<ConfigError>() {
                eprintln!("Установи переменную окружения {var} с токеном бота");
            } else {
                error!(error = %format!("{e:#}"), "bot stopped");
                eprintln!("pricescout-bot: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
