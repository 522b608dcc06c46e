use contact_service::api;
use contact_service::common::init;
use contact_service::settings::AppSettings;
use contact_service::workers::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load_from_env()?;
    init::initialize_logging(&settings);
    match settings.app_component.as_str() {
        "api" => api::serve(&settings).await,
        "seed" => seed::serve(&settings).await,
        other => anyhow::bail!("Unknown app component: {other}"),
    }
}
