use contribution_dashboard_server::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[rocket::launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let config = envy::from_env::<Config>().expect("Failed to load environment variables");
    tracing::info!(
        window_days = config.window_days,
        profile = %config.activity_profile,
        seeded = config.seed.is_some(),
        "Starting contribution dashboard"
    );

    contribution_dashboard_server::build(config).expect("Failed to build server")
}
