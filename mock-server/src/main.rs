use std::env;

use mock_server::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    init_logging();

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    // Optional credentials so a real client build can point at this server.
    let mut state = AppState::default();
    if let (Ok(user_id), Ok(api_key)) = (env::var("MOCK_USER_ID"), env::var("MOCK_API_KEY")) {
        state = state.with_credentials(&user_id, &api_key);
    }
    mock_server::serve(listener, state).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
