use std::{error::Error, sync::Arc};

use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;
use server::{IdentityVerifier, JwtVerifier};
use settings::{Auth, Database};

mod settings;

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let verifier = build_verifier(&settings.auth)?;

    let db = connect(&settings.server.database).await.inspect_err(|err| {
        tracing::error!("failed to initialize database: {err}");
    })?;
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .inspect_err(|err| tracing::error!("failed to build engine from database: {err}"))?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .inspect_err(|err| tracing::error!("failed to bind {addr}: {err}"))?;

    server::run_with_listener(engine, verifier, listener).await?;
    Ok(())
}

async fn connect(config: &Database) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let options = match config {
        // Every pooled connection would otherwise open its own empty database.
        Database::Memory => {
            let mut options = ConnectOptions::new("sqlite::memory:");
            options.max_connections(1);
            options
        }
        Database::Url(url) => ConnectOptions::new(url.clone()),
    };

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

fn build_verifier(auth: &Auth) -> Result<Arc<dyn IdentityVerifier>, BoxError> {
    let issuer = auth.issuer.as_deref();

    if let Some(secret) = auth.secret.as_deref().filter(|s| !s.is_empty()) {
        tracing::info!("verifying HS256 tokens for audience {}", auth.audience);
        return Ok(Arc::new(JwtVerifier::hs256(
            secret.as_bytes(),
            &auth.audience,
            issuer,
        )));
    }

    if let Some(path) = auth.public_key_pem.as_deref() {
        let pem = std::fs::read(path)
            .map_err(|err| format!("cannot read public key {path}: {err}"))?;
        tracing::info!("verifying RS256 tokens for audience {}", auth.audience);
        return Ok(Arc::new(JwtVerifier::rs256_pem(&pem, &auth.audience, issuer)?));
    }

    Err("auth requires either `secret` or `public_key_pem`".into())
}
