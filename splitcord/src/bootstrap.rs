use crate::{handler::BotHandler, registry::PanelRegistry};
use serenity::{
    Client,
    all::{GatewayIntents, GuildId},
};
use splitcord_infrastructure::{Database, PgLedgerStore};
use std::env;

/// Application configuration, loaded once at startup.
pub struct AppConfig {
    pub token: String,
    pub database_url: String,
    pub command_guild: Option<GuildId>,
    pub intents: GatewayIntents,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let token = env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN is not set");
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set");
        let command_guild = env::var("COMMAND_GUILD_ID").ok().map(|raw| {
            let id: u64 = raw
                .parse()
                .expect("COMMAND_GUILD_ID is not a numeric guild id");
            GuildId::new(id)
        });
        // Commands and components arrive on the interaction stream, so no
        // privileged intents are needed.
        let intents = GatewayIntents::GUILDS;

        Self {
            token,
            database_url,
            command_guild,
            intents,
        }
    }
}

/// Builds and configures the Discord client with all dependencies
pub struct AppBuilder;

impl AppBuilder {
    pub async fn build(config: &AppConfig, database: &Database) -> Result<Client, serenity::Error> {
        let ledger = PgLedgerStore::new(database);
        let registry = PanelRegistry::new();
        let handler: BotHandler<PgLedgerStore> =
            BotHandler::new(ledger, registry, config.command_guild);

        Client::builder(&config.token, config.intents)
            .event_handler(handler)
            .await
    }
}

/// Initialize logging and tracing
pub fn init_logging() {
    tracing_subscriber::fmt::init();
}

/// Run the application with proper error handling
pub async fn run() {
    init_logging();

    let config = AppConfig::from_env();

    let database = match Database::connect(&config.database_url).await {
        Ok(database) => database,
        Err(e) => {
            tracing::error!("Failed to connect to PostgreSQL: {:?}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = database.ensure_schema().await {
        tracing::error!("Failed to prepare the ledger schema: {:?}", e);
        std::process::exit(1);
    }

    let mut client = match AppBuilder::build(&config, &database).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create client: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(why) = client.start().await {
        tracing::error!("Client error: {:?}", why);
    }
}
