use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub keyring_url: String,
    pub feature_announcements_url: Option<String>,
    pub onchain_notifications_url: Option<String>,
    pub notifications_auth_token: Option<String>,
    pub notification_poll_secs: u64,
    pub tx_poll_secs: u64,
    pub known_token_contracts: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/wallet.db".to_string()),
            rpc_url: env::var("RPC_URL").expect("RPC_URL must be set"),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("CHAIN_ID must be a valid number"),
            keyring_url: env::var("KEYRING_URL").expect("KEYRING_URL must be set"),
            feature_announcements_url: env::var("FEATURE_ANNOUNCEMENTS_URL").ok(),
            onchain_notifications_url: env::var("ONCHAIN_NOTIFICATIONS_URL").ok(),
            notifications_auth_token: env::var("NOTIFICATIONS_AUTH_TOKEN").ok(),
            notification_poll_secs: env::var("NOTIFICATION_POLL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("NOTIFICATION_POLL_SECS must be a valid number"),
            tx_poll_secs: env::var("TX_POLL_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("TX_POLL_SECS must be a valid number"),
            known_token_contracts: env::var("KNOWN_TOKEN_CONTRACTS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
