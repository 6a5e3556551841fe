use std::net::SocketAddr;

use clap::Parser;
use sqlx::postgres::PgConnectOptions;

use crate::auth::CredentialPolicy;

/// GoBeSi student enrollment server
#[derive(Debug, Clone, Parser)]
#[command(name = "gobesi-server", version)]
pub struct Args {
    /// Address the HTTP form endpoint listens on
    #[arg(long, env = "GOBESI_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[arg(long, env = "GOBESI_DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, env = "GOBESI_DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    #[arg(long, env = "GOBESI_DB_USER", default_value = "postgres")]
    pub db_user: String,

    #[arg(long, env = "GOBESI_DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    #[arg(long, env = "GOBESI_DB_NAME", default_value = "gobesi")]
    pub db_name: String,

    /// Store PBKDF2 hashes instead of plain-text passwords
    #[arg(long, env = "GOBESI_HASH_PASSWORDS")]
    pub hash_passwords: bool,
}

impl Args {
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .database(&self.db_name);
        if self.db_password.is_empty() {
            options
        } else {
            options.password(&self.db_password)
        }
    }

    pub fn credential_policy(&self) -> CredentialPolicy {
        CredentialPolicy::from_flag(self.hash_passwords)
    }
}
