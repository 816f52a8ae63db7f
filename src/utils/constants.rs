use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::env as std_env;

lazy_static! {
    pub static ref DATABASE_URL: Secret<String> = get_db_url();
    pub static ref APP_ADDRESS: String =
        load_or_default(env::APP_ADDRESS_ENV_VAR, prod::APP_ADDRESS);
}

fn load_env() {
    dotenv().ok();
}

fn get_db_url() -> Secret<String> {
    load_env();
    let db_url = std_env::var(env::DATABASE_URL_ENV_VAR)
        .expect("DATABASE_URL must be set.");
    if db_url.is_empty() {
        panic!("DATABASE_URL must not be empty.");
    }
    Secret::new(db_url)
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) if !value.is_empty() => value,
        _ => String::from(default_value),
    }
}

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const APP_ADDRESS_ENV_VAR: &str = "APP_ADDRESS";
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:8080";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}

pub const MAX_DB_CONNECTIONS: u32 = 5;
