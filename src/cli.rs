use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::api::SolaxApiVersion;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stand guard: poll the inverter and answer Telegram commands.
    #[clap(name = "sentry")]
    Sentry(SentryArgs),

    /// Poll the inverter and log every reading, without the bot.
    #[clap(name = "forage")]
    Forage(ForageArgs),

    /// Fetch a single reading and print it.
    #[clap(name = "peek")]
    Peek(PeekArgs),
}

#[derive(Parser)]
pub struct SentryArgs {
    #[clap(flatten)]
    pub solax: SolaxApiArgs,

    #[clap(flatten)]
    pub telegram: TelegramArgs,

    #[clap(flatten)]
    pub poll: PollArgs,
}

#[derive(Parser)]
pub struct ForageArgs {
    #[clap(flatten)]
    pub solax: SolaxApiArgs,

    #[clap(flatten)]
    pub poll: PollArgs,
}

#[derive(Parser)]
pub struct PeekArgs {
    #[clap(flatten)]
    pub solax: SolaxApiArgs,
}

#[derive(Parser)]
pub struct SolaxApiArgs {
    #[clap(
        long = "solax-endpoint",
        env = "SOLAX_ENDPOINT",
        default_value = "https://global.solaxcloud.com:9443"
    )]
    pub endpoint: Url,

    #[clap(long = "solax-token", env = "SOLAX_TOKEN_ID")]
    pub token_id: String,

    #[clap(long, alias = "serial", env = "SOLAX_SERIAL_NUMBER")]
    pub serial_number: String,

    #[clap(
        long = "solax-api-version",
        env = "SOLAX_API_VERSION",
        default_value = "v1",
        value_enum
    )]
    pub api_version: SolaxApiVersion,
}

#[derive(Parser)]
pub struct TelegramArgs {
    #[clap(long = "bot-token", env = "TELEGRAM_BOT_TOKEN")]
    pub bot_token: String,

    #[clap(
        long = "telegram-endpoint",
        env = "TELEGRAM_ENDPOINT",
        default_value = "https://api.telegram.org"
    )]
    pub endpoint: Url,
}

#[derive(Parser)]
pub struct PollArgs {
    /// Seconds between two fetches.
    #[clap(long = "poll-period-secs", default_value = "60", env = "POLL_PERIOD_SECS")]
    pub period_secs: u64,
}

impl PollArgs {
    #[must_use]
    pub const fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}
