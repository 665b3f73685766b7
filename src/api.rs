mod client;
mod solax;
mod source;
mod telegram;

pub use self::{
    solax::{Api as SolaxCloud, ApiVersion as SolaxApiVersion},
    source::{FetchError, RealTimeSource},
    telegram::Api as Telegram,
};
