use std::time::Duration;

use reqwest::Client;

use crate::prelude::*;

/// Build a default client with the fixed request timeout.
pub fn try_new() -> Result<Client> {
    Ok(Client::builder().timeout(Duration::from_secs(10)).build()?)
}
