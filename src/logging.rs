// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "SITEBOOK_LOG";

/// Filter directive for a `-v` count when `SITEBOOK_LOG` is not set.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "sitebook=warn",
        1 => "sitebook=info",
        2 => "sitebook=debug",
        _ => "sitebook=trace",
    }
}

/// Installs the stderr subscriber. Stdout stays reserved for tables and JSON.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
