//! LrpBuilder - DesireAppMessage から DesiredLrp を組み立てる
//!
//! I/O なしの純粋な変換。action 組み立てのエッジケースはここでテストする。

use crate::domain::{
    APP_LOG_SOURCE, DesireAppMessage, DesiredLrp, DownloadAction, EnvironmentVariable,
    ExecutorAction, LogConfig, LrpState, ProcessGuid, RunAction,
};

/// Only instance zero is desired at this stage.
pub const DESIRED_INSTANCE_INDEX: u32 = 0;

/// Where the droplet is placed (and extracted) inside the container.
pub const DROPLET_DESTINATION: &str = ".";

/// Directory the start command runs from, once the droplet is extracted.
pub const APP_DIRECTORY: &str = "./app";

const DROPLET_CACHE_PREFIX: &str = "droplets-";

pub fn droplet_cache_key(guid: &ProcessGuid) -> String {
    format!("{DROPLET_CACHE_PREFIX}{guid}")
}

/// Assemble the descriptor: download the droplet, then run the start command.
pub fn build_desired_lrp(message: &DesireAppMessage, env: Vec<EnvironmentVariable>) -> DesiredLrp {
    let guid = message.process_guid();

    let download = DownloadAction {
        from: message.droplet_uri.clone(),
        to: DROPLET_DESTINATION.to_string(),
        extract: true,
        cache_key: droplet_cache_key(&guid),
    };
    let run = RunAction {
        script: format!("cd {APP_DIRECTORY} && {}", message.start_command),
        env,
    };

    DesiredLrp {
        guid,
        state: LrpState::Desired,
        log: LogConfig {
            guid: message.app_id.clone(),
            source_name: APP_LOG_SOURCE.to_string(),
            index: Some(DESIRED_INSTANCE_INDEX),
        },
        actions: vec![ExecutorAction::Download(download), ExecutorAction::Run(run)],
    }
}
