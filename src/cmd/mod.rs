mod auth;
mod output;
mod profile;
mod review;

pub use auth::{cmd_login, cmd_logout, cmd_signup, cmd_whoami};
pub use profile::{cmd_profile_show, cmd_profile_update};
pub use review::{
    cmd_comment_add, cmd_comment_delete, cmd_comment_list, cmd_draw, cmd_drawings,
    cmd_drawings_clear, cmd_seek, cmd_task_add, cmd_task_delete, cmd_task_edit, cmd_task_list,
    cmd_task_toggle,
};

use anyhow::Result;

use trackerops::{ApiClient, AuthStore, Config, FileStore, ReviewSession};

/// Auth store over the REST backend and the on-disk session
fn auth_store(config: &Config) -> Result<AuthStore<ApiClient, FileStore>> {
    let client = ApiClient::from_config(config)?;
    Ok(AuthStore::new(client, FileStore::in_dir(&config.data_dir)))
}

/// Review workspace with the player already loaded
fn review_session(config: &Config) -> ReviewSession<FileStore> {
    let mut session = ReviewSession::open(FileStore::in_dir(&config.data_dir), config);
    session.player_mut().mark_ready(config.video_duration_secs);
    session
}
