use std::path::PathBuf;

use anyhow::{bail, Result};

use trackerops::auth::{load_profile_photo, to_data_uri};
use trackerops::{ClientError, Config, ProfileUpdate, UserBackend};

use super::auth_store;
use super::output::{print_session_user, print_user};

pub async fn cmd_profile_show(config: &Config) -> Result<()> {
    let mut auth = auth_store(config)?;
    let Some(session) = auth.check_auth_state()? else {
        bail!(ClientError::NotAuthenticated);
    };

    println!("🌐 Fetching profile from {}", auth.backend().base_url());

    let user = auth.backend().get_user(session.id).await?;
    print_user(&user);
    Ok(())
}

pub async fn cmd_profile_update(
    config: &Config,
    name: Option<String>,
    email: Option<String>,
    organization: Option<String>,
    photo: Option<PathBuf>,
) -> Result<()> {
    let mut auth = auth_store(config)?;
    if auth.check_auth_state()?.is_none() {
        bail!(ClientError::NotAuthenticated);
    }

    let profile_image = match photo {
        Some(path) => {
            let (bytes, mime) = load_profile_photo(&path).await?;
            println!("🖼️  Photo: {} ({} bytes, {mime})", path.display(), bytes.len());
            Some(to_data_uri(&bytes, mime))
        }
        None => None,
    };

    let update = ProfileUpdate { name, email, organization, profile_image };
    let saved = auth.update_profile(&update).await?;

    println!("✅ Profile saved");
    print_session_user(&saved);
    Ok(())
}
