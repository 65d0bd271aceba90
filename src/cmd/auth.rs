use anyhow::Result;

use trackerops::{Config, Credentials, SignupRequest};

use super::auth_store;
use super::output::print_session_user;

pub async fn cmd_signup(
    config: &Config,
    name: String,
    email: String,
    organization: String,
    password: String,
) -> Result<()> {
    let mut auth = auth_store(config)?;

    println!("📝 Creating account for {email}");

    let request = SignupRequest { name, email, organization, password };
    let user = auth.signup(&request).await?;

    println!("✅ Account created (id {})", user.id);
    println!("   Log in with: trackerops login --email {}", user.email);
    Ok(())
}

pub async fn cmd_login(config: &Config, email: &str, password: &str) -> Result<()> {
    let mut auth = auth_store(config)?;

    println!("🔐 Logging in as {email}");

    let user = auth.login(&Credentials::new(email, password)).await?;

    println!("✅ Welcome, {}", user.name);
    Ok(())
}

pub fn cmd_logout(config: &Config) -> Result<()> {
    let mut auth = auth_store(config)?;
    let was_signed_in = auth.check_auth_state()?.is_some();
    auth.logout()?;

    if was_signed_in {
        println!("👋 Logged out");
    } else {
        println!("👋 No session to clear");
    }
    Ok(())
}

pub fn cmd_whoami(config: &Config) -> Result<()> {
    let mut auth = auth_store(config)?;

    match auth.check_auth_state()? {
        Some(user) => print_session_user(&user),
        None => {
            println!("❌ Not signed in");
            println!("   Run: trackerops login --email <EMAIL> --password <PASSWORD>");
        }
    }
    Ok(())
}
