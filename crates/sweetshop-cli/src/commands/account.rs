//! `register`, `login`, `logout`.

use super::ClientContext;
use anyhow::Context;
use std::io::{BufRead, Write};

pub async fn register(ctx: &ClientContext, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = password_or_prompt(password)?;
    let user = ctx.anonymous()?.register(username, &password).await?;
    println!("✔ Registered {} ({})", user.username, user.role);
    println!("Log in with: sweetshop login {}", user.username);
    Ok(())
}

pub async fn login(ctx: &ClientContext, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = password_or_prompt(password)?;
    let mut client = ctx.anonymous()?;
    let session = client.login(username, &password).await?;
    ctx.token_file.save(&session)?;
    tracing::debug!(path = %ctx.token_file.path().display(), "saved session");

    println!(
        "✔ Logged in as {} ({}); session valid until {}",
        username, session.role, session.expires_at
    );
    Ok(())
}

pub fn logout(ctx: &ClientContext) -> anyhow::Result<()> {
    if ctx.token_file.clear()? {
        println!("✔ Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Read the password from stdin when it was not given on the command line.
fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    print!("Password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
