//! Sign-in, sign-out and registration handlers.

use std::io::{self, BufRead, Write};

use acty_core::auth;
use acty_core::session::mask_token;
use anyhow::Result;

use super::Context;

pub async fn signin(
    ctx: &Context,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    let client = ctx.signin_client()?;
    let token = match auth::sign_in(
        &client,
        ctx.config.effective_token_path(),
        &username,
        &password,
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            tracing::debug!(error = %e, "sign-in failed");
            anyhow::bail!("{}", e.user_message());
        }
    };

    println!("✓ Signed in as {} (token: {})", username.trim(), mask_token(&token));
    println!("  Session saved to: {}", ctx.session().path().display());
    Ok(())
}

pub fn signout(ctx: &Context) -> Result<()> {
    let client = ctx.signin_client()?;
    if auth::sign_out(&client)? {
        println!("✓ Signed out");
        println!("  Session removed from: {}", ctx.session().path().display());
    } else {
        println!("Not signed in (no session found).");
    }
    Ok(())
}

pub fn register() -> Result<()> {
    anyhow::bail!("Registration is not available yet. Ask an administrator for an account.")
}

/// Reads one line from stdin after printing `label`.
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
