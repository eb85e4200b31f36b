//! Sign-in commands.

use anyhow::{bail, Context as _, Result};
use chrono::{Local, Utc};
use dialoguer::Input;
use grocer_auth::{normalize_email, AuthSession};
use serde_json::json;

use super::LoginArgs;
use crate::context::Context;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    match args.verify {
        Some(token) => verify(args.email, &token, ctx).await,
        None => send_link(args.email, ctx).await,
    }
}

async fn send_link(email: Option<String>, ctx: &Context) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None if !ctx.output.is_json() => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()?,
        None => bail!("An email address is required"),
    };
    let email = normalize_email(&email)?;

    let backend = ctx.backend()?;
    let mut state = ctx.load_state()?;

    let spinner = ctx.output.spinner("Sending login link...");
    let result = backend.auth().send_magic_link(&email).await;
    spinner.finish_and_clear();
    result.context("Failed to send login email")?;

    state.pending_email = Some(email.clone());
    ctx.save_state(&state)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "email": email, "sent": true }));
    } else {
        ctx.output.success("Check your email for the login link!");
        ctx.output
            .info("Follow the link, or run `grocer login --verify <token>` with the emailed code.");
    }
    Ok(())
}

async fn verify(email: Option<String>, token: &str, ctx: &Context) -> Result<()> {
    let mut state = ctx.load_state()?;
    let Some(email) = email.or_else(|| state.pending_email.clone()) else {
        bail!("No pending login. Run `grocer login <email>` first, or pass the email again.");
    };

    let backend = ctx.backend()?;
    let spinner = ctx.output.spinner("Verifying...");
    let result = backend.auth().verify_otp(&email, token).await;
    spinner.finish_and_clear();
    let session = result.context("Failed to sign in")?;

    state.session = Some(session.clone());
    state.pending_email = None;
    ctx.save_state(&state)?;

    if ctx.output.is_json() {
        ctx.output.json(&session_summary(&session));
    } else {
        ctx.output
            .success(&format!("Signed in as {}", session.user.display_name()));
    }
    Ok(())
}

/// Run the logout command.
pub async fn logout(ctx: &Context) -> Result<()> {
    let mut state = ctx.load_state()?;
    let Some(session) = state.session.take() else {
        ctx.output.info("Not signed in.");
        return Ok(());
    };

    // Local sign-out happens even if the server call fails.
    match ctx.backend() {
        Ok(backend) => {
            if let Err(e) = backend.auth().sign_out(&session.access_token).await {
                tracing::warn!(error = %e, "remote sign-out failed");
                ctx.output
                    .warn("Could not reach the server; signed out locally.");
            }
        }
        Err(e) => tracing::warn!(error = %e, "skipping remote sign-out"),
    }

    state.sign_out();
    ctx.save_state(&state)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "signed_out": true }));
    } else {
        ctx.output.success("Signed out");
    }
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let backend = ctx.backend()?;
    let mut state = ctx.load_state()?;
    let session = ctx.session(&backend, &mut state).await?;

    let spinner = ctx.output.spinner("Checking session...");
    let result = backend.auth().get_user(&session.access_token).await;
    spinner.finish_and_clear();
    let user = result.context("Failed to fetch the signed-in user")?;

    if ctx.output.is_json() {
        let mut summary = session_summary(&session);
        summary["email_verified"] = json!(user.is_email_verified());
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header("Signed in");
    ctx.output.kv("email", user.display_name());
    ctx.output.kv("user id", user.id.as_str());
    ctx.output.kv(
        "session expires",
        &session
            .expires_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    );
    Ok(())
}

fn session_summary(session: &AuthSession) -> serde_json::Value {
    json!({
        "user_id": session.user.id,
        "email": session.user.email,
        "expires_at": session.expires_at,
        "expires_in_secs": session.time_to_expiry_at(Utc::now()).max(0),
    })
}
