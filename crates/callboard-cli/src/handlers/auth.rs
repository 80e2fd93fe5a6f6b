use anyhow::Result;
use callboard_client::Credentials;
use callboard_types::{AuthToken, LoginCredentials, RegisterInput};

use crate::context::ExecutionContext;

pub async fn login(ctx: &ExecutionContext, email: String, password: String) -> Result<()> {
    let backend = ctx.backend()?;
    let token = backend
        .login(&LoginCredentials {
            email: email.clone(),
            password,
        })
        .await?;
    store(ctx, token, email.clone())?;
    ctx.say(format!("Logged in as {}", email));
    Ok(())
}

pub async fn register(
    ctx: &ExecutionContext,
    email: String,
    password: String,
    full_name: String,
) -> Result<()> {
    let backend = ctx.backend()?;
    let token = backend
        .register(&RegisterInput {
            email: email.clone(),
            password,
            full_name,
        })
        .await?;
    store(ctx, token, email.clone())?;
    ctx.say(format!("Account created. Logged in as {}", email));
    Ok(())
}

fn store(ctx: &ExecutionContext, token: AuthToken, email: String) -> Result<()> {
    Credentials {
        access_token: token.access_token,
        email: Some(email),
    }
    .save_to(&ctx.credentials_path())?;
    Ok(())
}

pub async fn whoami(ctx: &ExecutionContext) -> Result<()> {
    let user = ctx.authed_backend()?.me().await?;
    ctx.emit(&user, |palette| {
        let mut out = format!("{}\n", palette.heading(&user.email));
        if let Some(name) = &user.full_name {
            out.push_str(&format!("  Name: {}\n", name));
        }
        out.push_str(&format!("  ID:   {}\n", user.id));
        out
    })
}

pub fn logout(ctx: &ExecutionContext) -> Result<()> {
    if Credentials::clear(&ctx.credentials_path())? {
        ctx.say("Logged out");
    } else {
        ctx.say("Not logged in");
    }
    Ok(())
}
