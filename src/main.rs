use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};

use stx::auth::{authorize_url, code_from_input, exchange_code};
use stx::config::{Credentials, API_BASE_URL, SCOPES, TOKEN_URL};
use stx::redirect::check_redirect_uri;
use stx::report::{access_token_if_ok, fetch_profile, granted_scopes, parse_body};

#[tokio::main]
async fn main() -> Result<()> {
    let creds = Credentials::from_env();

    if let Some(note) = check_redirect_uri(&creds.redirect_uri)?.advisory() {
        eprintln!("{note}");
    }

    let url = authorize_url(&creds, &SCOPES, true)?;
    println!("\nOpen this URL in your browser and authorize the app:\n");
    println!("{url}");
    // Best effort; the printed URL is the fallback.
    let _ = webbrowser::open(url.as_str());

    print!("\nPaste the 'code' from the redirect URL: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Error reading the pasted code from stdin")?;
    let code = code_from_input(&line, creds.state())?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let response = exchange_code(&client, TOKEN_URL, &creds, &code).await?;
    let status = response.status();
    let token_json = parse_body(&response.text().await?);

    println!("\nToken response:");
    println!("{token_json:#}");

    match access_token_if_ok(status, &token_json)? {
        Some(access_token) => {
            println!("\nAccess token acquired.");
            println!("Granted scopes: {}", granted_scopes(&token_json));

            let profile = fetch_profile(&client, API_BASE_URL, &access_token).await?;
            println!("\nGET /v1/me -> {}", profile.status.as_u16());
            println!("{}", profile.body);
        }
        None => println!("\nFailed to exchange code. Status: {}", status.as_u16()),
    }

    Ok(())
}
