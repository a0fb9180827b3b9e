//! `fill`: run one fill operation against a JSON element tree.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use secrecy::SecretString;
use serde::Serialize;
use unique_passwords_accounts::Settings;
use unique_passwords_discovery::{Document, SearchOptions, UsernameHeuristic};
use zeroize::Zeroizing;

use super::generate::derive_for_account;
use super::{read_secret, save_settings, ParameterOverrides};
use crate::fill::{FillContext, FillMessage, FillReply, FillSession};

/// Arguments for `fill`.
#[derive(Debug, Clone, Args)]
pub struct FillArgs {
    /// JSON element tree of the page.
    #[arg(long)]
    pub document: PathBuf,
    /// `id` of the targeted password field.
    #[arg(long)]
    pub password_field: String,
    /// URL of the page.
    #[arg(long)]
    pub url: String,
    /// Keep subdomains instead of the last two labels.
    #[arg(long)]
    pub keep_subdomain: bool,
    /// Username to use instead of the page or cached one.
    #[arg(long)]
    pub username: Option<String>,
    /// Never pick an unrendered field as the username field.
    #[arg(long)]
    pub skip_hidden: bool,
    /// Show the password in the field and in the summary.
    #[arg(long)]
    pub show: bool,
    /// Write the filled element tree here, password field left empty.
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub overrides: ParameterOverrides,
}

/// What a fill operation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSummary {
    /// Normalized domain.
    pub domain: String,
    /// Username the password was derived for.
    pub username: String,
    /// `id` of the discovered username field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_field: Option<String>,
    /// `id` of the password field.
    pub password_field: String,
    /// Whether the password field was switched to plain text.
    pub password_visible: bool,
    /// The password, only when shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Zeroizing<String>>,
}

/// Fill `document`: resolve the username (argument, then page value, then
/// the single cached account), derive, write both fields.
///
/// Returns the summary and whether the account cache changed.
///
/// # Errors
///
/// Returns an error if the password field is missing or derivation fails.
pub fn fill(
    settings: &mut Settings,
    document: &mut Document,
    args: &FillArgs,
    secret: SecretString,
) -> anyhow::Result<(FillSummary, bool)> {
    let context = FillContext::new(&args.url, &args.password_field);
    let domain = context.domain(args.keep_subdomain);
    let heuristic = UsernameHeuristic {
        options: SearchOptions {
            match_hidden_nodes: !args.skip_hidden,
        },
        ..UsernameHeuristic::default()
    };
    let mut session = FillSession::new(document, context, &heuristic)?;

    let page_username = session
        .handle(FillMessage::GetUsername)
        .map(|FillReply::SetUsername { username }| username)
        .unwrap_or_default();
    let username = match &args.username {
        Some(username) => username.clone(),
        None if !page_username.is_empty() => page_username.clone(),
        None => settings
            .cached_accounts
            .suggested_username(&domain)
            .unwrap_or_default()
            .to_string(),
    };
    if username != page_username {
        session.handle(FillMessage::SetUsername {
            username: username.clone(),
        });
    }

    let (_, password, cached) =
        derive_for_account(settings, &domain, &username, &args.overrides, secret)?;
    session.handle(FillMessage::SetPassword {
        password: Zeroizing::new(password.expose().to_string()),
    });
    if args.show {
        session.reveal();
    }

    let summary = FillSummary {
        domain,
        username,
        username_field: session.username_field_id().map(str::to_string),
        password_field: args.password_field.clone(),
        password_visible: session.is_revealed(),
        password: args
            .show
            .then(|| Zeroizing::new(password.expose().to_string())),
    };
    Ok((summary, cached))
}

/// Load the document, fill it, print the summary as JSON.
///
/// # Errors
///
/// Returns document, derivation or I/O failures.
pub fn execute(
    data_dir: &Path,
    args: &FillArgs,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let json = fs::read_to_string(&args.document)
        .with_context(|| format!("cannot read {}", args.document.display()))?;
    let mut document = Document::from_json(&json)?;
    let mut settings = Settings::load(data_dir);
    let secret = read_secret(input)?;

    let (summary, cached) = fill(&mut settings, &mut document, args, secret)?;
    serde_json::to_writer_pretty(&mut *output, &summary)?;
    writeln!(output)?;

    if let Some(path) = &args.output {
        write_document(&mut document, &args.password_field, path)?;
    }
    if cached {
        save_settings(&settings, data_dir)?;
    }
    Ok(())
}

/// Write the filled tree with the password field blanked.
fn write_document(
    document: &mut Document,
    password_field: &str,
    path: &Path,
) -> anyhow::Result<()> {
    let field = document.require_element(password_field)?;
    document.set_value(field, "");
    let json = serde_json::to_string_pretty(&document.to_spec())?;
    fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))
}
