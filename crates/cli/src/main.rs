//! `crowdfund-authz` — inspect the role catalog and evaluate decisions offline.

mod command;

use std::process::ExitCode;

use anyhow::Context;

use crowdfund_auth::{AuthorizationChecker, OrganizationRole, UserRole};

use crate::command::Command;

fn main() -> ExitCode {
    if let Err(err) = crowdfund_observability::init() {
        eprintln!("error: {err}");
        return ExitCode::from(2);
    }

    match run(std::env::args().skip(1)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the evaluated check (if any) was allowed.
fn run(args: impl Iterator<Item = String>) -> anyhow::Result<bool> {
    let command = Command::parse(args)?;
    let checker = AuthorizationChecker::global();

    match command {
        Command::Catalog => {
            let registry = checker.catalog().registry();
            let json = serde_json::to_string_pretty(&registry).context("failed to render registry")?;
            println!("{json}");
            Ok(true)
        }
        Command::CheckPlatform { role_id, privilege } => {
            let allowed = checker.is_role_id_authorized::<UserRole>(role_id, privilege);
            report(allowed);
            Ok(allowed)
        }
        Command::CheckOrganization { role_id, privilege } => {
            let allowed = checker.is_role_id_authorized::<OrganizationRole>(role_id, privilege);
            report(allowed);
            Ok(allowed)
        }
    }
}

fn report(allowed: bool) {
    tracing::info!(allowed, "authorization check evaluated");
    println!("{}", if allowed { "allowed" } else { "denied" });
}
