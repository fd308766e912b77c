//! Argument parsing for `crowdfund-authz`.

use anyhow::{Context, bail};

use crowdfund_auth::{Hierarchy, OrganizationPrivilege, PlatformPrivilege};

pub const USAGE: &str = "\
usage:
  crowdfund-authz catalog
  crowdfund-authz check platform <role-id> <PRIVILEGE>
  crowdfund-authz check org <role-id> <PRIVILEGE>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the role registry as JSON.
    Catalog,
    CheckPlatform { role_id: i32, privilege: PlatformPrivilege },
    CheckOrganization { role_id: i32, privilege: OrganizationPrivilege },
}

impl Command {
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match args.as_slice() {
            ["catalog"] => Ok(Command::Catalog),
            ["check", scope, role_id, privilege] => {
                let role_id: i32 = role_id
                    .parse()
                    .with_context(|| format!("role id must be an integer, got '{role_id}'"))?;
                match parse_hierarchy(scope)? {
                    Hierarchy::Platform => Ok(Command::CheckPlatform {
                        role_id,
                        privilege: privilege.parse()?,
                    }),
                    Hierarchy::Organization => Ok(Command::CheckOrganization {
                        role_id,
                        privilege: privilege.parse()?,
                    }),
                }
            }
            _ => bail!("unrecognized arguments\n{USAGE}"),
        }
    }
}

fn parse_hierarchy(s: &str) -> anyhow::Result<Hierarchy> {
    match s {
        "platform" => Ok(Hierarchy::Platform),
        "org" | "organization" => Ok(Hierarchy::Organization),
        other => bail!("unknown hierarchy '{other}' (expected 'platform' or 'org')"),
    }
}
