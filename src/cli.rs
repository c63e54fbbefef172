use clap::{value_parser, Arg, ArgAction, Command};

use crate::auth::Permissions;
use crate::config::Overrides;

pub fn ask() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("secret")
                .short('s')
                .long("secret")
                .help("Secret to generate and authenticate the token")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to .joblyrc file")
                .default_value(".joblyrc")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Makes Jobly verbose. Useful for debugging and seeing what's going on \"under the hood\"")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("serve")
                .about("Start the jobs API")
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Custom server port")
                        .value_parser(value_parser!(u16)),
                )
                .arg(
                    Arg::new("database")
                        .short('d')
                        .long("database")
                        .help("Database directory"),
                ),
        )
        .subcommand(
            Command::new("token")
                .about("Create a token based on the secret to authorize API calls")
                .arg(
                    Arg::new("permissions")
                        .short('p')
                        .long("permissions")
                        .help("Comma separated token permissions, e.g. job:write")
                        .value_delimiter(',')
                        .value_parser(value_parser!(Permissions)),
                )
                .arg(
                    Arg::new("duration")
                        .short('d')
                        .long("duration")
                        .help("Token duration until expires in minutes")
                        .default_value("43800")
                        .value_parser(value_parser!(i64)),
                ),
        )
}

/// Collects the flags that override config file values.
pub fn overrides(matches: &clap::ArgMatches) -> Overrides {
    Overrides {
        port: matches.get_one::<u16>("port").copied(),
        database: matches.get_one::<String>("database").cloned(),
        secret: matches.get_one::<String>("secret").cloned(),
    }
}
