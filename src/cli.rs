use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Optionally specify the path to the config file to use.
    /// If not set, then the `USERFORM_CONFIG_FILE` environment variable will be used,
    /// falling back to the built-in defaults.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a user from the given fields.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a user: fields not given keep their current value.
    Update {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Delete {
        id: i64,
    },
    /// Print every stored user.
    List,
    Show {
        id: i64,
    },
    /// Fill in the form interactively on stdin.
    Form,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "userform",
            "add",
            "--name",
            "A",
            "--email",
            "a@gmail.com",
            "--password",
            "12345678",
            "--phone",
            "1234567890",
            "--city",
            "X",
        ])
        .unwrap();
        let Command::Add { fields } = args.command else {
            panic!("expected add");
        };
        assert_eq!(fields.email.as_deref(), Some("a@gmail.com"));
        assert_eq!(fields.city.as_deref(), Some("X"));
    }

    #[test]
    fn test_parse_update_partial() {
        let args =
            Args::try_parse_from(["userform", "-v", "update", "1", "--city", "NewCity"]).unwrap();
        assert!(args.verbose);
        let Command::Update { id, fields } = args.command else {
            panic!("expected update");
        };
        assert_eq!(id, 1);
        assert_eq!(fields.city.as_deref(), Some("NewCity"));
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        assert!(Args::try_parse_from(["userform", "delete", "one"]).is_err());
    }
}
