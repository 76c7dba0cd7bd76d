use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Context;
use log::debug;

use crate::form::{FormSession, Notice};
use crate::record::{Field, UserId};
use crate::render::render_session;
use crate::storage::KeyValueStorage;

const HELP: &str = r#"Form commands:
 - set <field> <value>: type into one of the inputs (name, email, password, phone, city).
 - submit: press the Add User / Update User button.
 - edit <id>: load a user into the form for editing.
 - delete <id>: delete a user.
 - toggle: show or hide the user list.
 - cancel: clear the form and stop editing.
 - show: redraw the form.
 - h | help: show this help message.
 - q | quit: leave the form.
"#;

#[derive(Debug, PartialEq, Eq)]
enum FormCommand {
    Set(Field, String),
    Submit,
    Edit(UserId),
    Delete(UserId),
    Toggle,
    Cancel,
    Show,
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>) -> Result<UserId, String> {
    let arg = arg.ok_or_else(|| "Expected a user ID".to_owned())?;
    arg.trim()
        .parse::<i64>()
        .map(UserId)
        .map_err(|_| format!("Not a user ID: {arg}"))
}

fn parse_command(line: &str) -> Result<FormCommand, String> {
    // only the line terminator and leading blanks go; field values keep trailing spaces
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, Some(rest.trim_start())),
        None => (line.trim_end(), None),
    };

    match command {
        "set" => {
            let rest = rest.ok_or_else(|| "Expected: set <field> <value>".to_owned())?;
            let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let field = Field::from_str(field).map_err(|_| format!("Unknown field {field}"))?;
            Ok(FormCommand::Set(field, value.to_owned()))
        }
        "submit" => Ok(FormCommand::Submit),
        "edit" => parse_id(rest).map(FormCommand::Edit),
        "delete" => parse_id(rest).map(FormCommand::Delete),
        "toggle" => Ok(FormCommand::Toggle),
        "cancel" => Ok(FormCommand::Cancel),
        "show" => Ok(FormCommand::Show),
        "h" | "help" => Ok(FormCommand::Help),
        "q" | "quit" | "exit" => Ok(FormCommand::Quit),
        unknown => Err(format!("Unrecognized command {unknown}")),
    }
}

fn print_notice<W: Write>(out: &mut W, notice: &Notice) -> std::io::Result<()> {
    match notice {
        Notice::Success(message) => writeln!(out, "** {message}"),
        Notice::Failure(message) => writeln!(out, "!! {message}"),
    }
}

/// Drive the form from line-based input until `quit` or end of input.
pub fn run_form<S, R, W>(session: &mut FormSession<S>, input: R, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStorage,
    R: BufRead,
    W: Write,
{
    write!(out, "{}", render_session(session))?;

    for line in input.lines() {
        let line = line.context("Reading form input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "Error: {message}\n")?;
                out.write_all(HELP.as_bytes())?;
                continue;
            }
        };
        debug!("Form command: {command:?}");

        match command {
            FormCommand::Set(field, value) => session.set_field(field, value),
            FormCommand::Submit => {
                let notice = session.submit()?;
                print_notice(out, &notice)?;
            }
            FormCommand::Edit(id) => {
                let notice = session.begin_edit(id);
                print_notice(out, &notice)?;
            }
            FormCommand::Delete(id) => {
                let notice = session.delete(id)?;
                print_notice(out, &notice)?;
            }
            FormCommand::Toggle => session.toggle_list(),
            FormCommand::Cancel => session.cancel_edit(),
            FormCommand::Show => {}
            FormCommand::Help => {
                out.write_all(HELP.as_bytes())?;
                continue;
            }
            FormCommand::Quit => break,
        }

        write!(out, "{}", render_session(session))?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::{IdPolicy, RecordStore};

    fn run(script: &str) -> (FormSession<MemoryStorage>, String) {
        let mut session =
            FormSession::new(RecordStore::load(MemoryStorage::new(), IdPolicy::default()).unwrap());
        let mut out = Vec::new();
        run_form(&mut session, script.as_bytes(), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("set city New York"),
            Ok(FormCommand::Set(Field::City, "New York".to_owned()))
        );
        assert_eq!(
            parse_command("set name"),
            Ok(FormCommand::Set(Field::Name, String::new()))
        );
        assert_eq!(
            parse_command("set password 1234567 "),
            Ok(FormCommand::Set(Field::Password, "1234567 ".to_owned()))
        );
        assert_eq!(
            parse_command("  set  city  Oslo\r\n"),
            Ok(FormCommand::Set(Field::City, " Oslo".to_owned()))
        );
        assert_eq!(parse_command("edit 3"), Ok(FormCommand::Edit(UserId(3))));
        assert_eq!(parse_command("edit 3 "), Ok(FormCommand::Edit(UserId(3))));
        assert_eq!(parse_command("  q  "), Ok(FormCommand::Quit));
        assert!(parse_command("set id 4").is_err());
        assert!(parse_command("delete").is_err());
        assert!(parse_command("delete x").is_err());
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn test_add_edit_update_script() {
        let script = "\
set name A
set email a@gmail.com
set password 12345678
set phone 1234567890
set city X
submit
edit 1
set city NewCity
submit
toggle
quit
set name ignored
";
        let (session, out) = run(script);
        assert!(out.contains("** User added successfully!"));
        assert!(out.contains("** Editing user #1"));
        assert!(out.contains("[Update User]"));
        assert!(out.contains("** User updated successfully!"));
        assert!(out.contains("City: NewCity"));

        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().records()[0].city, "NewCity");
        assert_eq!(session.editing(), None);
        assert!(session.form().is_blank());
    }

    #[test]
    fn test_trailing_space_counts_toward_password() {
        let script = "set name A\nset email a@gmail.com\nset password 1234567 \nset phone 1234567890\nset city X\nsubmit\n";
        let (session, out) = run(script);
        assert!(out.contains("** User added successfully!"));
        assert_eq!(session.store().records()[0].password, "1234567 ");
    }

    #[test]
    fn test_failure_notices_and_bad_input() {
        let script = "\
set email b@yahoo.com
submit
bogus
delete 9
";
        let (session, out) = run(script);
        assert!(out.contains("!! Please fill in all fields."));
        assert!(out.contains("Error: Unrecognized command bogus"));
        assert!(out.contains("** User deleted successfully!"));
        assert!(session.store().is_empty());
    }
}
